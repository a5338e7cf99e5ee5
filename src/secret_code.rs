use std::collections::VecDeque;

pub const SECRET_CODE: &str = "VIRGEN";
/// How long the reveal overlay stays up.
pub const REVEAL_MS: u32 = 8000;

/// Watches typed letters for [`SECRET_CODE`].
#[derive(Clone, Debug, Default)]
pub struct SecretCodeDetector {
    window: VecDeque<char>,
}

impl SecretCodeDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds a `KeyboardEvent.key`. Returns true on the key that completes
    /// the code; the window is then cleared.
    pub fn feed(&mut self, key: &str) -> bool {
        let mut chars = key.chars();
        let (Some(c), None) = (chars.next(), chars.next()) else {
            return false;
        };
        if !c.is_ascii_alphabetic() {
            return false;
        }
        let len = SECRET_CODE.len();
        self.window.push_back(c.to_ascii_uppercase());
        while self.window.len() > len {
            self.window.pop_front();
        }
        if self.window.iter().copied().eq(SECRET_CODE.chars()) {
            self.window.clear();
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed_all(d: &mut SecretCodeDetector, keys: &[&str]) -> Vec<bool> {
        keys.iter().map(|k| d.feed(k)).collect()
    }

    #[test]
    fn fires_on_last_letter_only() {
        let mut d = SecretCodeDetector::new();
        let hits = feed_all(&mut d, &["v", "i", "r", "g", "e", "n"]);
        assert_eq!(hits, vec![false, false, false, false, false, true]);
    }

    #[test]
    fn ignores_non_letters_and_accepts_prefix_noise() {
        let mut d = SecretCodeDetector::new();
        let hits = feed_all(
            &mut d,
            &["x", "V", "Shift", "I", "1", "R", "ArrowUp", "G", "E", " ", "N"],
        );
        assert_eq!(hits.iter().filter(|h| **h).count(), 1);
        assert_eq!(hits.last(), Some(&true));
    }

    #[test]
    fn resets_after_firing() {
        let mut d = SecretCodeDetector::new();
        feed_all(&mut d, &["v", "i", "r", "g", "e", "n"]);
        // "N" alone must not complete a code from leftovers.
        assert!(!d.feed("n"));
        let again = feed_all(&mut d, &["v", "i", "r", "g", "e", "n"]);
        assert_eq!(again.last(), Some(&true));
    }

    #[test]
    fn interrupted_sequence_does_not_fire() {
        let mut d = SecretCodeDetector::new();
        let hits = feed_all(&mut d, &["v", "i", "r", "x", "g", "e", "n"]);
        assert!(hits.iter().all(|h| !h));
    }
}
