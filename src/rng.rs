/// Source of uniform randomness in `[0, 1)`.
pub trait RandomSource {
    fn next_f64(&mut self) -> f64;

    /// Index in `0..len`; `len` must be non-zero.
    fn next_index(&mut self, len: usize) -> usize {
        let i = (self.next_f64() * len as f64).floor() as usize;
        i.min(len.saturating_sub(1))
    }

    fn coin_flip(&mut self) -> bool {
        self.next_f64() > 0.5
    }
}

/// Browser `Math.random()`.
#[derive(Clone, Copy, Debug, Default)]
pub struct JsRandom;

impl RandomSource for JsRandom {
    fn next_f64(&mut self) -> f64 {
        js_sys::Math::random()
    }
}

/// Replays a fixed list of values, cycling when exhausted.
#[cfg(test)]
#[derive(Clone, Debug)]
pub struct SequenceRandom {
    values: Vec<f64>,
    pos: usize,
}

#[cfg(test)]
impl SequenceRandom {
    pub fn new(values: &[f64]) -> Self {
        assert!(!values.is_empty());
        Self {
            values: values.to_vec(),
            pos: 0,
        }
    }
}

#[cfg(test)]
impl RandomSource for SequenceRandom {
    fn next_f64(&mut self) -> f64 {
        let v = self.values[self.pos % self.values.len()];
        self.pos += 1;
        v
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_stays_in_range() {
        let mut rng = SequenceRandom::new(&[0.0, 0.5, 0.999_999]);
        assert_eq!(rng.next_index(10), 0);
        assert_eq!(rng.next_index(10), 5);
        assert_eq!(rng.next_index(10), 9);
    }
}
