//! Minigame simulations. Each game is a plain state struct with pure
//! operations plus a `yew::Reducible` adapter for the views.

pub mod clicker;
pub mod pong;
pub mod snake;

use serde::{Deserialize, Serialize};

use crate::storage::{self, KeyValueStore};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MiniGame {
    Snake,
    Pong,
    Clicker,
}

impl MiniGame {
    pub const ALL: [MiniGame; 3] = [MiniGame::Snake, MiniGame::Pong, MiniGame::Clicker];

    /// Id used by the favorites store.
    pub fn catalog_id(self) -> u32 {
        match self {
            MiniGame::Snake => 101,
            MiniGame::Pong => 102,
            MiniGame::Clicker => 103,
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            MiniGame::Snake => "🐍",
            MiniGame::Pong => "🏓",
            MiniGame::Clicker => "⭐",
        }
    }

    /// Translation key of the hub label.
    pub fn label_key(self) -> &'static str {
        match self {
            MiniGame::Snake => "games.snake",
            MiniGame::Pong => "games.pong",
            MiniGame::Clicker => "games.clicker",
        }
    }

    pub fn tagline_key(self) -> &'static str {
        match self {
            MiniGame::Snake => "hub.classic",
            MiniGame::Pong => "hub.vsCpu",
            MiniGame::Clicker => "hub.incremental",
        }
    }
}

/// Persisted best score of one game.
///
/// A new best is written the moment it is reached, so closing the page
/// mid-round keeps it. `round_start` remembers the best when the round
/// began, which is what decides whether the round set a record.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BestScore {
    key: &'static str,
    saved: u32,
    round_start: u32,
}

impl BestScore {
    pub fn load(store: &dyn KeyValueStore, key: &'static str) -> Self {
        let saved = storage::load_json(store, key, 0u32).into_inner();
        Self {
            key,
            saved,
            round_start: saved,
        }
    }

    pub fn saved(&self) -> u32 {
        self.saved
    }

    /// Persists `score` when it beats the stored best; true when written.
    pub fn record(&mut self, store: &dyn KeyValueStore, score: u32) -> bool {
        if score <= self.saved {
            return false;
        }
        self.saved = score;
        storage::persist(store, self.key, &score);
        true
    }

    pub fn is_round_record(&self, score: u32) -> bool {
        score > self.round_start
    }

    pub fn begin_round(&mut self) {
        self.round_start = self.saved;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemoryStore, keys};

    #[test]
    fn new_best_is_written_immediately() {
        let store = MemoryStore::new();
        let mut best = BestScore::load(&store, keys::PONG_HIGH_SCORE);
        assert_eq!(best.saved(), 0);
        assert!(best.record(&store, 1));
        assert_eq!(store.get_item(keys::PONG_HIGH_SCORE).unwrap().as_deref(), Some("1"));
        assert!(best.record(&store, 2));
        assert!(!best.record(&store, 2));
        assert_eq!(BestScore::load(&store, keys::PONG_HIGH_SCORE).saved(), 2);
    }

    #[test]
    fn lower_scores_leave_the_best_alone() {
        let store = MemoryStore::new();
        store.set_item(keys::SNAKE_HIGH_SCORE, "80").unwrap();
        let mut best = BestScore::load(&store, keys::SNAKE_HIGH_SCORE);
        assert!(!best.record(&store, 50));
        assert_eq!(store.get_item(keys::SNAKE_HIGH_SCORE).unwrap().as_deref(), Some("80"));
    }

    #[test]
    fn round_record_compares_against_round_start() {
        let store = MemoryStore::new();
        let mut best = BestScore::load(&store, keys::PONG_HIGH_SCORE);
        best.record(&store, 3);
        assert!(best.is_round_record(3));
        best.begin_round();
        assert!(!best.is_round_record(3));
        assert!(best.is_round_record(4));
    }
}
