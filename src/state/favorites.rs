use std::collections::BTreeSet;
use std::rc::Rc;

use crate::events::EventBus;
use crate::storage::{self, KeyValueStore, keys};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Favorites {
    pub games: BTreeSet<u32>,
    pub tracks: BTreeSet<String>,
}

/// Favorite minigames (by catalog id) and playlist tracks (by track id).
pub struct FavoritesStore {
    store: Rc<dyn KeyValueStore>,
    favorites: Favorites,
    changes: EventBus<Favorites>,
}

impl FavoritesStore {
    pub fn load(store: Rc<dyn KeyValueStore>) -> Self {
        let games: Vec<u32> = storage::load_json(&*store, keys::FAVORITE_GAMES, Vec::new()).into_inner();
        let tracks: Vec<String> =
            storage::load_json(&*store, keys::FAVORITE_TRACKS, Vec::new()).into_inner();
        Self {
            store,
            favorites: Favorites {
                games: games.into_iter().collect(),
                tracks: tracks.into_iter().collect(),
            },
            changes: EventBus::new(),
        }
    }

    pub fn snapshot(&self) -> &Favorites {
        &self.favorites
    }

    pub fn changes(&self) -> EventBus<Favorites> {
        self.changes.clone()
    }

    /// Returns whether the game is a favorite afterwards.
    pub fn toggle_game(&mut self, id: u32) -> bool {
        let now = toggle(&mut self.favorites.games, id);
        storage::persist(&*self.store, keys::FAVORITE_GAMES, &self.favorites.games);
        self.changes.publish(&self.favorites);
        now
    }

    pub fn toggle_track(&mut self, id: &str) -> bool {
        let now = toggle(&mut self.favorites.tracks, id.to_string());
        storage::persist(&*self.store, keys::FAVORITE_TRACKS, &self.favorites.tracks);
        self.changes.publish(&self.favorites);
        now
    }

    pub fn is_game_favorite(&self, id: u32) -> bool {
        self.favorites.games.contains(&id)
    }

    pub fn is_track_favorite(&self, id: &str) -> bool {
        self.favorites.tracks.contains(id)
    }

    pub fn game_count(&self) -> usize {
        self.favorites.games.len()
    }

    pub fn track_count(&self) -> usize {
        self.favorites.tracks.len()
    }
}

fn toggle<T: Ord>(set: &mut BTreeSet<T>, value: T) -> bool {
    if set.remove(&value) {
        false
    } else {
        set.insert(value);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use std::cell::Cell;

    #[test]
    fn toggle_twice_restores() {
        let kv = Rc::new(MemoryStore::new());
        let mut favs = FavoritesStore::load(kv.clone());
        assert!(favs.toggle_game(102));
        assert!(favs.is_game_favorite(102));
        assert!(!favs.toggle_game(102));
        assert_eq!(favs.game_count(), 0);
        assert_eq!(kv.get_item(keys::FAVORITE_GAMES).unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn persisted_as_json_arrays() {
        let kv = Rc::new(MemoryStore::new());
        let mut favs = FavoritesStore::load(kv.clone());
        favs.toggle_game(103);
        favs.toggle_game(101);
        favs.toggle_track("2");
        assert_eq!(kv.get_item(keys::FAVORITE_GAMES).unwrap().as_deref(), Some("[101,103]"));
        assert_eq!(kv.get_item(keys::FAVORITE_TRACKS).unwrap().as_deref(), Some("[\"2\"]"));

        let reloaded = FavoritesStore::load(kv);
        assert!(reloaded.is_game_favorite(101));
        assert!(reloaded.is_track_favorite("2"));
        assert_eq!(reloaded.track_count(), 1);
    }

    #[test]
    fn duplicates_in_storage_collapse() {
        let kv = Rc::new(MemoryStore::new());
        kv.set_item(keys::FAVORITE_TRACKS, "[\"1\",\"1\",\"4\"]").unwrap();
        let favs = FavoritesStore::load(kv);
        assert_eq!(favs.track_count(), 2);
    }

    #[test]
    fn corrupt_storage_yields_empty() {
        let kv = Rc::new(MemoryStore::new());
        kv.set_item(keys::FAVORITE_GAMES, "{oops").unwrap();
        let favs = FavoritesStore::load(kv);
        assert_eq!(favs.game_count(), 0);
    }

    #[test]
    fn toggles_publish() {
        let mut favs = FavoritesStore::load(Rc::new(MemoryStore::new()));
        let hits = Rc::new(Cell::new(0));
        let _sub = {
            let hits = hits.clone();
            favs.changes().subscribe(move |_| hits.set(hits.get() + 1))
        };
        favs.toggle_track("3");
        favs.toggle_game(101);
        assert_eq!(hits.get(), 2);
    }
}
