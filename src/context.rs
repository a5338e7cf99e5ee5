use std::cell::RefCell;
use std::rc::Rc;

use crate::events::{AppEvent, EventBus};
use crate::sound::{Cue, SoundSink, WebAudio};
use crate::state::preferences::{DocumentTheme, DomAudio};
use crate::state::{FavoritesStore, MusicPlayer, PreferencesStore, SharedPlayer};
use crate::storage::KeyValueStore;

/// Shared services, passed to each view explicitly as its `ctx` property.
#[derive(Clone)]
pub struct AppContext {
    pub store: Rc<dyn KeyValueStore>,
    pub preferences: Rc<RefCell<PreferencesStore>>,
    pub favorites: Rc<RefCell<FavoritesStore>>,
    pub music: SharedPlayer,
    pub events: EventBus<AppEvent>,
    pub sound: Rc<dyn SoundSink>,
}

impl PartialEq for AppContext {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.preferences, &other.preferences)
            && Rc::ptr_eq(&self.favorites, &other.favorites)
            && Rc::ptr_eq(&self.music, &other.music)
            && self.events == other.events
    }
}

impl AppContext {
    /// Wires the browser theme and audio sinks to `store`.
    pub fn new(store: Rc<dyn KeyValueStore>) -> Self {
        let preferences = PreferencesStore::load(
            store.clone(),
            Box::new(DocumentTheme),
            Box::new(DomAudio::default()),
        );
        let preferences = Rc::new(RefCell::new(preferences));
        PreferencesStore::connect_audio(&preferences);
        let favorites = FavoritesStore::load(store.clone());
        Self {
            store,
            preferences,
            favorites: Rc::new(RefCell::new(favorites)),
            music: Rc::new(RefCell::new(MusicPlayer::default())),
            events: EventBus::new(),
            sound: Rc::new(WebAudio::default()),
        }
    }

    pub fn play(&self, cue: Cue) {
        self.sound.play(cue);
    }

    /// Translation in the current language.
    pub fn t(&self, key: &str) -> String {
        self.preferences.borrow().t(key).to_string()
    }
}
