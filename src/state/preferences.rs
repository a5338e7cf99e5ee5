//! Theme, language and ambient-music preferences.
//!
//! Each setter applies its effect (CSS variables, audio element), persists
//! the new value and publishes the full snapshot on [`PreferencesStore::changes`].

use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use wasm_bindgen::JsValue;
use wasm_bindgen::closure::Closure;
use web_sys::{HtmlAudioElement, HtmlElement};

use crate::events::EventBus;
use crate::i18n::{self, Language};
use crate::storage::{self, KeyValueStore, keys};
use crate::util::cwarn;

/// Ambient music stays quiet so interface sounds remain audible.
pub const MAX_BACKGROUND_VOLUME: f64 = 0.2;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeId {
    #[default]
    Default,
    Ocean,
    Forest,
    Sunset,
    Galaxy,
}

type Palette = [(&'static str, &'static str); 7];

const DEFAULT_PALETTE: Palette = [
    ("--neon-cyan", "180 100% 50%"),
    ("--neon-pink", "320 100% 60%"),
    ("--neon-purple", "280 80% 55%"),
    ("--star-gold", "45 100% 65%"),
    ("--primary", "180 100% 50%"),
    ("--secondary", "300 70% 60%"),
    ("--accent", "45 100% 60%"),
];
const OCEAN_PALETTE: Palette = [
    ("--neon-cyan", "200 100% 50%"),
    ("--neon-pink", "210 80% 60%"),
    ("--neon-purple", "220 70% 55%"),
    ("--star-gold", "190 100% 65%"),
    ("--primary", "200 100% 50%"),
    ("--secondary", "210 80% 60%"),
    ("--accent", "180 100% 60%"),
];
const FOREST_PALETTE: Palette = [
    ("--neon-cyan", "140 100% 45%"),
    ("--neon-pink", "100 70% 50%"),
    ("--neon-purple", "160 60% 45%"),
    ("--star-gold", "60 100% 50%"),
    ("--primary", "140 100% 45%"),
    ("--secondary", "100 70% 50%"),
    ("--accent", "80 100% 55%"),
];
const SUNSET_PALETTE: Palette = [
    ("--neon-cyan", "30 100% 55%"),
    ("--neon-pink", "350 100% 60%"),
    ("--neon-purple", "15 90% 55%"),
    ("--star-gold", "45 100% 65%"),
    ("--primary", "30 100% 55%"),
    ("--secondary", "350 100% 60%"),
    ("--accent", "50 100% 60%"),
];
const GALAXY_PALETTE: Palette = [
    ("--neon-cyan", "270 100% 60%"),
    ("--neon-pink", "300 100% 60%"),
    ("--neon-purple", "260 80% 55%"),
    ("--star-gold", "280 100% 70%"),
    ("--primary", "270 100% 60%"),
    ("--secondary", "300 100% 60%"),
    ("--accent", "290 100% 65%"),
];

impl ThemeId {
    pub const ALL: [ThemeId; 5] = [
        ThemeId::Default,
        ThemeId::Ocean,
        ThemeId::Forest,
        ThemeId::Sunset,
        ThemeId::Galaxy,
    ];

    pub fn variables(self) -> &'static [(&'static str, &'static str)] {
        match self {
            ThemeId::Default => &DEFAULT_PALETTE,
            ThemeId::Ocean => &OCEAN_PALETTE,
            ThemeId::Forest => &FOREST_PALETTE,
            ThemeId::Sunset => &SUNSET_PALETTE,
            ThemeId::Galaxy => &GALAXY_PALETTE,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ThemeId::Default => "Neon",
            ThemeId::Ocean => "Ocean",
            ThemeId::Forest => "Forest",
            ThemeId::Sunset => "Sunset",
            ThemeId::Galaxy => "Galaxy",
        }
    }

    /// Swatch color for the settings menu.
    pub fn swatch(self) -> String {
        format!("hsl({})", self.variables()[0].1)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BackgroundMusic {
    #[default]
    None,
    Lofi,
    VibRibbon,
    Zelda,
}

impl BackgroundMusic {
    pub const ALL: [BackgroundMusic; 4] = [
        BackgroundMusic::None,
        BackgroundMusic::Lofi,
        BackgroundMusic::VibRibbon,
        BackgroundMusic::Zelda,
    ];

    pub fn source(self) -> Option<&'static str> {
        match self {
            BackgroundMusic::None => None,
            BackgroundMusic::Lofi => Some("assets/music/lofi-relaxing.opus"),
            BackgroundMusic::VibRibbon => Some("assets/music/vib-ribbon.opus"),
            BackgroundMusic::Zelda => Some("assets/music/zelda-theme.opus"),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            BackgroundMusic::None => "Off",
            BackgroundMusic::Lofi => "Lo-Fi",
            BackgroundMusic::VibRibbon => "Vib-Ribbon",
            BackgroundMusic::Zelda => "Zelda",
        }
    }
}

pub fn clamp_volume(volume: f64) -> f64 {
    if volume.is_nan() {
        0.0
    } else {
        volume.clamp(0.0, MAX_BACKGROUND_VOLUME)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Preferences {
    pub theme: ThemeId,
    pub language: Language,
    pub background_music: BackgroundMusic,
    /// Runtime only; every session starts silent.
    pub is_background_music_playing: bool,
    pub background_music_volume: f64,
    pub custom_cursor_enabled: bool,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            theme: ThemeId::Default,
            language: Language::Es,
            background_music: BackgroundMusic::None,
            is_background_music_playing: false,
            background_music_volume: MAX_BACKGROUND_VOLUME,
            custom_cursor_enabled: true,
        }
    }
}

/// Where theme variables end up.
pub trait ThemeSink {
    fn apply(&self, variables: &[(&'static str, &'static str)]);
}

/// Reports from the audio output that arrive after the call that caused them.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AudioSignal {
    /// Play attempt `attempt` was refused (autoplay policy, missing file).
    PlaybackRejected { attempt: u64 },
}

/// Ambient audio output.
pub trait AudioSink {
    /// `None` releases the current source.
    fn set_source(&mut self, src: Option<&str>);
    /// Starts play attempt `attempt`; false when refused on the spot. Later
    /// refusals are reported through the listener.
    fn play(&mut self, attempt: u64) -> bool;
    fn pause(&mut self);
    fn set_volume(&mut self, volume: f64);
    fn set_listener(&mut self, listener: Rc<dyn Fn(AudioSignal)>);
}

/// Writes CSS custom properties on `<html>`.
#[derive(Clone, Copy, Debug, Default)]
pub struct DocumentTheme;

impl ThemeSink for DocumentTheme {
    fn apply(&self, variables: &[(&'static str, &'static str)]) {
        let root = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.document_element())
            .and_then(|e| e.dyn_into::<HtmlElement>().ok());
        let Some(root) = root else {
            cwarn("theme: no document element");
            return;
        };
        let style = root.style();
        for (name, value) in variables {
            if let Err(e) = style.set_property(name, value) {
                cwarn(&format!("theme: {} rejected: {:?}", name, e));
            }
        }
    }
}

/// Looping `<audio>` element created on first use.
#[derive(Default)]
pub struct DomAudio {
    element: Option<HtmlAudioElement>,
    volume: f64,
    listener: Option<Rc<dyn Fn(AudioSignal)>>,
}

impl AudioSink for DomAudio {
    fn set_source(&mut self, src: Option<&str>) {
        let Some(src) = src else {
            if let Some(el) = self.element.take() {
                let _ = el.pause();
            }
            return;
        };
        if let Some(el) = &self.element {
            el.set_src(src);
            return;
        }
        match HtmlAudioElement::new_with_src(src) {
            Ok(el) => {
                el.set_loop(true);
                el.set_volume(self.volume);
                self.element = Some(el);
            }
            Err(e) => cwarn(&format!("audio: cannot create element: {:?}", e)),
        }
    }

    fn play(&mut self, attempt: u64) -> bool {
        let Some(el) = &self.element else {
            return false;
        };
        match el.play() {
            Ok(promise) => {
                // Autoplay policies and missing files reject asynchronously.
                let listener = self.listener.clone();
                let on_reject = Closure::once(move |e: JsValue| {
                    cwarn(&format!("audio: playback rejected: {:?}", e));
                    if let Some(listener) = listener {
                        listener(AudioSignal::PlaybackRejected { attempt });
                    }
                });
                let _ = promise.catch(&on_reject);
                on_reject.forget();
                true
            }
            Err(e) => {
                cwarn(&format!("audio: play failed: {:?}", e));
                false
            }
        }
    }

    fn pause(&mut self) {
        if let Some(el) = &self.element {
            let _ = el.pause();
        }
    }

    fn set_volume(&mut self, volume: f64) {
        self.volume = volume;
        if let Some(el) = &self.element {
            el.set_volume(volume);
        }
    }

    fn set_listener(&mut self, listener: Rc<dyn Fn(AudioSignal)>) {
        self.listener = Some(listener);
    }
}

pub struct PreferencesStore {
    store: Rc<dyn KeyValueStore>,
    theme_sink: Box<dyn ThemeSink>,
    audio: Box<dyn AudioSink>,
    prefs: Preferences,
    play_attempt: u64,
    changes: EventBus<Preferences>,
}

impl PreferencesStore {
    /// Restores persisted values and applies theme and volume.
    pub fn load(
        store: Rc<dyn KeyValueStore>,
        theme_sink: Box<dyn ThemeSink>,
        audio: Box<dyn AudioSink>,
    ) -> Self {
        let d = Preferences::default();
        let kv: &dyn KeyValueStore = &*store;
        let prefs = Preferences {
            theme: storage::load_json(kv, keys::THEME, d.theme).into_inner(),
            language: storage::load_json(kv, keys::LANGUAGE, d.language).into_inner(),
            background_music_volume: clamp_volume(
                storage::load_json(kv, keys::BACKGROUND_VOLUME, d.background_music_volume)
                    .into_inner(),
            ),
            custom_cursor_enabled: storage::load_json(kv, keys::CUSTOM_CURSOR, d.custom_cursor_enabled)
                .into_inner(),
            ..d
        };
        let mut s = Self {
            store,
            theme_sink,
            audio,
            prefs,
            play_attempt: 0,
            changes: EventBus::new(),
        };
        s.theme_sink.apply(s.prefs.theme.variables());
        s.audio.set_volume(s.prefs.background_music_volume);
        s
    }

    /// Routes late audio reports back into `this`. Promise callbacks run
    /// after the current call stack unwinds, so the store is not borrowed.
    pub fn connect_audio(this: &Rc<RefCell<Self>>) {
        let weak = Rc::downgrade(this);
        let listener: Rc<dyn Fn(AudioSignal)> = Rc::new(move |signal: AudioSignal| {
            let Some(store) = weak.upgrade() else {
                return;
            };
            match store.try_borrow_mut() {
                Ok(mut s) => s.handle_audio_signal(signal),
                Err(_) => cwarn(&format!("preferences busy, dropped {:?}", signal)),
            };
        });
        this.borrow_mut().audio.set_listener(listener);
    }

    /// A rejection only counts for the latest attempt that is still playing.
    pub fn handle_audio_signal(&mut self, signal: AudioSignal) {
        match signal {
            AudioSignal::PlaybackRejected { attempt } => {
                if attempt != self.play_attempt || !self.prefs.is_background_music_playing {
                    return;
                }
                self.prefs.is_background_music_playing = false;
                self.commit();
            }
        }
    }

    pub fn snapshot(&self) -> &Preferences {
        &self.prefs
    }

    pub fn changes(&self) -> EventBus<Preferences> {
        self.changes.clone()
    }

    pub fn t<'a>(&self, key: &'a str) -> &'a str {
        i18n::t(self.prefs.language, key)
    }

    fn commit(&self) {
        self.changes.publish(&self.prefs);
    }

    pub fn set_theme(&mut self, theme: ThemeId) {
        self.prefs.theme = theme;
        self.theme_sink.apply(theme.variables());
        storage::persist(&*self.store, keys::THEME, &theme);
        self.commit();
    }

    pub fn set_language(&mut self, language: Language) {
        self.prefs.language = language;
        storage::persist(&*self.store, keys::LANGUAGE, &language);
        self.commit();
    }

    /// Switches the ambient track. Playback stays paused until toggled.
    pub fn set_background_music(&mut self, music: BackgroundMusic) {
        self.audio.pause();
        self.audio.set_source(music.source());
        self.prefs.background_music = music;
        self.prefs.is_background_music_playing = false;
        self.commit();
    }

    /// Clamps to `[0, MAX_BACKGROUND_VOLUME]`; returns the stored value.
    pub fn set_volume(&mut self, volume: f64) -> f64 {
        let v = clamp_volume(volume);
        self.prefs.background_music_volume = v;
        self.audio.set_volume(v);
        storage::persist(&*self.store, keys::BACKGROUND_VOLUME, &v);
        self.commit();
        v
    }

    pub fn toggle_playback(&mut self) {
        if self.prefs.background_music == BackgroundMusic::None {
            return;
        }
        if self.prefs.is_background_music_playing {
            self.audio.pause();
            self.prefs.is_background_music_playing = false;
        } else {
            self.play_attempt += 1;
            self.prefs.is_background_music_playing = self.audio.play(self.play_attempt);
        }
        self.commit();
    }

    pub fn set_custom_cursor(&mut self, enabled: bool) {
        self.prefs.custom_cursor_enabled = enabled;
        storage::persist(&*self.store, keys::CUSTOM_CURSOR, &enabled);
        self.commit();
    }
}
