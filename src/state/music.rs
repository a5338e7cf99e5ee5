//! Playlist player driving an embedded video widget.
//!
//! [`MusicPlayer`] owns the playlist position, play flag and volume. The
//! widget (when attached) receives commands and reports back through
//! [`MusicPlayer::handle_signal`].

use serde::{Deserialize, Serialize};
use std::rc::Rc;

use crate::events::EventBus;
use crate::storage::{self, KeyValueStore, keys};
use crate::util::cwarn;

pub const DEFAULT_VOLUME: u8 = 50;
pub const MAX_VOLUME: u8 = 100;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Track {
    pub id: &'static str,
    pub video_id: &'static str,
    pub title: &'static str,
    pub artist: &'static str,
}

impl Track {
    pub fn thumbnail(&self) -> String {
        format!("https://img.youtube.com/vi/{}/mqdefault.jpg", self.video_id)
    }
}

pub const DEFAULT_PLAYLIST: [Track; 4] = [
    Track {
        id: "1",
        video_id: "PydqkG0xRZo",
        title: "Chill Beats",
        artist: "Lo-Fi Music",
    },
    Track {
        id: "2",
        video_id: "SMgqzgRqH7w",
        title: "Relaxing Vibes",
        artist: "Ambient Sounds",
    },
    Track {
        id: "3",
        video_id: "-B65n78YLtA",
        title: "Night Drive",
        artist: "Synthwave Mix",
    },
    Track {
        id: "4",
        video_id: "VDI2S-acTiA",
        title: "Dreamy Melodies",
        artist: "Chill Music",
    },
];

/// Commands understood by an embedded player.
pub trait VideoWidget {
    fn load(&mut self, video_id: &str, autoplay: bool);
    fn play(&mut self);
    fn pause(&mut self);
    fn stop(&mut self);
    fn set_volume(&mut self, volume: u8);
}

/// Notifications coming back from the widget.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WidgetSignal {
    Ended,
    Error(i32),
}

#[derive(Clone, Debug, PartialEq)]
pub struct PlayerStatus {
    pub current: Option<Track>,
    pub is_playing: bool,
    pub volume: u8,
    pub muted: bool,
}

pub struct MusicPlayer {
    playlist: Vec<Track>,
    current: Option<usize>,
    is_playing: bool,
    volume: u8,
    muted: bool,
    widget: Option<Box<dyn VideoWidget>>,
    changes: EventBus<PlayerStatus>,
}

impl Default for MusicPlayer {
    fn default() -> Self {
        Self::new(DEFAULT_PLAYLIST.to_vec())
    }
}

impl MusicPlayer {
    pub fn new(playlist: Vec<Track>) -> Self {
        Self {
            playlist,
            current: None,
            is_playing: false,
            volume: DEFAULT_VOLUME,
            muted: false,
            widget: None,
            changes: EventBus::new(),
        }
    }

    pub fn playlist(&self) -> &[Track] {
        &self.playlist
    }

    pub fn current_track(&self) -> Option<&Track> {
        self.current.and_then(|i| self.playlist.get(i))
    }

    pub fn status(&self) -> PlayerStatus {
        PlayerStatus {
            current: self.current_track().cloned(),
            is_playing: self.is_playing,
            volume: self.volume,
            muted: self.muted,
        }
    }

    pub fn changes(&self) -> EventBus<PlayerStatus> {
        self.changes.clone()
    }

    pub fn has_widget(&self) -> bool {
        self.widget.is_some()
    }

    /// Takes a widget already loaded with the current track.
    pub fn attach_widget(&mut self, mut widget: Box<dyn VideoWidget>) {
        widget.set_volume(self.effective_volume());
        self.widget = Some(widget);
    }

    pub fn effective_volume(&self) -> u8 {
        if self.muted { 0 } else { self.volume }
    }

    fn commit(&self) {
        self.changes.publish(&self.status());
    }

    /// Out-of-range indexes are ignored.
    pub fn play_track(&mut self, index: usize) {
        let Some(track) = self.playlist.get(index) else {
            return;
        };
        self.current = Some(index);
        self.is_playing = true;
        if let Some(w) = self.widget.as_mut() {
            w.load(track.video_id, true);
        }
        self.commit();
    }

    pub fn next_track(&mut self) {
        let len = self.playlist.len();
        if len == 0 {
            return;
        }
        let next = match self.current {
            Some(i) => (i + 1) % len,
            None => 0,
        };
        self.play_track(next);
    }

    pub fn prev_track(&mut self) {
        let len = self.playlist.len();
        if len == 0 {
            return;
        }
        let prev = match self.current {
            Some(i) => (i + len - 1) % len,
            None => len - 1,
        };
        self.play_track(prev);
    }

    /// With nothing selected, starts the first track.
    pub fn toggle_play(&mut self) {
        if self.current.is_none() {
            self.play_track(0);
            return;
        }
        self.is_playing = !self.is_playing;
        if let Some(w) = self.widget.as_mut() {
            if self.is_playing {
                w.play();
            } else {
                w.pause();
            }
        }
        self.commit();
    }

    /// Clamps to `0..=MAX_VOLUME`. A positive volume lifts mute.
    pub fn set_volume(&mut self, volume: i32) {
        self.volume = volume.clamp(0, MAX_VOLUME as i32) as u8;
        if self.muted && self.volume > 0 {
            self.muted = false;
        }
        let v = self.effective_volume();
        if let Some(w) = self.widget.as_mut() {
            w.set_volume(v);
        }
        self.commit();
    }

    pub fn toggle_mute(&mut self) {
        self.muted = !self.muted;
        let v = self.effective_volume();
        if let Some(w) = self.widget.as_mut() {
            w.set_volume(v);
        }
        self.commit();
    }

    /// Stops playback and keeps the selection.
    pub fn close(&mut self) {
        self.is_playing = false;
        if let Some(w) = self.widget.as_mut() {
            w.stop();
        }
        self.commit();
    }

    pub fn handle_signal(&mut self, signal: WidgetSignal) {
        match signal {
            WidgetSignal::Ended => self.next_track(),
            WidgetSignal::Error(code) => {
                cwarn(&format!("video widget error {}", code));
                self.is_playing = false;
                if let Some(w) = self.widget.as_mut() {
                    w.pause();
                }
                self.commit();
            }
        }
    }
}

/// Offset of the music dock from its bottom-right anchor, in pixels.
/// Both axes are zero or negative.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DockPosition {
    pub x: f64,
    pub y: f64,
}

impl DockPosition {
    pub fn is_origin(&self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }

    pub fn load(store: &dyn KeyValueStore) -> Self {
        storage::load_json(store, keys::PLAYER_POSITION, DockPosition::default()).into_inner()
    }

    /// The origin is the default, so it clears the stored offset instead.
    pub fn save(&self, store: &dyn KeyValueStore) {
        if self.is_origin() {
            if let Err(e) = store.remove_item(keys::PLAYER_POSITION) {
                cwarn(&format!("{}: {}", keys::PLAYER_POSITION, e));
            }
        } else {
            storage::persist(store, keys::PLAYER_POSITION, self);
        }
    }

    /// Start position plus drag delta, kept on screen with a 100px margin.
    /// Viewports narrower than the margin pin the axis to zero.
    pub fn dragged(start: DockPosition, dx: f64, dy: f64, viewport: (f64, f64)) -> Self {
        let (w, h) = viewport;
        Self {
            x: (start.x + dx).min(0.0).max(-w + 100.0).min(0.0),
            y: (start.y + dy).min(0.0).max(-h + 100.0).min(0.0),
        }
    }
}

/// A drag in progress: where the pointer went down and where the dock was.
/// Mouse and touch input feed the same client coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DockDrag {
    pub pointer_x: f64,
    pub pointer_y: f64,
    pub from: DockPosition,
}

impl DockDrag {
    pub fn begin(pointer_x: f64, pointer_y: f64, from: DockPosition) -> Self {
        Self {
            pointer_x,
            pointer_y,
            from,
        }
    }

    pub fn moved_to(&self, x: f64, y: f64, viewport: (f64, f64)) -> DockPosition {
        DockPosition::dragged(self.from, x - self.pointer_x, y - self.pointer_y, viewport)
    }
}

/// Shared handle used by the UI.
pub type SharedPlayer = Rc<std::cell::RefCell<MusicPlayer>>;
