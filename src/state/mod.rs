pub mod favorites;
pub mod music;
pub mod preferences;

pub use favorites::FavoritesStore;
pub use music::{MusicPlayer, SharedPlayer};
pub use preferences::PreferencesStore;
