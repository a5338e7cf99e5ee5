pub mod achievement_toast;
pub mod app;
pub mod clicker_view;
pub mod custom_cursor;
pub mod hooks;
pub mod minigames_hub;
pub mod music_dock;
pub mod pong_view;
pub mod settings_menu;
pub mod snake_view;
