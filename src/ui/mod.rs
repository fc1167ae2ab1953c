pub mod app;
pub mod battle_panel;
pub mod draft_panel;
pub mod fonts;
pub mod playback;
pub mod result_panel;
pub mod settings;
pub mod settings_io;
pub mod settings_window;
pub mod setup_panel;
