//! Dark/light preference shared by every view

pub mod storage;
pub mod store;
pub mod types;

pub use storage::{get_theme_path, load_theme, save_theme};
pub use store::{Subscription, ThemeStore};
pub use types::{detect_system_theme, Theme, ThemePreference};
