use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Dark,
    Light,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "dark" => Some(Theme::Dark),
            "light" => Some(Theme::Light),
            _ => None,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Theme::Dark => f.write_str("dark"),
            Theme::Light => f.write_str("light"),
        }
    }
}

/// On-disk shape of the saved preference
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThemePreference {
    pub version: u32,
    pub theme: Theme,
}

impl ThemePreference {
    pub fn new(theme: Theme) -> Self {
        Self { version: 1, theme }
    }
}

/// Theme reported by the environment when nothing has been saved.
///
/// Reads the terminal background luminance; dark when it cannot be detected.
pub fn detect_system_theme() -> Theme {
    match terminal_light::luma() {
        Ok(luma) if luma > 0.6 => Theme::Light,
        Ok(_) => Theme::Dark,
        Err(e) => {
            log::debug!("Could not detect terminal background: {}", e);
            Theme::Dark
        }
    }
}
