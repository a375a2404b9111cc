//! Colour palettes for the TUI, one per theme

use ratatui::prelude::*;

use crate::calendar::{palette, LEVELS};
use crate::contributions::ContributionStatus;
use crate::theme::Theme;

/// Complete color palette for the TUI
#[derive(Debug, Clone, PartialEq)]
pub struct ThemeColors {
    pub title_color: Color,
    pub text: Color,
    pub muted: Color,
    pub accent: Color,
    pub index_color: Color,
    pub header_style: Style,
    pub row_selected: Style,

    // Contribution status badges
    pub status_open: Color,
    pub status_closed: Color,
    pub status_merged: Color,
    pub status_unknown: Color,

    // Status bar
    pub status_bar_bg: Color,
    pub status_key_color: Color,
    pub flash_success: Color,
    pub flash_error: Color,

    // Popups
    pub popup_border: Color,
    pub popup_title: Style,

    /// Activity calendar colours, level 0 through 4
    pub heat: [Color; LEVELS],
}

fn heat_colors(theme: Theme) -> [Color; LEVELS] {
    palette(theme).map(|(r, g, b)| Color::Rgb(r, g, b))
}

impl ThemeColors {
    pub fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Dark => Self::dark(),
            Theme::Light => Self::light(),
        }
    }

    pub fn dark() -> Self {
        Self {
            title_color: Color::Cyan,
            text: Color::White,
            muted: Color::Gray,
            accent: Color::Yellow,
            index_color: Color::DarkGray,
            header_style: Style::new().bold(),
            row_selected: Style::new().reversed(),
            status_open: Color::Green,
            status_closed: Color::Red,
            status_merged: Color::Magenta,
            status_unknown: Color::DarkGray,
            status_bar_bg: Color::Indexed(236),
            status_key_color: Color::Cyan,
            flash_success: Color::Green,
            flash_error: Color::Red,
            popup_border: Color::Cyan,
            popup_title: Style::new().fg(Color::Cyan).bold(),
            heat: heat_colors(Theme::Dark),
        }
    }

    pub fn light() -> Self {
        Self {
            title_color: Color::Blue,
            text: Color::Black,
            muted: Color::DarkGray,
            accent: Color::Rgb(176, 96, 0),
            index_color: Color::Gray,
            header_style: Style::new().bold(),
            row_selected: Style::new().bg(Color::Indexed(153)).fg(Color::Black),
            status_open: Color::Rgb(26, 127, 55),
            status_closed: Color::Rgb(207, 34, 46),
            status_merged: Color::Rgb(130, 80, 223),
            status_unknown: Color::Gray,
            status_bar_bg: Color::Indexed(254),
            status_key_color: Color::Blue,
            flash_success: Color::Rgb(26, 127, 55),
            flash_error: Color::Rgb(207, 34, 46),
            popup_border: Color::Blue,
            popup_title: Style::new().fg(Color::Blue).bold(),
            heat: heat_colors(Theme::Light),
        }
    }

    pub fn status_color(&self, status: ContributionStatus) -> Color {
        match status {
            ContributionStatus::Open => self.status_open,
            ContributionStatus::Closed => self.status_closed,
            ContributionStatus::Merged => self.status_merged,
            ContributionStatus::Unknown => self.status_unknown,
        }
    }

    /// Colour for an activity level; out-of-range levels use the top colour
    pub fn heat_color(&self, level: u8) -> Color {
        self.heat[(level as usize).min(LEVELS - 1)]
    }
}
