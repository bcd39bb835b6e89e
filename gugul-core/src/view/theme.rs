//! src/view/theme.rs
//! ============================================================================
//! # Color palettes
//!
//! One palette per configured [`Theme`]. `Default` keeps the terminal's own
//! background and only colors accents; `Light` and `Dark` paint everything.

use ratatui::style::{Color, Modifier, Style};
use tracing::{debug, instrument};

use crate::config::Theme;

pub const ACCENT: Color = Color::Rgb(246, 207, 13); // #f6cf0d
pub const INK: Color = Color::Rgb(82, 82, 82); // #525252
pub const PAPER: Color = Color::Rgb(255, 255, 255);

pub const BACKGROUND: Color = Color::Rgb(30, 30, 46); // Base
pub const CURRENT_LINE: Color = Color::Rgb(69, 71, 90); // Surface1
pub const FOREGROUND: Color = Color::Rgb(205, 214, 244); // Text
pub const COMMENT: Color = Color::Rgb(127, 132, 156); // Overlay1
pub const GREEN: Color = Color::Rgb(166, 227, 161); // Green
pub const RED: Color = Color::Rgb(243, 139, 168); // Red

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub background: Color,
    pub text: Color,
    pub muted: Color,
    pub accent: Color,
    pub url: Color,
    pub error: Color,
    pub placeholder: Color,
}

impl Palette {
    #[instrument(level = "debug")]
    pub fn for_theme(theme: Theme) -> Self {
        let palette = match theme {
            Theme::Default => Self {
                background: Color::Reset,
                text: Color::Reset,
                muted: Color::DarkGray,
                accent: ACCENT,
                url: Color::Green,
                error: Color::Red,
                placeholder: Color::DarkGray,
            },
            Theme::Light => Self {
                background: PAPER,
                text: INK,
                muted: Color::Rgb(150, 150, 150),
                accent: ACCENT,
                url: Color::Rgb(0, 102, 33),
                error: Color::Rgb(200, 40, 40),
                placeholder: Color::Rgb(230, 230, 230),
            },
            Theme::Dark => Self {
                background: BACKGROUND,
                text: FOREGROUND,
                muted: COMMENT,
                accent: ACCENT,
                url: GREEN,
                error: RED,
                placeholder: CURRENT_LINE,
            },
        };
        debug!("Palette for {:?}: {:?}", theme, palette);
        palette
    }

    pub fn base(&self) -> Style {
        Style::default().bg(self.background).fg(self.text)
    }

    pub fn title(&self, selected: bool) -> Style {
        let style = self.base().add_modifier(Modifier::BOLD);
        if selected { style.fg(self.accent) } else { style }
    }

    pub fn url(&self) -> Style {
        self.base().fg(self.url)
    }

    pub fn muted(&self) -> Style {
        self.base().fg(self.muted)
    }

    pub fn marker(&self) -> Style {
        self.base().fg(self.accent)
    }

    pub fn placeholder(&self) -> Style {
        self.base().fg(self.placeholder)
    }

    pub fn error(&self) -> Style {
        self.base().fg(self.error).add_modifier(Modifier::BOLD)
    }

    pub fn border(&self, focused: bool) -> Style {
        if focused { self.marker() } else { self.muted() }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::for_theme(Theme::Default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_theme_uses_the_accent() {
        for theme in [Theme::Default, Theme::Light, Theme::Dark] {
            assert_eq!(Palette::for_theme(theme).accent, ACCENT);
        }
    }

    #[test]
    fn test_selected_title_is_accented() {
        let palette = Palette::for_theme(Theme::Light);
        assert_eq!(palette.title(true).fg, Some(ACCENT));
        assert_eq!(palette.title(false).fg, Some(INK));
    }
}
