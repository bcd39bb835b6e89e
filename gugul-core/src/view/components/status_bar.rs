//! src/view/components/status_bar.rs
//!
//! One line at the bottom: search status on the left, key hints on the
//! right. Hints depend on whether the input has focus.

use ratatui::{
    prelude::*,
    widgets::Paragraph,
};

use crate::view::{snapshots::UiSnapshot, theme::Palette};

pub struct StatusBar;

impl StatusBar {
    pub fn render(frame: &mut Frame<'_>, snap: &UiSnapshot<'_>, palette: &Palette, area: Rect) {
        let left = Self::status_text(snap);
        let right = if snap.focused {
            "↑↓ select · ⏎ open · esc leave input"
        } else {
            "/ search · ↑↓ select · ⏎ open · q quit"
        };

        let [left_area, right_area] =
            Layout::horizontal([Constraint::Min(0), Constraint::Length(Self::width(right))])
                .areas(area);

        frame.render_widget(Paragraph::new(left).style(palette.muted()), left_area);
        frame.render_widget(
            Paragraph::new(right)
                .style(palette.muted())
                .alignment(Alignment::Right),
            right_area,
        );
    }

    fn width(text: &str) -> u16 {
        u16::try_from(Line::from(text).width()).unwrap_or(u16::MAX)
    }

    pub fn status_text(snap: &UiSnapshot<'_>) -> String {
        let state = snap.state;
        if state.loading {
            return format!("Searching for \"{}\"…", state.query);
        }
        if state.error.is_some() || state.query.is_empty() || !state.searched {
            return String::new();
        }

        match state.result_count() {
            0 => format!("No results for \"{}\"", state.query),
            1 => "1 result".to_owned(),
            n => format!("{} of {n} results", state.selected + 1),
        }
    }
}
