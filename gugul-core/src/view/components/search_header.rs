//! ``src/view/components/search_header.rs``
//! ============================================================================
//! # `SearchHeader`: boxed single-line query input
//!
//! Shows the placeholder text when the query is empty and places the
//! terminal cursor at the caret while the input has focus.

use ratatui::{
    Frame,
    layout::{Position, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use crate::view::{snapshots::UiSnapshot, theme::Palette};

pub const PLACEHOLDER: &str = "Gugul Search...";
pub const HEADER_HEIGHT: u16 = 3;

pub struct SearchHeader;

impl SearchHeader {
    pub fn render(frame: &mut Frame<'_>, snap: &UiSnapshot<'_>, palette: &Palette, area: Rect) {
        let value = snap.input.value();
        let line = if value.is_empty() {
            Line::from(Span::styled(PLACEHOLDER, palette.muted()))
        } else {
            Line::from(Span::styled(value, palette.base()))
        };

        let block = Block::default()
            .title(Span::styled(" Gugul ", palette.marker()))
            .borders(Borders::ALL)
            .border_style(palette.border(snap.focused))
            .style(palette.base());

        let inner = block.inner(area);
        let caret = u16::try_from(snap.input.cursor_width()).unwrap_or(u16::MAX);
        // keep the caret visible on narrow terminals
        let scroll = caret.saturating_sub(inner.width.saturating_sub(1));

        frame.render_widget(Paragraph::new(line).block(block).scroll((0, scroll)), area);

        if snap.focused && inner.width > 0 && inner.height > 0 {
            frame.set_cursor_position(Position::new(inner.x + caret - scroll, inner.y));
        }
    }
}
