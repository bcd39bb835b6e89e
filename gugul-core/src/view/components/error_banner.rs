//! Error message shown above the (empty) result area.

use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
};

use crate::view::theme::Palette;

pub struct ErrorBanner;

impl ErrorBanner {
    pub const HEIGHT: u16 = 2;

    pub fn render(frame: &mut Frame<'_>, message: &str, palette: &Palette, area: Rect) {
        let text = Line::from(vec![
            Span::styled("! ", palette.error()),
            Span::styled(message, palette.error()),
        ]);
        frame.render_widget(
            Paragraph::new(text)
                .style(palette.base())
                .wrap(Wrap { trim: true }),
            area,
        );
    }
}
