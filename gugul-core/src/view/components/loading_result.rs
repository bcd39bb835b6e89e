//! src/view/components/loading_result.rs
//! ============================================================
//! Placeholder row shown while a search is in flight. Three bars
//! shaped like a title, a url and a description line.

use ratatui::text::{Line, Span};

use crate::view::theme::Palette;

/// Bar widths as a share of the available width, in percent
const BAR_WIDTHS: [u16; 3] = [45, 30, 80];

pub struct LoadingResult;

impl LoadingResult {
    pub const HEIGHT: u16 = BAR_WIDTHS.len() as u16;

    pub fn lines(width: u16, palette: &Palette) -> Vec<Line<'static>> {
        BAR_WIDTHS
            .iter()
            .map(|pct| {
                let len = usize::from(width) * usize::from(*pct) / 100;
                Line::from(Span::styled("▒".repeat(len.max(1)), palette.placeholder()))
            })
            .collect()
    }
}
