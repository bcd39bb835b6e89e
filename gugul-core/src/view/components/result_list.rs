//! ``src/view/components/result_list.rs``
//! ============================================================================
//! # `ResultListView`: scrollable list of result rows
//!
//! Every row is laid out in content coordinates first (top line, height,
//! bottom margin), then drawn shifted by the viewport offset. Rows cut by the
//! top or bottom edge are clipped, not skipped.
//!
//! The layout is reported back as `RowHit`s so the controller can scroll the
//! selected row into view and hit-test mouse clicks.

use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
};
use unicode_width::UnicodeWidthStr;

use crate::{
    model::{
        result_list::{ResultRecord, ResultRow},
        viewport::RowHandle,
    },
    view::{components::loading_result::LoadingResult, theme::Palette, ui::RowHit},
};

/// Blank lines below each row
pub const ROW_MARGIN: u16 = 1;

/// Columns reserved for the selection marker
const GUTTER: u16 = 2;

const MAX_DESCRIPTION_LINES: usize = 2;

/// Geometry of the list after layout.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListLayout {
    pub rows: Vec<RowHit>,
    pub content_height: u16,
    pub selected: Option<RowHandle>,
}

pub struct ResultListView;

impl ResultListView {
    pub fn render(
        frame: &mut Frame<'_>,
        rows: &[ResultRow<'_>],
        offset: u16,
        palette: &Palette,
        area: Rect,
    ) -> ListLayout {
        let text_width = area.width.saturating_sub(GUTTER);
        let mut layout = ListLayout::default();
        let mut top: u16 = 0;

        for row in rows {
            let (lines, selected) = match row {
                ResultRow::Hit {
                    record, selected, ..
                } => (Self::hit_lines(record, *selected, text_width, palette), *selected),
                ResultRow::Placeholder => (Self::placeholder_lines(text_width, palette), false),
            };

            let height = u16::try_from(lines.len()).unwrap_or(u16::MAX);
            let handle = RowHandle {
                top,
                height,
                margin_bottom: ROW_MARGIN,
            };

            if let ResultRow::Hit { index, .. } = row {
                layout.rows.push(RowHit {
                    index: *index,
                    handle,
                });
            }
            if selected {
                layout.selected = Some(handle);
            }

            Self::draw_clipped(frame, lines, handle, offset, area);
            top = top.saturating_add(height + ROW_MARGIN);
        }

        layout.content_height = top;
        layout
    }

    fn hit_lines<'a>(
        record: &'a ResultRecord,
        selected: bool,
        width: u16,
        palette: &Palette,
    ) -> Vec<Line<'a>> {
        let marker = |first: bool| {
            if selected && first {
                Span::styled("▌ ", palette.marker())
            } else if selected {
                Span::styled("▏ ", palette.marker())
            } else {
                Span::styled("  ", palette.base())
            }
        };

        let mut lines = vec![Line::from(vec![
            marker(true),
            Span::styled(record.title.as_str(), palette.title(selected)),
        ])];

        if let Some(url) = record.display_url() {
            lines.push(Line::from(vec![marker(false), Span::styled(url, palette.url())]));
        }

        if let Some(description) = record.description.as_deref() {
            for text in wrap_text(description, usize::from(width), MAX_DESCRIPTION_LINES) {
                lines.push(Line::from(vec![marker(false), Span::styled(text, palette.base())]));
            }
        }

        lines
    }

    fn placeholder_lines(width: u16, palette: &Palette) -> Vec<Line<'static>> {
        LoadingResult::lines(width, palette)
            .into_iter()
            .map(|line| {
                let mut spans = vec![Span::raw("  ")];
                spans.extend(line.spans);
                Line::from(spans)
            })
            .collect()
    }

    fn draw_clipped(
        frame: &mut Frame<'_>,
        lines: Vec<Line<'_>>,
        row: RowHandle,
        offset: u16,
        area: Rect,
    ) {
        let start = i32::from(row.top) - i32::from(offset);
        let end = start + i32::from(row.height);
        let bottom = i32::from(area.height);
        if end <= 0 || start >= bottom {
            return;
        }

        let skip = u16::try_from(-start.min(0)).unwrap_or(0);
        let y = u16::try_from(start.max(0)).unwrap_or(0);
        let height = u16::try_from(end.min(bottom) - start.max(0)).unwrap_or(0);
        let rect = Rect::new(area.x, area.y + y, area.width, height);

        frame.render_widget(Paragraph::new(lines).scroll((skip, 0)), rect);
    }

    /// Message for a finished search without hits.
    pub fn render_empty(frame: &mut Frame<'_>, query: &str, palette: &Palette, area: Rect) {
        let line = Line::from(vec![
            Span::raw("  "),
            Span::styled(format!("Nothing found for \"{query}\""), palette.muted()),
        ]);
        frame.render_widget(Paragraph::new(line), area);
    }
}

/// Greedy word wrap to `width` columns, at most `max_lines` lines. A cut
/// text ends in an ellipsis.
pub fn wrap_text(text: &str, width: usize, max_lines: usize) -> Vec<String> {
    if width == 0 || max_lines == 0 {
        return Vec::new();
    }

    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut current_width = 0;
    let mut truncated = false;

    for word in text.split_whitespace() {
        let word_width = word.width();
        if !current.is_empty() && current_width + 1 + word_width > width {
            lines.push(std::mem::take(&mut current));
            current_width = 0;
            if lines.len() == max_lines {
                truncated = true;
                break;
            }
        }

        if !current.is_empty() {
            current.push(' ');
            current_width += 1;
        }
        current.push_str(word);
        current_width += word_width;
    }

    if !current.is_empty() {
        lines.push(current);
    }
    if truncated && let Some(last) = lines.last_mut() {
        last.push('…');
    }
    lines
}
