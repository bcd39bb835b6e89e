//! src/view/ui.rs
//! ============================================================
//! Frame renderer that draws the whole search screen from a
//! `UiSnapshot` and hands back the frame geometry the controller
//! needs (hit areas, row handles, content height).

use std::time::{Duration, Instant};

use ratatui::prelude::*;
use tracing::{instrument, warn};

use crate::{
    config::Theme,
    model::viewport::RowHandle,
    view::{
        components::{
            error_banner::ErrorBanner,
            result_list::ResultListView,
            search_header::{HEADER_HEIGHT, SearchHeader},
            status_bar::StatusBar,
        },
        snapshots::UiSnapshot,
        theme::Palette,
    },
};

/// A drawn result row and the index of its record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RowHit {
    pub index: usize,
    pub handle: RowHandle,
}

/// Geometry of the last frame.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrameLayout {
    /// Click target that focuses the input
    pub header: Rect,

    /// Screen area of the scrollable result list
    pub results: Rect,

    pub rows: Vec<RowHit>,

    /// Total height of all rows, margins included
    pub content_height: u16,

    /// Handle of the selected row, if it was laid out
    pub selected_row: Option<RowHandle>,
}

#[derive(Debug, Default, Clone, Copy)]
pub struct RenderStats {
    pub frames: u64,
    pub slow: u64,
    pub total: Duration,
}

impl RenderStats {
    #[allow(clippy::cast_precision_loss)]
    pub fn avg_ms(&self) -> f64 {
        if self.frames == 0 {
            return 0.0;
        }
        self.total.as_secs_f64() * 1_000.0 / self.frames as f64
    }
}

pub struct UIRenderer {
    palette: Palette,
    stats: RenderStats,
}

impl UIRenderer {
    pub fn new(theme: Theme) -> Self {
        Self {
            palette: Palette::for_theme(theme),
            stats: RenderStats::default(),
        }
    }

    pub const fn stats(&self) -> &RenderStats {
        &self.stats
    }

    #[instrument(level = "trace", skip(self, f, snap))]
    pub fn render(&mut self, f: &mut Frame<'_>, snap: &UiSnapshot<'_>) -> FrameLayout {
        let start = Instant::now();
        let palette = self.palette;

        f.render_widget(ratatui::widgets::Block::default().style(palette.base()), f.area());

        let error = snap.state.error.as_deref();
        let banner_height = if error.is_some() { ErrorBanner::HEIGHT } else { 0 };

        let [header, banner, results, status] = Layout::vertical([
            Constraint::Length(HEADER_HEIGHT),
            Constraint::Length(banner_height),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .areas(f.area());

        // one blank line between the header and the first result
        let results = Rect {
            y: results.y.saturating_add(1).min(results.bottom()),
            height: results.height.saturating_sub(1),
            ..results
        };

        SearchHeader::render(f, snap, &palette, header);
        if let Some(message) = error {
            ErrorBanner::render(f, message, &palette, banner);
        }

        let rows = snap.rows();
        let list = ResultListView::render(f, &rows, snap.scroll_offset, &palette, results);
        let resolved_empty = rows.is_empty()
            && error.is_none()
            && snap.state.searched
            && !snap.state.query.is_empty();
        if resolved_empty {
            ResultListView::render_empty(f, &snap.state.query, &palette, results);
        }

        StatusBar::render(f, snap, &palette, status);

        let elapsed = start.elapsed();
        self.stats.frames += 1;
        self.stats.total += elapsed;
        if elapsed > Duration::from_millis(16) {
            self.stats.slow += 1;
            warn!("Slow render: {}ms (target: <16ms)", elapsed.as_millis());
        }

        FrameLayout {
            header,
            results,
            rows: list.rows,
            content_height: list.content_height,
            selected_row: list.selected,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        model::{
            result_list::{ResultList, ResultRecord},
            search_input::SearchInput,
            ui_state::UIState,
        },
        view::components::search_header::PLACEHOLDER,
    };
    use ratatui::backend::TestBackend;

    fn screen(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        (0..buffer.area.height)
            .map(|y| {
                (0..buffer.area.width)
                    .map(|x| buffer[(x, y)].symbol())
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn draw(state: &UIState, input: &SearchInput) -> (Terminal<TestBackend>, FrameLayout) {
        let mut terminal = Terminal::new(TestBackend::new(60, 20)).unwrap();
        let mut renderer = UIRenderer::new(Theme::Default);
        let mut layout = FrameLayout::default();

        let snap = UiSnapshot {
            state,
            input,
            focused: true,
            scroll_offset: 0,
            placeholder_rows: 10,
            redraw_flags: 0,
        };
        terminal
            .draw(|f| layout = renderer.render(f, &snap))
            .unwrap();
        assert_eq!(renderer.stats().frames, 1);
        (terminal, layout)
    }

    #[test]
    fn test_empty_screen_shows_placeholder() {
        let (terminal, layout) = draw(&UIState::default(), &SearchInput::default());

        assert!(screen(&terminal).contains(PLACEHOLDER));
        assert_eq!(layout.header, Rect::new(0, 0, 60, HEADER_HEIGHT));
        assert!(layout.rows.is_empty());
    }

    #[test]
    fn test_results_are_drawn_and_reported() {
        let results: ResultList = vec![
            ResultRecord::new("The Rust Book", Some("https://doc.rust-lang.org/book/")),
            ResultRecord::new("No link", None),
            ResultRecord::new("Tokio", Some("https://tokio.rs/")),
        ]
        .into();
        let state = UIState::resolved("rust", results);
        let (terminal, layout) = draw(&state, &SearchInput::new("rust"));

        let text = screen(&terminal);
        assert!(text.contains("The Rust Book"));
        assert!(text.contains("doc.rust-lang.org/book"));
        assert!(text.contains("Tokio"));
        assert!(!text.contains("No link"));

        assert_eq!(layout.rows.len(), 2);
        assert_eq!(layout.selected_row, Some(layout.rows[0].handle));
        assert_eq!(layout.results.y, HEADER_HEIGHT + 1);
    }

    #[test]
    fn test_error_banner() {
        let state = UIState::failed("rust", "Sorry, there was an error.");
        let (terminal, _) = draw(&state, &SearchInput::new("rust"));

        let text = screen(&terminal);
        assert!(text.contains("Sorry, there was an error."));
        assert!(!text.contains("Nothing found"));
    }

    #[test]
    fn test_nothing_found_only_after_search_resolved() {
        let (terminal, _) = draw(&UIState::typed("cats"), &SearchInput::new("cats"));
        let text = screen(&terminal);
        assert!(!text.contains("Nothing found"));
        assert!(!text.contains("No results"));

        let state = UIState::resolved("cats", ResultList::empty());
        let (terminal, _) = draw(&state, &SearchInput::new("cats"));
        assert!(screen(&terminal).contains("Nothing found for \"cats\""));
    }
}
