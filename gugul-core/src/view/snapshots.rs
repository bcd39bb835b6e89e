//! src/view/snapshots.rs
//! ============================================================
//! Borrowed, read-only view of the controller taken once per
//! frame. Widgets only ever see this, never the controller.

use crate::model::{
    result_list::{ResultRow, project_rows},
    search_input::SearchInput,
    ui_state::UIState,
};

#[derive(Debug, Clone, Copy)]
pub struct UiSnapshot<'a> {
    pub state: &'a UIState,
    pub input: &'a SearchInput,

    /// Whether the text input has focus
    pub focused: bool,

    /// First visible content line of the result area
    pub scroll_offset: u16,

    pub placeholder_rows: usize,

    /// Bits of `RedrawFlag` requested since the last frame
    pub redraw_flags: u8,
}

impl<'a> UiSnapshot<'a> {
    /// Rows of the result area, placeholders while loading.
    pub fn rows(&self) -> Vec<ResultRow<'a>> {
        let state: &'a UIState = self.state;
        project_rows(
            &state.results,
            state.selected,
            state.loading,
            self.placeholder_rows,
        )
    }
}
