//! Search UI state and redraw bookkeeping

use compact_str::CompactString;

use crate::model::result_list::ResultList;

/// Redraw flags, combined as bits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum RedrawFlag {
    Header = 1,
    Results = 2,
    StatusBar = 4,
    All = 7,
}

impl RedrawFlag {
    #[inline]
    pub const fn bits(self) -> u8 {
        self as u8
    }
}

/// Snapshot of everything the search screen shows.
///
/// A transition always produces a whole new value; fields are never patched
/// one by one from outside the controller.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UIState {
    pub query: CompactString,
    pub results: ResultList,
    pub selected: usize,
    pub error: Option<CompactString>,
    pub loading: bool,

    /// A search for `query` has finished, so empty `results` mean no hits.
    pub searched: bool,
}

impl UIState {
    /// Initial state for a (possibly empty) query.
    pub fn with_query(query: impl Into<CompactString>) -> Self {
        Self {
            query: query.into(),
            ..Self::default()
        }
    }

    /// State after the user edited the query: everything else is reset.
    pub fn typed(query: impl Into<CompactString>) -> Self {
        Self::with_query(query)
    }

    /// State after a search for `query` succeeded.
    pub fn resolved(query: impl Into<CompactString>, results: ResultList) -> Self {
        Self {
            query: query.into(),
            results,
            searched: true,
            ..Self::default()
        }
    }

    /// State after a search for `query` failed.
    pub fn failed(query: impl Into<CompactString>, message: &str) -> Self {
        Self {
            query: query.into(),
            error: Some(CompactString::from(message)),
            searched: true,
            ..Self::default()
        }
    }

    #[inline]
    pub fn result_count(&self) -> usize {
        self.results.len()
    }

    /// Selected record, if the index points into the list.
    pub fn selected_record(&self) -> Option<&crate::model::result_list::ResultRecord> {
        self.results.get(self.selected)
    }
}

/// Whether moving from `prev` to `next` should repaint.
///
/// While a search is in flight and no results are shown, the placeholder
/// list stays as drawn until real results (or a non-loading state) arrive.
pub fn should_redraw(prev: &UIState, next: &UIState) -> bool {
    if !prev.loading || !next.loading {
        return true;
    }
    if !prev.results.is_empty() {
        return true;
    }
    !next.results.is_empty()
}
