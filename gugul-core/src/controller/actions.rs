//! src/controller/actions.rs
//! ============================================================================
//! # Actions: everything the search screen reacts to
//!
//! Terminal input, debounce timers and finished search tasks all arrive at
//! the controller as an `Action`, so there is one place where state changes.

use crate::controller::event_loop::TaskResult;
use crossterm::event::{KeyEvent, MouseEvent};

#[derive(Debug, Clone)]
pub enum Action {
    /// A keyboard event.
    Key(KeyEvent),

    /// A mouse event.
    Mouse(MouseEvent),

    /// A terminal resize event.
    Resize(u16, u16),

    /// Animation tick.
    Tick,

    /// Quit the application.
    Quit,

    /// Loading debounce elapsed for the given edit generation: show
    /// placeholders if a query is pending.
    ShowLoading(u64),

    /// Search debounce elapsed for the given edit generation: run the search
    /// for the current query.
    RunSearch(u64),

    /// Give the text input focus again.
    FocusSearch,

    /// Select a result by index (mouse click on a row).
    SelectResult(usize),

    /// A result from a background task.
    TaskResult(TaskResult),

    /// No operation. Used when an event is consumed but no state change is needed.
    NoOp,
}
