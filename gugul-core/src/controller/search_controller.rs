//! ``src/controller/search_controller.rs``
//! ============================================================================
//! # Search Controller
//!
//! Owns everything the search screen shows and every timer or task that can
//! change it:
//!
//! - query text (through `SearchInput`) and focus
//! - `UIState`, replaced as a whole on each transition
//! - loading and search debouncers
//! - the one live `SearchTask`
//! - the results viewport and its smooth scroll
//! - the navigation key bindings
//!
//! All methods run on the event-loop task. Background work reports back as an
//! `Action` and is applied through [`SearchController::dispatch`].

use std::{sync::Arc, time::Instant};

use compact_str::CompactString;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::{Position, Rect};
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info, trace, warn};

use crate::{
    config::Config,
    controller::{
        actions::Action,
        event_loop::TaskResult,
        keybindings::{KeyBindings, KeyDisposition, NavCommand},
        navigator::Navigator,
    },
    model::{
        location::{Location, LocationSync},
        result_list::DEFAULT_PLACEHOLDER_ROWS,
        search_input::{InputEdit, SearchInput},
        ui_state::{RedrawFlag, UIState, should_redraw},
        viewport::ResultsViewport,
    },
    tasks::search_task::{SearchBackend, SearchTask},
    util::debounce::{DebounceConfig, Debouncer},
    view::{snapshots::UiSnapshot, ui::FrameLayout},
};

/// Timing and sizing knobs, usually taken from [`Config`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControllerOptions {
    pub loading: DebounceConfig,
    pub search: DebounceConfig,
    pub placeholder_rows: usize,
    pub scroll_duration: std::time::Duration,
}

impl Default for ControllerOptions {
    fn default() -> Self {
        Self {
            loading: DebounceConfig::loading_indicator(),
            search: DebounceConfig::search_dispatch(),
            placeholder_rows: DEFAULT_PLACEHOLDER_ROWS,
            scroll_duration: std::time::Duration::from_millis(200),
        }
    }
}

impl From<&Config> for ControllerOptions {
    fn from(config: &Config) -> Self {
        Self {
            loading: DebounceConfig::new(config.search.loading_delay),
            search: DebounceConfig::new(config.search.search_delay),
            placeholder_rows: config.search.placeholder_rows,
            scroll_duration: config.scroll.duration,
        }
    }
}

pub struct SearchController {
    state: UIState,
    redraw: u8,
    focused: bool,
    should_quit: bool,
    torn_down: bool,

    input: SearchInput,
    viewport: ResultsViewport,
    layout: FrameLayout,
    placeholder_rows: usize,

    current_task: Option<SearchTask>,
    next_task_id: u64,
    /// Bumped on every text change; debounce emissions carry it
    edit_generation: u64,
    loading_debounce: Debouncer<Action>,
    search_debounce: Debouncer<Action>,

    backend: Arc<dyn SearchBackend>,
    task_tx: UnboundedSender<TaskResult>,
    location: Box<dyn LocationSync>,
    navigator: Box<dyn Navigator>,
    bindings: KeyBindings,
}

impl SearchController {
    pub fn new(
        options: ControllerOptions,
        backend: Arc<dyn SearchBackend>,
        action_tx: UnboundedSender<Action>,
        task_tx: UnboundedSender<TaskResult>,
        location: Box<dyn LocationSync>,
        navigator: Box<dyn Navigator>,
    ) -> Self {
        info!(
            backend = backend.name(),
            loading_ms = options.loading.delay.as_millis(),
            search_ms = options.search.delay.as_millis(),
            "Creating search controller"
        );

        Self {
            state: UIState::default(),
            redraw: RedrawFlag::All.bits(),
            focused: true,
            should_quit: false,
            torn_down: false,
            input: SearchInput::default(),
            viewport: ResultsViewport::new(options.scroll_duration),
            layout: FrameLayout::default(),
            placeholder_rows: options.placeholder_rows,
            current_task: None,
            next_task_id: 1,
            edit_generation: 0,
            loading_debounce: Debouncer::new("loading", options.loading, action_tx.clone()),
            search_debounce: Debouncer::new("search", options.search, action_tx),
            backend,
            task_tx,
            location,
            navigator,
            bindings: KeyBindings::default(),
        }
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub const fn state(&self) -> &UIState {
        &self.state
    }

    pub const fn input(&self) -> &SearchInput {
        &self.input
    }

    pub const fn is_focused(&self) -> bool {
        self.focused
    }

    pub const fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub const fn viewport(&self) -> &ResultsViewport {
        &self.viewport
    }

    pub const fn bindings(&self) -> &KeyBindings {
        &self.bindings
    }

    pub fn current_task(&self) -> Option<&SearchTask> {
        self.current_task.as_ref()
    }

    /// Everything the renderer needs for one frame.
    pub fn snapshot(&self) -> UiSnapshot<'_> {
        UiSnapshot {
            state: &self.state,
            input: &self.input,
            focused: self.focused,
            scroll_offset: self.viewport.offset(),
            placeholder_rows: self.placeholder_rows,
            redraw_flags: self.redraw,
        }
    }

    pub const fn request_redraw(&mut self, flag: RedrawFlag) {
        self.redraw |= flag.bits();
    }

    pub const fn needs_redraw(&self) -> bool {
        self.redraw != 0
    }

    /// Pending redraw bits, cleared.
    pub const fn take_redraw(&mut self) -> u8 {
        std::mem::replace(&mut self.redraw, 0)
    }

    // ------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------

    /// Hydrate from the initial location and search right away if it carries
    /// a query.
    pub fn mount(&mut self, initial: &Location) {
        let query = initial.query().unwrap_or_default();
        info!("Mounting search controller at {}", initial);

        self.state = UIState::with_query(query);
        self.input.set_value(query);
        self.focused = true;
        self.request_redraw(RedrawFlag::All);

        if !query.is_empty() {
            self.submit(query);
        }
    }

    /// Stop every timer and the live task and drop the key bindings.
    /// Safe to call more than once.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        info!("Tearing down search controller");

        self.loading_debounce.cancel();
        self.search_debounce.cancel();
        self.abort_current();
        self.bindings.clear();
        self.torn_down = true;
    }

    // ------------------------------------------------------------------
    // State transitions
    // ------------------------------------------------------------------

    /// Swap in `next`. Returns whether a redraw was requested.
    fn transition(&mut self, next: UIState) -> bool {
        let redraw = should_redraw(&self.state, &next);
        if !next.results.ptr_eq(&self.state.results) {
            self.viewport.reset();
        }
        self.state = next;

        if redraw {
            self.request_redraw(RedrawFlag::All);
        } else {
            trace!("Redraw suppressed while placeholders are showing");
        }
        redraw
    }

    fn abort_current(&mut self) {
        if let Some(task) = self.current_task.take() {
            debug!(task_id = task.id(), "Aborting search task");
            task.abort();
        }
    }

    /// The query text changed: reset everything else, restart both
    /// debouncers and publish the new location.
    pub fn handle_text_change(&mut self, query: &str) {
        debug!("Query changed to {:?}", query);
        if self.input.value() != query {
            self.input.set_value(query);
        }

        // results of the previous text are stale now
        self.abort_current();
        self.transition(UIState::typed(query));

        self.edit_generation += 1;
        self.loading_debounce
            .trigger(Action::ShowLoading(self.edit_generation));
        self.search_debounce
            .trigger(Action::RunSearch(self.edit_generation));
        self.location.push(&Location::for_query(query));
    }

    /// Set the query and search immediately. A pending debounced search is
    /// left alone; when it fires it supersedes this one.
    pub fn submit(&mut self, query: &str) {
        debug!("Submitting {:?}", query);
        if self.input.value() != query {
            self.input.set_value(query);
        }

        let mut next = self.state.clone();
        if next.query != query {
            next.query = CompactString::from(query);
            next.searched = false;
        }
        self.transition(next);
        self.search();
    }

    /// Loading debounce elapsed.
    pub fn show_loading(&mut self) {
        let mut next = self.state.clone();
        next.loading = !next.query.is_empty();
        self.transition(next);
    }

    /// Start a search for the current query, aborting the previous one.
    /// Returns the new task id.
    pub fn search(&mut self) -> u64 {
        let mut next = self.state.clone();
        next.loading = true;
        self.transition(next);

        self.abort_current();

        let id = self.next_task_id;
        self.next_task_id += 1;

        let task = SearchTask::new(id, self.state.query.clone());
        info!(task_id = id, query = %self.state.query, "Starting search");
        task.spawn(Arc::clone(&self.backend), self.task_tx.clone());
        self.current_task = Some(task);
        id
    }

    /// Apply a finished task. Returns false when the outcome was stale.
    pub fn apply_task_result(&mut self, result: TaskResult) -> bool {
        match result {
            TaskResult::Search { task, outcome } => {
                let is_current = self
                    .current_task
                    .as_ref()
                    .is_some_and(|current| current.id() == task.id());

                if task.is_aborted() || !is_current {
                    debug!(task_id = task.id(), "Discarding outcome of stale search");
                    return false;
                }
                self.current_task = None;

                let next = match outcome {
                    Ok(results) => {
                        info!(task_id = task.id(), count = results.len(), "Search resolved");
                        UIState::resolved(task.query(), results)
                    }
                    Err(err) => {
                        warn!(task_id = task.id(), error = %err, "Search failed");
                        UIState::failed(task.query(), err.user_message())
                    }
                };
                self.transition(next);
                true
            }
        }
    }

    // ------------------------------------------------------------------
    // Selection
    // ------------------------------------------------------------------

    /// Select `index`. Returns false if it is out of range or already
    /// selected.
    pub fn select_result(&mut self, index: usize) -> bool {
        if index >= self.state.result_count() || index == self.state.selected {
            return false;
        }

        trace!("Selecting result {}", index);
        let mut next = self.state.clone();
        next.selected = index;
        self.transition(next);
        self.viewport.request_reveal();
        true
    }

    pub fn select_next(&mut self) -> KeyDisposition {
        let next = self.state.selected + 1;
        KeyDisposition::from_changed(self.select_result(next))
    }

    pub fn select_prev(&mut self) -> KeyDisposition {
        let changed = self
            .state
            .selected
            .checked_sub(1)
            .is_some_and(|prev| self.select_result(prev));
        KeyDisposition::from_changed(changed)
    }

    /// Open the selected record's target, if it has one.
    pub fn activate(&mut self) -> KeyDisposition {
        let Some(target) = self
            .state
            .selected_record()
            .and_then(|record| record.target())
            .map(str::to_owned)
        else {
            return KeyDisposition::Ignored;
        };

        if let Err(err) = self.navigator.open(&target) {
            warn!("Failed to open {}: {}", target, err);
        }
        KeyDisposition::Handled
    }

    pub fn focus_search(&mut self) {
        if !self.focused {
            debug!("Focusing search input");
            self.focused = true;
            self.request_redraw(RedrawFlag::Header);
        }
    }

    // ------------------------------------------------------------------
    // Input
    // ------------------------------------------------------------------

    /// Route a key: bound navigation first, then the input's default action.
    pub fn handle_key(&mut self, key: KeyEvent) -> KeyDisposition {
        trace!("Key {:?} (focused={})", key.code, self.focused);

        if !self.focused && key.modifiers.difference(KeyModifiers::SHIFT).is_empty() {
            match key.code {
                KeyCode::Char('q') => {
                    info!("Quit requested");
                    self.should_quit = true;
                    return KeyDisposition::Handled;
                }
                KeyCode::Char('/') => {
                    self.focus_search();
                    return KeyDisposition::Handled;
                }
                _ => {}
            }
        }

        if let Some(command) = self.bindings.lookup(&key) {
            let disposition = match command {
                NavCommand::Next => self.select_next(),
                NavCommand::Previous => self.select_prev(),
                NavCommand::Activate => self.activate(),
            };
            if disposition.is_handled() {
                return disposition;
            }
        }

        if !self.focused {
            return KeyDisposition::Ignored;
        }
        self.apply_default_key(&key)
    }

    fn apply_default_key(&mut self, key: &KeyEvent) -> KeyDisposition {
        match self.input.apply_key(key) {
            InputEdit::Changed => {
                let query = self.input.value().to_owned();
                self.handle_text_change(&query);
            }
            InputEdit::Moved => self.request_redraw(RedrawFlag::Header),
            InputEdit::Submitted => {
                let query = self.input.value().to_owned();
                self.submit(&query);
            }
            InputEdit::Blurred => {
                debug!("Search input blurred");
                self.focused = false;
                self.request_redraw(RedrawFlag::Header);
            }
            InputEdit::Unhandled => return KeyDisposition::Ignored,
        }
        KeyDisposition::Handled
    }

    pub fn handle_mouse(&mut self, mouse: MouseEvent) {
        if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
            return;
        }
        let pos = Position::new(mouse.column, mouse.row);

        if self.layout.header.contains(pos) {
            self.focus_search();
        } else if let Some(index) = self.row_at(pos) {
            self.select_result(index);
        }
    }

    fn row_at(&self, pos: Position) -> Option<usize> {
        let area: Rect = self.layout.results;
        if !area.contains(pos) {
            return None;
        }

        let y = pos.y - area.y + self.viewport.offset();
        self.layout
            .rows
            .iter()
            .find(|hit| y >= hit.handle.top && y < hit.handle.top + hit.handle.height)
            .map(|hit| hit.index)
    }

    // ------------------------------------------------------------------
    // Frames
    // ------------------------------------------------------------------

    /// Take the geometry of the frame just drawn. Starts the scroll that
    /// brings the selected row into view when a selection change asked
    /// for it.
    pub fn after_render(&mut self, layout: FrameLayout, now: Instant) {
        self.viewport
            .set_bounds(layout.results.height, layout.content_height);

        if self.viewport.take_reveal_request()
            && let Some(row) = layout.selected_row
            && self.viewport.reveal(row, now)
        {
            self.request_redraw(RedrawFlag::Results);
        }
        self.layout = layout;
    }

    /// Advance the scroll animation.
    pub fn on_tick(&mut self, now: Instant) {
        if self.viewport.tick(now) {
            self.request_redraw(RedrawFlag::Results);
        }
    }

    /// Apply one action from the event loop.
    pub fn dispatch(&mut self, action: Action) {
        if self.torn_down {
            return;
        }

        match action {
            Action::Key(key) => {
                self.handle_key(key);
            }
            Action::Mouse(mouse) => self.handle_mouse(mouse),
            Action::Resize(..) => self.request_redraw(RedrawFlag::All),
            Action::Tick => self.on_tick(Instant::now()),
            Action::Quit => self.should_quit = true,
            Action::ShowLoading(generation) | Action::RunSearch(generation)
                if generation != self.edit_generation =>
            {
                debug!(generation, current = self.edit_generation, "Dropping stale debounce");
            }
            Action::ShowLoading(_) => self.show_loading(),
            Action::RunSearch(_) => {
                self.search();
            }
            Action::FocusSearch => self.focus_search(),
            Action::SelectResult(index) => {
                self.select_result(index);
            }
            Action::TaskResult(result) => {
                self.apply_task_result(result);
            }
            Action::NoOp => {}
        }
    }
}

impl Drop for SearchController {
    fn drop(&mut self) {
        self.teardown();
    }
}
