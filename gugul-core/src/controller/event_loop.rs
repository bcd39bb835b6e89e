//! ``src/controller/event_loop.rs``
//! ============================================================================
//! # Event Loop: merge terminal, timer and task sources into actions
//!
//! The loop owns the receiving ends of the task and action channels plus the
//! crossterm event stream. It never touches controller state; it only
//! produces the next `Action`.

use std::time::Duration;

use crossterm::event::{Event as TermEvent, EventStream, KeyCode, KeyEventKind, KeyModifiers};
use futures::StreamExt;
use tokio::{
    sync::mpsc,
    time::{Interval, MissedTickBehavior, interval},
};
use tracing::{debug, info, trace};

use crate::{
    controller::actions::Action, error::SearchError, model::result_list::ResultList,
    tasks::search_task::SearchTask,
};

/// Animation frame interval (~60fps)
pub const TICK_RATE: Duration = Duration::from_millis(16);

/// Outcome of a background task
#[derive(Debug, Clone)]
pub enum TaskResult {
    /// A search finished, successfully or not
    Search {
        task: SearchTask,
        outcome: Result<ResultList, SearchError>,
    },
}

pub struct EventLoop {
    task_rx: mpsc::UnboundedReceiver<TaskResult>,
    action_rx: mpsc::UnboundedReceiver<Action>,
    event_stream: EventStream,
    ticker: Interval,
    event_count: u64,
}

impl EventLoop {
    pub fn new(
        task_rx: mpsc::UnboundedReceiver<TaskResult>,
        action_rx: mpsc::UnboundedReceiver<Action>,
    ) -> Self {
        info!("Initializing event loop");
        let mut ticker = interval(TICK_RATE);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        Self {
            task_rx,
            action_rx,
            event_stream: EventStream::new(),
            ticker,
            event_count: 0,
        }
    }

    pub const fn event_count(&self) -> u64 {
        self.event_count
    }

    /// Wait for the next action. `None` once every source is closed.
    pub async fn next_action(&mut self) -> Option<Action> {
        let action = tokio::select! {
            Some(Ok(event)) = self.event_stream.next() => {
                trace!("Terminal event received: {:?}", event);
                Some(map_terminal_event(event))
            }

            Some(task_result) = self.task_rx.recv() => {
                debug!("Task result received");
                Some(Action::TaskResult(task_result))
            }

            Some(action) = self.action_rx.recv() => {
                debug!("Direct action received: {:?}", action);
                Some(action)
            }

            _ = self.ticker.tick() => Some(Action::Tick),
        };

        if action.is_some() {
            self.event_count += 1;
        }
        action
    }
}

/// Translate a raw terminal event. Keys go to the controller untouched,
/// except Ctrl-C which always quits.
pub fn map_terminal_event(event: TermEvent) -> Action {
    match event {
        TermEvent::Key(key) if key.kind == KeyEventKind::Release => Action::NoOp,

        TermEvent::Key(key)
            if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) =>
        {
            info!("Ctrl-C received");
            Action::Quit
        }

        TermEvent::Key(key) => Action::Key(key),

        TermEvent::Mouse(mouse) => Action::Mouse(mouse),

        TermEvent::Resize(x, y) => {
            info!("Terminal resize: {}x{}", x, y);
            Action::Resize(x, y)
        }

        _ => Action::NoOp,
    }
}
