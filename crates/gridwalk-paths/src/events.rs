//! The event stream a search produces, and the sinks that consume it.
//!
//! A run emits any number of [`SearchEvent::Visited`] followed by exactly one
//! terminal event. Renderers implement [`EventSink`]; they own pacing and
//! input and may stop a run through a shared [`CancelToken`].

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use gridwalk_core::Cell;

/// One step of a search, in emission order.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SearchEvent {
    /// A cell was taken off the frontier and settled.
    Visited(Cell),
    /// The end was reached; the path runs start to end, both included.
    PathFound(Vec<Cell>),
    /// The frontier ran dry before reaching the end.
    NoPath,
    /// The run was stopped through its cancel token.
    Cancelled,
}

impl SearchEvent {
    /// Whether this event ends the stream.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, SearchEvent::Visited(_))
    }
}

/// Consumer of search events.
pub trait EventSink {
    fn on_event(&mut self, event: &SearchEvent);
}

impl<F: FnMut(&SearchEvent)> EventSink for F {
    fn on_event(&mut self, event: &SearchEvent) {
        self(event)
    }
}

/// Sink that keeps every event, for tests and headless callers.
#[derive(Debug, Default, Clone)]
pub struct Recorder {
    events: Vec<SearchEvent>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// All events received so far.
    pub fn events(&self) -> &[SearchEvent] {
        &self.events
    }

    /// Visited cells in visiting order.
    pub fn visited(&self) -> Vec<Cell> {
        self.events
            .iter()
            .filter_map(|e| match e {
                SearchEvent::Visited(c) => Some(*c),
                _ => None,
            })
            .collect()
    }

    /// The terminal event, once one arrived.
    pub fn terminal(&self) -> Option<&SearchEvent> {
        self.events.last().filter(|e| e.is_terminal())
    }

    /// The found path, if the run succeeded.
    pub fn path(&self) -> Option<&[Cell]> {
        match self.terminal() {
            Some(SearchEvent::PathFound(p)) => Some(p),
            _ => None,
        }
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl EventSink for Recorder {
    fn on_event(&mut self, event: &SearchEvent) {
        self.events.push(event.clone());
    }
}

/// Cooperative stop flag shared between a run and whoever drives it.
///
/// Clones share the flag. The engine checks it once per step, so a request
/// takes effect before the next cell is settled.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask the run to stop.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }

    /// Clear a previous request so the token can be reused for another run.
    pub fn reset(&self) {
        self.flag.store(false, Ordering::Relaxed);
    }
}
