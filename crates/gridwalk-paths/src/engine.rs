//! The traversal engine: one search loop for every strategy.
//!
//! An [`Engine`] hands out at most one running [`Search`] at a time. A
//! `Search` borrows the grid and advances one event per
//! [`step`](Search::step), so the caller decides when the next cell is
//! settled. [`Engine::run`] is the convenience that drives a search to the
//! end and feeds an [`EventSink`].

use std::cell::Cell as Slot;
use std::rc::{Rc, Weak};

use gridwalk_core::{Cell, Grid};
use log::{debug, trace, warn};

use crate::error::SearchError;
use crate::events::{CancelToken, EventSink, SearchEvent};
use crate::frontier::{AnyFrontier, Entry, Frontier};
use crate::path::PredecessorMap;
use crate::strategy::{Discovery, Strategy};

/// Sentinel value meaning "no cost known yet" in the cost map.
pub const UNREACHABLE: u32 = u32::MAX;

/// Lifecycle of a run, as seen from its engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RunState {
    Idle,
    Running,
    Succeeded,
    Exhausted,
    Cancelled,
}

impl RunState {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            RunState::Succeeded | RunState::Exhausted | RunState::Cancelled
        )
    }
}

/// How a finished run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Outcome {
    Found(Vec<Cell>),
    NoPath,
    Cancelled,
}

impl Outcome {
    fn state(&self) -> RunState {
        match self {
            Outcome::Found(_) => RunState::Succeeded,
            Outcome::NoPath => RunState::Exhausted,
            Outcome::Cancelled => RunState::Cancelled,
        }
    }

    fn event(&self) -> SearchEvent {
        match self {
            Outcome::Found(path) => SearchEvent::PathFound(path.clone()),
            Outcome::NoPath => SearchEvent::NoPath,
            Outcome::Cancelled => SearchEvent::Cancelled,
        }
    }
}

/// Totals for a finished run.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RunSummary {
    pub strategy: Strategy,
    pub outcome: Outcome,
    /// Cells settled, start and end included.
    pub visited: usize,
    /// Largest frontier size seen, stale entries included.
    pub peak_frontier: usize,
}

impl RunSummary {
    /// The found path, if any.
    pub fn path(&self) -> Option<&[Cell]> {
        match &self.outcome {
            Outcome::Found(p) => Some(p),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// Hands out searches, one at a time.
#[derive(Debug, Default)]
pub struct Engine {
    current: Weak<Slot<RunState>>,
}

impl Engine {
    pub fn new() -> Self {
        Self::default()
    }

    /// State of the latest run. `Idle` once its [`Search`] has been dropped.
    pub fn state(&self) -> RunState {
        self.current
            .upgrade()
            .map_or(RunState::Idle, |s| s.get())
    }

    /// Begin a search with a private cancel token.
    pub fn start<'g>(
        &mut self,
        grid: &'g Grid,
        strategy: Strategy,
    ) -> Result<Search<'g>, SearchError> {
        self.start_with_cancel(grid, strategy, CancelToken::new())
    }

    /// Begin a search that stops once `cancel` is triggered.
    ///
    /// Fails with [`SearchError::ConcurrentRun`] while a previous search of
    /// this engine is still running, and with [`SearchError::InvalidGrid`]
    /// when the grid lacks a usable start or end.
    pub fn start_with_cancel<'g>(
        &mut self,
        grid: &'g Grid,
        strategy: Strategy,
        cancel: CancelToken,
    ) -> Result<Search<'g>, SearchError> {
        if self.state() == RunState::Running {
            return Err(SearchError::ConcurrentRun);
        }
        let (start, end) = grid.validate()?;
        let state = Rc::new(Slot::new(RunState::Running));
        self.current = Rc::downgrade(&state);
        debug!(
            "{strategy} search {start} -> {end} on {}x{} grid",
            grid.rows(),
            grid.cols()
        );
        Search::new(grid, strategy, start, end, cancel, state)
    }

    /// Run a search to its end, sending every event to `sink`.
    pub fn run<S: EventSink + ?Sized>(
        &mut self,
        grid: &Grid,
        strategy: Strategy,
        cancel: &CancelToken,
        sink: &mut S,
    ) -> Result<RunSummary, SearchError> {
        let mut search = self.start_with_cancel(grid, strategy, cancel.clone())?;
        search.drive(sink)
    }
}

// ---------------------------------------------------------------------------
// Search
// ---------------------------------------------------------------------------

/// One run over a borrowed grid. Dropping it mid-run cancels the run.
pub struct Search<'g> {
    grid: &'g Grid,
    strategy: Strategy,
    start: Cell,
    end: Cell,
    frontier: AnyFrontier,
    visited: Vec<bool>,
    visited_count: usize,
    preds: PredecessorMap,
    /// Lowest known cost per cell; only populated for Dijkstra.
    costs: Vec<u32>,
    cancel: CancelToken,
    state: Rc<Slot<RunState>>,
    outcome: Option<Outcome>,
    /// Terminal event waiting to be emitted by the next step.
    pending: Option<SearchEvent>,
    peak_frontier: usize,
}

impl<'g> Search<'g> {
    fn new(
        grid: &'g Grid,
        strategy: Strategy,
        start: Cell,
        end: Cell,
        cancel: CancelToken,
        state: Rc<Slot<RunState>>,
    ) -> Result<Self, SearchError> {
        let costs = match strategy.discovery() {
            Discovery::Relax => vec![UNREACHABLE; grid.len()],
            Discovery::Unconditional => Vec::new(),
        };
        let mut search = Self {
            grid,
            strategy,
            start,
            end,
            frontier: strategy.frontier(),
            visited: vec![false; grid.len()],
            visited_count: 0,
            preds: PredecessorMap::for_grid(grid),
            costs,
            cancel,
            state,
            outcome: None,
            pending: None,
            peak_frontier: 0,
        };

        let si = grid.index(start)?;
        search.preds.set_root(start);
        if !search.costs.is_empty() {
            search.costs[si] = 0;
        }
        search.push(Entry::new(start, 0));
        Ok(search)
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    pub fn start(&self) -> Cell {
        self.start
    }

    pub fn end(&self) -> Cell {
        self.end
    }

    pub fn state(&self) -> RunState {
        self.state.get()
    }

    /// A handle on this run's cancel flag.
    pub fn cancel_token(&self) -> &CancelToken {
        &self.cancel
    }

    /// Number of cells settled so far.
    pub fn visited_count(&self) -> usize {
        self.visited_count
    }

    pub fn is_visited(&self, cell: Cell) -> bool {
        self.grid.index(cell).is_ok_and(|i| self.visited[i])
    }

    /// Best known cost to `cell`. Only Dijkstra keeps a cost map.
    pub fn cost_at(&self, cell: Cell) -> Option<u32> {
        let i = self.grid.index(cell).ok()?;
        self.costs.get(i).copied().filter(|&c| c != UNREACHABLE)
    }

    pub fn predecessors(&self) -> &PredecessorMap {
        &self.preds
    }

    /// Entries currently in the frontier, stale ones included.
    pub fn frontier_len(&self) -> usize {
        self.frontier.len()
    }

    /// Totals, once the run is over.
    pub fn summary(&self) -> Option<RunSummary> {
        let outcome = self.outcome.clone()?;
        Some(RunSummary {
            strategy: self.strategy,
            outcome,
            visited: self.visited_count,
            peak_frontier: self.peak_frontier,
        })
    }

    /// Advance by one event.
    ///
    /// Returns `Ok(None)` once the terminal event has been handed out.
    pub fn step(&mut self) -> Result<Option<SearchEvent>, SearchError> {
        if let Some(ev) = self.pending.take() {
            return Ok(Some(ev));
        }
        if self.state() != RunState::Running {
            return Ok(None);
        }
        if self.cancel.is_cancelled() {
            return Ok(Some(self.finish(Outcome::Cancelled)));
        }

        loop {
            let Some(entry) = self.frontier.pop_next() else {
                return Ok(Some(self.finish(Outcome::NoPath)));
            };
            let ci = self.grid.index(entry.cell)?;
            if self.visited[ci] {
                // Duplicate push or superseded cost.
                continue;
            }
            self.visited[ci] = true;
            self.visited_count += 1;
            trace!("visit {} (cost {})", entry.cell, entry.cost);

            if entry.cell == self.end {
                let outcome = match self.preds.reconstruct(self.start, self.end) {
                    Some(path) => Outcome::Found(path),
                    None => {
                        warn!(
                            "reached {} but the predecessor chain back to {} is broken",
                            self.end, self.start
                        );
                        Outcome::NoPath
                    }
                };
                self.pending = Some(self.finish(outcome));
            } else {
                self.expand(entry, ci)?;
            }
            return Ok(Some(SearchEvent::Visited(entry.cell)));
        }
    }

    /// Step until the run is over, sending every event to `sink`.
    pub fn drive<S: EventSink + ?Sized>(&mut self, sink: &mut S) -> Result<RunSummary, SearchError> {
        while let Some(ev) = self.step()? {
            sink.on_event(&ev);
        }
        // `step` only stops once `finish` has stored the outcome; a running
        // search can't be dropped while borrowed here.
        match self.summary() {
            Some(summary) => Ok(summary),
            None => unreachable!("{} search stopped without an outcome", self.strategy),
        }
    }

    fn expand(&mut self, current: Entry, ci: usize) -> Result<(), SearchError> {
        let discovery = self.strategy.discovery();
        let base = match discovery {
            Discovery::Relax => self.costs[ci],
            Discovery::Unconditional => current.cost,
        };
        let cost = base + 1;

        for n in self.grid.neighbors(current.cell)? {
            let ni = self.grid.index(n)?;
            if self.visited[ni] || !self.grid.is_traversable(n)? {
                continue;
            }
            match discovery {
                Discovery::Unconditional => {
                    self.preds.record_first(n, current.cell);
                    self.push(Entry::new(n, cost));
                }
                Discovery::Relax => {
                    if cost < self.costs[ni] {
                        self.costs[ni] = cost;
                        self.preds.relink(n, current.cell);
                        self.push(Entry::new(n, cost));
                    }
                }
            }
        }
        Ok(())
    }

    fn push(&mut self, entry: Entry) {
        self.frontier.push(entry);
        self.peak_frontier = self.peak_frontier.max(self.frontier.len());
    }

    fn finish(&mut self, outcome: Outcome) -> SearchEvent {
        let ev = outcome.event();
        self.state.set(outcome.state());
        debug!(
            "{} search ended {:?} after {} visits",
            self.strategy,
            outcome.state(),
            self.visited_count
        );
        self.outcome = Some(outcome);
        ev
    }
}

impl Drop for Search<'_> {
    fn drop(&mut self) {
        if self.state() == RunState::Running {
            debug!("{} search dropped while running", self.strategy);
            self.state.set(RunState::Cancelled);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(layout: &str) -> Grid {
        layout.parse().unwrap()
    }

    #[test]
    fn step_by_step_until_terminal() {
        let g = grid("SE");
        let mut engine = Engine::new();
        let mut s = engine.start(&g, Strategy::Bfs).unwrap();
        assert_eq!(s.state(), RunState::Running);
        assert_eq!(s.step(), Ok(Some(SearchEvent::Visited(Cell::new(0, 0)))));
        assert_eq!(s.step(), Ok(Some(SearchEvent::Visited(Cell::new(0, 1)))));
        assert_eq!(s.state(), RunState::Succeeded);
        assert_eq!(
            s.step(),
            Ok(Some(SearchEvent::PathFound(vec![Cell::new(0, 0), Cell::new(0, 1)])))
        );
        assert_eq!(s.step(), Ok(None));
        assert_eq!(s.step(), Ok(None));
        assert_eq!(engine.state(), RunState::Succeeded);
        drop(s);
        assert_eq!(engine.state(), RunState::Idle);
    }

    #[test]
    fn invalid_grid_is_rejected_before_running() {
        let mut g = Grid::new(2, 2).unwrap();
        g.set_start(Cell::ORIGIN).unwrap();
        let mut engine = Engine::new();
        assert!(matches!(
            engine.start(&g, Strategy::Dfs),
            Err(SearchError::InvalidGrid(_))
        ));
        assert_eq!(engine.state(), RunState::Idle);
    }

    #[test]
    fn second_start_while_running_fails() {
        let g = grid("S..E");
        let mut engine = Engine::new();
        let mut first = engine.start(&g, Strategy::Bfs).unwrap();
        first.step().unwrap();
        assert_eq!(
            engine.start(&g, Strategy::Dfs).err(),
            Some(SearchError::ConcurrentRun)
        );
        // Finished but still held: a new run is fine.
        while first.step().unwrap().is_some() {}
        assert!(engine.start(&g, Strategy::Dfs).is_ok());
    }

    #[test]
    fn dropping_a_running_search_frees_the_engine() {
        let g = grid("S..E");
        let mut engine = Engine::new();
        let mut s = engine.start(&g, Strategy::Bfs).unwrap();
        s.step().unwrap();
        assert_eq!(engine.state(), RunState::Running);
        drop(s);
        assert_eq!(engine.state(), RunState::Idle);
        assert!(engine.start(&g, Strategy::Bfs).is_ok());
    }

    #[test]
    fn dijkstra_records_costs() {
        let g = grid("S.\n.E");
        let mut engine = Engine::new();
        let mut s = engine.start(&g, Strategy::Dijkstra).unwrap();
        assert_eq!(s.cost_at(Cell::new(0, 0)), Some(0));
        assert_eq!(s.cost_at(Cell::new(1, 1)), None);
        s.drive(&mut |_: &SearchEvent| {}).unwrap();
        assert_eq!(s.cost_at(Cell::new(0, 1)), Some(1));
        assert_eq!(s.cost_at(Cell::new(1, 0)), Some(1));
        assert_eq!(s.cost_at(Cell::new(1, 1)), Some(2));
    }

    #[test]
    fn bfs_keeps_no_cost_map() {
        let g = grid("S.E");
        let mut engine = Engine::new();
        let mut s = engine.start(&g, Strategy::Bfs).unwrap();
        s.drive(&mut |_: &SearchEvent| {}).unwrap();
        assert_eq!(s.cost_at(Cell::new(0, 1)), None);
        assert!(s.is_visited(Cell::new(0, 1)));
        assert_eq!(s.predecessors().predecessor(Cell::new(0, 2)), Some(Cell::new(0, 1)));
    }

    #[test]
    fn summary_only_after_the_end() {
        let g = grid("S#E");
        let mut engine = Engine::new();
        let mut s = engine.start(&g, Strategy::Bfs).unwrap();
        assert_eq!(s.summary(), None);
        assert_eq!(s.step(), Ok(Some(SearchEvent::Visited(Cell::ORIGIN))));
        assert_eq!(s.step(), Ok(Some(SearchEvent::NoPath)));
        let sum = s.summary().unwrap();
        assert_eq!(sum.outcome, Outcome::NoPath);
        assert_eq!(sum.visited, 1);
        assert_eq!(sum.path(), None);
    }

    #[test]
    fn drive_resumes_and_reports_the_stored_outcome() {
        let g = grid("S.E");
        let mut engine = Engine::new();
        let mut s = engine.start(&g, Strategy::Dijkstra).unwrap();
        assert_eq!(s.step(), Ok(Some(SearchEvent::Visited(Cell::ORIGIN))));

        let mut rest = Vec::new();
        let sum = s.drive(&mut |e: &SearchEvent| rest.push(e.clone())).unwrap();
        let path = vec![Cell::new(0, 0), Cell::new(0, 1), Cell::new(0, 2)];
        assert_eq!(
            rest,
            vec![
                SearchEvent::Visited(Cell::new(0, 1)),
                SearchEvent::Visited(Cell::new(0, 2)),
                SearchEvent::PathFound(path.clone()),
            ]
        );
        assert_eq!(sum.outcome, Outcome::Found(path));
        assert_eq!(sum.visited, 3);
        assert_eq!(s.summary(), Some(sum.clone()));

        // A finished search emits nothing more and reports the same totals.
        let mut extra = 0;
        let again = s.drive(&mut |_: &SearchEvent| extra += 1).unwrap();
        assert_eq!(extra, 0);
        assert_eq!(again, sum);
    }

    #[test]
    fn dfs_pushes_duplicates() {
        // Several cells are pushed more than once; once every cell is
        // visited the leftovers in the stack are all stale copies.
        let g = grid("S..\n...\n..E");
        let mut engine = Engine::new();
        let mut s = engine.start(&g, Strategy::Dfs).unwrap();
        let sum = s.drive(&mut |_: &SearchEvent| {}).unwrap();
        assert_eq!(sum.visited, g.len());
        assert_eq!(s.frontier_len(), 4);
        assert!(sum.peak_frontier >= 5);
    }
}
