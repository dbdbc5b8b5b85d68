//! Step-by-step path search over obstacle grids.
//!
//! This crate explores a [`gridwalk_core::Grid`] from its start cell to its
//! end cell with one of three strategies and reports every settled cell as it
//! goes:
//!
//! - **BFS** ([`Strategy::Bfs`]): FIFO frontier, shortest path in steps
//! - **DFS** ([`Strategy::Dfs`]): LIFO frontier, exploration-order demo
//! - **Dijkstra** ([`Strategy::Dijkstra`]): min-cost frontier with relaxation
//!
//! All three run through the same loop in [`Search`]; only the [`Frontier`]
//! and the [`Discovery`] policy differ.
//!
//! # Driving a search
//!
//! | Entry point | Use |
//! |---|---|
//! | [`Search::step`] | one event per call, caller paces |
//! | [`Engine::run`] | run to the end into an [`EventSink`] |

mod engine;
mod error;
mod events;
mod frontier;
mod path;
mod strategy;

pub use engine::{Engine, Outcome, RunState, RunSummary, Search, UNREACHABLE};
pub use error::SearchError;
pub use events::{CancelToken, EventSink, Recorder, SearchEvent};
pub use frontier::{AnyFrontier, Entry, Fifo, Frontier, Lifo, Priority};
pub use path::PredecessorMap;
pub use strategy::{Discovery, ParseStrategyError, Strategy};
