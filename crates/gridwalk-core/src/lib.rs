//! **gridwalk-core**: obstacle grid model for step-by-step path search.
//!
//! This crate provides the foundational types used across the *gridwalk*
//! workspace: the [`Cell`] coordinate, the [`Grid`] of [`CellState`]s with its
//! bounds checks and 4-way neighbor enumeration, and the errors raised when a
//! grid cannot be searched.

pub mod error;
pub mod geom;
pub mod grid;

pub use error::{InvalidGrid, OutOfRange};
pub use geom::{Bounds, Cell, Dir};
pub use grid::{CellState, Grid, MAX_CELLS, Neighbors};
