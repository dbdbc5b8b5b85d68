//! Errors raised by the grid model.

use crate::geom::Cell;

/// Reasons a grid cannot be built or searched.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidGrid {
    /// Rows or columns are not positive, or the grid has too many cells.
    #[error("invalid grid dimensions {rows}x{cols}")]
    Dimensions { rows: i64, cols: i64 },
    /// No start cell has been placed.
    #[error("grid has no start cell")]
    MissingStart,
    /// No end cell has been placed.
    #[error("grid has no end cell")]
    MissingEnd,
    /// A text layout names a second start cell.
    #[error("grid has a second start cell at {second} (first at {first})")]
    DuplicateStart { first: Cell, second: Cell },
    /// A text layout names a second end cell.
    #[error("grid has a second end cell at {second} (first at {first})")]
    DuplicateEnd { first: Cell, second: Cell },
    /// Start or end sits on an obstacle.
    #[error("endpoint {0} is an obstacle")]
    BlockedEndpoint(Cell),
    /// Lines of a text layout have different widths.
    #[error("row {row} has {found} columns, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
    /// A text layout contains a character outside `.#SE`.
    #[error("unknown symbol '{ch}' at {at}")]
    UnknownSymbol { ch: char, at: Cell },
}

/// A coordinate outside the grid was handed to a grid accessor.
///
/// Coordinates inside a search come from neighbor enumeration or from the
/// validated endpoints, so seeing this mid-run is a bug, not bad input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("cell {cell} is outside the {rows}x{cols} grid")]
pub struct OutOfRange {
    pub cell: Cell,
    pub rows: i32,
    pub cols: i32,
}
