//! Geometry primitives: [`Cell`], [`Dir`] and [`Bounds`].
//!
//! Cells are addressed as `(row, col)` with rows growing downwards, the way a
//! grid is drawn on screen.

use std::fmt;
use std::ops::Add;

// ---------------------------------------------------------------------------
// Cell
// ---------------------------------------------------------------------------

/// A grid coordinate. Rows grow down, columns grow right.
///
/// Coordinates are signed so that stepping off an edge yields a value that
/// simply fails the bounds check instead of wrapping.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cell {
    pub row: i32,
    pub col: i32,
}

impl Cell {
    /// Top-left corner.
    pub const ORIGIN: Self = Self { row: 0, col: 0 };

    /// Create a new cell coordinate.
    #[inline]
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// Return the cell shifted by (drow, dcol).
    #[inline]
    pub const fn shift(self, drow: i32, dcol: i32) -> Self {
        Self {
            row: self.row + drow,
            col: self.col + dcol,
        }
    }

    /// The adjacent cell in direction `dir`, which may lie outside any grid.
    #[inline]
    pub const fn step(self, dir: Dir) -> Self {
        let (dr, dc) = dir.delta();
        self.shift(dr, dc)
    }

    /// Manhattan (L1) distance to `other`, i.e. the number of 4-way steps on
    /// an open grid.
    #[inline]
    pub fn manhattan(self, other: Cell) -> u32 {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col)
    }

    /// Whether `other` is one 4-way step away.
    #[inline]
    pub fn is_adjacent(self, other: Cell) -> bool {
        self.manhattan(other) == 1
    }
}

impl From<(i32, i32)> for Cell {
    #[inline]
    fn from((row, col): (i32, i32)) -> Self {
        Self::new(row, col)
    }
}

impl PartialOrd for Cell {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Cell {
    /// Row-major order.
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.row.cmp(&other.row).then(self.col.cmp(&other.col))
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

impl Add<Dir> for Cell {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Dir) -> Self {
        self.step(rhs)
    }
}

// ---------------------------------------------------------------------------
// Dir
// ---------------------------------------------------------------------------

/// One of the four cardinal moves.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Dir {
    Up,
    Down,
    Left,
    Right,
}

impl Dir {
    /// Expansion order used by every search: up, down, left, right.
    ///
    /// Search output is deterministic only because this order is fixed.
    pub const COMPASS: [Dir; 4] = [Dir::Up, Dir::Down, Dir::Left, Dir::Right];

    /// `(drow, dcol)` for this direction.
    #[inline]
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Dir::Up => (-1, 0),
            Dir::Down => (1, 0),
            Dir::Left => (0, -1),
            Dir::Right => (0, 1),
        }
    }
}

// ---------------------------------------------------------------------------
// Bounds
// ---------------------------------------------------------------------------

/// The `rows × cols` extent of a grid and its row-major cell numbering.
///
/// Anything that keeps per-cell data in a flat buffer sized for a grid
/// indexes it through these.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Bounds {
    rows: i32,
    cols: i32,
}

impl Bounds {
    /// Negative extents are clamped to zero.
    #[inline]
    pub const fn new(rows: i32, cols: i32) -> Self {
        Self {
            rows: if rows < 0 { 0 } else { rows },
            cols: if cols < 0 { 0 } else { cols },
        }
    }

    #[inline]
    pub const fn rows(self) -> i32 {
        self.rows
    }

    #[inline]
    pub const fn cols(self) -> i32 {
        self.cols
    }

    /// Number of cells; `None` if it does not fit in `usize`.
    #[inline]
    pub fn area(self) -> Option<usize> {
        (self.rows as usize).checked_mul(self.cols as usize)
    }

    #[inline]
    pub const fn contains(self, c: Cell) -> bool {
        c.row >= 0 && c.row < self.rows && c.col >= 0 && c.col < self.cols
    }

    /// Row-major index of `c`, or `None` outside.
    #[inline]
    pub const fn index(self, c: Cell) -> Option<usize> {
        if !self.contains(c) {
            return None;
        }
        Some(c.row as usize * self.cols as usize + c.col as usize)
    }

    /// Inverse of [`index`](Self::index). `idx` must be below the area.
    #[inline]
    pub const fn cell_at(self, idx: usize) -> Cell {
        let cols = self.cols as usize;
        Cell::new((idx / cols) as i32, (idx % cols) as i32)
    }
}
