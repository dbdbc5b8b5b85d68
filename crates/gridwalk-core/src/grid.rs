//! The [`Grid`] type: a fixed-size 2D store of [`CellState`]s.
//!
//! The grid is sized once at construction and edited only between searches.
//! Obstacles live in a flat row-major buffer; the start and end cells are
//! tracked separately so that both can sit on the same coordinate, and so
//! that an obstacle dropped on an endpoint hides it without forgetting it.
//!
//! ## Text layout
//!
//! Grids can be written and read as ASCII art, one line per row:
//!
//! ```text
//! S..#
//! .#.#
//! ...E
//! ```
//!
//! `.` is empty, `#` an obstacle, `S` the start and `E` the end.

use std::fmt;
use std::str::FromStr;

use crate::error::{InvalidGrid, OutOfRange};
use crate::geom::{Bounds, Cell, Dir};

const EMPTY_CH: char = '.';
const OBSTACLE_CH: char = '#';
const START_CH: char = 'S';
const END_CH: char = 'E';

/// Largest number of cells a [`Grid`] may have (a 4096×4096 board).
pub const MAX_CELLS: usize = 1 << 24;

// ---------------------------------------------------------------------------
// CellState
// ---------------------------------------------------------------------------

/// What occupies a cell.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CellState {
    #[default]
    Empty,
    Obstacle,
    Start,
    End,
}

impl CellState {
    /// Everything but an obstacle can be walked through.
    #[inline]
    pub const fn is_traversable(self) -> bool {
        !matches!(self, CellState::Obstacle)
    }

    /// The text-layout symbol for this state.
    pub const fn symbol(self) -> char {
        match self {
            CellState::Empty => EMPTY_CH,
            CellState::Obstacle => OBSTACLE_CH,
            CellState::Start => START_CH,
            CellState::End => END_CH,
        }
    }

    /// Parse a text-layout symbol.
    pub const fn from_symbol(ch: char) -> Option<Self> {
        match ch {
            EMPTY_CH => Some(CellState::Empty),
            OBSTACLE_CH => Some(CellState::Obstacle),
            START_CH => Some(CellState::Start),
            END_CH => Some(CellState::End),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Grid
// ---------------------------------------------------------------------------

/// A `rows × cols` obstacle grid with an optional start and end cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    bounds: Bounds,
    /// Row-major; `true` marks an obstacle.
    blocked: Vec<bool>,
    start: Option<Cell>,
    end: Option<Cell>,
}

impl Grid {
    /// Create an empty grid of the given dimensions.
    ///
    /// Fails with [`InvalidGrid::Dimensions`] when either side is not
    /// positive or the grid would exceed [`MAX_CELLS`].
    pub fn new(rows: i32, cols: i32) -> Result<Self, InvalidGrid> {
        let dims_err = InvalidGrid::Dimensions {
            rows: rows.into(),
            cols: cols.into(),
        };
        if rows <= 0 || cols <= 0 {
            return Err(dims_err);
        }
        let bounds = Bounds::new(rows, cols);
        let Some(len) = bounds.area().filter(|&n| n <= MAX_CELLS) else {
            return Err(dims_err);
        };
        let mut blocked = Vec::new();
        if blocked.try_reserve_exact(len).is_err() {
            return Err(dims_err);
        }
        blocked.resize(len, false);
        Ok(Self {
            bounds,
            blocked,
            start: None,
            end: None,
        })
    }

    /// Number of rows.
    #[inline]
    pub fn rows(&self) -> i32 {
        self.bounds.rows()
    }

    /// Number of columns.
    #[inline]
    pub fn cols(&self) -> i32 {
        self.bounds.cols()
    }

    /// Extent and row-major numbering, for buffers sized to this grid.
    #[inline]
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// Total number of cells.
    #[inline]
    pub fn len(&self) -> usize {
        self.blocked.len()
    }

    /// Always `false`: construction rejects empty grids.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.blocked.is_empty()
    }

    /// Whether `cell` lies inside the grid.
    #[inline]
    pub fn contains(&self, cell: Cell) -> bool {
        self.bounds.contains(cell)
    }

    /// Flat row-major index of `cell`.
    #[inline]
    pub fn index(&self, cell: Cell) -> Result<usize, OutOfRange> {
        self.bounds
            .index(cell)
            .ok_or_else(|| self.out_of_range(cell))
    }

    /// Inverse of [`index`](Self::index). The caller guarantees
    /// `idx < self.len()`.
    #[inline]
    pub fn cell_at(&self, idx: usize) -> Cell {
        self.bounds.cell_at(idx)
    }

    fn out_of_range(&self, cell: Cell) -> OutOfRange {
        OutOfRange {
            cell,
            rows: self.rows(),
            cols: self.cols(),
        }
    }

    /// The state of `cell`. When start and end coincide, `Start` wins; an
    /// obstacle hides an endpoint underneath it.
    pub fn state_of(&self, cell: Cell) -> Result<CellState, OutOfRange> {
        let i = self.index(cell)?;
        Ok(self.state_at(i, cell))
    }

    fn state_at(&self, i: usize, cell: Cell) -> CellState {
        if self.blocked[i] {
            CellState::Obstacle
        } else if self.start == Some(cell) {
            CellState::Start
        } else if self.end == Some(cell) {
            CellState::End
        } else {
            CellState::Empty
        }
    }

    /// Whether a search may step onto `cell`.
    #[inline]
    pub fn is_traversable(&self, cell: Cell) -> Result<bool, OutOfRange> {
        let i = self.index(cell)?;
        Ok(!self.blocked[i])
    }

    /// In-bounds 4-way neighbors of `cell` in compass order (up, down, left,
    /// right). Obstacles are included; filtering is up to the caller.
    pub fn neighbors(&self, cell: Cell) -> Result<Neighbors, OutOfRange> {
        if !self.contains(cell) {
            return Err(self.out_of_range(cell));
        }
        Ok(Neighbors {
            origin: cell,
            bounds: self.bounds,
            next: 0,
        })
    }

    /// The start cell, if placed.
    #[inline]
    pub fn start(&self) -> Option<Cell> {
        self.start
    }

    /// The end cell, if placed.
    #[inline]
    pub fn end(&self) -> Option<Cell> {
        self.end
    }

    /// Check that the grid can be searched and return `(start, end)`.
    pub fn validate(&self) -> Result<(Cell, Cell), InvalidGrid> {
        let start = self.start.ok_or(InvalidGrid::MissingStart)?;
        let end = self.end.ok_or(InvalidGrid::MissingEnd)?;
        for p in [start, end] {
            // Endpoints are only ever placed through `index`, so they are in
            // range; only an obstacle can make them unusable.
            if self.is_traversable(p) != Ok(true) {
                return Err(InvalidGrid::BlockedEndpoint(p));
            }
        }
        Ok((start, end))
    }

    // -----------------------------------------------------------------------
    // Editing
    // -----------------------------------------------------------------------

    /// Move the start to `cell`, clearing any obstacle there.
    pub fn set_start(&mut self, cell: Cell) -> Result<(), OutOfRange> {
        let i = self.index(cell)?;
        self.blocked[i] = false;
        self.start = Some(cell);
        Ok(())
    }

    /// Move the end to `cell`, clearing any obstacle there.
    pub fn set_end(&mut self, cell: Cell) -> Result<(), OutOfRange> {
        let i = self.index(cell)?;
        self.blocked[i] = false;
        self.end = Some(cell);
        Ok(())
    }

    /// Put an obstacle on `cell`. An endpoint on that cell is removed.
    pub fn set_obstacle(&mut self, cell: Cell) -> Result<(), OutOfRange> {
        let i = self.index(cell)?;
        self.forget_endpoint(cell);
        self.blocked[i] = true;
        Ok(())
    }

    /// Place the next thing in click order: the start if there is none, then
    /// the end, then obstacles. Returns the state `cell` ends up with.
    ///
    /// Unlike [`set_obstacle`](Self::set_obstacle), an obstacle marked on an
    /// endpoint keeps the endpoint: it stays placed but blocked, and
    /// [`validate`](Self::validate) reports it until the cell is erased or
    /// the endpoint is moved.
    pub fn mark(&mut self, cell: Cell) -> Result<CellState, OutOfRange> {
        if self.start.is_none() {
            self.set_start(cell)?;
        } else if self.end.is_none() {
            self.set_end(cell)?;
        } else {
            let i = self.index(cell)?;
            self.blocked[i] = true;
        }
        self.state_of(cell)
    }

    /// Make `cell` empty, removing an obstacle or endpoint.
    pub fn erase(&mut self, cell: Cell) -> Result<(), OutOfRange> {
        let i = self.index(cell)?;
        self.forget_endpoint(cell);
        self.blocked[i] = false;
        Ok(())
    }

    fn forget_endpoint(&mut self, cell: Cell) {
        if self.start == Some(cell) {
            self.start = None;
        }
        if self.end == Some(cell) {
            self.end = None;
        }
    }

    /// Remove every obstacle, keeping start and end.
    pub fn clear_obstacles(&mut self) {
        self.blocked.fill(false);
    }

    /// Back to a blank grid: no obstacles, no start, no end.
    pub fn reset(&mut self) {
        self.clear_obstacles();
        self.start = None;
        self.end = None;
    }

    /// Number of obstacle cells.
    pub fn obstacle_count(&self) -> usize {
        self.blocked.iter().filter(|&&b| b).count()
    }

    /// Iterate over `(Cell, CellState)` pairs in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (Cell, CellState)> + '_ {
        (0..self.len()).map(move |i| {
            let c = self.cell_at(i);
            (c, self.state_at(i, c))
        })
    }
}

impl FromStr for Grid {
    type Err = InvalidGrid;

    /// Parse a text layout. Surrounding blank lines and trailing spaces are
    /// ignored; every row must have the same width.
    fn from_str(s: &str) -> Result<Self, InvalidGrid> {
        let lines: Vec<&str> = s.trim().lines().map(str::trim_end).collect();
        let rows = if lines.iter().all(|l| l.is_empty()) { 0 } else { lines.len() };
        let width = lines.first().map_or(0, |l| l.chars().count());
        let dims = |rows: usize, cols: usize| InvalidGrid::Dimensions {
            rows: rows as i64,
            cols: cols as i64,
        };
        let (Ok(nrows), Ok(ncols)) = (i32::try_from(rows), i32::try_from(width)) else {
            return Err(dims(rows, width));
        };
        let mut grid = Grid::new(nrows, ncols)?;

        for (r, line) in lines.iter().enumerate() {
            let found = line.chars().count();
            if found != width {
                return Err(InvalidGrid::RaggedRow {
                    row: r,
                    expected: width,
                    found,
                });
            }
            for (c, ch) in line.chars().enumerate() {
                let at = Cell::new(r as i32, c as i32);
                let state =
                    CellState::from_symbol(ch).ok_or(InvalidGrid::UnknownSymbol { ch, at })?;
                let i = grid.index(at).map_err(|_| dims(rows, width))?;
                match state {
                    CellState::Empty => {}
                    CellState::Obstacle => grid.blocked[i] = true,
                    CellState::Start => {
                        if let Some(first) = grid.start {
                            return Err(InvalidGrid::DuplicateStart { first, second: at });
                        }
                        grid.start = Some(at);
                    }
                    CellState::End => {
                        if let Some(first) = grid.end {
                            return Err(InvalidGrid::DuplicateEnd { first, second: at });
                        }
                        grid.end = Some(at);
                    }
                }
            }
        }
        Ok(grid)
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (c, st) in self.iter() {
            if c.col == 0 && c.row > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", st.symbol())?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Neighbors
// ---------------------------------------------------------------------------

/// Iterator over the in-bounds 4-way neighbors of a cell, in
/// [`Dir::COMPASS`] order.
#[derive(Clone, Debug)]
pub struct Neighbors {
    origin: Cell,
    bounds: Bounds,
    next: usize,
}

impl Iterator for Neighbors {
    type Item = Cell;

    fn next(&mut self) -> Option<Cell> {
        while let Some(&dir) = Dir::COMPASS.get(self.next) {
            self.next += 1;
            let n = self.origin + dir;
            if self.bounds.contains(n) {
                return Some(n);
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(Dir::COMPASS.len() - self.next))
    }
}
