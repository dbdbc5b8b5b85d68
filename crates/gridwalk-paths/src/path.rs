//! Predecessor bookkeeping and backtracking path reconstruction.

use gridwalk_core::{Bounds, Cell, Grid};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Link {
    Unseen,
    /// The search origin: discovered, with no predecessor.
    Root,
    From(Cell),
}

/// Where each discovered cell was reached from, stored flat and row-major.
#[derive(Debug, Clone)]
pub struct PredecessorMap {
    bounds: Bounds,
    links: Vec<Link>,
}

impl PredecessorMap {
    /// An empty map sized for `grid`.
    pub fn for_grid(grid: &Grid) -> Self {
        Self {
            bounds: grid.bounds(),
            links: vec![Link::Unseen; grid.len()],
        }
    }

    #[inline]
    fn idx(&self, c: Cell) -> Option<usize> {
        self.bounds.index(c)
    }

    /// Mark `cell` as the origin. Returns `false` if it is out of range.
    pub fn set_root(&mut self, cell: Cell) -> bool {
        match self.idx(cell) {
            Some(i) => {
                self.links[i] = Link::Root;
                true
            }
            None => false,
        }
    }

    /// Record `from` as the predecessor of `cell` unless one is already
    /// recorded. Returns whether the link was written.
    pub fn record_first(&mut self, cell: Cell, from: Cell) -> bool {
        match self.idx(cell) {
            Some(i) if self.links[i] == Link::Unseen => {
                self.links[i] = Link::From(from);
                true
            }
            _ => false,
        }
    }

    /// Point `cell` at `from`, replacing any earlier link.
    pub fn relink(&mut self, cell: Cell, from: Cell) -> bool {
        match self.idx(cell) {
            Some(i) => {
                self.links[i] = Link::From(from);
                true
            }
            None => false,
        }
    }

    /// Whether `cell` has been discovered (origin included).
    pub fn contains(&self, cell: Cell) -> bool {
        self.idx(cell)
            .is_some_and(|i| self.links[i] != Link::Unseen)
    }

    /// The cell `cell` was reached from; `None` for the origin and for
    /// undiscovered cells.
    pub fn predecessor(&self, cell: Cell) -> Option<Cell> {
        match self.links[self.idx(cell)?] {
            Link::From(p) => Some(p),
            Link::Root | Link::Unseen => None,
        }
    }

    /// Walk back from `end` to `start` and return the path in start-to-end
    /// order, both endpoints included.
    ///
    /// Returns `None` when `end` was never discovered, or when the chain is
    /// broken: it dangles, loops, takes a non-adjacent step, or bottoms out
    /// at a root other than `start`.
    pub fn reconstruct(&self, start: Cell, end: Cell) -> Option<Vec<Cell>> {
        let mut path = vec![end];
        let mut cur = end;
        while cur != start {
            // A simple chain can't be longer than the grid.
            if path.len() > self.links.len() {
                return None;
            }
            match self.links[self.idx(cur)?] {
                Link::From(p) if p.is_adjacent(cur) => {
                    path.push(p);
                    cur = p;
                }
                Link::From(_) | Link::Root | Link::Unseen => return None,
            }
        }
        if self.links[self.idx(start)?] != Link::Root {
            return None;
        }
        path.reverse();
        Some(path)
    }
}
