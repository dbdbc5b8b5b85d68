//! Frontier containers: the open lists that decide exploration order.
//!
//! All three share the [`Frontier`] contract. None of them deduplicate: a
//! cell may be pushed several times and the engine discards the extra copies
//! when they come out after the cell was already visited.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, VecDeque};

use gridwalk_core::Cell;

/// A cell waiting in the frontier, with the accumulated cost of the route
/// that discovered it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Entry {
    pub cell: Cell,
    pub cost: u32,
}

impl Entry {
    #[inline]
    pub const fn new(cell: Cell, cost: u32) -> Self {
        Self { cell, cost }
    }
}

/// Uniform open-list interface.
pub trait Frontier {
    /// Schedule an entry.
    fn push(&mut self, entry: Entry);

    /// Remove and return the next entry according to the container's policy.
    fn pop_next(&mut self) -> Option<Entry>;

    /// Number of scheduled entries, stale ones included.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ---------------------------------------------------------------------------
// Fifo
// ---------------------------------------------------------------------------

/// First in, first out. Drives breadth-first search.
#[derive(Debug, Default, Clone)]
pub struct Fifo {
    queue: VecDeque<Entry>,
}

impl Fifo {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Frontier for Fifo {
    fn push(&mut self, entry: Entry) {
        self.queue.push_back(entry);
    }

    fn pop_next(&mut self) -> Option<Entry> {
        self.queue.pop_front()
    }

    fn len(&self) -> usize {
        self.queue.len()
    }
}

// ---------------------------------------------------------------------------
// Lifo
// ---------------------------------------------------------------------------

/// Last in, first out. Drives depth-first search.
#[derive(Debug, Default, Clone)]
pub struct Lifo {
    stack: Vec<Entry>,
}

impl Lifo {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Frontier for Lifo {
    fn push(&mut self, entry: Entry) {
        self.stack.push(entry);
    }

    fn pop_next(&mut self) -> Option<Entry> {
        self.stack.pop()
    }

    fn len(&self) -> usize {
        self.stack.len()
    }
}

// ---------------------------------------------------------------------------
// Priority
// ---------------------------------------------------------------------------

/// Heap slot ordered by `(cost, seq)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Ranked {
    cost: u32,
    /// Insertion counter; equal costs pop in push order.
    seq: u64,
    cell: Cell,
}

impl Ord for Ranked {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        // Wrapped in Reverse for the BinaryHeap, so this is the natural
        // order: cheaper first, then older first.
        self.cost
            .cmp(&other.cost)
            .then_with(|| self.seq.cmp(&other.seq))
    }
}

impl PartialOrd for Ranked {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

/// Min-priority queue on accumulated cost. Drives Dijkstra.
///
/// Improved costs are pushed as new entries; the superseded ones stay in the
/// heap until popped and are then skipped by the engine (lazy deletion).
#[derive(Debug, Default, Clone)]
pub struct Priority {
    heap: BinaryHeap<Reverse<Ranked>>,
    seq: u64,
}

impl Priority {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Frontier for Priority {
    fn push(&mut self, entry: Entry) {
        let seq = self.seq;
        self.seq += 1;
        self.heap.push(Reverse(Ranked {
            cost: entry.cost,
            seq,
            cell: entry.cell,
        }));
    }

    fn pop_next(&mut self) -> Option<Entry> {
        self.heap
            .pop()
            .map(|Reverse(r)| Entry::new(r.cell, r.cost))
    }

    fn len(&self) -> usize {
        self.heap.len()
    }
}

// ---------------------------------------------------------------------------
// AnyFrontier
// ---------------------------------------------------------------------------

/// One of the three frontiers, picked at run time from a
/// [`Strategy`](crate::Strategy).
#[derive(Debug, Clone)]
pub enum AnyFrontier {
    Fifo(Fifo),
    Lifo(Lifo),
    Priority(Priority),
}

impl Frontier for AnyFrontier {
    #[inline]
    fn push(&mut self, entry: Entry) {
        match self {
            AnyFrontier::Fifo(f) => f.push(entry),
            AnyFrontier::Lifo(f) => f.push(entry),
            AnyFrontier::Priority(f) => f.push(entry),
        }
    }

    #[inline]
    fn pop_next(&mut self) -> Option<Entry> {
        match self {
            AnyFrontier::Fifo(f) => f.pop_next(),
            AnyFrontier::Lifo(f) => f.pop_next(),
            AnyFrontier::Priority(f) => f.pop_next(),
        }
    }

    #[inline]
    fn len(&self) -> usize {
        match self {
            AnyFrontier::Fifo(f) => f.len(),
            AnyFrontier::Lifo(f) => f.len(),
            AnyFrontier::Priority(f) => f.len(),
        }
    }
}
