use std::fmt;
use std::str::FromStr;

use crate::frontier::{AnyFrontier, Fifo, Lifo, Priority};

/// Which search to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Strategy {
    /// Breadth-first: FIFO frontier, shortest path in steps.
    Bfs,
    /// Depth-first: LIFO frontier, finds *a* path, not the shortest.
    Dfs,
    /// Uniform-cost: priority frontier keyed by accumulated cost.
    Dijkstra,
}

/// How newly reached neighbors are scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Discovery {
    /// Push every unvisited neighbor; the first recorded predecessor sticks.
    Unconditional,
    /// Push only on a strictly lower cost, overwriting cost and predecessor.
    Relax,
}

impl Strategy {
    pub const ALL: [Strategy; 3] = [Strategy::Bfs, Strategy::Dfs, Strategy::Dijkstra];

    /// Display name, as offered to users.
    pub const fn name(self) -> &'static str {
        match self {
            Strategy::Bfs => "BFS",
            Strategy::Dfs => "DFS",
            Strategy::Dijkstra => "Dijkstra",
        }
    }

    /// A fresh, empty frontier of the kind this strategy explores with.
    pub fn frontier(self) -> AnyFrontier {
        match self {
            Strategy::Bfs => AnyFrontier::Fifo(Fifo::new()),
            Strategy::Dfs => AnyFrontier::Lifo(Lifo::new()),
            Strategy::Dijkstra => AnyFrontier::Priority(Priority::new()),
        }
    }

    pub const fn discovery(self) -> Discovery {
        match self {
            Strategy::Bfs | Strategy::Dfs => Discovery::Unconditional,
            Strategy::Dijkstra => Discovery::Relax,
        }
    }

    /// Whether the path found is guaranteed to be a shortest one.
    pub const fn is_optimal(self) -> bool {
        !matches!(self, Strategy::Dfs)
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Returned when a strategy name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown search strategy '{0}' (expected BFS, DFS or Dijkstra)")]
pub struct ParseStrategyError(pub String);

impl FromStr for Strategy {
    type Err = ParseStrategyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bfs" | "breadth-first" => Ok(Strategy::Bfs),
            "dfs" | "depth-first" => Ok(Strategy::Dfs),
            "dijkstra" | "ucs" | "uniform-cost" => Ok(Strategy::Dijkstra),
            _ => Err(ParseStrategyError(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontier::Frontier;

    #[test]
    fn parse_names() {
        assert_eq!("BFS".parse(), Ok(Strategy::Bfs));
        assert_eq!(" dfs ".parse(), Ok(Strategy::Dfs));
        assert_eq!("Dijkstra".parse(), Ok(Strategy::Dijkstra));
        assert_eq!("uniform-cost".parse(), Ok(Strategy::Dijkstra));
        assert!("astar".parse::<Strategy>().is_err());
    }

    #[test]
    fn display_round_trips() {
        for s in Strategy::ALL {
            assert_eq!(s.to_string().parse(), Ok(s));
        }
    }

    #[test]
    fn frontier_kinds() {
        assert!(matches!(Strategy::Bfs.frontier(), AnyFrontier::Fifo(_)));
        assert!(matches!(Strategy::Dfs.frontier(), AnyFrontier::Lifo(_)));
        assert!(matches!(Strategy::Dijkstra.frontier(), AnyFrontier::Priority(_)));
        assert!(Strategy::Bfs.frontier().is_empty());
    }

    #[test]
    fn discovery_policy() {
        assert_eq!(Strategy::Bfs.discovery(), Discovery::Unconditional);
        assert_eq!(Strategy::Dfs.discovery(), Discovery::Unconditional);
        assert_eq!(Strategy::Dijkstra.discovery(), Discovery::Relax);
        assert!(!Strategy::Dfs.is_optimal());
    }
}
