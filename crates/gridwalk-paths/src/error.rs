use gridwalk_core::{InvalidGrid, OutOfRange};

/// Failures reported by the engine. Not finding a path is an outcome, not an
/// error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SearchError {
    /// The grid cannot be searched (missing or blocked endpoint).
    #[error(transparent)]
    InvalidGrid(#[from] InvalidGrid),
    /// A coordinate escaped the grid; indicates a bug in the caller or engine.
    #[error(transparent)]
    OutOfRange(#[from] OutOfRange),
    /// A run was started while another run of the same engine is going.
    #[error("a search is already running on this engine")]
    ConcurrentRun,
}
