//! Error types for grid construction, lookups and search control.

use grid_util::point::Point;
use thiserror::Error;

/// Caller errors reported by the grid and the search engine.
///
/// All of these are synchronous and non-retryable: they signal bad input,
/// never an internal engine fault. An unreachable goal is not an error; it
/// is reported through [SearchPhase::Failed](crate::SearchPhase::Failed).
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchError {
    #[error("invalid grid dimensions {width}x{height}")]
    InvalidDimension { width: usize, height: usize },

    #[error("cell ({x}, {z}) is outside the grid")]
    OutOfBounds { x: i32, z: i32 },

    #[error("invalid endpoints: start {start} and goal {goal} must be distinct walkable cells")]
    InvalidEndpoint { start: Point, goal: Point },

    #[error("no path available: the search has not succeeded")]
    NoPathAvailable,
}

pub type Result<T> = std::result::Result<T, SearchError>;
