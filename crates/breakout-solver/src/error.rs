//! Error types for solver backends.

use std::time::Duration;

use thiserror::Error;

/// Result type for solver operations.
pub type Result<T> = std::result::Result<T, SolveError>;

/// Ways a solve can fail.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SolveError {
    /// No assignment of the variables satisfies every constraint.
    #[error("model is infeasible")]
    Infeasible,

    /// The objective can be decreased without bound.
    #[error("model is unbounded")]
    Unbounded,

    /// The solve did not finish within its time limit.
    #[error("solve exceeded time limit of {0:?}")]
    Timeout(Duration),

    /// The model references a variable it does not define.
    #[error("invalid model: {0}")]
    InvalidModel(String),

    /// Too many abandoned solves are still running to start another.
    #[error("{0} abandoned solves still running")]
    Saturated(usize),

    /// Any other backend failure.
    #[error("backend error: {0}")]
    Backend(String),
}
