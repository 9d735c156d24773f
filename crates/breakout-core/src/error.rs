//! Error types for the assignment engine.

use std::time::Duration;

use thiserror::Error;

use crate::Algorithm;

/// Result type for breakout operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while planning or computing assignments.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Counts are non-positive, or there are more rooms than participants.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// A produced assignment broke the capacity or coverage invariant.
    #[error("infeasible assignment: {0}")]
    InfeasibleAssignment(String),

    /// The solver proved the round's integer program has no solution.
    #[error("solver reported the round infeasible: {0}")]
    Infeasible(String),

    /// The solver exceeded its time budget.
    #[error("optimization timed out after {0:?}")]
    OptimizationTimeout(Duration),

    /// Any other solver backend failure.
    #[error("solver error: {0}")]
    Solver(String),

    /// A failure inside a specific round.
    #[error("round {round} ({algorithm}) failed: {source}")]
    Round {
        round: usize,
        algorithm: Algorithm,
        #[source]
        source: Box<Error>,
    },
}

/// Flat classification of an [`Error`], with round context stripped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub enum ErrorKind {
    InvalidConfiguration,
    InfeasibleAssignment,
    Infeasible,
    OptimizationTimeout,
    Solver,
}

impl ErrorKind {
    /// Suggested HTTP status for a front end that maps engine failures.
    pub const fn status(&self) -> u16 {
        match self {
            ErrorKind::InvalidConfiguration => 400,
            ErrorKind::InfeasibleAssignment => 500,
            ErrorKind::Infeasible => 502,
            ErrorKind::OptimizationTimeout => 504,
            ErrorKind::Solver => 502,
        }
    }
}

impl Error {
    /// Wrap this error with the round and algorithm it happened in.
    pub fn in_round(self, round: usize, algorithm: Algorithm) -> Self {
        Error::Round {
            round,
            algorithm,
            source: Box::new(self),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidConfiguration(_) => ErrorKind::InvalidConfiguration,
            Error::InfeasibleAssignment(_) => ErrorKind::InfeasibleAssignment,
            Error::Infeasible(_) => ErrorKind::Infeasible,
            Error::OptimizationTimeout(_) => ErrorKind::OptimizationTimeout,
            Error::Solver(_) => ErrorKind::Solver,
            Error::Round { source, .. } => source.kind(),
        }
    }

    /// Round index the failure happened in, if it was raised by a round.
    pub fn round(&self) -> Option<usize> {
        match self {
            Error::Round { round, .. } => Some(*round),
            _ => None,
        }
    }

    /// Whether the failure came from the solver rather than from bad input.
    pub fn is_solver_failure(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::Infeasible | ErrorKind::OptimizationTimeout | ErrorKind::Solver
        )
    }
}
