//! Breakout Solver
//!
//! A small integer-programming layer: build a [`Model`] out of variables,
//! linear constraints and a linear objective, then hand it to any
//! [`Solver`]. Formulation code depends only on the trait, so the concrete
//! MILP library can be swapped without touching it.
//!
//! # Backends
//!
//! - [`MicroLp`] (feature `microlp`, on by default): pure-Rust
//!   branch-and-bound through `good_lp`.

mod error;
mod model;

#[cfg(feature = "microlp")]
mod microlp;

use std::sync::Arc;
use std::time::Duration;

pub use error::{Result, SolveError};
pub use model::{Constraint, Domain, LinearExpr, Model, Relation, Solution, VarId, Variable};

#[cfg(feature = "microlp")]
pub use microlp::{MicroLp, DEFAULT_MAX_DETACHED};

/// A MILP oracle: minimize the model's objective subject to its constraints.
///
/// Implementations must return [`SolveError::Timeout`] rather than block past
/// `time_limit` when one is given. The model is shared so a backend can hand
/// it to a worker without copying it.
pub trait Solver: Send + Sync {
    /// Short backend name for logs.
    fn name(&self) -> &'static str;

    fn solve(&self, model: Arc<Model>, time_limit: Option<Duration>) -> Result<Solution>;
}

impl<S: Solver + ?Sized> Solver for Arc<S> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn solve(&self, model: Arc<Model>, time_limit: Option<Duration>) -> Result<Solution> {
        (**self).solve(model, time_limit)
    }
}

/// The backend compiled in by default.
#[cfg(feature = "microlp")]
pub fn default_solver() -> MicroLp {
    MicroLp::default()
}
