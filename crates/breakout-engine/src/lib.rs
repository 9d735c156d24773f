//! Breakout Engine
//!
//! Produces a sequence of balanced room assignments that keeps pairs of
//! participants from meeting again.
//!
//! # Assigners
//!
//! - [`RandomAssigner`]: uniform shuffle. Always used for round 1.
//! - [`GreedyAssigner`]: one pass, each participant joins the open room with
//!   the fewest prior partners. Deterministic.
//! - [`OptimalAssigner`]: per-round integer program minimizing weighted
//!   repeat pairings, solved by any [`breakout_solver::Solver`].
//!
//! # Example
//!
//! ```
//! use breakout_core::Algorithm;
//! use breakout_engine::{Engine, EngineConfig, Request};
//!
//! let engine = Engine::new(EngineConfig::default().with_seed(7));
//! let schedule = engine.run(&Request::new(9, 3, 3, Algorithm::Greedy)).unwrap();
//! assert_eq!(schedule.round_count(), 3);
//! ```

mod config;
mod greedy;
mod optimal;
mod orchestrator;
mod random;

pub use config::{EngineConfig, Fallback, PairWeighting, DEFAULT_SOLVER_TIMEOUT};
pub use greedy::GreedyAssigner;
pub use optimal::{weighted_cost, Formulation, OptimalAssigner};
pub use orchestrator::{Engine, Request, RoundOutcome, Schedule};
pub use random::{random_sizes, RandomAssigner};
