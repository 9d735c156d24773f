//! Breakout Core
//!
//! Data model for repeated balanced partitioning: N participants are split
//! into R rooms, round after round, and every pair's shared-room count is
//! remembered so later rounds can avoid repeats.
//!
//! # Balance Invariant
//!
//! Every room holds `floor(N/R)` or `floor(N/R) + 1` participants. See
//! [`CapacityPlan`].
//!
//! # Round Invariants
//!
//! Every [`Assignment`] places each participant in exactly one room and
//! respects the plan's size bounds. The [`CoOccurrenceMatrix`] only grows:
//! it is updated once per finalized round and never decremented.

mod assignment;
mod capacity;
mod cooccurrence;
mod error;
mod ids;
mod stats;

pub use assignment::Assignment;
pub use capacity::{validate_request, CapacityPlan};
pub use cooccurrence::{CoOccurrenceMatrix, Pair};
pub use error::{Error, ErrorKind, Result};
pub use ids::{Algorithm, ParticipantId, RoomId};
pub use stats::PairStats;
