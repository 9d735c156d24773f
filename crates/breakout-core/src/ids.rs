//! Participant and room identifiers, and the algorithm selector.

use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// An opaque participant identifier, unique within one request.
///
/// Participants of a request are numbered `1..=N`. The ordering is only used
/// to fix a deterministic processing order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ParticipantId(pub u32);

impl ParticipantId {
    #[inline]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    #[inline]
    pub const fn value(&self) -> u32 {
        self.0
    }

    /// The participants of a request of size `count`: `1..=count`.
    pub fn roster(count: usize) -> Vec<ParticipantId> {
        (1..=count as u32).map(ParticipantId).collect()
    }
}

impl From<u32> for ParticipantId {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A room, by zero-based index. Displayed one-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct RoomId(pub usize);

impl RoomId {
    #[inline]
    pub const fn index(&self) -> usize {
        self.0
    }

    /// One-based room number, as presented to callers.
    #[inline]
    pub const fn number(&self) -> usize {
        self.0 + 1
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "room {}", self.number())
    }
}

/// Assignment strategy for rounds after the first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Algorithm {
    Random,
    #[default]
    Greedy,
    Optimal,
}

impl Algorithm {
    pub const ALL: [Algorithm; 3] = [Algorithm::Random, Algorithm::Greedy, Algorithm::Optimal];

    pub fn as_str(&self) -> &'static str {
        match self {
            Algorithm::Random => "random",
            Algorithm::Greedy => "greedy",
            Algorithm::Optimal => "optimal",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Algorithm {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "random" => Ok(Algorithm::Random),
            "greedy" => Ok(Algorithm::Greedy),
            "optimal" => Ok(Algorithm::Optimal),
            other => Err(Error::InvalidConfiguration(format!(
                "unknown algorithm {:?} (expected random, greedy or optimal)",
                other
            ))),
        }
    }
}
