//! Balanced room capacities.
//!
//! For N participants and R rooms every room holds either
//! `floor(N/R)` or `floor(N/R) + 1` occupants, and exactly `N mod R` rooms
//! hold the larger count:
//!
//! ```text
//! min_size  = N / R
//! remainder = N % R
//! max_size  = min_size + (remainder > 0)
//! N         = R × min_size + remainder
//! ```
//!
//! A valid partition always exists: give the first `remainder` rooms
//! `max_size` and the rest `min_size`.

use crate::error::{Error, Result};

/// Per-room size bounds for one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CapacityPlan {
    participants: usize,
    rooms: usize,
}

impl CapacityPlan {
    /// Plan capacities for `participants` people across `rooms` rooms.
    ///
    /// # Examples
    ///
    /// ```
    /// use breakout_core::CapacityPlan;
    ///
    /// let plan = CapacityPlan::new(5, 2).unwrap();
    /// assert_eq!((plan.min_size(), plan.max_size()), (2, 3));
    /// assert!(CapacityPlan::new(3, 4).is_err()); // would leave a room empty
    /// ```
    pub fn new(participants: usize, rooms: usize) -> Result<Self> {
        if participants == 0 {
            return Err(Error::InvalidConfiguration(
                "participant count must be at least 1".into(),
            ));
        }
        if rooms == 0 {
            return Err(Error::InvalidConfiguration(
                "room count must be at least 1".into(),
            ));
        }
        if rooms > participants {
            return Err(Error::InvalidConfiguration(format!(
                "room count ({}) exceeds participant count ({})",
                rooms, participants
            )));
        }
        Ok(Self {
            participants,
            rooms,
        })
    }

    /// Total participants N.
    #[inline]
    pub const fn participants(&self) -> usize {
        self.participants
    }

    /// Total rooms R.
    #[inline]
    pub const fn rooms(&self) -> usize {
        self.rooms
    }

    #[inline]
    pub const fn min_size(&self) -> usize {
        self.participants / self.rooms
    }

    #[inline]
    pub const fn max_size(&self) -> usize {
        if self.remainder() == 0 {
            self.min_size()
        } else {
            self.min_size() + 1
        }
    }

    /// Number of rooms that must hold `max_size` occupants (`N mod R`).
    #[inline]
    pub const fn remainder(&self) -> usize {
        self.participants % self.rooms
    }

    /// Whether a room of `size` occupants respects the balance rule.
    #[inline]
    pub const fn admits(&self, size: usize) -> bool {
        size >= self.min_size() && size <= self.max_size()
    }

    /// Room sizes with the larger rooms first.
    pub fn round_robin_sizes(&self) -> Vec<usize> {
        (0..self.rooms)
            .map(|room| self.min_size() + usize::from(room < self.remainder()))
            .collect()
    }

    /// Whether a full set of room sizes is a valid partition under this plan.
    pub fn accepts_sizes(&self, sizes: &[usize]) -> bool {
        sizes.len() == self.rooms
            && sizes.iter().all(|&s| self.admits(s))
            && sizes.iter().sum::<usize>() == self.participants
    }
}

/// Validate a full request before any round runs.
///
/// Rejects zero rounds in addition to everything [`CapacityPlan::new`] rejects.
pub fn validate_request(participants: usize, rooms: usize, rounds: usize) -> Result<CapacityPlan> {
    let plan = CapacityPlan::new(participants, rooms)?;
    if rounds == 0 {
        return Err(Error::InvalidConfiguration(
            "round count must be at least 1".into(),
        ));
    }
    Ok(plan)
}
