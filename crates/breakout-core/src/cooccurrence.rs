//! Pairwise co-occurrence tracking across rounds.
//!
//! The matrix is symmetric and sparse: only pairs that have shared a room
//! are stored, keyed by `(low, high)`. Counts only ever grow, one round at a
//! time, through [`CoOccurrenceMatrix::record`].

use std::collections::HashMap;

use crate::assignment::Assignment;
use crate::ids::ParticipantId;

/// An unordered participant pair, stored with the lower id first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Pair(ParticipantId, ParticipantId);

impl Pair {
    pub fn new(a: ParticipantId, b: ParticipantId) -> Self {
        if a <= b {
            Self(a, b)
        } else {
            Self(b, a)
        }
    }

    pub const fn low(&self) -> ParticipantId {
        self.0
    }

    pub const fn high(&self) -> ParticipantId {
        self.1
    }
}

/// Request-scoped count of how often each pair has shared a room.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CoOccurrenceMatrix {
    counts: HashMap<Pair, u32>,
    rounds: usize,
}

impl CoOccurrenceMatrix {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one more meeting for every pair co-located in `assignment`.
    pub fn record(&mut self, assignment: &Assignment) {
        for (a, b) in assignment.pairs() {
            *self.counts.entry(Pair::new(a, b)).or_insert(0) += 1;
        }
        self.rounds += 1;
    }

    /// Rounds in which `a` and `b` shared a room. Zero for unseen pairs.
    pub fn count_of(&self, a: ParticipantId, b: ParticipantId) -> u32 {
        if a == b {
            return 0;
        }
        self.counts.get(&Pair::new(a, b)).copied().unwrap_or(0)
    }

    /// Sum of counts between `participant` and each of `others`.
    pub fn score(&self, participant: ParticipantId, others: &[ParticipantId]) -> u64 {
        others
            .iter()
            .map(|&other| u64::from(self.count_of(participant, other)))
            .sum()
    }

    /// Pairs that have met at least once, with their counts.
    pub fn pairs(&self) -> impl Iterator<Item = (Pair, u32)> + '_ {
        self.counts.iter().map(|(&pair, &count)| (pair, count))
    }

    /// Number of rounds recorded so far.
    pub fn rounds_recorded(&self) -> usize {
        self.rounds
    }

    pub fn max_count(&self) -> u32 {
        self.counts.values().copied().max().unwrap_or(0)
    }

    /// Sum of all pair counts (total co-located pair-rounds).
    pub fn total(&self) -> u64 {
        self.counts.values().map(|&c| u64::from(c)).sum()
    }

    /// Number of distinct pairs that have met.
    pub fn distinct_pairs(&self) -> usize {
        self.counts.len()
    }

    /// True if no pair in `self` has a higher count in `earlier`.
    pub fn dominates(&self, earlier: &CoOccurrenceMatrix) -> bool {
        earlier
            .pairs()
            .all(|(pair, count)| self.count_of(pair.low(), pair.high()) >= count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CapacityPlan;

    fn p(id: u32) -> ParticipantId {
        ParticipantId(id)
    }

    fn assignment(rooms: &[&[u32]]) -> Assignment {
        let n = rooms.iter().map(|r| r.len()).sum();
        let plan = CapacityPlan::new(n, rooms.len()).unwrap();
        let rooms = rooms
            .iter()
            .map(|r| r.iter().copied().map(ParticipantId).collect())
            .collect();
        Assignment::new(&plan, &ParticipantId::roster(n), rooms).unwrap()
    }

    #[test]
    fn empty_matrix_counts_zero() {
        let matrix = CoOccurrenceMatrix::new();
        assert_eq!(matrix.count_of(p(1), p(2)), 0);
        assert_eq!(matrix.count_of(p(1), p(1)), 0);
        assert_eq!(matrix.max_count(), 0);
        assert_eq!(matrix.rounds_recorded(), 0);
    }

    #[test]
    fn record_counts_each_room_pair_once() {
        let mut matrix = CoOccurrenceMatrix::new();
        matrix.record(&assignment(&[&[1, 2, 3], &[4, 5]]));

        assert_eq!(matrix.count_of(p(1), p(2)), 1);
        assert_eq!(matrix.count_of(p(3), p(1)), 1);
        assert_eq!(matrix.count_of(p(4), p(5)), 1);
        assert_eq!(matrix.count_of(p(1), p(4)), 0);
        assert_eq!(matrix.distinct_pairs(), 4);
        assert_eq!(matrix.total(), 4);
    }

    #[test]
    fn counts_are_symmetric_and_accumulate() {
        let mut matrix = CoOccurrenceMatrix::new();
        matrix.record(&assignment(&[&[1, 2], &[3, 4]]));
        let before = matrix.clone();
        matrix.record(&assignment(&[&[1, 2], &[3, 4]]));
        matrix.record(&assignment(&[&[1, 3], &[2, 4]]));

        assert_eq!(matrix.count_of(p(1), p(2)), 2);
        assert_eq!(matrix.count_of(p(2), p(1)), 2);
        assert_eq!(matrix.count_of(p(1), p(3)), 1);
        assert_eq!(matrix.max_count(), 2);
        assert_eq!(matrix.rounds_recorded(), 3);
        assert!(matrix.dominates(&before));
        assert!(!before.dominates(&matrix));
    }

    #[test]
    fn score_sums_over_occupants() {
        let mut matrix = CoOccurrenceMatrix::new();
        matrix.record(&assignment(&[&[1, 2], &[3, 4]]));
        matrix.record(&assignment(&[&[1, 3], &[2, 4]]));

        assert_eq!(matrix.score(p(1), &[p(2), p(3), p(4)]), 2);
        assert_eq!(matrix.score(p(4), &[]), 0);
    }

    #[test]
    fn pair_normalizes_order() {
        assert_eq!(Pair::new(p(5), p(2)), Pair::new(p(2), p(5)));
        assert_eq!(Pair::new(p(5), p(2)).low(), p(2));
    }
}
