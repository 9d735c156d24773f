//! Single-pass greedy placement.
//!
//! Participants are placed one at a time in ascending id order. Each goes to
//! the open room whose current occupants it has met the fewest times:
//!
//! ```text
//! score(p, room) = Σ_{o ∈ room} count(p, o)
//! room(p)        = argmin_{open rooms} (score, room index)
//! ```
//!
//! A room is open while it is below `min_size`, or at `min_size` while some
//! of the `N mod R` larger slots are still unclaimed. This keeps every final
//! room inside `[min_size, max_size]` without backtracking.

use breakout_core::{
    Assignment, CapacityPlan, CoOccurrenceMatrix, Error, ParticipantId, Result, RoomId,
};
use tracing::debug;

/// Deterministic greedy assigner: same roster and matrix, same result.
#[derive(Debug, Clone, Copy, Default)]
pub struct GreedyAssigner;

impl GreedyAssigner {
    pub fn assign(
        &self,
        participants: &[ParticipantId],
        plan: &CapacityPlan,
        matrix: &CoOccurrenceMatrix,
    ) -> Result<Assignment> {
        let mut order = participants.to_vec();
        order.sort_unstable();

        let mut rooms: Vec<Vec<ParticipantId>> =
            vec![Vec::with_capacity(plan.max_size()); plan.rooms()];
        let mut large_slots = plan.remainder();
        let mut total_score = 0u64;

        for participant in order {
            let (index, score) = pick(participant, &rooms, plan, matrix, large_slots)
                .ok_or_else(|| {
                    Error::InfeasibleAssignment(format!(
                        "no room has capacity left for participant {}",
                        participant
                    ))
                })?;

            if rooms[index].len() == plan.min_size() {
                large_slots -= 1;
            }
            rooms[index].push(participant);
            total_score += score;
        }

        debug!(
            participants = plan.participants(),
            rooms = plan.rooms(),
            repeat_score = total_score,
            "greedy placement finished"
        );

        Assignment::new(plan, participants, rooms)
    }

    /// Room the greedy rule would pick for `participant` given partial `rooms`.
    ///
    /// Exposed for diagnostics; [`assign`](Self::assign) applies the same rule.
    pub fn best_room(
        &self,
        participant: ParticipantId,
        rooms: &[Vec<ParticipantId>],
        plan: &CapacityPlan,
        matrix: &CoOccurrenceMatrix,
    ) -> Option<RoomId> {
        let used_large = rooms
            .iter()
            .filter(|r| r.len() > plan.min_size())
            .count();
        let large_slots = plan.remainder().saturating_sub(used_large);
        pick(participant, rooms, plan, matrix, large_slots).map(|(index, _)| RoomId(index))
    }
}

/// Lowest `(score, index)` among open rooms.
fn pick(
    participant: ParticipantId,
    rooms: &[Vec<ParticipantId>],
    plan: &CapacityPlan,
    matrix: &CoOccurrenceMatrix,
    large_slots: usize,
) -> Option<(usize, u64)> {
    rooms
        .iter()
        .enumerate()
        .filter(|(_, occupants)| is_open(plan, occupants.len(), large_slots))
        .map(|(index, occupants)| (index, matrix.score(participant, occupants)))
        .min_by_key(|&(index, score)| (score, index))
}

fn is_open(plan: &CapacityPlan, size: usize, large_slots: usize) -> bool {
    size < plan.min_size() || (size == plan.min_size() && large_slots > 0)
}
