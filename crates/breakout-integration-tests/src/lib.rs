//! Shared checks for end-to-end engine tests.

use std::collections::HashSet;

use breakout_core::{Assignment, CapacityPlan, CoOccurrenceMatrix, ParticipantId};
use breakout_engine::Schedule;

/// Check that one assignment is a balanced partition of `1..=N`.
pub fn check_assignment(plan: &CapacityPlan, assignment: &Assignment) -> Result<(), String> {
    if assignment.room_count() != plan.rooms() {
        return Err(format!(
            "expected {} rooms, got {}",
            plan.rooms(),
            assignment.room_count()
        ));
    }

    let mut seen = HashSet::new();
    for (room, occupants) in assignment.rooms() {
        if !plan.admits(occupants.len()) {
            return Err(format!(
                "{} holds {} participants, outside [{}, {}]",
                room,
                occupants.len(),
                plan.min_size(),
                plan.max_size()
            ));
        }
        for &p in occupants {
            if !seen.insert(p) {
                return Err(format!("participant {} seated twice", p));
            }
        }
    }

    let expected: HashSet<_> = ParticipantId::roster(plan.participants()).into_iter().collect();
    if seen != expected {
        return Err("seated participants differ from the roster".into());
    }
    Ok(())
}

/// Check every round of a schedule, and that the final matrix is the sum of
/// its rounds and grew monotonically.
pub fn check_schedule(schedule: &Schedule) -> Result<(), String> {
    let mut replay = CoOccurrenceMatrix::new();
    for outcome in &schedule.rounds {
        check_assignment(&schedule.plan, &outcome.assignment)
            .map_err(|e| format!("round {}: {}", outcome.round, e))?;

        let before = replay.clone();
        replay.record(&outcome.assignment);
        if !replay.dominates(&before) {
            return Err(format!("round {} decreased a pair count", outcome.round));
        }
        if replay.total() != before.total() + outcome.assignment.pairs().count() as u64 {
            return Err(format!("round {} did not add one per co-located pair", outcome.round));
        }
    }

    if replay != schedule.matrix {
        return Err("schedule matrix does not match its rounds".into());
    }
    Ok(())
}

/// Largest pair count after one round of `assign` on top of `history`.
pub fn max_after(history: &CoOccurrenceMatrix, assignment: &Assignment) -> u32 {
    let mut matrix = history.clone();
    matrix.record(assignment);
    matrix.max_count()
}
