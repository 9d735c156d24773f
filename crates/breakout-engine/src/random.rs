//! Uniformly random balanced assignment.

use breakout_core::{Assignment, CapacityPlan, ParticipantId, Result};
use rand::seq::SliceRandom;
use rand::Rng;

/// Shuffles participants and slices them into rooms. Ignores history.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomAssigner;

impl RandomAssigner {
    pub fn assign<R: Rng + ?Sized>(
        &self,
        participants: &[ParticipantId],
        plan: &CapacityPlan,
        rng: &mut R,
    ) -> Result<Assignment> {
        let mut order = participants.to_vec();
        order.shuffle(rng);

        let mut rooms = Vec::with_capacity(plan.rooms());
        let mut rest = order.as_slice();
        for size in random_sizes(plan, rng) {
            let (head, tail) = rest.split_at(size.min(rest.len()));
            rooms.push(head.to_vec());
            rest = tail;
        }

        Assignment::new(plan, participants, rooms)
    }
}

/// Room sizes where a uniformly random subset of `N mod R` rooms gets the
/// extra occupant.
pub fn random_sizes<R: Rng + ?Sized>(plan: &CapacityPlan, rng: &mut R) -> Vec<usize> {
    let mut sizes = vec![plan.min_size(); plan.rooms()];
    let mut rooms: Vec<usize> = (0..plan.rooms()).collect();
    rooms.shuffle(rng);
    for &room in &rooms[..plan.remainder()] {
        sizes[room] += 1;
    }
    sizes
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn produces_balanced_rooms() {
        let mut rng = SmallRng::seed_from_u64(1);
        let plan = CapacityPlan::new(11, 3).unwrap();
        let roster = ParticipantId::roster(11);

        for _ in 0..50 {
            let assignment = RandomAssigner.assign(&roster, &plan, &mut rng).unwrap();
            let mut sizes = assignment.room_sizes();
            sizes.sort_unstable();
            assert_eq!(sizes, vec![3, 4, 4]);
        }
    }

    #[test]
    fn same_seed_same_assignment() {
        let plan = CapacityPlan::new(9, 2).unwrap();
        let roster = ParticipantId::roster(9);
        let a = RandomAssigner
            .assign(&roster, &plan, &mut SmallRng::seed_from_u64(42))
            .unwrap();
        let b = RandomAssigner
            .assign(&roster, &plan, &mut SmallRng::seed_from_u64(42))
            .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn extra_slot_moves_between_rooms() {
        // 7 participants, 3 rooms: one room gets 3.
        let plan = CapacityPlan::new(7, 3).unwrap();
        let mut rng = SmallRng::seed_from_u64(9);
        let trials = 3000;
        let mut large = [0usize; 3];

        for _ in 0..trials {
            let sizes = random_sizes(&plan, &mut rng);
            for (room, &size) in sizes.iter().enumerate() {
                if size == plan.max_size() {
                    large[room] += 1;
                }
            }
        }

        // Each room should get the extra slot about a third of the time.
        for count in large {
            let share = count as f64 / trials as f64;
            assert!((share - 1.0 / 3.0).abs() < 0.05, "share {} too far from 1/3", share);
        }
    }

    #[test]
    fn divisible_counts_have_no_extra_slot() {
        let plan = CapacityPlan::new(8, 4).unwrap();
        let sizes = random_sizes(&plan, &mut SmallRng::seed_from_u64(3));
        assert_eq!(sizes, vec![2, 2, 2, 2]);
    }
}
