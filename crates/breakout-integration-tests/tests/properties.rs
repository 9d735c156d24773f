//! Property tests over random request shapes.

use breakout_core::{Algorithm, CapacityPlan, CoOccurrenceMatrix, ParticipantId};
use breakout_engine::{random_sizes, Engine, EngineConfig, GreedyAssigner, RandomAssigner, Request};
use breakout_integration_tests::{check_assignment, check_schedule};
use proptest::prelude::*;
use rand::rngs::SmallRng;
use rand::SeedableRng;

fn shape() -> impl Strategy<Value = (usize, usize, usize)> {
    (1usize..40)
        .prop_flat_map(|n| (Just(n), 1..=n, 1usize..6))
}

proptest! {
    #[test]
    fn every_run_keeps_rooms_balanced(
        (n, r, t) in shape(),
        seed in any::<u64>(),
        greedy in any::<bool>(),
    ) {
        let algorithm = if greedy { Algorithm::Greedy } else { Algorithm::Random };
        let schedule = Engine::new(EngineConfig::default().with_seed(seed))
            .run(&Request::new(n, r, t, algorithm))
            .unwrap();

        prop_assert_eq!(schedule.round_count(), t);
        prop_assert_eq!(schedule.matrix.rounds_recorded(), t);
        if let Err(e) = check_schedule(&schedule) {
            return Err(TestCaseError::fail(e));
        }
    }

    #[test]
    fn greedy_is_deterministic_and_balanced((n, r, _) in shape(), seed in any::<u64>()) {
        let plan = CapacityPlan::new(n, r).unwrap();
        let roster = ParticipantId::roster(n);
        let mut rng = SmallRng::seed_from_u64(seed);
        let mut matrix = CoOccurrenceMatrix::new();
        matrix.record(&RandomAssigner.assign(&roster, &plan, &mut rng).unwrap());

        let first = GreedyAssigner.assign(&roster, &plan, &matrix).unwrap();
        let again = GreedyAssigner.assign(&roster, &plan, &matrix).unwrap();
        prop_assert_eq!(&first, &again);
        if let Err(e) = check_assignment(&plan, &first) {
            return Err(TestCaseError::fail(e));
        }
    }

    #[test]
    fn random_sizes_always_fit_plan((n, r, _) in shape(), seed in any::<u64>()) {
        let plan = CapacityPlan::new(n, r).unwrap();
        let mut rng = SmallRng::seed_from_u64(seed);
        let sizes = random_sizes(&plan, &mut rng);

        prop_assert!(plan.accepts_sizes(&sizes));
        prop_assert_eq!(sizes.iter().filter(|&&s| s == plan.max_size() && s > plan.min_size()).count(), plan.remainder());
    }

    #[test]
    fn zero_or_oversized_requests_are_rejected(n in 0usize..10, extra in 1usize..5, t in 0usize..3) {
        let request = Request::new(n, n + extra, t, Algorithm::Greedy);
        let err = Engine::new(EngineConfig::default().with_seed(0)).run(&request).unwrap_err();
        prop_assert_eq!(err.kind(), breakout_core::ErrorKind::InvalidConfiguration);
    }
}
