//! Multi-round driver.
//!
//! ```text
//! Start ──► round 1 (random) ──► round 2..T (selected) ──► Done
//!   │            │                      │
//!   empty     record()               record()
//!   matrix
//! ```
//!
//! Rounds run strictly in order because each one reads the matrix left by
//! the previous one. The matrix and RNG belong to a single run and are never
//! shared.

use std::sync::Arc;

use breakout_core::{
    validate_request, Algorithm, Assignment, CapacityPlan, CoOccurrenceMatrix, PairStats,
    ParticipantId, Result,
};
use breakout_solver::Solver;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, warn};

use crate::config::{EngineConfig, Fallback};
use crate::greedy::GreedyAssigner;
use crate::optimal::OptimalAssigner;
use crate::random::RandomAssigner;

/// Engine input, as supplied by a front end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Request {
    pub participant_count: usize,
    pub room_count: usize,
    pub round_count: usize,
    pub algorithm: Algorithm,
}

impl Request {
    pub fn new(participants: usize, rooms: usize, rounds: usize, algorithm: Algorithm) -> Self {
        Self {
            participant_count: participants,
            room_count: rooms,
            round_count: rounds,
            algorithm,
        }
    }
}

/// One finished round.
#[derive(Debug, Clone, PartialEq)]
pub struct RoundOutcome {
    /// One-based round index.
    pub round: usize,
    /// Algorithm that produced this round (differs from the request after a fallback).
    pub algorithm: Algorithm,
    pub assignment: Assignment,
}

/// Result of a full run.
#[derive(Debug, Clone)]
pub struct Schedule {
    pub plan: CapacityPlan,
    pub rounds: Vec<RoundOutcome>,
    /// Matrix after the last round.
    pub matrix: CoOccurrenceMatrix,
    pub stats: PairStats,
}

impl Schedule {
    pub fn assignments(&self) -> impl Iterator<Item = &Assignment> + '_ {
        self.rounds.iter().map(|r| &r.assignment)
    }

    pub fn round_count(&self) -> usize {
        self.rounds.len()
    }
}

/// Runs requests end to end. Holds only immutable configuration, so one
/// engine can serve concurrent runs.
#[derive(Clone)]
pub struct Engine {
    config: EngineConfig,
    optimal: OptimalAssigner,
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("config", &self.config)
            .field("optimal", &self.optimal)
            .finish()
    }
}

impl Engine {
    /// Engine backed by the bundled solver.
    pub fn new(config: EngineConfig) -> Self {
        Self::with_solver(config, Arc::new(breakout_solver::default_solver()))
    }

    pub fn with_solver(config: EngineConfig, solver: Arc<dyn Solver>) -> Self {
        let optimal = OptimalAssigner::new(solver)
            .with_weighting(config.weighting)
            .with_time_limit(config.solver_timeout);
        Self { config, optimal }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Run a request with an RNG seeded from the config (or OS entropy).
    pub fn run(&self, request: &Request) -> Result<Schedule> {
        let mut rng = match self.config.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_os_rng(),
        };
        self.run_with_rng(request, &mut rng)
    }

    pub fn run_with_rng<R: Rng + ?Sized>(&self, request: &Request, rng: &mut R) -> Result<Schedule> {
        self.config.validate()?;
        let plan = validate_request(request.participant_count, request.room_count, request.round_count)?;
        let participants = ParticipantId::roster(plan.participants());

        info!(
            participants = plan.participants(),
            rooms = plan.rooms(),
            rounds = request.round_count,
            algorithm = %request.algorithm,
            "starting run"
        );

        let mut matrix = CoOccurrenceMatrix::new();
        let mut rounds = Vec::with_capacity(request.round_count);

        for round in 1..=request.round_count {
            let algorithm = if round == 1 {
                Algorithm::Random
            } else {
                request.algorithm
            };

            let outcome = self.assign_round(round, algorithm, &participants, &plan, &matrix, rng)?;
            matrix.record(&outcome.assignment);

            debug!(
                round,
                algorithm = %outcome.algorithm,
                max_count = matrix.max_count(),
                "round recorded"
            );
            rounds.push(outcome);
        }

        let stats = PairStats::from_matrix(&matrix, plan.participants());
        info!(
            rounds = rounds.len(),
            max_count = stats.max,
            repeated_pairs = stats.repeated_pairs,
            mean = stats.mean,
            "run complete"
        );

        Ok(Schedule {
            plan,
            rounds,
            matrix,
            stats,
        })
    }

    fn assign_round<R: Rng + ?Sized>(
        &self,
        round: usize,
        algorithm: Algorithm,
        participants: &[ParticipantId],
        plan: &CapacityPlan,
        matrix: &CoOccurrenceMatrix,
        rng: &mut R,
    ) -> Result<RoundOutcome> {
        let attempt = match algorithm {
            Algorithm::Random => RandomAssigner.assign(participants, plan, rng),
            Algorithm::Greedy => GreedyAssigner.assign(participants, plan, matrix),
            Algorithm::Optimal => self.optimal.assign(participants, plan, matrix),
        };

        match attempt {
            Ok(assignment) => Ok(RoundOutcome {
                round,
                algorithm,
                assignment,
            }),
            Err(e)
                if algorithm == Algorithm::Optimal
                    && self.config.fallback == Fallback::Greedy
                    && e.is_solver_failure() =>
            {
                warn!(round, error = %e, "optimal assignment failed, falling back to greedy");
                let assignment = GreedyAssigner
                    .assign(participants, plan, matrix)
                    .map_err(|e| e.in_round(round, Algorithm::Greedy))?;
                Ok(RoundOutcome {
                    round,
                    algorithm: Algorithm::Greedy,
                    assignment,
                })
            }
            Err(e) => Err(e.in_round(round, algorithm)),
        }
    }
}
