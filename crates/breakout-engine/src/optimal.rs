//! Per-round integer program.
//!
//! For participants `i` (in ascending id order) and rooms `j`:
//!
//! ```text
//! x[i,j]      ∈ {0,1}   participant i sits in room j
//! y[i1,i2,j]  ∈ {0,1}   i1 < i2 both sit in room j
//!
//! Σ_j x[i,j] = 1                                  every participant placed once
//! min_size ≤ Σ_i x[i,j] ≤ max_size                balanced rooms
//! y ≤ x[i1,j],  y ≤ x[i2,j],  y ≥ x[i1,j] + x[i2,j] - 1
//!
//! minimize Σ weight(count(i1,i2)) · y[i1,i2,j]
//! ```
//!
//! Rooms are interchangeable, so the first participant is pinned to the
//! first room. Pairs with zero weight get no `y` variables: they cannot
//! change the objective.
//!
//! Each round is solved on its own, conditioned on the cumulative matrix.
//! This keeps the model at `O(N²·R)` variables instead of `O(N²·R·T)` for a
//! joint multi-round program, at the cost of global optimality.
//!
//! The time limit covers the whole round: building the model counts against
//! it, and the solver only gets what is left.

use std::sync::Arc;
use std::time::{Duration, Instant};

use breakout_core::{
    Assignment, CapacityPlan, CoOccurrenceMatrix, Error, ParticipantId, Result,
};
use breakout_solver::{LinearExpr, Model, SolveError, Solver, VarId};
use tracing::debug;

use crate::config::PairWeighting;

/// A formulated round: the model plus the `x[i][j]` handles to decode it.
#[derive(Debug, Clone)]
pub struct Formulation {
    pub model: Model,
    pub participants: Vec<ParticipantId>,
    /// `placement[i][j]` is `x[i,j]`.
    pub placement: Vec<Vec<VarId>>,
}

/// Assigns a round by solving the integer program above.
#[derive(Clone)]
pub struct OptimalAssigner {
    solver: Arc<dyn Solver>,
    weighting: PairWeighting,
    time_limit: Option<Duration>,
}

impl std::fmt::Debug for OptimalAssigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OptimalAssigner")
            .field("solver", &self.solver.name())
            .field("weighting", &self.weighting)
            .field("time_limit", &self.time_limit)
            .finish()
    }
}

impl OptimalAssigner {
    pub fn new(solver: Arc<dyn Solver>) -> Self {
        Self {
            solver,
            weighting: PairWeighting::default(),
            time_limit: None,
        }
    }

    pub fn with_weighting(mut self, weighting: PairWeighting) -> Self {
        self.weighting = weighting;
        self
    }

    pub fn with_time_limit(mut self, time_limit: Option<Duration>) -> Self {
        self.time_limit = time_limit;
        self
    }

    pub fn weighting(&self) -> PairWeighting {
        self.weighting
    }

    /// Build the round's model without solving it.
    ///
    /// Fails with [`Error::OptimizationTimeout`] if `deadline` passes while
    /// the pair terms are still being added.
    pub fn formulate(
        &self,
        participants: &[ParticipantId],
        plan: &CapacityPlan,
        matrix: &CoOccurrenceMatrix,
        deadline: Option<Instant>,
    ) -> Result<Formulation> {
        let mut order = participants.to_vec();
        order.sort_unstable();
        let n = order.len();
        let r = plan.rooms();

        let mut model = Model::new();
        let placement: Vec<Vec<VarId>> = order
            .iter()
            .map(|p| {
                (0..r)
                    .map(|j| model.add_binary(format!("x_{}_{}", p, j + 1)))
                    .collect()
            })
            .collect();

        for row in &placement {
            model.equal(LinearExpr::sum(row.iter().copied()), 1.0);
        }

        for j in 0..r {
            let occupancy = LinearExpr::sum(placement.iter().map(|row| row[j]));
            model.greater_eq(occupancy.clone(), plan.min_size() as f64);
            model.less_eq(occupancy, plan.max_size() as f64);
        }

        if let Some(first) = placement.first() {
            model.equal(LinearExpr::sum([first[0]]), 1.0);
        }

        let mut objective = LinearExpr::with_capacity(n * n.saturating_sub(1) / 2 * r);
        for i1 in 0..n {
            if deadline.is_some_and(|d| Instant::now() >= d) {
                return Err(self.timed_out(Duration::ZERO));
            }
            for i2 in (i1 + 1)..n {
                let weight = self.weighting.weight(matrix.count_of(order[i1], order[i2]));
                if weight == 0.0 {
                    continue;
                }
                for j in 0..r {
                    let (a, b) = (placement[i1][j], placement[i2][j]);
                    let y = model.add_binary(format!("y_{}_{}_{}", order[i1], order[i2], j + 1));

                    let mut upper_a = LinearExpr::sum([y]);
                    upper_a.add(a, -1.0);
                    model.less_eq(upper_a, 0.0);

                    let mut upper_b = LinearExpr::sum([y]);
                    upper_b.add(b, -1.0);
                    model.less_eq(upper_b, 0.0);

                    let mut lower = LinearExpr::sum([y]);
                    lower.add(a, -1.0).add(b, -1.0);
                    model.greater_eq(lower, -1.0);

                    objective.add(y, weight);
                }
            }
        }
        model.minimize(objective);

        Ok(Formulation {
            model,
            participants: order,
            placement,
        })
    }

    pub fn assign(
        &self,
        participants: &[ParticipantId],
        plan: &CapacityPlan,
        matrix: &CoOccurrenceMatrix,
    ) -> Result<Assignment> {
        let deadline = self.time_limit.map(|limit| Instant::now() + limit);
        let Formulation {
            model,
            participants: order,
            placement,
        } = self.formulate(participants, plan, matrix, deadline)?;

        let remaining = deadline.map(|d| d.saturating_duration_since(Instant::now()));
        if remaining == Some(Duration::ZERO) {
            return Err(self.timed_out(Duration::ZERO));
        }
        debug!(
            solver = self.solver.name(),
            variables = model.variable_count(),
            constraints = model.constraint_count(),
            ?remaining,
            "solving round"
        );

        let solution = self
            .solver
            .solve(Arc::new(model), remaining)
            .map_err(|e| self.solve_error(e))?;

        let mut rooms = vec![Vec::with_capacity(plan.max_size()); plan.rooms()];
        for (participant, row) in order.iter().zip(&placement) {
            let mut chosen = row.iter().enumerate().filter(|&(_, &x)| solution.is_set(x));
            match (chosen.next(), chosen.next()) {
                (Some((j, _)), None) => rooms[j].push(*participant),
                _ => {
                    return Err(Error::Solver(format!(
                        "solution does not place participant {} in exactly one room",
                        participant
                    )))
                }
            }
        }

        debug!(objective = solution.objective(), "round solved");
        Assignment::new(plan, participants, rooms)
    }

    /// Timeouts report the configured round limit, not what was left of it.
    fn timed_out(&self, fallback: Duration) -> Error {
        Error::OptimizationTimeout(self.time_limit.unwrap_or(fallback))
    }

    fn solve_error(&self, e: SolveError) -> Error {
        match e {
            SolveError::Infeasible => {
                Error::Infeasible("no balanced assignment satisfies the model".into())
            }
            SolveError::Timeout(limit) => self.timed_out(limit),
            other => Error::Solver(other.to_string()),
        }
    }
}

/// Weighted repeat-pairing cost of `assignment` against the prior `matrix`.
///
/// This is the objective the optimal assigner minimizes, so any assigner's
/// output can be compared against it.
pub fn weighted_cost(
    assignment: &Assignment,
    matrix: &CoOccurrenceMatrix,
    weighting: PairWeighting,
) -> f64 {
    assignment
        .pairs()
        .map(|(a, b)| weighting.weight(matrix.count_of(a, b)))
        .sum()
}
