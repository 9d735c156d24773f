//! `microlp` backend via `good_lp`.
//!
//! microlp is a pure-Rust simplex with branch-and-bound for integer
//! variables. It has no native time limit and cannot be interrupted once
//! branch-and-bound starts, so a bounded solve runs on a worker thread and
//! the caller waits on a channel with a deadline.
//!
//! ```text
//! caller:  spawn ──► recv_timeout(limit) ──► Ok(solution)
//!                          │
//!                       deadline ──► mark abandoned ──► Err(Timeout)
//!
//! worker:  translate ──► abandoned? ──yes──► exit
//!                            │no
//!                          solve ──► send ──► exit
//! ```

use std::sync::atomic::{AtomicU8, AtomicUsize, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use good_lp::{
    constraint, variable, Expression, ProblemVariables, ResolutionError, Solution as _, SolverModel,
};
use tracing::{debug, warn};

use crate::error::{Result, SolveError};
use crate::model::{Domain, LinearExpr, Model, Relation, Solution};
use crate::Solver;

/// Abandoned workers allowed to keep running before bounded solves are refused.
pub const DEFAULT_MAX_DETACHED: usize = 2;

const RUNNING: u8 = 0;
const DONE: u8 = 1;
const ABANDONED: u8 = 2;

/// The bundled pure-Rust MILP backend.
///
/// A worker abandoned at its deadline exits without solving if it has not
/// reached branch-and-bound yet. One that already started keeps its CPU and
/// its share of the model until the search ends. At most `max_detached` such
/// workers may be outstanding; past that, bounded solves fail fast with
/// [`SolveError::Saturated`]. Clones share the counter.
#[derive(Debug, Clone)]
pub struct MicroLp {
    detached: Arc<AtomicUsize>,
    max_detached: usize,
}

impl Default for MicroLp {
    fn default() -> Self {
        Self::new()
    }
}

impl MicroLp {
    pub fn new() -> Self {
        Self {
            detached: Arc::new(AtomicUsize::new(0)),
            max_detached: DEFAULT_MAX_DETACHED,
        }
    }

    pub fn with_max_detached(mut self, max_detached: usize) -> Self {
        self.max_detached = max_detached;
        self
    }

    /// Abandoned workers that have not exited yet.
    pub fn detached(&self) -> usize {
        self.detached.load(Ordering::Acquire)
    }
}

/// State shared by a bounded solve's caller and its worker.
struct Handoff {
    state: AtomicU8,
    detached: Arc<AtomicUsize>,
}

impl Handoff {
    fn abandoned(&self) -> bool {
        self.state.load(Ordering::Acquire) == ABANDONED
    }

    /// Worker side, once, after its result is sent.
    fn finish(&self) {
        if self.state.swap(DONE, Ordering::AcqRel) == ABANDONED {
            self.detached.fetch_sub(1, Ordering::AcqRel);
        }
    }

    /// Caller side, at the deadline. False if the worker already finished.
    fn abandon(&self) -> bool {
        self.detached.fetch_add(1, Ordering::AcqRel);
        match self
            .state
            .compare_exchange(RUNNING, ABANDONED, Ordering::AcqRel, Ordering::Acquire)
        {
            Ok(_) => true,
            Err(_) => {
                self.detached.fetch_sub(1, Ordering::AcqRel);
                false
            }
        }
    }
}

impl Solver for MicroLp {
    fn name(&self) -> &'static str {
        "microlp"
    }

    fn solve(&self, model: Arc<Model>, time_limit: Option<Duration>) -> Result<Solution> {
        model.validate()?;
        let Some(limit) = time_limit else {
            return solve_blocking(&model, || false);
        };

        let running = self.detached();
        if running >= self.max_detached {
            warn!(running, max = self.max_detached, "refusing bounded microlp solve");
            return Err(SolveError::Saturated(running));
        }

        let handoff = Arc::new(Handoff {
            state: AtomicU8::new(RUNNING),
            detached: Arc::clone(&self.detached),
        });
        let worker = Arc::clone(&handoff);
        let (tx, rx) = mpsc::channel();
        thread::Builder::new()
            .name("microlp-solve".into())
            .spawn(move || {
                let result = solve_blocking(&model, || worker.abandoned());
                // The receiver is gone if the deadline already passed.
                let _ = tx.send(result);
                worker.finish();
            })
            .map_err(|e| SolveError::Backend(format!("failed to spawn solver thread: {}", e)))?;

        match rx.recv_timeout(limit) {
            Ok(result) => result,
            Err(RecvTimeoutError::Timeout) => {
                if !handoff.abandon() {
                    // Finished between the deadline and the hand-off.
                    return rx.recv().unwrap_or_else(|_| {
                        Err(SolveError::Backend("solver thread exited without a result".into()))
                    });
                }
                warn!(
                    ?limit,
                    detached = self.detached(),
                    "abandoning microlp solve past its time limit"
                );
                Err(SolveError::Timeout(limit))
            }
            Err(RecvTimeoutError::Disconnected) => Err(SolveError::Backend(
                "solver thread exited without a result".into(),
            )),
        }
    }
}

/// Translate and solve. `abandoned` is checked between steps; once
/// branch-and-bound starts it runs to completion.
fn solve_blocking<F>(model: &Model, abandoned: F) -> Result<Solution>
where
    F: Fn() -> bool,
{
    let started = Instant::now();
    let skipped = || {
        debug!(
            elapsed_ms = started.elapsed().as_millis() as u64,
            "abandoned microlp worker exiting before solve"
        );
        Err(SolveError::Backend("solve abandoned before branch-and-bound".into()))
    };

    let mut vars = ProblemVariables::new();
    let handles: Vec<good_lp::Variable> = model
        .variables()
        .iter()
        .map(|v| match v.domain {
            Domain::Binary => vars.add(variable().binary().name(v.name.clone())),
            Domain::Continuous { lower, upper } => {
                vars.add(variable().min(lower).max(upper).name(v.name.clone()))
            }
        })
        .collect();
    if abandoned() {
        return skipped();
    }

    let objective = to_expression(model.objective(), &handles);
    let mut problem = vars.minimise(objective).using(good_lp::microlp);

    for c in model.constraints() {
        // Constants move to the right-hand side.
        let lhs = to_expression(&LinearExpr { constant: 0.0, ..c.expr.clone() }, &handles);
        let rhs = c.rhs - c.expr.constant;
        let translated = match c.relation {
            Relation::LessEq => constraint::leq(lhs, rhs),
            Relation::GreaterEq => constraint::geq(lhs, rhs),
            Relation::Equal => constraint::eq(lhs, rhs),
        };
        problem.add_constraint(translated);
    }
    if abandoned() {
        return skipped();
    }

    let solved = problem.solve().map_err(SolveError::from)?;
    let values: Vec<f64> = handles.iter().map(|&h| solved.value(h)).collect();
    let objective = model.objective().evaluate(&values);

    debug!(
        variables = model.variable_count(),
        constraints = model.constraint_count(),
        objective,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "microlp solve finished"
    );

    Ok(Solution::new(values, objective))
}

fn to_expression(expr: &LinearExpr, handles: &[good_lp::Variable]) -> Expression {
    let mut out = Expression::with_capacity(expr.terms.len());
    for &(var, coefficient) in &expr.terms {
        out.add_mul(coefficient, handles[var.index()]);
    }
    out + expr.constant
}

impl From<ResolutionError> for SolveError {
    fn from(e: ResolutionError) -> Self {
        match e {
            ResolutionError::Infeasible => SolveError::Infeasible,
            ResolutionError::Unbounded => SolveError::Unbounded,
            other => SolveError::Backend(other.to_string()),
        }
    }
}
