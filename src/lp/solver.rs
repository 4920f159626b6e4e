//! LP solving backends.
//!
//! - `LpSolver`: the capability the fitting code depends on
//! - `MicroLp`: `good_lp` with the pure-Rust `microlp` backend (supports binaries)
//! - `TimeLimited`: wraps any solver with a per-solve wall-clock limit

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossbeam_channel::RecvTimeoutError;
use good_lp::{
    Expression, ProblemVariables, ResolutionError, Solution, SolverModel, Variable, microlp, variable,
};

use crate::error::FitError;
use crate::lp::program::{Cmp, LinearProgram, LpSolution, Sense, VarId, VarKind};

/// Anything that can solve a `LinearProgram` to optimality.
///
/// Implementations must be shareable across sweep workers.
pub trait LpSolver: Send + Sync {
    fn solve(&self, program: &LinearProgram) -> Result<LpSolution, FitError>;
}

impl<S: LpSolver + ?Sized> LpSolver for Arc<S> {
    fn solve(&self, program: &LinearProgram) -> Result<LpSolution, FitError> {
        (**self).solve(program)
    }
}

/// Simplex / branch-and-bound solver from `good_lp`'s `microlp` backend.
#[derive(Debug, Clone, Copy, Default)]
pub struct MicroLp;

impl LpSolver for MicroLp {
    fn solve(&self, program: &LinearProgram) -> Result<LpSolution, FitError> {
        let mut vars = ProblemVariables::new();
        let handles: Vec<Variable> = program
            .variables()
            .iter()
            .map(|def| {
                let mut v = variable().name(def.name.clone());
                match def.kind {
                    VarKind::Binary => v = v.binary(),
                    VarKind::Continuous { lower, upper } => {
                        if let Some(lower) = lower {
                            v = v.min(lower);
                        }
                        if let Some(upper) = upper {
                            v = v.max(upper);
                        }
                    }
                }
                vars.add(v)
            })
            .collect();

        let objective = affine(&handles, program.objective());
        let unsolved = match program.sense() {
            Sense::Minimize => vars.minimise(objective),
            Sense::Maximize => vars.maximise(objective),
        };
        let mut model = unsolved.using(microlp);

        for c in program.constraints() {
            let lhs = affine(&handles, &c.terms);
            let constraint = match c.cmp {
                Cmp::Eq => good_lp::constraint::eq(lhs, c.rhs),
                Cmp::Geq => good_lp::constraint::geq(lhs, c.rhs),
                Cmp::Leq => good_lp::constraint::leq(lhs, c.rhs),
            };
            model.add_constraint(constraint);
        }

        let solution = model.solve().map_err(|err| match err {
            ResolutionError::Infeasible => FitError::Infeasible,
            ResolutionError::Unbounded => FitError::Unbounded,
            other => FitError::Solver(other.to_string()),
        })?;

        let values = handles.iter().map(|&v| solution.value(v)).collect();
        Ok(LpSolution::new(program, values))
    }
}

fn affine(handles: &[Variable], terms: &[(VarId, f64)]) -> Expression {
    let mut expr = Expression::with_capacity(terms.len());
    for &(var, coef) in terms {
        expr.add_mul(coef, handles[var.index()]);
    }
    expr
}

/// Run each solve on its own thread and stop waiting after `timeout`.
///
/// A timed-out solve keeps running in the background until the backend
/// returns; its answer is dropped.
#[derive(Debug, Clone)]
pub struct TimeLimited<S> {
    inner: Arc<S>,
    timeout: Duration,
}

impl<S> TimeLimited<S> {
    pub fn new(inner: S, timeout: Duration) -> Self {
        Self {
            inner: Arc::new(inner),
            timeout,
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl<S: LpSolver + 'static> LpSolver for TimeLimited<S> {
    fn solve(&self, program: &LinearProgram) -> Result<LpSolution, FitError> {
        let (tx, rx) = crossbeam_channel::bounded(1);
        let inner = Arc::clone(&self.inner);
        let program = program.clone();

        thread::Builder::new()
            .name("lp-solve".to_string())
            .spawn(move || {
                // The receiver is gone if we already timed out.
                let _ = tx.send(inner.solve(&program));
            })
            .map_err(|e| FitError::Solver(format!("failed to spawn solver thread: {e}")))?;

        match rx.recv_timeout(self.timeout) {
            Ok(result) => result,
            Err(RecvTimeoutError::Timeout) => {
                log::warn!("LP solve exceeded {:?}; abandoning it", self.timeout);
                Err(FitError::SolveTimeout(self.timeout))
            }
            Err(RecvTimeoutError::Disconnected) => Err(FitError::Solver(
                "solver thread exited without a result".to_string(),
            )),
        }
    }
}

/// Build the configured solver: `MicroLp`, time-limited when `timeout` is set.
pub fn default_solver(timeout: Option<Duration>) -> Arc<dyn LpSolver> {
    match timeout {
        Some(timeout) => Arc::new(TimeLimited::new(MicroLp, timeout)),
        None => Arc::new(MicroLp),
    }
}
