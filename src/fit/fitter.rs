//! Single fit: formulate -> solve -> aggregate.
//!
//! Given:
//! - prepared data (`X`, `y`, `Ω`)
//! - a model kind and its parameters (`r`, `delta` / `big_m`)
//! - an LP solver
//!
//! we build the LP, solve it once and turn the optimal values into a
//! `FitResult`. Infeasibility and solver failures are returned as-is; nothing
//! is retried with other parameters.

use crate::data::PreparedData;
use crate::domain::{FitParams, FitResult, ModelKind};
use crate::error::FitError;
use crate::fit::aggregate::aggregate;
use crate::fit::formulate::formulator;
use crate::lp::LpSolver;

/// Fit one model kind at `params.r`.
pub fn fit_model(
    kind: ModelKind,
    data: &PreparedData,
    params: &FitParams,
    solver: &dyn LpSolver,
) -> Result<FitResult, FitError> {
    let formulation = formulator(kind, params).build(data, params.r);
    log::debug!(
        "solving {} LP at r={:.2}: {} variables, {} constraints",
        kind.display_name(),
        params.r,
        formulation.program.variables().len(),
        formulation.program.constraints().len()
    );

    let solution = solver.solve(&formulation.program)?;
    let raw = formulation.extract(&solution);
    log::debug!("objective={:.8} at r={:.2}", raw.objective, params.r);

    aggregate(kind, params.r, data, raw)
}
