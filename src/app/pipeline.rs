//! Shared fit / criteria pipeline logic used by the CLI and the integration tests.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! matrix -> validation -> prepared data -> fit or ideal point search
//!
//! The CLI can then focus on presentation (printing and exports).

use crate::criteria::{CriteriaReport, evaluate_criteria_with_labels};
use crate::data::{PreparedData, prepare};
use crate::domain::{CriteriaConfig, FitConfig, FitMode, FitResult};
use crate::error::{AppError, FitError};
use crate::fit::control::CancelToken;
use crate::fit::fitter::fit_model;
use crate::fit::selection::{IdealPointSearch, search_ideal_point};
use crate::io::ingest::load_matrix;
use crate::lp::default_solver;

/// All computed outputs of a single `cfit fit` run.
#[derive(Debug, Clone)]
pub struct FitRun {
    pub data: PreparedData,
    /// The canonical result (for ideal point runs: the fit at the chosen r).
    pub result: FitResult,
    pub search: Option<IdealPointSearch>,
}

/// Load the input matrix and run the configured fit.
pub fn run_fit(config: &FitConfig) -> Result<FitRun, AppError> {
    validate_fit_config(config)?;
    let matrix = load_matrix(&config.input)?;
    run_fit_on_rows(config, &matrix.rows, None)
}

/// Run the configured fit on an in-memory matrix.
///
/// `cancel` is polled between sweep iterations of an ideal point search.
pub fn run_fit_on_rows(
    config: &FitConfig,
    rows: &[Vec<f64>],
    cancel: Option<&CancelToken>,
) -> Result<FitRun, AppError> {
    validate_fit_config(config)?;
    let data = prepare(rows, config.response_column, config.intercept)?;
    let solver = default_solver(config.solve_timeout);
    let params = config.params();

    log::info!(
        "fitting {} on n={} observations, {} model columns",
        config.mode.display_name(),
        data.n(),
        data.k()
    );

    let (result, search) = match config.mode {
        FitMode::IdealPoint => {
            let search = with_threads(config.threads, || {
                search_ideal_point(&data, &params, solver.as_ref(), cancel)
            })?;
            (search.result.clone(), Some(search))
        }
        mode => (fit_model(mode.model_kind(), &data, &params, solver.as_ref())?, None),
    };

    log::info!(
        "fit finished: r={:.2} L={:.6} e={:.4}%",
        result.r,
        result.stats.total_violation,
        result.stats.e
    );

    Ok(FitRun {
        data,
        result,
        search,
    })
}

/// Load the input matrix and evaluate the criteria table.
pub fn run_criteria(config: &CriteriaConfig) -> Result<CriteriaReport, AppError> {
    let matrix = load_matrix(&config.input)?;
    // The first header names the actual column.
    let labels = matrix
        .headers
        .as_deref()
        .and_then(|h| h.get(1..))
        .unwrap_or_default();
    Ok(evaluate_criteria_with_labels(&matrix.rows, labels)?)
}

/// Reject configurations the fitting core cannot interpret (exit code 2).
pub fn validate_fit_config(config: &FitConfig) -> Result<(), AppError> {
    match (config.mode, config.r) {
        (FitMode::IdealPoint, _) => {}
        (_, None) => {
            return Err(AppError::new(
                2,
                format!("`--r` is required for {} fits.", config.mode.display_name()),
            ));
        }
        (_, Some(r)) if !(0.0..=1.0).contains(&r) => {
            return Err(AppError::new(2, format!("`--r` must lie in [0, 1], got {r}.")));
        }
        _ => {}
    }
    if !config.delta.is_finite() || config.delta <= 0.0 {
        return Err(AppError::new(2, "`--delta` must be finite and > 0."));
    }
    if config.big_m == 0 {
        return Err(AppError::new(2, "`--big-m` must be > 0."));
    }
    if config.response_column == 0 {
        return Err(AppError::new(2, "`--response-column` is 1-based and must be >= 1."));
    }
    if config.threads == Some(0) {
        return Err(AppError::new(2, "`--threads` must be >= 1."));
    }
    Ok(())
}

/// Run `f` on a dedicated rayon pool when a thread count is configured.
fn with_threads<T: Send>(
    threads: Option<usize>,
    f: impl FnOnce() -> Result<T, FitError> + Send,
) -> Result<T, AppError> {
    let Some(n) = threads else {
        return Ok(f()?);
    };
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(n)
        .build()
        .map_err(|e| AppError::new(2, format!("Failed to build a {n}-thread worker pool: {e}")))?;
    Ok(pool.install(f)?)
}
