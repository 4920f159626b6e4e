//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory during fitting
//! - exported to JSON/CSV
//! - rendered as terminal tables

use std::path::PathBuf;
use std::time::Duration;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Raw observation matrix: rows are observations, all rows share one width.
pub type Matrix = Vec<Vec<f64>>;

/// What a `fit` run computes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum FitMode {
    /// One global linear model `y = X·a` (LP with b/g coefficient split).
    GlobalLinear,
    /// Pointwise minimum of per-feature linear branches (MIP with big-M).
    PiecewiseGiven,
    /// Sweep r over global-linear fits and pick the most balanced one.
    IdealPoint,
}

impl FitMode {
    pub fn display_name(self) -> &'static str {
        match self {
            FitMode::IdealPoint => "ideal point search",
            mode => mode.model_kind().display_name(),
        }
    }

    /// The LP formulation used by this mode.
    pub fn model_kind(self) -> ModelKind {
        match self {
            FitMode::GlobalLinear | FitMode::IdealPoint => ModelKind::GlobalLinear,
            FitMode::PiecewiseGiven => ModelKind::PiecewiseGiven,
        }
    }
}

/// Concrete LP formulation kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ModelKind {
    GlobalLinear,
    PiecewiseGiven,
}

impl ModelKind {
    /// Human-readable label for terminal output.
    pub fn display_name(self) -> &'static str {
        match self {
            ModelKind::GlobalLinear => "global linear",
            ModelKind::PiecewiseGiven => "piecewise given",
        }
    }
}

/// Per-solve numeric parameters.
///
/// Kept apart from `PreparedData` so one prepared dataset can be shared
/// read-only by every worker of an r sweep.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitParams {
    /// Weight of absolute error versus concordance violation, in `[0, 1]`.
    pub r: f64,
    /// Regularization weight on `Σ(b_j + g_j)` (global linear only).
    pub delta: f64,
    /// Big-M bound for the branch indicators (piecewise only).
    pub big_m: f64,
}

impl FitParams {
    pub fn with_r(self, r: f64) -> Self {
        Self { r, ..self }
    }
}

impl Default for FitParams {
    fn default() -> Self {
        Self {
            r: 0.5,
            delta: DEFAULT_DELTA,
            big_m: DEFAULT_BIG_M as f64,
        }
    }
}

pub const DEFAULT_DELTA: f64 = 1e-6;
pub const DEFAULT_BIG_M: u32 = 1000;

/// Summary statistics of one solved fit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FitStats {
    /// Mean relative error, percent.
    pub e: f64,
    /// Number of concordant pairs between fitted and actual values.
    pub osp: usize,
    /// Sum of absolute residuals.
    pub m: f64,
    /// Continuous concordance score.
    pub n_cont: f64,
    /// Total concordance violation `Σ l`.
    pub total_violation: f64,
    /// Height of the result table: `max(|a|, |l|, |yy|, |eps|)`.
    pub count_rows: usize,
}

/// Output of a single solved fit. Built once, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitResult {
    pub kind: ModelKind,
    pub r: f64,
    /// Optimal LP objective value.
    pub objective: f64,
    /// Model coefficients, one per column of `X`.
    pub a: Vec<f64>,
    /// Residuals, one per observation.
    pub eps: Vec<f64>,
    /// Concordance violations, in canonical pair order.
    pub l: Vec<f64>,
    /// Fitted values, one per observation.
    pub yy: Vec<f64>,
    /// Piecewise only: 0-based index of the branch attaining each row minimum.
    pub active_branch: Option<Vec<usize>>,
    pub stats: FitStats,
}

/// Where and how to read a numeric matrix.
#[derive(Debug, Clone)]
pub struct InputSpec {
    pub path: PathBuf,
    pub delimiter: u8,
    pub has_header: bool,
}

/// A full `fit` run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags (plus defaults).
#[derive(Debug, Clone)]
pub struct FitConfig {
    pub input: InputSpec,
    pub mode: FitMode,
    /// 1-based column index of the response inside each row.
    pub response_column: usize,
    pub intercept: bool,
    /// Required unless `mode` is `IdealPoint`.
    pub r: Option<f64>,
    pub delta: f64,
    pub big_m: u32,

    pub solve_timeout: Option<Duration>,
    /// Worker threads for the r sweep (`None` = rayon default).
    pub threads: Option<usize>,
    /// Print every sweep point instead of the sampled subset.
    pub all_pods: bool,

    pub export_results: Option<PathBuf>,
    /// Ideal point mode only: every sweep point as CSV.
    pub export_pods: Option<PathBuf>,
    pub export_json: Option<PathBuf>,
}

impl FitConfig {
    /// Parameters for the direct fitting modes; the r sweep overrides `r`.
    pub fn params(&self) -> FitParams {
        FitParams {
            r: self.r.unwrap_or(0.0),
            delta: self.delta,
            big_m: f64::from(self.big_m),
        }
    }
}

/// Configuration of a `criteria` run.
#[derive(Debug, Clone)]
pub struct CriteriaConfig {
    pub input: InputSpec,
    pub export_results: Option<PathBuf>,
    pub export_json: Option<PathBuf>,
}
