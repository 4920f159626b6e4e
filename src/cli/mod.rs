//! Command-line parsing for `cfit`.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the fitting/criteria code.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::{DEFAULT_BIG_M, DEFAULT_DELTA, FitMode};
use crate::io::parse_delimiter;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(
    name = "cfit",
    version,
    about = "Linear fits with pairwise concordance constraints, solved as LP/MIP"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fit a model to a numeric matrix and print the result table.
    Fit(FitArgs),
    /// Compare computed columns against an actual column.
    Criteria(CriteriaArgs),
}

/// Where the matrix comes from.
#[derive(Debug, Args, Clone)]
pub struct InputArgs {
    /// Delimited text file, one observation per line.
    #[arg(value_name = "FILE")]
    pub input: PathBuf,

    /// Field delimiter (single character, or `tab`).
    #[arg(long, default_value = ",", value_parser = parse_delimiter)]
    pub delimiter: u8,

    /// The first line is a header row.
    #[arg(long)]
    pub header: bool,
}

/// Options for `cfit fit`.
#[derive(Debug, Args, Clone)]
pub struct FitArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Which model to fit.
    #[arg(long, value_enum, default_value_t = FitMode::GlobalLinear)]
    pub mode: FitMode,

    /// 1-based index of the response column.
    #[arg(short = 'y', long, default_value_t = 1)]
    pub response_column: usize,

    /// Add a constant-1 predictor column.
    #[arg(long)]
    pub intercept: bool,

    /// Error versus concordance weight in [0, 1] (required unless `--mode ideal-point`).
    #[arg(short = 'r', long)]
    pub r: Option<f64>,

    /// Coefficient regularization weight (global linear and ideal point).
    #[arg(long, default_value_t = DEFAULT_DELTA)]
    pub delta: f64,

    /// Big-M bound for branch indicators (piecewise).
    #[arg(long, default_value_t = DEFAULT_BIG_M)]
    pub big_m: u32,

    /// Give up on a single LP solve after this many milliseconds.
    #[arg(long, env = "CFIT_SOLVE_TIMEOUT_MS")]
    pub solve_timeout_ms: Option<u64>,

    /// Worker threads for the r sweep (default: one per core).
    #[arg(long)]
    pub threads: Option<usize>,

    /// Print every sweep point instead of the sampled subset.
    #[arg(long)]
    pub all_pods: bool,

    /// Export the result table to CSV.
    #[arg(long)]
    pub export: Option<PathBuf>,

    /// Export every sweep point to CSV (ideal point mode).
    #[arg(long = "export-pods")]
    pub export_pods: Option<PathBuf>,

    /// Export the full run report to JSON.
    #[arg(long = "export-json")]
    pub export_json: Option<PathBuf>,
}

/// Options for `cfit criteria`.
#[derive(Debug, Args, Clone)]
pub struct CriteriaArgs {
    // first column: actual values, remaining columns: computed values
    #[command(flatten)]
    pub input: InputArgs,

    /// Export the criteria table to CSV.
    #[arg(long)]
    pub export: Option<PathBuf>,

    /// Export the criteria report to JSON.
    #[arg(long = "export-json")]
    pub export_json: Option<PathBuf>,
}
