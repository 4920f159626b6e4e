//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads `.env` and sets up logging
//! - parses CLI arguments
//! - runs a fit or a criteria evaluation
//! - prints reports and writes optional exports

use std::time::Duration;

use clap::Parser;

use crate::cli::{Command, CriteriaArgs, FitArgs, InputArgs};
use crate::domain::{CriteriaConfig, FitConfig, FitMode, InputSpec};
use crate::error::AppError;
use crate::io::{CriteriaReportFile, FitReportFile};

pub mod pipeline;

/// Entry point for the `cfit` binary.
pub fn run() -> Result<(), AppError> {
    // `.env` may provide RUST_LOG and CFIT_SOLVE_TIMEOUT_MS.
    dotenvy::dotenv().ok();
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .try_init();

    let cli = crate::cli::Cli::parse();

    match cli.command {
        Command::Fit(args) => handle_fit(args),
        Command::Criteria(args) => handle_criteria(args),
    }
}

fn handle_fit(args: FitArgs) -> Result<(), AppError> {
    let config = fit_config_from_args(&args);
    let run = pipeline::run_fit(&config)?;

    println!(
        "{}",
        crate::report::format_fit_summary(&config, run.data.n(), run.data.k(), &run.result)
    );
    if let Some(search) = &run.search {
        println!("{}", crate::report::format_search_summary(search, config.all_pods));
    }
    println!("{}", crate::report::format_result_table(&run.result));

    // Optional exports.
    if let Some(path) = &config.export_results {
        crate::io::export::write_results_csv(path, &run.result)?;
    }
    if let Some(path) = &config.export_pods {
        match &run.search {
            Some(search) => crate::io::export::write_pods_csv(path, &search.scored)?,
            None => log::warn!("--export-pods ignored: only ideal point runs produce a sweep"),
        }
    }
    if let Some(path) = &config.export_json {
        let report = FitReportFile::new(&config, &run.result, run.search.as_ref());
        crate::io::report_json::write_fit_report(path, &report)?;
    }

    Ok(())
}

fn handle_criteria(args: CriteriaArgs) -> Result<(), AppError> {
    let config = criteria_config_from_args(&args);
    let report = pipeline::run_criteria(&config)?;

    println!("{}", crate::report::format_criteria_table(&report));

    if let Some(path) = &config.export_results {
        crate::io::export::write_criteria_csv(path, &report)?;
    }
    if let Some(path) = &config.export_json {
        crate::io::report_json::write_criteria_report(path, &CriteriaReportFile::new(&report))?;
    }

    Ok(())
}

pub fn fit_config_from_args(args: &FitArgs) -> FitConfig {
    FitConfig {
        input: input_spec_from_args(&args.input),
        mode: args.mode,
        response_column: args.response_column,
        intercept: args.intercept,
        r: args.r,
        delta: args.delta,
        big_m: args.big_m,
        solve_timeout: args.solve_timeout_ms.map(Duration::from_millis),
        threads: args.threads,
        all_pods: args.all_pods && args.mode == FitMode::IdealPoint,
        export_results: args.export.clone(),
        export_pods: args.export_pods.clone(),
        export_json: args.export_json.clone(),
    }
}

pub fn criteria_config_from_args(args: &CriteriaArgs) -> CriteriaConfig {
    CriteriaConfig {
        input: input_spec_from_args(&args.input),
        export_results: args.export.clone(),
        export_json: args.export_json.clone(),
    }
}

fn input_spec_from_args(args: &InputArgs) -> InputSpec {
    InputSpec {
        path: args.input.clone(),
        delimiter: args.delimiter,
        has_header: args.header,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Cli;

    #[test]
    fn fit_args_map_to_config() {
        let cli = Cli::try_parse_from([
            "cfit",
            "fit",
            "m.csv",
            "--mode",
            "piecewise-given",
            "-r",
            "0.4",
            "--big-m",
            "50",
            "--solve-timeout-ms",
            "1500",
            "--header",
        ])
        .unwrap();
        let Command::Fit(args) = cli.command else {
            panic!("expected fit");
        };
        let config = fit_config_from_args(&args);
        assert_eq!(config.mode, FitMode::PiecewiseGiven);
        assert_eq!(config.solve_timeout, Some(Duration::from_millis(1500)));
        assert!(config.input.has_header);
        let params = config.params();
        assert_eq!(params.r, 0.4);
        assert_eq!(params.big_m, 50.0);
    }
}
