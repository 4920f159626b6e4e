//! Read/write JSON reports.
//!
//! A report is the portable representation of a run:
//! - tool name and generation timestamp
//! - the run configuration that matters for reproducing it
//! - the fit result, and for ideal point runs the whole sweep

use std::fs::File;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::criteria::CriteriaReport;
use crate::domain::{FitConfig, FitMode, FitResult};
use crate::error::AppError;
use crate::fit::selection::IdealPointSearch;

pub const TOOL_NAME: &str = "cfit";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FitReportFile {
    pub tool: String,
    pub generated_at: DateTime<Utc>,
    pub mode: FitMode,
    pub response_column: usize,
    pub intercept: bool,
    pub delta: f64,
    pub big_m: u32,
    pub result: FitResult,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<IdealPointSearch>,
}

impl FitReportFile {
    pub fn new(config: &FitConfig, result: &FitResult, search: Option<&IdealPointSearch>) -> Self {
        Self {
            tool: TOOL_NAME.to_string(),
            generated_at: Utc::now(),
            mode: config.mode,
            response_column: config.response_column,
            intercept: config.intercept,
            delta: config.delta,
            big_m: config.big_m,
            result: result.clone(),
            search: search.cloned(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CriteriaReportFile {
    pub tool: String,
    pub generated_at: DateTime<Utc>,
    pub criteria: CriteriaReport,
}

impl CriteriaReportFile {
    pub fn new(report: &CriteriaReport) -> Self {
        Self {
            tool: TOOL_NAME.to_string(),
            generated_at: Utc::now(),
            criteria: report.clone(),
        }
    }
}

/// Write a fit report JSON file.
pub fn write_fit_report(path: &Path, report: &FitReportFile) -> Result<(), AppError> {
    write_json(path, report)
}

/// Write a criteria report JSON file.
pub fn write_criteria_report(path: &Path, report: &CriteriaReportFile) -> Result<(), AppError> {
    write_json(path, report)
}

/// Read a fit report JSON file.
pub fn read_fit_report(path: &Path) -> Result<FitReportFile, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open report JSON '{}': {e}", path.display())))?;
    serde_json::from_reader(file).map_err(|e| AppError::new(2, format!("Invalid report JSON: {e}")))
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create report JSON '{}': {e}", path.display())))?;
    serde_json::to_writer_pretty(file, value)
        .map_err(|e| AppError::new(2, format!("Failed to write report JSON: {e}")))
}
