//! Goodness-of-fit criteria for competing computed columns.
//!
//! Input is a matrix whose first column holds actual values and whose
//! remaining columns hold values computed by candidate models. Every candidate
//! gets the same ten statistics. Rows are labelled by the candidate's column
//! header when one is given, otherwise `y1..yJ` in column order.

use serde::{Deserialize, Serialize};

use crate::error::FitError;

pub mod stats;

pub use stats::*;

/// Column headers of a criteria row, in table order.
pub const CRITERIA_COLUMNS: [&str; 10] = [
    "approx_err_pct",
    "ksp",
    "rel_ksp",
    "cont_ksp",
    "rel_cont_ksp",
    "sum_abs_err",
    "max_abs_err",
    "max_rel_err_pct",
    "sse",
    "determination",
];

/// Ten statistics of one candidate column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriteriaRow {
    pub label: String,
    pub approximation_error: f64,
    pub ksp: usize,
    pub relative_ksp: f64,
    pub continuous_ksp: f64,
    pub relative_continuous_ksp: f64,
    pub sum_abs_error: f64,
    pub max_abs_error: f64,
    pub max_relative_error: f64,
    pub sum_squared_errors: f64,
    pub determination: f64,
}

impl CriteriaRow {
    /// Values in `CRITERIA_COLUMNS` order.
    pub fn values(&self) -> [f64; 10] {
        [
            self.approximation_error,
            self.ksp as f64,
            self.relative_ksp,
            self.continuous_ksp,
            self.relative_continuous_ksp,
            self.sum_abs_error,
            self.max_abs_error,
            self.max_relative_error,
            self.sum_squared_errors,
            self.determination,
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriteriaReport {
    /// Number of observations.
    pub n: usize,
    pub rows: Vec<CriteriaRow>,
}

/// Evaluate every candidate column of `matrix` against its first column.
pub fn evaluate_criteria(matrix: &[Vec<f64>]) -> Result<CriteriaReport, FitError> {
    evaluate_criteria_with_labels(matrix, &[])
}

/// Like [`evaluate_criteria`], labelling candidate `j` (1-based) with
/// `labels[j - 1]`. Missing or blank labels fall back to `y{j}`.
pub fn evaluate_criteria_with_labels(
    matrix: &[Vec<f64>],
    labels: &[String],
) -> Result<CriteriaReport, FitError> {
    let n = matrix.len();
    if n < 2 {
        return Err(FitError::shape(format!(
            "criteria need at least 2 rows, got {n}"
        )));
    }
    let width = matrix[0].len();
    if width < 2 {
        return Err(FitError::shape(
            "criteria need an actual column and at least one computed column",
        ));
    }
    if let Some((idx, row)) = matrix.iter().enumerate().find(|(_, row)| row.len() != width) {
        return Err(FitError::shape(format!(
            "row {} has {} values, expected {width}",
            idx + 1,
            row.len()
        )));
    }

    let actual: Vec<f64> = matrix.iter().map(|row| row[0]).collect();
    let rows = (1..width)
        .map(|j| {
            let computed: Vec<f64> = matrix.iter().map(|row| row[j]).collect();
            let label = labels
                .get(j - 1)
                .filter(|l| !l.is_empty())
                .cloned()
                .unwrap_or_else(|| format!("y{j}"));
            evaluate_column(label, &actual, &computed)
        })
        .collect::<Result<Vec<_>, _>>()?;

    log::info!("evaluated {} candidate column(s) over {n} rows", rows.len());
    Ok(CriteriaReport { n, rows })
}

fn evaluate_column(label: String, a: &[f64], c: &[f64]) -> Result<CriteriaRow, FitError> {
    let ksp = stats::ksp(a, c);
    Ok(CriteriaRow {
        label,
        approximation_error: approximation_error(a, c)?,
        ksp,
        relative_ksp: relative_ksp(ksp, a.len()),
        continuous_ksp: continuous_ksp(a, c),
        relative_continuous_ksp: relative_continuous_ksp(a, c),
        sum_abs_error: sum_abs_error(a, c),
        max_abs_error: max_abs_error(a, c),
        max_relative_error: max_relative_error(a, c)?,
        sum_squared_errors: sum_squared_errors(a, c),
        determination: determination(a, c)?,
    })
}
