//! Export result, pod and criteria tables to CSV.
//!
//! The exports are meant to be easy to consume in spreadsheets or downstream scripts.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::criteria::{CRITERIA_COLUMNS, CriteriaReport};
use crate::domain::FitResult;
use crate::error::AppError;
use crate::fit::selection::ScoredPod;
use crate::report::{result_row_cells, result_table, result_table_headers};

/// Write the result table of one fit.
pub fn write_results_csv(path: &Path, result: &FitResult) -> Result<(), AppError> {
    let mut file = create(path)?;
    write_results(&mut file, result)
}

/// Write every sweep point with its normalized statistics.
pub fn write_pods_csv(path: &Path, pods: &[ScoredPod]) -> Result<(), AppError> {
    let mut file = create(path)?;
    write_pods(&mut file, pods)
}

/// Write the criteria table.
pub fn write_criteria_csv(path: &Path, report: &CriteriaReport) -> Result<(), AppError> {
    let mut file = create(path)?;
    write_criteria(&mut file, report)
}

fn create(path: &Path) -> Result<File, AppError> {
    File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create export CSV '{}': {e}", path.display())))
}

fn write_results<W: Write>(out: &mut W, result: &FitResult) -> Result<(), AppError> {
    writeln!(out, "{}", result_table_headers(result).join(","))
        .map_err(|e| AppError::new(2, format!("Failed to write export CSV header: {e}")))?;

    let piecewise = result.active_branch.is_some();
    for row in result_table(result) {
        let cells = result_row_cells(&row, piecewise, |v| format!("{v:.10}"));
        writeln!(out, "{}", cells.join(","))
            .map_err(|e| AppError::new(2, format!("Failed to write export CSV row: {e}")))?;
    }
    Ok(())
}

fn write_pods<W: Write>(out: &mut W, pods: &[ScoredPod]) -> Result<(), AppError> {
    writeln!(out, "r,e,m,L,e_norm,m_norm,L_norm,r_dot,ideal")
        .map_err(|e| AppError::new(2, format!("Failed to write export CSV header: {e}")))?;

    for p in pods {
        writeln!(
            out,
            "{:.2},{:.10},{:.10},{:.10},{:.10},{:.10},{:.10},{:.10},{}",
            p.pod.r, p.pod.e, p.pod.m, p.pod.l, p.e_norm, p.m_norm, p.l_norm, p.r_dot, p.is_max
        )
        .map_err(|e| AppError::new(2, format!("Failed to write export CSV row: {e}")))?;
    }
    Ok(())
}

fn write_criteria<W: Write>(out: &mut W, report: &CriteriaReport) -> Result<(), AppError> {
    writeln!(out, "model,{}", CRITERIA_COLUMNS.join(","))
        .map_err(|e| AppError::new(2, format!("Failed to write export CSV header: {e}")))?;

    for row in &report.rows {
        let values = row.values().iter().map(|v| format!("{v:.10}")).collect::<Vec<_>>();
        writeln!(out, "{},{}", row.label, values.join(","))
            .map_err(|e| AppError::new(2, format!("Failed to write export CSV row: {e}")))?;
    }
    Ok(())
}
