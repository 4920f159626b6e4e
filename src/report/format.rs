//! Formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the fitting and criteria code stays clean and testable
//! - output changes are localized

use crate::criteria::{CRITERIA_COLUMNS, CriteriaReport};
use crate::domain::{FitConfig, FitResult};
use crate::fit::selection::{IdealPointSearch, ScoredPod};
use crate::report::{result_row_cells, result_table, result_table_headers};

const CELL: usize = 14;

/// Header block of a `fit` run.
pub fn format_fit_summary(config: &FitConfig, n: usize, k: usize, result: &FitResult) -> String {
    let mut out = String::new();

    out.push_str("=== cfit - concordance-constrained fit ===\n");
    out.push_str(&format!("Mode: {}\n", config.mode.display_name()));
    out.push_str(&format!(
        "Data: n={n} | model columns={k} | response column={} | intercept={}\n",
        config.response_column,
        if config.intercept { "yes" } else { "no" }
    ));
    out.push_str(&format!("r={:.2} | objective={:.8}\n", result.r, result.objective));
    out.push_str(&format!("- a : {}\n", fmt_vec(&result.a)));
    out.push('\n');

    out
}

/// The result table (coefficients, violations, residuals and statistics).
pub fn format_result_table(result: &FitResult) -> String {
    let piecewise = result.active_branch.is_some();
    let headers = result_table_headers(result);

    let mut out = String::new();
    push_row(&mut out, headers.iter().map(|h| h.to_string()));
    push_row(&mut out, headers.iter().map(|_| "-".repeat(CELL)));
    for row in result_table(result) {
        push_row(&mut out, result_row_cells(&row, piecewise, |v| format!("{v:.6}")));
    }
    out
}

/// Pod table: r, r_dot and a `*` marker on ideal points.
pub fn format_pod_table(pods: &[ScoredPod]) -> String {
    let mut out = String::new();
    out.push_str(&format!("{:>6} {:>12}\n", "r", "r_dot"));
    out.push_str(&format!("{:-<6} {:-<12}\n", "", ""));
    for p in pods {
        let line = format!(
            "{:>6.2} {:>12.6} {}",
            p.pod.r,
            p.r_dot,
            if p.is_max { "*" } else { "" }
        );
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}

/// Summary of an ideal point search plus its pod table.
///
/// `all_pods` prints the whole sweep instead of the sampled subset.
pub fn format_search_summary(search: &IdealPointSearch, all_pods: bool) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "Sweep: r=[{:.2}, 1.00] ({} solves) | ideal r={:.2} ({} tied)\n\n",
        search.left_boundary,
        search.pods.len(),
        search.r,
        search.ideal.len()
    ));
    if all_pods {
        out.push_str(&format_pod_table(&search.scored));
    } else {
        out.push_str(&format_pod_table(&search.sampled));
    }
    out
}

/// Criteria table: one line per candidate column.
pub fn format_criteria_table(report: &CriteriaReport) -> String {
    let mut out = String::new();
    push_row(
        &mut out,
        std::iter::once("model".to_string()).chain(CRITERIA_COLUMNS.iter().map(|c| c.to_string())),
    );
    push_row(&mut out, (0..=CRITERIA_COLUMNS.len()).map(|_| "-".repeat(CELL)));
    for row in &report.rows {
        push_row(
            &mut out,
            std::iter::once(row.label.clone()).chain(row.values().iter().map(|v| format!("{v:.6}"))),
        );
    }
    out
}

fn push_row(out: &mut String, cells: impl IntoIterator<Item = String>) {
    let line = cells
        .into_iter()
        .map(|c| format!("{c:>width$}", width = CELL))
        .collect::<Vec<_>>()
        .join(" ");
    out.push_str(line.trim_end());
    out.push('\n');
}

fn fmt_vec(v: &[f64]) -> String {
    let inner = v.iter().map(|x| format!("{x:.8}")).collect::<Vec<_>>().join(", ");
    format!("[{inner}]")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::criteria::evaluate_criteria;
    use crate::domain::{FitStats, ModelKind};
    use crate::fit::selection::Pod;

    #[test]
    fn result_table_lists_scalars_once() {
        let result = FitResult {
            kind: ModelKind::PiecewiseGiven,
            r: 0.5,
            objective: 1.0,
            a: vec![1.0, 2.0],
            eps: vec![0.5, -0.5],
            l: vec![0.25],
            yy: vec![1.0, 2.0],
            active_branch: Some(vec![1, 0]),
            stats: FitStats {
                e: 10.0,
                osp: 1,
                m: 1.0,
                n_cont: 2.0,
                total_violation: 0.25,
                count_rows: 2,
            },
        };
        let table = format_result_table(&result);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].trim_end().ends_with('N'));
        assert!(lines[0].contains("branch"));
        assert_eq!(lines[2].split_whitespace().count(), 9);
        // second row: a, eps and the 1-based branch only
        assert_eq!(
            lines[3].split_whitespace().collect::<Vec<_>>(),
            vec!["2.000000", "-0.500000", "1"]
        );
    }

    #[test]
    fn pod_table_marks_ideal_points() {
        let pod = |step: u32, r_dot: f64, is_max: bool| ScoredPod {
            pod: Pod {
                step,
                r: f64::from(step) / 100.0,
                e: 1.0,
                m: 1.0,
                l: 1.0,
            },
            e_norm: 0.5,
            m_norm: 0.5,
            l_norm: 0.5,
            r_dot,
            is_max,
        };
        let table = format_pod_table(&[pod(40, 1.2, false), pod(41, 1.5, true)]);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[2], "  0.40     1.200000");
        assert_eq!(lines[3], "  0.41     1.500000 *");
    }

    #[test]
    fn criteria_table_has_one_line_per_candidate() {
        let m = vec![
            vec![5.0, 4.0, 5.5],
            vec![7.0, 8.0, 7.0],
            vec![9.0, 6.0, 9.5],
            vec![3.0, 3.0, 2.0],
        ];
        let report = evaluate_criteria(&m).unwrap();
        let table = format_criteria_table(&report);
        assert_eq!(table.lines().count(), 4);
        assert!(table.lines().nth(2).unwrap().trim_start().starts_with("y1"));
    }
}
