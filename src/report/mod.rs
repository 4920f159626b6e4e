//! Reporting utilities: table rows for fit results, pods and criteria.
//!
//! Rows are built here once and then rendered as text (`format`) or written
//! to CSV (`io::export`).

use crate::domain::FitResult;

pub mod format;

pub use format::*;

/// One line of the result table.
///
/// Vector columns are filled while the vector lasts; scalar statistics only
/// appear on the first line.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultTableRow {
    pub coefficient: Option<f64>,
    pub violation: Option<f64>,
    pub total_violation: Option<f64>,
    pub residual: Option<f64>,
    /// 1-based index of the active branch (piecewise only).
    pub branch: Option<usize>,
    pub mean_error_pct: Option<f64>,
    pub concordance: Option<usize>,
    pub sum_abs_residual: Option<f64>,
    pub continuous_concordance: Option<f64>,
}

/// Header names for the result table of `result`.
pub fn result_table_headers(result: &FitResult) -> Vec<&'static str> {
    let mut headers = vec!["a", "l", "L", "eps"];
    if result.active_branch.is_some() {
        headers.push("branch");
    }
    headers.extend(["e_pct", "osp", "m", "N"]);
    headers
}

/// Rows of the result table, `result.stats.count_rows` of them.
pub fn result_table(result: &FitResult) -> Vec<ResultTableRow> {
    let stats = &result.stats;
    (0..stats.count_rows)
        .map(|i| {
            let first = i == 0;
            ResultTableRow {
                coefficient: result.a.get(i).copied(),
                violation: result.l.get(i).copied(),
                total_violation: first.then_some(stats.total_violation),
                residual: result.eps.get(i).copied(),
                branch: result
                    .active_branch
                    .as_ref()
                    .and_then(|b| b.get(i))
                    .map(|j| j + 1),
                mean_error_pct: first.then_some(stats.e),
                concordance: first.then_some(stats.osp),
                sum_abs_residual: first.then_some(stats.m),
                continuous_concordance: first.then_some(stats.n_cont),
            }
        })
        .collect()
}

/// Cells of `row` in `result_table_headers` order, formatted by `num`.
pub fn result_row_cells(
    row: &ResultTableRow,
    piecewise: bool,
    num: impl Fn(f64) -> String,
) -> Vec<String> {
    let opt = |v: Option<f64>| v.map(&num).unwrap_or_default();
    let mut cells = vec![
        opt(row.coefficient),
        opt(row.violation),
        opt(row.total_violation),
        opt(row.residual),
    ];
    if piecewise {
        cells.push(row.branch.map(|b| b.to_string()).unwrap_or_default());
    }
    cells.push(opt(row.mean_error_pct));
    cells.push(row.concordance.map(|c| c.to_string()).unwrap_or_default());
    cells.push(opt(row.sum_abs_residual));
    cells.push(opt(row.continuous_concordance));
    cells
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FitStats, ModelKind};

    fn result(branch: Option<Vec<usize>>) -> FitResult {
        FitResult {
            kind: ModelKind::PiecewiseGiven,
            r: 0.5,
            objective: 1.0,
            a: vec![1.0, 2.0],
            eps: vec![0.1, 0.2, 0.3],
            l: vec![0.0, 1.0, 0.0],
            yy: vec![1.0, 2.0, 3.0],
            active_branch: branch,
            stats: FitStats {
                e: 12.5,
                osp: 2,
                m: 0.6,
                n_cont: 3.0,
                total_violation: 1.0,
                count_rows: 3,
            },
        }
    }

    #[test]
    fn scalars_only_on_first_row() {
        let rows = result_table(&result(None));
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].mean_error_pct, Some(12.5));
        assert_eq!(rows[0].concordance, Some(2));
        assert_eq!(rows[1].total_violation, None);
        assert_eq!(rows[2].coefficient, None);
        assert_eq!(rows[2].residual, Some(0.3));
    }

    #[test]
    fn branches_are_one_based() {
        let r = result(Some(vec![0, 1, 0]));
        let rows = result_table(&r);
        assert_eq!(rows[1].branch, Some(2));
        assert_eq!(result_table_headers(&r)[4], "branch");
        let cells = result_row_cells(&rows[2], true, |v| format!("{v:.1}"));
        assert_eq!(cells, vec!["", "0.0", "", "0.3", "1", "", "", "", ""]);
    }
}
