//! Turn raw LP values into a `FitResult` with its summary statistics.
//!
//! Fitted values and residuals depend on the model:
//!
//! - global linear: `yy_i = Σ_j a_j·x_ij`, `eps_i = u_i - v_i`,
//!   `e = 100/n · Σ |eps_i / y_i|`
//! - piecewise: `yy_i = min_j a_j·x_ij`, `eps_i = y_i - yy_i`,
//!   `e = 100/n · Σ |y_i - yy_i| / y_i`
//!
//! Shared statistics:
//!
//! - `osp`: pairs where `(yy_k - yy_s)·(y_k - y_s) > 0`
//! - `N = 200/(n(n-1)) · Σ l_ks / (y_k + y_s)`
//! - `L = Σ l`, `m = Σ |eps|`

use crate::data::PreparedData;
use crate::domain::{FitResult, FitStats, ModelKind};
use crate::error::FitError;
use crate::fit::formulate::RawSolution;
use crate::math::pairs;

/// Build the immutable `FitResult` for one solve.
pub fn aggregate(
    kind: ModelKind,
    r: f64,
    data: &PreparedData,
    raw: RawSolution,
) -> Result<FitResult, FitError> {
    let RawSolution {
        a,
        split_residuals,
        l,
        objective,
    } = raw;
    let y = data.y.as_slice();

    let (yy, eps, active_branch, e) = match kind {
        ModelKind::GlobalLinear => {
            let yy = linear_values(data, &a);
            let e = mean_relative_error(y, |i| split_residuals[i] / y[i])?;
            (yy, split_residuals, None, e)
        }
        ModelKind::PiecewiseGiven => {
            let (yy, branches) = envelope_values(data, &a);
            let eps: Vec<f64> = y.iter().zip(&yy).map(|(y, yy)| y - yy).collect();
            let e = mean_relative_error(y, |i| (y[i] - yy[i]).abs() / y[i])?;
            (yy, eps, Some(branches), e)
        }
    };

    let stats = FitStats {
        e,
        osp: concordant_pairs(&yy, y),
        m: eps.iter().map(|v| v.abs()).sum(),
        n_cont: continuous_concordance(&l, y)?,
        total_violation: l.iter().sum(),
        count_rows: a.len().max(l.len()).max(yy.len()).max(eps.len()),
    };

    Ok(FitResult {
        kind,
        r,
        objective,
        a,
        eps,
        l,
        yy,
        active_branch,
        stats,
    })
}

/// `X·a`.
pub fn linear_values(data: &PreparedData, a: &[f64]) -> Vec<f64> {
    (0..data.n())
        .map(|i| (0..data.k()).map(|j| a[j] * data.x[(i, j)]).sum())
        .collect()
}

/// Row minimum of `a_j·x_ij` and the first index attaining it.
pub fn envelope_values(data: &PreparedData, a: &[f64]) -> (Vec<f64>, Vec<usize>) {
    let mut values = Vec::with_capacity(data.n());
    let mut branches = Vec::with_capacity(data.n());
    for i in 0..data.n() {
        let mut best = a[0] * data.x[(i, 0)];
        let mut best_j = 0;
        for j in 1..data.k() {
            let candidate = a[j] * data.x[(i, j)];
            if candidate < best {
                best = candidate;
                best_j = j;
            }
        }
        values.push(best);
        branches.push(best_j);
    }
    (values, branches)
}

fn mean_relative_error(y: &[f64], term: impl Fn(usize) -> f64) -> Result<f64, FitError> {
    let mut sum = 0.0;
    for i in 0..y.len() {
        if y[i] == 0.0 {
            return Err(FitError::numeric(
                "mean relative error",
                format!("observation {} has a zero response value", i + 1),
            ));
        }
        sum += term(i).abs();
    }
    Ok(100.0 / y.len() as f64 * sum)
}

/// Count of pairs ordered the same way by `fitted` and `actual` (ties excluded).
pub fn concordant_pairs(fitted: &[f64], actual: &[f64]) -> usize {
    pairs(actual.len())
        .filter(|&(k, s)| (fitted[k] - fitted[s]) * (actual[k] - actual[s]) > 0.0)
        .count()
}

fn continuous_concordance(l: &[f64], y: &[f64]) -> Result<f64, FitError> {
    let n = y.len() as f64;
    let mut sum = 0.0;
    for (p, (k, s)) in pairs(y.len()).enumerate() {
        let denom = y[k] + y[s];
        if denom == 0.0 {
            return Err(FitError::numeric(
                "continuous concordance",
                format!("y_{} + y_{} is zero", k + 1, s + 1),
            ));
        }
        sum += l[p] / denom;
    }
    Ok(sum * (200.0 / (n * (n - 1.0))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::prepare;

    fn data() -> PreparedData {
        let rows = vec![
            vec![5.0, 1.0, 6.0],
            vec![7.0, 7.0, 8.0],
            vec![9.0, 4.0, 2.0],
            vec![3.0, 3.0, 5.0],
        ];
        prepare(&rows, 1, false).unwrap()
    }

    fn reference_raw() -> RawSolution {
        let a = vec![9.0 / 14.0, 3.0 / 14.0];
        RawSolution {
            a,
            split_residuals: vec![43.0 / 14.0, 11.0 / 14.0, 6.0, 0.0],
            l: vec![0.0, 0.0, 15.0 / 14.0, 45.0 / 14.0, 0.0, 0.0],
            objective: 5.957_143_73,
        }
    }

    #[test]
    fn global_linear_statistics() {
        let data = data();
        let res = aggregate(ModelKind::GlobalLinear, 0.3, &data, reference_raw()).unwrap();

        let yy_expected = [27.0 / 14.0, 87.0 / 14.0, 3.0, 3.0];
        for (got, want) in res.yy.iter().zip(yy_expected) {
            assert!((got - want).abs() < 1e-12);
        }

        let e = 100.0 / 4.0 * ((43.0 / 14.0) / 5.0 + (11.0 / 14.0) / 7.0 + 6.0 / 9.0);
        assert!((res.stats.e - e).abs() < 1e-9);
        assert!((res.stats.m - (43.0 + 11.0 + 84.0) / 14.0).abs() < 1e-9);
        assert!((res.stats.total_violation - 60.0 / 14.0).abs() < 1e-9);

        // y = 5,7,9,3 ; yy ≈ 1.93, 6.21, 3, 3
        // concordant: (0,1) (0,2) (1,3) ; discordant: (0,3) (1,2) ;
        // (2,3) is a tie up to round-off in yy.
        assert!((3..=4).contains(&res.stats.osp), "osp={}", res.stats.osp);

        let n_cont = 200.0 / 12.0 * ((15.0 / 14.0) / 8.0 + (45.0 / 14.0) / 16.0);
        assert!((res.stats.n_cont - n_cont).abs() < 1e-9);
        assert_eq!(res.stats.count_rows, 6);
        assert!(res.active_branch.is_none());
    }

    #[test]
    fn piecewise_uses_envelope_and_first_minimum() {
        let data = data();
        // a = (1, 1): rows min(1,6)=1, min(7,8)=7, min(4,2)=2, min(3,5)=3
        let raw = RawSolution {
            a: vec![1.0, 1.0],
            split_residuals: vec![0.0; 4],
            l: vec![0.0; 6],
            objective: 0.0,
        };
        let res = aggregate(ModelKind::PiecewiseGiven, 0.5, &data, raw).unwrap();
        assert_eq!(res.yy, vec![1.0, 7.0, 2.0, 3.0]);
        assert_eq!(res.eps, vec![4.0, 0.0, 7.0, 0.0]);
        assert_eq!(res.active_branch, Some(vec![0, 0, 1, 0]));
        let e = 100.0 / 4.0 * (4.0 / 5.0 + 7.0 / 9.0);
        assert!((res.stats.e - e).abs() < 1e-9);
    }

    #[test]
    fn envelope_ties_pick_lowest_index() {
        let rows = vec![vec![1.0, 2.0, 2.0], vec![2.0, 3.0, 1.0]];
        let data = prepare(&rows, 1, false).unwrap();
        let (values, branches) = envelope_values(&data, &[1.0, 1.0]);
        assert_eq!(values, vec![2.0, 1.0]);
        assert_eq!(branches, vec![0, 1]);
    }

    #[test]
    fn zero_response_is_a_numeric_fault() {
        let rows = vec![vec![0.0, 1.0], vec![2.0, 3.0]];
        let data = prepare(&rows, 1, false).unwrap();
        let raw = RawSolution {
            a: vec![1.0],
            split_residuals: vec![-1.0, -1.0],
            l: vec![0.0],
            objective: 0.0,
        };
        let err = aggregate(ModelKind::GlobalLinear, 0.5, &data, raw).unwrap_err();
        assert!(matches!(
            err,
            FitError::NumericFault { quantity: "mean relative error", .. }
        ));
    }

    #[test]
    fn opposite_responses_fault_continuous_concordance() {
        // y_1 + y_2 = 0; the mean relative error is still defined.
        let rows = vec![vec![2.0, 1.0], vec![-2.0, 3.0]];
        let data = prepare(&rows, 1, false).unwrap();
        let raw = RawSolution {
            a: vec![1.0],
            split_residuals: vec![1.0, -5.0],
            l: vec![0.0],
            objective: 0.0,
        };
        let err = aggregate(ModelKind::GlobalLinear, 0.5, &data, raw).unwrap_err();
        assert!(matches!(
            err,
            FitError::NumericFault { quantity: "continuous concordance", .. }
        ));
    }

    #[test]
    fn concordant_pairs_ignores_ties() {
        assert_eq!(concordant_pairs(&[1.0, 1.0, 2.0], &[1.0, 2.0, 3.0]), 2);
    }
}
