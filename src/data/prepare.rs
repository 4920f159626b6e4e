//! Turn a raw observation matrix into the objects the LP formulations need.
//!
//! - `x`: predictors (every column except the response), optionally with a
//!   leading constant-1 column
//! - `y`: the response column
//! - `omega`: sign of `y_k - y_s` for every pair, in canonical pair order

use nalgebra::{DMatrix, DVector};

use crate::error::FitError;
use crate::math::{pair_count, pairs, sign};

/// Read-only inputs shared by every solve of one fit request.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedData {
    pub x: DMatrix<f64>,
    pub y: DVector<f64>,
    pub omega: Vec<i8>,
}

impl PreparedData {
    /// Number of observations.
    pub fn n(&self) -> usize {
        self.y.len()
    }

    /// Number of model columns (including the intercept column, if any).
    pub fn k(&self) -> usize {
        self.x.ncols()
    }

    /// Number of observation pairs.
    pub fn pairs(&self) -> usize {
        self.omega.len()
    }
}

/// Build `PreparedData` from `rows`.
///
/// `response_column` is 1-based. Every row must have the same width, there must
/// be at least two rows and at least one predictor column.
pub fn prepare(
    rows: &[Vec<f64>],
    response_column: usize,
    intercept: bool,
) -> Result<PreparedData, FitError> {
    let n = rows.len();
    if n < 2 {
        return Err(FitError::shape(format!(
            "need at least 2 observations, got {n}"
        )));
    }

    let width = rows[0].len();
    if let Some((idx, row)) = rows.iter().enumerate().find(|(_, row)| row.len() != width) {
        return Err(FitError::shape(format!(
            "row {} has {} values, expected {width}",
            idx + 1,
            row.len()
        )));
    }
    if response_column == 0 || response_column > width {
        return Err(FitError::shape(format!(
            "response column {response_column} is out of range 1..={width}"
        )));
    }
    if width < 2 && !intercept {
        return Err(FitError::shape("no predictor columns left after removing the response"));
    }

    let response = response_column - 1;
    let offset = usize::from(intercept);
    let k = width - 1 + offset;

    let x = DMatrix::from_fn(n, k, |i, j| {
        if intercept && j == 0 {
            return 1.0;
        }
        let source = j - offset;
        // Skip over the response column.
        let source = if source >= response { source + 1 } else { source };
        rows[i][source]
    });
    let y = DVector::from_fn(n, |i, _| rows[i][response]);
    let omega = concordance_signs(y.as_slice());

    Ok(PreparedData { x, y, omega })
}

/// Sign of `y_k - y_s` for each pair `(k, s)`.
pub fn concordance_signs(y: &[f64]) -> Vec<i8> {
    let mut omega = Vec::with_capacity(pair_count(y.len()));
    for (k, s) in pairs(y.len()) {
        omega.push(sign(y[k] - y[s]));
    }
    omega
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn fixture() -> Vec<Vec<f64>> {
        vec![
            vec![5.0, 1.0, 6.0],
            vec![7.0, 7.0, 8.0],
            vec![9.0, 4.0, 2.0],
            vec![3.0, 3.0, 5.0],
        ]
    }

    #[test]
    fn splits_response_and_predictors() {
        let data = prepare(&fixture(), 1, false).unwrap();
        assert_eq!(data.y.as_slice(), &[5.0, 7.0, 9.0, 3.0]);
        assert_eq!(data.k(), 2);
        assert_eq!(data.x[(0, 0)], 1.0);
        assert_eq!(data.x[(0, 1)], 6.0);
        assert_eq!(data.x[(2, 0)], 4.0);
        assert_eq!(data.x[(2, 1)], 2.0);
    }

    #[test]
    fn intercept_is_leading_column() {
        let data = prepare(&fixture(), 2, true).unwrap();
        assert_eq!(data.k(), 3);
        assert_eq!(data.y.as_slice(), &[1.0, 7.0, 4.0, 3.0]);
        for i in 0..data.n() {
            assert_eq!(data.x[(i, 0)], 1.0);
        }
        assert_eq!(data.x[(1, 1)], 7.0);
        assert_eq!(data.x[(1, 2)], 8.0);
    }

    #[test]
    fn omega_uses_canonical_pair_order() {
        let data = prepare(&fixture(), 1, false).unwrap();
        // y = 5, 7, 9, 3
        assert_eq!(data.omega, vec![-1, -1, 1, -1, 1, 1]);
    }

    #[test]
    fn omega_matches_pairwise_signs_on_random_data() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..50 {
            let n = rng.gen_range(2..12);
            let y: Vec<f64> = (0..n).map(|_| f64::from(rng.gen_range(-3..4_i32))).collect();
            let omega = concordance_signs(&y);
            assert_eq!(omega.len(), n * (n - 1) / 2);
            let mut p = 0;
            for k in 0..n {
                for s in (k + 1)..n {
                    assert_eq!(omega[p], sign(y[k] - y[s]));
                    p += 1;
                }
            }
        }
    }

    #[test]
    fn omega_is_zero_for_ties() {
        assert_eq!(concordance_signs(&[2.0, 2.0, 1.0]), vec![0, 1, 1]);
    }

    #[test]
    fn rejects_out_of_range_response_column() {
        let err = prepare(&fixture(), 4, false).unwrap_err();
        assert!(matches!(err, FitError::Shape(_)));
        let err = prepare(&fixture(), 0, false).unwrap_err();
        assert!(matches!(err, FitError::Shape(_)));
    }

    #[test]
    fn rejects_ragged_rows() {
        let mut rows = fixture();
        rows[2].pop();
        let err = prepare(&rows, 1, false).unwrap_err();
        assert!(matches!(err, FitError::Shape(msg) if msg.contains("row 3")));
    }

    #[test]
    fn rejects_single_observation() {
        let err = prepare(&fixture()[..1], 1, false).unwrap_err();
        assert!(matches!(err, FitError::Shape(_)));
    }
}
