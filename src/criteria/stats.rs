//! Individual goodness-of-fit statistics.
//!
//! Every function compares an actual column `a` with one computed column `c`
//! of the same length. Divisions by zero are reported, never turned into
//! `inf`/`NaN`.

use crate::error::FitError;
use crate::math::pairs;

/// `100/n · Σ |(a_i - c_i) / a_i|`.
pub fn approximation_error(a: &[f64], c: &[f64]) -> Result<f64, FitError> {
    let mut sum = 0.0;
    for i in 0..a.len() {
        sum += relative_error(a, c, i, "approximation error")?;
    }
    Ok(sum / a.len() as f64 * 100.0)
}

/// Number of pairs where `a` and `c` are not ordered oppositely.
///
/// Ties in either column count as concordant.
pub fn ksp(a: &[f64], c: &[f64]) -> usize {
    pairs(a.len())
        .filter(|&(k, s)| (a[k] - a[s]) * (c[k] - c[s]) >= 0.0)
        .count()
}

/// `ksp` as a percentage of all pairs.
pub fn relative_ksp(ksp: usize, n: usize) -> f64 {
    200.0 * ksp as f64 / (n as f64 * (n as f64 - 1.0))
}

/// `Σ |c_k - c_s|` over the discordant pairs.
pub fn continuous_ksp(a: &[f64], c: &[f64]) -> f64 {
    discordant(a, c).map(|(k, s)| (c[k] - c[s]).abs()).sum()
}

/// `200/(n(n-1)) · Σ |c_k - c_s| / (a_k - a_s)` over the discordant pairs.
///
/// The denominator keeps its sign. It cannot be zero: a discordant pair has
/// `a_k != a_s`.
pub fn relative_continuous_ksp(a: &[f64], c: &[f64]) -> f64 {
    let n = a.len() as f64;
    let sum: f64 = discordant(a, c)
        .map(|(k, s)| (c[k] - c[s]).abs() / (a[k] - a[s]))
        .sum();
    sum * (200.0 / (n * (n - 1.0)))
}

pub fn sum_abs_error(a: &[f64], c: &[f64]) -> f64 {
    a.iter().zip(c).map(|(a, c)| (a - c).abs()).sum()
}

pub fn max_abs_error(a: &[f64], c: &[f64]) -> f64 {
    a.iter()
        .zip(c)
        .map(|(a, c)| (a - c).abs())
        .fold(0.0, f64::max)
}

/// `100 · max_i |(a_i - c_i) / a_i|`.
pub fn max_relative_error(a: &[f64], c: &[f64]) -> Result<f64, FitError> {
    let mut max = 0.0_f64;
    for i in 0..a.len() {
        max = max.max(relative_error(a, c, i, "maximum relative error")?);
    }
    Ok(100.0 * max)
}

pub fn sum_squared_errors(a: &[f64], c: &[f64]) -> f64 {
    a.iter().zip(c).map(|(a, c)| (a - c).powi(2)).sum()
}

/// Multiple determination criterion `Σ(ā - c_i)² / Σ(a_i - c_i)²`.
pub fn determination(a: &[f64], c: &[f64]) -> Result<f64, FitError> {
    let mean = a.iter().sum::<f64>() / a.len() as f64;
    let numerator: f64 = c.iter().map(|c| (mean - c).powi(2)).sum();
    let denominator = sum_squared_errors(a, c);
    if denominator == 0.0 {
        return Err(FitError::numeric(
            "determination criterion",
            "computed values match the actual values exactly (zero residual sum of squares)",
        ));
    }
    Ok(numerator / denominator)
}

fn relative_error(a: &[f64], c: &[f64], i: usize, quantity: &'static str) -> Result<f64, FitError> {
    if a[i] == 0.0 {
        return Err(FitError::numeric(
            quantity,
            format!("actual value in row {} is zero", i + 1),
        ));
    }
    Ok(((a[i] - c[i]) / a[i]).abs())
}

fn discordant<'a>(a: &'a [f64], c: &'a [f64]) -> impl Iterator<Item = (usize, usize)> + 'a {
    pairs(a.len()).filter(move |&(k, s)| (a[k] - a[s]) * (c[k] - c[s]) < 0.0)
}
