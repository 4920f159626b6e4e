//! Canonical pair enumeration.
//!
//! Every pair-indexed array in the crate (concordance signs, violation slacks,
//! concordance statistics) uses the same order:
//!
//! ```text
//! (0,1) (0,2) ... (0,n-1) (1,2) ... (n-2,n-1)
//! ```
//!
//! Arrays built from different sources are only comparable because they all go
//! through [`pairs`].

/// Number of unordered pairs among `n` observations.
pub fn pair_count(n: usize) -> usize {
    n * n.saturating_sub(1) / 2
}

/// Iterate `(k, s)` with `k < s` in canonical order.
pub fn pairs(n: usize) -> impl Iterator<Item = (usize, usize)> {
    (0..n.saturating_sub(1)).flat_map(move |k| ((k + 1)..n).map(move |s| (k, s)))
}

/// Sign of `value` as `-1`, `0` or `1`.
pub fn sign(value: f64) -> i8 {
    if value > 0.0 {
        1
    } else if value < 0.0 {
        -1
    } else {
        0
    }
}
