//! Ideal point search over the trade-off parameter r.
//!
//! Steps:
//! 1. Probe r = 0.01..=0.99 for the first global-linear fit with a non-zero
//!    total violation `L`; that r is the left boundary of the sweep.
//! 2. Sweep r from the left boundary to 1.00 (step 0.01), recording `(e, m, L)`.
//! 3. Normalize each statistic by its maximum over the sweep and score
//!    `r_dot = (1 - e') + (1 - m') + (1 - L')`.
//! 4. The ideal points are the indices with the maximal `r_dot`.
//! 5. Sample a readable subset of the sweep and refit at the first ideal r.
//!
//! Each solve depends only on the shared data and its own r, so the probe and
//! the sweep run on the rayon pool. Results are collected in grid order before
//! any scoring happens.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::data::PreparedData;
use crate::domain::{FitParams, FitResult, ModelKind};
use crate::error::FitError;
use crate::fit::control::CancelToken;
use crate::fit::fitter::fit_model;
use crate::fit::r_grid::{is_tenth, probe_steps, step_to_r, sweep_steps};
use crate::lp::LpSolver;

/// `L` at or below this is treated as zero (solver round-off).
pub const TRIVIAL_TOLERANCE: f64 = 1e-9;

/// One sweep point: raw statistics of the fit at `r`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pod {
    /// r in hundredths.
    pub step: u32,
    pub r: f64,
    pub e: f64,
    pub m: f64,
    pub l: f64,
}

/// A sweep point after normalization.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoredPod {
    pub pod: Pod,
    pub e_norm: f64,
    pub m_norm: f64,
    pub l_norm: f64,
    pub r_dot: f64,
    pub is_max: bool,
}

/// Everything the ideal point search produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdealPointSearch {
    /// First probed r with a non-trivial solution.
    pub left_boundary: f64,
    /// Raw sweep history, sorted by r.
    pub pods: Vec<Pod>,
    /// Normalized copy of `pods`.
    pub scored: Vec<ScoredPod>,
    /// Indices into `scored` that attain the maximal `r_dot`.
    pub ideal: Vec<usize>,
    /// Subset of `scored` for reporting, sorted by r.
    pub sampled: Vec<ScoredPod>,
    /// The chosen r (first ideal point).
    pub r: f64,
    /// Global-linear fit at `r`.
    pub result: FitResult,
}

/// Run the full search.
///
/// `params.r` is ignored; `params.delta` is used for every solve.
pub fn search_ideal_point(
    data: &PreparedData,
    params: &FitParams,
    solver: &dyn LpSolver,
    cancel: Option<&CancelToken>,
) -> Result<IdealPointSearch, FitError> {
    let left = find_non_trivial(data, params, solver, cancel)?;
    log::info!("first non-trivial solution at r={:.2}", step_to_r(left));

    let mut pods = sweep(data, params, solver, cancel, left)?;
    pods.sort_by(|a, b| a.r.total_cmp(&b.r));

    let mut scored = score(&pods)?;
    let ideal = ideal_indices(&scored);
    for &i in &ideal {
        scored[i].is_max = true;
    }
    let sampled = sample_indices(&scored, &ideal)
        .into_iter()
        .map(|i| scored[i])
        .collect();

    let r = scored[ideal[0]].pod.r;
    log::info!(
        "ideal point r={r:.2} (r_dot={:.6}, {} tied)",
        scored[ideal[0]].r_dot,
        ideal.len()
    );

    let result = fit_model(ModelKind::GlobalLinear, data, &params.with_r(r), solver)?;

    Ok(IdealPointSearch {
        left_boundary: step_to_r(left),
        pods,
        scored,
        ideal,
        sampled,
        r,
        result,
    })
}

/// First probe step whose fit has `L != 0`.
///
/// Runs in parallel but returns exactly what a left-to-right scan would,
/// including which error surfaces first.
pub fn find_non_trivial(
    data: &PreparedData,
    params: &FitParams,
    solver: &dyn LpSolver,
    cancel: Option<&CancelToken>,
) -> Result<u32, FitError> {
    let hit = probe_steps()
        .into_par_iter()
        .map(|step| -> Result<(u32, bool), FitError> {
            check_cancelled(cancel)?;
            let res = fit_model(ModelKind::GlobalLinear, data, &params.with_r(step_to_r(step)), solver)?;
            Ok((step, res.stats.total_violation > TRIVIAL_TOLERANCE))
        })
        .find_first(|outcome| !matches!(outcome, Ok((_, false))));

    match hit {
        Some(Ok((step, _))) => Ok(step),
        Some(Err(err)) => Err(err),
        None => Err(FitError::AllTrivial),
    }
}

fn sweep(
    data: &PreparedData,
    params: &FitParams,
    solver: &dyn LpSolver,
    cancel: Option<&CancelToken>,
    left: u32,
) -> Result<Vec<Pod>, FitError> {
    sweep_steps(left)?
        .into_par_iter()
        .map(|step| -> Result<Pod, FitError> {
            check_cancelled(cancel)?;
            let r = step_to_r(step);
            let res = fit_model(ModelKind::GlobalLinear, data, &params.with_r(r), solver)?;
            Ok(Pod {
                step,
                r,
                e: res.stats.e,
                m: res.stats.m,
                l: res.stats.total_violation,
            })
        })
        .collect()
}

fn check_cancelled(cancel: Option<&CancelToken>) -> Result<(), FitError> {
    match cancel {
        Some(token) => token.check(),
        None => Ok(()),
    }
}

/// Normalize `e`, `m`, `L` by their maxima and compute `r_dot`.
///
/// Works on a copy; the raw pods are left untouched.
pub fn score(pods: &[Pod]) -> Result<Vec<ScoredPod>, FitError> {
    let max_e = positive_max(pods.iter().map(|p| p.e), "normalized mean relative error")?;
    let max_m = positive_max(pods.iter().map(|p| p.m), "normalized absolute residual")?;
    let max_l = positive_max(pods.iter().map(|p| p.l), "normalized total violation")?;

    Ok(pods
        .iter()
        .map(|&pod| {
            let e_norm = pod.e / max_e;
            let m_norm = pod.m / max_m;
            let l_norm = pod.l / max_l;
            ScoredPod {
                pod,
                e_norm,
                m_norm,
                l_norm,
                r_dot: (1.0 - e_norm) + (1.0 - m_norm) + (1.0 - l_norm),
                is_max: false,
            }
        })
        .collect())
}

fn positive_max(values: impl Iterator<Item = f64>, quantity: &'static str) -> Result<f64, FitError> {
    let max = values.fold(f64::NEG_INFINITY, f64::max);
    if max.is_nan() || max <= 0.0 {
        return Err(FitError::numeric(
            quantity,
            format!("maximum over the sweep is {max}, cannot normalize"),
        ));
    }
    Ok(max)
}

/// Indices attaining the maximal `r_dot` (exact ties included), ascending.
pub fn ideal_indices(scored: &[ScoredPod]) -> Vec<usize> {
    let mut best = 0;
    for (i, p) in scored.iter().enumerate() {
        if scored[best].r_dot < p.r_dot {
            best = i;
        }
    }
    let Some(best_pod) = scored.get(best) else {
        return Vec::new();
    };
    scored
        .iter()
        .enumerate()
        .filter(|(_, p)| p.r_dot == best_pod.r_dot)
        .map(|(i, _)| i)
        .collect()
}

/// Indices of the sweep points shown in reports, ascending.
///
/// Always: the first and last point, every whole tenth of r and every ideal
/// point. Then the left neighbour of the first ideal point, and one right
/// neighbour: after the last ideal point when there are several ties and that
/// slot is free, otherwise after the first ideal point.
pub fn sample_indices(scored: &[ScoredPod], ideal: &[usize]) -> Vec<usize> {
    let len = scored.len();
    let mut picked = vec![false; len];
    for (i, p) in scored.iter().enumerate() {
        if ideal.contains(&i) || i == 0 || i + 1 == len || is_tenth(p.pod.step) {
            picked[i] = true;
        }
    }

    if let (Some(&first), Some(&last)) = (ideal.first(), ideal.last()) {
        if first >= 1 && !picked[first - 1] {
            picked[first - 1] = true;
        }
        if ideal.len() > 1 && last + 1 < len && !picked[last + 1] {
            picked[last + 1] = true;
        } else if first + 1 < len && !picked[first + 1] {
            picked[first + 1] = true;
        }
    }

    picked
        .iter()
        .enumerate()
        .filter(|&(_, &p)| p)
        .map(|(i, _)| i)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::prepare;
    use crate::lp::{LinearProgram, LpSolution, MicroLp};

    fn pod(step: u32, e: f64, m: f64, l: f64) -> Pod {
        Pod {
            step,
            r: step_to_r(step),
            e,
            m,
            l,
        }
    }

    fn scored_with(steps: std::ops::RangeInclusive<u32>, r_dot: impl Fn(usize) -> f64) -> Vec<ScoredPod> {
        steps
            .enumerate()
            .map(|(i, step)| ScoredPod {
                pod: pod(step, 1.0, 1.0, 1.0),
                e_norm: 0.0,
                m_norm: 0.0,
                l_norm: 0.0,
                r_dot: r_dot(i),
                is_max: false,
            })
            .collect()
    }

    /// Returns all-zero variable values: every fit is trivial.
    struct ZeroSolver;

    impl LpSolver for ZeroSolver {
        fn solve(&self, program: &LinearProgram) -> Result<LpSolution, FitError> {
            Ok(LpSolution::new(program, vec![0.0; program.variables().len()]))
        }
    }

    struct InfeasibleSolver;

    impl LpSolver for InfeasibleSolver {
        fn solve(&self, _program: &LinearProgram) -> Result<LpSolution, FitError> {
            Err(FitError::Infeasible)
        }
    }

    fn fixture() -> PreparedData {
        let rows = vec![
            vec![5.0, 1.0, 6.0],
            vec![7.0, 7.0, 8.0],
            vec![9.0, 4.0, 2.0],
            vec![3.0, 3.0, 5.0],
        ];
        prepare(&rows, 1, false).unwrap()
    }

    #[test]
    fn score_normalizes_by_maxima() {
        let pods = vec![pod(50, 2.0, 4.0, 1.0), pod(51, 1.0, 2.0, 0.5)];
        let scored = score(&pods).unwrap();
        assert_eq!(scored[0].e_norm, 1.0);
        assert_eq!(scored[1].m_norm, 0.5);
        assert!((scored[1].r_dot - 1.5).abs() < 1e-12);
        assert_eq!(scored[0].r_dot, 0.0);
        // The raw history is unchanged.
        assert_eq!(pods[1].e, 1.0);
    }

    #[test]
    fn score_rejects_zero_maximum() {
        let pods = vec![pod(50, 1.0, 1.0, 0.0), pod(51, 1.0, 1.0, 0.0)];
        let err = score(&pods).unwrap_err();
        assert!(matches!(
            err,
            FitError::NumericFault { quantity: "normalized total violation", .. }
        ));
    }

    #[test]
    fn ideal_indices_keep_ties() {
        let scored = scored_with(90..=99, |i| if i == 2 || i == 6 { 2.5 } else { 1.0 });
        assert_eq!(ideal_indices(&scored), vec![2, 6]);
    }

    #[test]
    fn sample_single_ideal_point() {
        // steps 50..=100, ideal at step 57 (index 7)
        let scored = scored_with(50..=100, |i| if i == 7 { 3.0 } else { 1.0 });
        let ideal = ideal_indices(&scored);
        assert_eq!(ideal, vec![7]);
        let picked: Vec<u32> = sample_indices(&scored, &ideal)
            .into_iter()
            .map(|i| scored[i].pod.step)
            .collect();
        assert_eq!(picked, vec![50, 56, 57, 58, 60, 70, 80, 90, 100]);
    }

    #[test]
    fn sample_non_adjacent_ties_fall_back_to_first_neighbour() {
        // steps 81..=100; ideal at indices 3 and 8 (steps 84, 89).
        // The slot after the last tie (index 9, step 90) is already a tenth,
        // so the right neighbour of the first tie is taken instead.
        let scored = scored_with(81..=100, |i| if i == 3 || i == 8 { 2.0 } else { 0.5 });
        let ideal = ideal_indices(&scored);
        assert_eq!(sample_indices(&scored, &ideal), vec![0, 2, 3, 4, 8, 9, 19]);
    }

    #[test]
    fn sample_always_contains_ends_and_ideals() {
        let scored = scored_with(1..=100, |i| ((i * 37) % 11) as f64);
        let ideal = ideal_indices(&scored);
        let picked = sample_indices(&scored, &ideal);
        assert_eq!(picked.first(), Some(&0));
        assert_eq!(picked.last(), Some(&99));
        for i in &ideal {
            assert!(picked.contains(i));
        }
        for step in (10..=100).step_by(10) {
            assert!(picked.contains(&((step - 1) as usize)));
        }
    }

    #[test]
    fn all_trivial_probe_fails() {
        let err = find_non_trivial(&fixture(), &FitParams::default(), &ZeroSolver, None).unwrap_err();
        assert_eq!(err, FitError::AllTrivial);
    }

    #[test]
    fn constant_response_is_all_trivial() {
        let rows = vec![vec![2.0, 1.0], vec![2.0, 3.0], vec![2.0, 5.0]];
        let data = prepare(&rows, 1, false).unwrap();
        let err = search_ideal_point(&data, &FitParams::default(), &MicroLp, None).unwrap_err();
        assert_eq!(err, FitError::AllTrivial);
    }

    #[test]
    fn infeasible_probe_is_reported_as_such() {
        let err =
            find_non_trivial(&fixture(), &FitParams::default(), &InfeasibleSolver, None).unwrap_err();
        assert_eq!(err, FitError::Infeasible);
    }

    #[test]
    fn cancelled_search_stops() {
        let token = CancelToken::new();
        token.cancel();
        let err = search_ideal_point(&fixture(), &FitParams::default(), &MicroLp, Some(&token))
            .unwrap_err();
        assert_eq!(err, FitError::Cancelled);
    }

    #[test]
    fn search_on_reference_data() {
        let data = fixture();
        let params = FitParams {
            delta: 1e-6,
            ..FitParams::default()
        };
        let search = search_ideal_point(&data, &params, &MicroLp, None).unwrap();

        assert!(search.left_boundary > 0.0 && search.left_boundary < 1.0);
        assert!(search.pods.windows(2).all(|w| w[0].r < w[1].r));
        for p in &search.pods {
            assert!(p.r >= search.left_boundary - 1e-12 && p.r <= 1.0);
        }
        assert_eq!(search.pods.last().map(|p| p.step), Some(100));
        assert!(search.pods[0].l > TRIVIAL_TOLERANCE);

        assert!(!search.ideal.is_empty());
        assert_eq!(search.r, search.scored[search.ideal[0]].pod.r);
        assert_eq!(search.result.r, search.r);
        assert!(search.sampled.iter().any(|p| p.is_max));
        assert!(search.sampled.windows(2).all(|w| w[0].pod.r < w[1].pod.r));
        assert_eq!(search.sampled[0].pod, search.pods[0]);
    }
}
