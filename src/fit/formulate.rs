//! LP formulations of the two fitting models.
//!
//! Both formulations share:
//!
//! - residual split `u_i, v_i >= 0` with `eps_i = u_i - v_i`
//! - concordance slacks `l_ks >= 0`, one per pair in canonical order
//! - objective `r·Σu + r·Σv + (1-r)·Σl` (+ mode-specific terms)
//!
//! `GlobalLinear` fits `y = X·a` with `a_j = b_j - g_j`.
//! `PiecewiseGiven` fits `y = min_j alfa_j·x_j` using big-M branch indicators.

use crate::data::PreparedData;
use crate::domain::{FitParams, ModelKind};
use crate::lp::{Cmp, LinearProgram, LpSolution, Sense, Terms, VarId};
use crate::math::pairs;

/// A built program plus the handles needed to read its solution back.
#[derive(Debug, Clone)]
pub struct Formulation {
    pub program: LinearProgram,
    pub layout: VarLayout,
}

#[derive(Debug, Clone)]
pub struct VarLayout {
    pub u: Vec<VarId>,
    pub v: Vec<VarId>,
    pub l: Vec<VarId>,
    pub coefficients: CoefficientVars,
}

#[derive(Debug, Clone)]
pub enum CoefficientVars {
    /// `a_j = b_j - g_j`.
    Split { b: Vec<VarId>, g: Vec<VarId> },
    /// `a_j = alfa_j`; `z_i` is the envelope value, `sigma[i][j]` the branch indicator.
    Piecewise {
        alfa: Vec<VarId>,
        z: Vec<VarId>,
        sigma: Vec<Vec<VarId>>,
    },
}

/// Solution values read back from a formulation.
#[derive(Debug, Clone, PartialEq)]
pub struct RawSolution {
    pub a: Vec<f64>,
    /// `u_i - v_i` per observation.
    pub split_residuals: Vec<f64>,
    pub l: Vec<f64>,
    pub objective: f64,
}

impl Formulation {
    pub fn extract(&self, solution: &LpSolution) -> RawSolution {
        let layout = &self.layout;
        let a = match &layout.coefficients {
            CoefficientVars::Split { b, g } => b
                .iter()
                .zip(g)
                .map(|(&b, &g)| solution.value(b) - solution.value(g))
                .collect(),
            CoefficientVars::Piecewise { alfa, .. } => solution.values(alfa),
        };
        let split_residuals = layout
            .u
            .iter()
            .zip(&layout.v)
            .map(|(&u, &v)| solution.value(u) - solution.value(v))
            .collect();

        RawSolution {
            a,
            split_residuals,
            l: solution.values(&layout.l),
            objective: solution.objective(),
        }
    }
}

/// Builds the LP for one model kind.
pub trait ModelFormulator: Send + Sync {
    fn kind(&self) -> ModelKind;

    fn build(&self, data: &PreparedData, r: f64) -> Formulation;
}

/// Formulator for `kind`, taking its mode-specific constants from `params`.
pub fn formulator(kind: ModelKind, params: &FitParams) -> Box<dyn ModelFormulator> {
    match kind {
        ModelKind::GlobalLinear => Box::new(GlobalLinear {
            delta: params.delta,
        }),
        ModelKind::PiecewiseGiven => Box::new(PiecewiseGiven {
            big_m: params.big_m,
        }),
    }
}

/// Variables and objective terms common to both models.
struct Common {
    u: Vec<VarId>,
    v: Vec<VarId>,
    l: Vec<VarId>,
    objective: Terms,
}

fn declare_common(lp: &mut LinearProgram, data: &PreparedData, r: f64) -> Common {
    let n = data.n();
    let u: Vec<VarId> = (0..n).map(|i| lp.non_negative(format!("u{i}"))).collect();
    let v: Vec<VarId> = (0..n).map(|i| lp.non_negative(format!("v{i}"))).collect();
    let l: Vec<VarId> = pairs(n)
        .map(|(k, s)| lp.non_negative(format!("l{k}_{s}")))
        .collect();

    let mut objective = Terms::with_capacity(2 * n + l.len());
    objective.extend(u.iter().map(|&var| (var, r)));
    objective.extend(v.iter().map(|&var| (var, r)));
    objective.extend(l.iter().map(|&var| (var, 1.0 - r)));

    Common { u, v, l, objective }
}

/// Global linear model with `a = b - g` and an L1 penalty `delta·Σ(b+g)`.
#[derive(Debug, Clone, Copy)]
pub struct GlobalLinear {
    pub delta: f64,
}

impl ModelFormulator for GlobalLinear {
    fn kind(&self) -> ModelKind {
        ModelKind::GlobalLinear
    }

    fn build(&self, data: &PreparedData, r: f64) -> Formulation {
        let mut lp = LinearProgram::new();
        let Common { u, v, l, mut objective } = declare_common(&mut lp, data, r);

        let k = data.k();
        let b: Vec<VarId> = (0..k).map(|j| lp.non_negative(format!("b{j}"))).collect();
        let g: Vec<VarId> = (0..k).map(|j| lp.non_negative(format!("g{j}"))).collect();
        for j in 0..k {
            objective.push((b[j], self.delta));
            objective.push((g[j], self.delta));
        }
        lp.set_objective(objective, Sense::Minimize);

        // Σ_j (b_j - g_j)·x_ij + u_i - v_i = y_i
        for i in 0..data.n() {
            let mut terms = Terms::with_capacity(2 * k + 2);
            for j in 0..k {
                let x = data.x[(i, j)];
                terms.push((b[j], x));
                terms.push((g[j], -x));
            }
            terms.push((u[i], 1.0));
            terms.push((v[i], -1.0));
            lp.constrain(terms, Cmp::Eq, data.y[i]);
        }

        // Σ_j (b_j - g_j)·(x_kj - x_sj)·Ω_ks + l_ks >= 0
        for (p, (ki, si)) in pairs(data.n()).enumerate() {
            let omega = f64::from(data.omega[p]);
            let mut terms = Terms::with_capacity(2 * k + 1);
            for j in 0..k {
                let dx = (data.x[(ki, j)] - data.x[(si, j)]) * omega;
                terms.push((b[j], dx));
                terms.push((g[j], -dx));
            }
            terms.push((l[p], 1.0));
            lp.constrain(terms, Cmp::Geq, 0.0);
        }

        Formulation {
            program: lp,
            layout: VarLayout {
                u,
                v,
                l,
                coefficients: CoefficientVars::Split { b, g },
            },
        }
    }
}

/// Piecewise model `z_i = min_j alfa_j·x_ij`, selected through binaries.
#[derive(Debug, Clone, Copy)]
pub struct PiecewiseGiven {
    pub big_m: f64,
}

impl ModelFormulator for PiecewiseGiven {
    fn kind(&self) -> ModelKind {
        ModelKind::PiecewiseGiven
    }

    fn build(&self, data: &PreparedData, r: f64) -> Formulation {
        let mut lp = LinearProgram::new();
        let Common { u, v, l, objective } = declare_common(&mut lp, data, r);
        lp.set_objective(objective, Sense::Minimize);

        let n = data.n();
        let k = data.k();
        let m = self.big_m;
        let alfa: Vec<VarId> = (0..k)
            .map(|j| lp.continuous(format!("alfa{j}"), None, None))
            .collect();
        let z: Vec<VarId> = (0..n).map(|i| lp.non_negative(format!("z{i}"))).collect();
        let sigma: Vec<Vec<VarId>> = (0..n)
            .map(|i| (0..k).map(|j| lp.binary(format!("sigma{i}_{j}"))).collect())
            .collect();

        for i in 0..n {
            lp.constrain(vec![(z[i], 1.0), (u[i], 1.0), (v[i], -1.0)], Cmp::Eq, data.y[i]);
        }

        // z_i never exceeds a branch value.
        for i in 0..n {
            for j in 0..k {
                lp.constrain(vec![(alfa[j], data.x[(i, j)]), (z[i], -1.0)], Cmp::Geq, 0.0);
            }
        }

        // sigma_ij = 1 pins z_i to branch j.
        for i in 0..n {
            for j in 0..k {
                lp.constrain(
                    vec![(alfa[j], data.x[(i, j)]), (z[i], -1.0), (sigma[i][j], m)],
                    Cmp::Leq,
                    m,
                );
            }
        }

        for row in &sigma {
            lp.constrain(row.iter().map(|&s| (s, 1.0)).collect(), Cmp::Eq, 1.0);
        }

        // Ω_ks·(z_k - z_s) + l_ks >= 0
        for (p, (ki, si)) in pairs(n).enumerate() {
            let omega = f64::from(data.omega[p]);
            lp.constrain(
                vec![(z[ki], omega), (z[si], -omega), (l[p], 1.0)],
                Cmp::Geq,
                0.0,
            );
        }

        Formulation {
            program: lp,
            layout: VarLayout {
                u,
                v,
                l,
                coefficients: CoefficientVars::Piecewise { alfa, z, sigma },
            },
        }
    }
}
