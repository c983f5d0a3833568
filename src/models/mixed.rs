//! Linear mixed model with one random intercept per group, fitted by REML.
//!
//! The model is `y = Xβ + u[g] + e` with `u ~ N(0, σ²θ)` and `e ~ N(0, σ²)`. With a
//! single variance component the marginal covariance of a group is `σ²(I + θ11ᵀ)`,
//! whose inverse has a closed form, so the fit only needs per-group sums. The
//! restricted likelihood is profiled over `β` and `σ²` and maximised over `θ`.

use crate::models::design::Design;
use crate::models::error::FitError;
use crate::models::linalg::{solve_normal, NormalSolution};
use crate::models::summary::{format_stat, CoefficientRow, SummaryTable};
use log::trace;
use nalgebra::{DMatrix, DVector};
use statrs::distribution::{ContinuousCDF, Normal};
use std::collections::HashMap;
use std::f64::consts::PI;
use std::fmt;

const MODEL: &str = "MixedLM";
const LN_THETA_MIN: f64 = -16.0;
const LN_THETA_MAX: f64 = 16.0;
const LN_THETA_TOLERANCE: f64 = 1e-6;
const MAX_ITERATIONS: usize = 200;

/// A fitted random-intercept model.
#[derive(Debug, Clone)]
pub struct MixedLmFit {
    pub dependent: String,
    pub group_var: String,
    pub names: Vec<String>,
    pub params: DVector<f64>,
    pub bse: DVector<f64>,
    pub zvalues: DVector<f64>,
    pub pvalues: DVector<f64>,
    pub conf_int: Vec<(f64, f64)>,
    /// Residual variance σ².
    pub scale: f64,
    /// Random-intercept variance σ²θ.
    pub group_variance: f64,
    /// Restricted log-likelihood at the optimum.
    pub llf: f64,
    pub nobs: usize,
    pub n_groups: usize,
    pub min_group_size: usize,
    pub max_group_size: usize,
    pub mean_group_size: f64,
    pub converged: bool,
}

impl MixedLmFit {
    pub fn param(&self, name: &str) -> Option<f64> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|i| self.params[i])
    }

    pub fn summary(&self) -> SummaryTable {
        SummaryTable {
            title: "Mixed Linear Model Regression Results",
            left: vec![
                ("Model", MODEL.to_string()),
                ("No. Observations", self.nobs.to_string()),
                ("No. Groups", self.n_groups.to_string()),
                ("Min. group size", self.min_group_size.to_string()),
                ("Max. group size", self.max_group_size.to_string()),
                ("Mean group size", format!("{:.1}", self.mean_group_size)),
            ],
            right: vec![
                ("Dependent Variable", self.dependent.clone()),
                ("Method", "REML".to_string()),
                ("Scale", format_stat(self.scale)),
                ("Log-Likelihood", format_stat(self.llf)),
                (
                    "Converged",
                    if self.converged { "Yes" } else { "No" }.to_string(),
                ),
            ],
            columns: ["Coef.", "Std.Err.", "z", "P>|z|", "[0.025", "0.975]"],
            rows: self
                .names
                .iter()
                .enumerate()
                .map(|(i, name)| CoefficientRow {
                    name: name.clone(),
                    values: [
                        self.params[i],
                        self.bse[i],
                        self.zvalues[i],
                        self.pvalues[i],
                        self.conf_int[i].0,
                        self.conf_int[i].1,
                    ],
                })
                .collect(),
            trailing: vec![("Group Var".to_string(), self.group_variance)],
        }
    }
}

impl fmt::Display for MixedLmFit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.summary().fmt(f)
    }
}

/// Sufficient statistics of one group.
struct GroupSums {
    size: f64,
    xtx: DMatrix<f64>,
    xty: DVector<f64>,
    yty: f64,
    x_sum: DVector<f64>,
    y_sum: f64,
}

struct Profile {
    solution: NormalSolution,
    scale: f64,
    llf: f64,
}

struct GroupedData {
    groups: Vec<GroupSums>,
    nobs: usize,
    nparams: usize,
}

impl GroupedData {
    fn new(y: &DVector<f64>, design: &Design, labels: &[String]) -> Self {
        let p = design.nparams();
        let mut index: HashMap<&str, usize> = HashMap::new();
        let mut members: Vec<Vec<usize>> = Vec::new();
        for (row, label) in labels.iter().enumerate() {
            let slot = *index.entry(label.as_str()).or_insert_with(|| {
                members.push(Vec::new());
                members.len() - 1
            });
            members[slot].push(row);
        }

        let groups = members
            .into_iter()
            .map(|rows| {
                let x = design.matrix.select_rows(&rows);
                let yg = DVector::from_iterator(rows.len(), rows.iter().map(|&r| y[r]));
                let xt = x.transpose();
                GroupSums {
                    size: rows.len() as f64,
                    xtx: &xt * &x,
                    xty: &xt * &yg,
                    yty: yg.norm_squared(),
                    x_sum: DVector::from_fn(p, |j, _| x.column(j).sum()),
                    y_sum: yg.sum(),
                }
            })
            .collect();

        Self {
            groups,
            nobs: design.nobs(),
            nparams: p,
        }
    }

    fn profile(&self, theta: f64) -> Result<Profile, FitError> {
        let p = self.nparams;
        let mut a = DMatrix::<f64>::zeros(p, p);
        let mut b = DVector::<f64>::zeros(p);
        let mut yvy = 0.0;
        let mut log_det_v = 0.0;
        for g in &self.groups {
            let w = theta / (1.0 + g.size * theta);
            a += &g.xtx - (&g.x_sum * g.x_sum.transpose()) * w;
            b += &g.xty - &g.x_sum * (w * g.y_sum);
            yvy += g.yty - w * g.y_sum * g.y_sum;
            log_det_v += (1.0 + g.size * theta).ln();
        }

        let solution = solve_normal(MODEL, &a, &b)?;
        let df = (self.nobs - p) as f64;
        let rss = (yvy - b.dot(&solution.coefficients)).max(0.0);
        let scale = rss / df;
        let llf = -0.5 * (df * ((2.0 * PI * scale).ln() + 1.0) + log_det_v + solution.log_det);
        Ok(Profile {
            solution,
            scale,
            llf,
        })
    }

    /// Maximises the profiled restricted likelihood over `ln θ`, then checks the
    /// `θ = 0` boundary.
    fn optimise(&self) -> Result<(f64, Profile, bool), FitError> {
        let ratio = (5f64.sqrt() - 1.0) / 2.0;
        // Extreme ratios can make the weighted cross-product numerically singular;
        // such points simply lose the comparison.
        let objective = |ln_theta: f64| {
            self.profile(ln_theta.exp())
                .map_or(f64::NEG_INFINITY, |p| p.llf)
        };

        let (mut lo, mut hi) = (LN_THETA_MIN, LN_THETA_MAX);
        let mut c = hi - ratio * (hi - lo);
        let mut d = lo + ratio * (hi - lo);
        let mut fc = objective(c);
        let mut fd = objective(d);
        let mut converged = false;
        for _ in 0..MAX_ITERATIONS {
            if hi - lo < LN_THETA_TOLERANCE {
                converged = true;
                break;
            }
            if fc > fd {
                hi = d;
                d = c;
                fd = fc;
                c = hi - ratio * (hi - lo);
                fc = objective(c);
            } else {
                lo = c;
                c = d;
                fc = fd;
                d = lo + ratio * (hi - lo);
                fd = objective(d);
            }
        }

        let interior_theta = ((lo + hi) / 2.0).exp();
        let boundary = self.profile(0.0)?;
        let interior = self.profile(interior_theta).ok().filter(|p| p.llf.is_finite());
        trace!(
            "REML optimum theta={} llf={:?} (boundary llf={})",
            interior_theta,
            interior.as_ref().map(|p| p.llf),
            boundary.llf
        );
        match interior {
            Some(interior) if interior.llf > boundary.llf => {
                Ok((interior_theta, interior, converged))
            }
            _ if boundary.llf.is_finite() => Ok((0.0, boundary, converged)),
            _ => Err(FitError::NonConvergence { model: MODEL }),
        }
    }
}

/// Fits `y ~ design` with a random intercept for each distinct value of `groups`.
///
/// `groups` holds one label per design row. Fixed-effect inference uses normal
/// reference distributions.
pub fn fit_mixed_lm(
    dependent: &str,
    group_var: &str,
    y: &DVector<f64>,
    design: &Design,
    groups: &[String],
) -> Result<MixedLmFit, FitError> {
    let n = design.nobs();
    let p = design.nparams();
    if n <= p || y.len() != n {
        return Err(FitError::InsufficientObservations {
            model: MODEL,
            observations: n.min(y.len()),
            parameters: p,
        });
    }
    if groups.len() != n {
        return Err(FitError::ColumnLength {
            name: group_var.to_string(),
            expected: n,
            found: groups.len(),
        });
    }

    let data = GroupedData::new(y, design, groups);
    let (theta, profile, converged) = data.optimise()?;

    let params = profile.solution.coefficients;
    let bse = DVector::from_fn(p, |i, _| {
        (profile.scale * profile.solution.inverse[(i, i)]).sqrt()
    });
    let zvalues = params.component_div(&bse);
    let normal = Normal::new(0.0, 1.0)?;
    let pvalues = zvalues.map(|z| 2.0 * (1.0 - normal.cdf(z.abs())));
    let q = normal.inverse_cdf(0.975);
    let conf_int = (0..p)
        .map(|i| (params[i] - q * bse[i], params[i] + q * bse[i]))
        .collect();

    let sizes: Vec<usize> = data.groups.iter().map(|g| g.size as usize).collect();
    Ok(MixedLmFit {
        dependent: dependent.to_string(),
        group_var: group_var.to_string(),
        names: design.names.clone(),
        params,
        bse,
        zvalues,
        pvalues,
        conf_int,
        scale: profile.scale,
        group_variance: profile.scale * theta,
        llf: profile.llf,
        nobs: n,
        n_groups: sizes.len(),
        min_group_size: sizes.iter().copied().min().unwrap_or(0),
        max_group_size: sizes.iter().copied().max().unwrap_or(0),
        mean_group_size: n as f64 / sizes.len().max(1) as f64,
        converged,
    })
}
