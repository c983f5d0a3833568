//! Ordinary least squares with classical standard errors.

use crate::models::design::Design;
use crate::models::error::FitError;
use crate::models::linalg::solve_normal;
use crate::models::summary::{format_stat, CoefficientRow, SummaryTable};
use nalgebra::DVector;
use statrs::distribution::{ContinuousCDF, FisherSnedecor, StudentsT};
use std::f64::consts::PI;
use std::fmt;

const MODEL: &str = "OLS";

/// A fitted OLS regression.
#[derive(Debug, Clone)]
pub struct OlsFit {
    pub dependent: String,
    pub names: Vec<String>,
    pub params: DVector<f64>,
    pub bse: DVector<f64>,
    pub tvalues: DVector<f64>,
    pub pvalues: DVector<f64>,
    pub conf_int: Vec<(f64, f64)>,
    pub fitted: DVector<f64>,
    pub resid: DVector<f64>,
    pub nobs: usize,
    pub df_model: f64,
    pub df_resid: f64,
    pub ssr: f64,
    pub rsquared: f64,
    pub rsquared_adj: f64,
    pub fvalue: f64,
    pub f_pvalue: f64,
    pub llf: f64,
    pub aic: f64,
    pub bic: f64,
}

impl OlsFit {
    pub fn param(&self, name: &str) -> Option<f64> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|i| self.params[i])
    }

    pub fn summary(&self) -> SummaryTable {
        SummaryTable {
            title: "OLS Regression Results",
            left: vec![
                ("Dep. Variable", self.dependent.clone()),
                ("Model", MODEL.to_string()),
                ("Method", "Least Squares".to_string()),
                ("No. Observations", self.nobs.to_string()),
                ("Df Residuals", format!("{}", self.df_resid)),
                ("Df Model", format!("{}", self.df_model)),
            ],
            right: vec![
                ("R-squared", format!("{:.3}", self.rsquared)),
                ("Adj. R-squared", format!("{:.3}", self.rsquared_adj)),
                ("F-statistic", format_stat(self.fvalue)),
                ("Prob (F-statistic)", format_stat(self.f_pvalue)),
                ("Log-Likelihood", format_stat(self.llf)),
                ("AIC", format_stat(self.aic)),
                ("BIC", format_stat(self.bic)),
            ],
            columns: ["coef", "std err", "t", "P>|t|", "[0.025", "0.975]"],
            rows: self
                .names
                .iter()
                .enumerate()
                .map(|(i, name)| CoefficientRow {
                    name: name.clone(),
                    values: [
                        self.params[i],
                        self.bse[i],
                        self.tvalues[i],
                        self.pvalues[i],
                        self.conf_int[i].0,
                        self.conf_int[i].1,
                    ],
                })
                .collect(),
            trailing: Vec::new(),
        }
    }
}

impl fmt::Display for OlsFit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.summary().fmt(f)
    }
}

/// Fits `y ~ design` by least squares.
///
/// The design is expected to contain an intercept; R² and the F-test are computed
/// against the intercept-only model.
pub fn fit_ols(dependent: &str, y: &DVector<f64>, design: &Design) -> Result<OlsFit, FitError> {
    let x = &design.matrix;
    let n = design.nobs();
    let p = design.nparams();
    if n <= p || y.len() != n {
        return Err(FitError::InsufficientObservations {
            model: MODEL,
            observations: n.min(y.len()),
            parameters: p,
        });
    }

    let xt = x.transpose();
    let solution = solve_normal(MODEL, &(&xt * x), &(&xt * y))?;
    let params = solution.coefficients;
    let fitted = x * &params;
    let resid = y - &fitted;

    let nobs = n as f64;
    let df_model = (p - 1) as f64;
    let df_resid = (n - p) as f64;
    let ssr = resid.norm_squared();
    let mean = y.mean();
    let centered_tss = y.iter().map(|v| (v - mean).powi(2)).sum::<f64>();
    let scale = ssr / df_resid;

    let rsquared = 1.0 - ssr / centered_tss;
    let rsquared_adj = 1.0 - (nobs - 1.0) / df_resid * (1.0 - rsquared);
    let (fvalue, f_pvalue) = if df_model > 0.0 {
        let fvalue = ((centered_tss - ssr) / df_model) / scale;
        let dist = FisherSnedecor::new(df_model, df_resid)?;
        (fvalue, 1.0 - dist.cdf(fvalue))
    } else {
        (f64::NAN, f64::NAN)
    };
    let llf = -nobs / 2.0 * ((2.0 * PI).ln() + (ssr / nobs).ln() + 1.0);
    let k = p as f64;

    let t_dist = StudentsT::new(0.0, 1.0, df_resid)?;
    let q = t_dist.inverse_cdf(0.975);
    let bse = DVector::from_fn(p, |i, _| (scale * solution.inverse[(i, i)]).sqrt());
    let tvalues = params.component_div(&bse);
    let pvalues = tvalues.map(|t| 2.0 * (1.0 - t_dist.cdf(t.abs())));
    let conf_int = (0..p)
        .map(|i| (params[i] - q * bse[i], params[i] + q * bse[i]))
        .collect();

    Ok(OlsFit {
        dependent: dependent.to_string(),
        names: design.names.clone(),
        params,
        bse,
        tvalues,
        pvalues,
        conf_int,
        fitted,
        resid,
        nobs: n,
        df_model,
        df_resid,
        ssr,
        rsquared,
        rsquared_adj,
        fvalue,
        f_pvalue,
        llf,
        aic: -2.0 * llf + 2.0 * k,
        bic: -2.0 * llf + k * nobs.ln(),
    })
}
