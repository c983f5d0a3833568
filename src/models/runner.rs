//! Runs both model families over every (weather variable, cause) pair.

use crate::models::design::Design;
use crate::models::error::{FitError, ModelError};
use crate::models::mixed::{fit_mixed_lm, MixedLmFit};
use crate::models::ols::{fit_ols, OlsFit};
use crate::types::merged_record::{rate_records, MergedRecord};
use crate::types::weather_variable::WeatherVariable;
use log::{debug, info};
use nalgebra::DVector;
use std::collections::BTreeMap;

pub const GROUP_COLUMN: &str = "iso_a3";
pub const RESPONSE_COLUMN: &str = "val";
pub const GDP_COLUMN: &str = "GDP_per_capita";
pub const HAQ_COLUMN: &str = "HAQ_index";

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ResultKey {
    pub variable: WeatherVariable,
    pub cause: String,
}

impl ResultKey {
    pub fn new(variable: WeatherVariable, cause: impl Into<String>) -> Self {
        Self {
            variable,
            cause: cause.into(),
        }
    }
}

pub type ModelResults<T> = BTreeMap<ResultKey, T>;

/// Two-stage fit: socioeconomic base model, then weather on its residuals.
#[derive(Debug, Clone)]
pub struct ResidualFit {
    pub base: OlsFit,
    pub weather: OlsFit,
}

/// Distinct non-null causes in order of first appearance.
pub fn distinct_causes(records: &[MergedRecord]) -> Vec<String> {
    let mut causes: Vec<String> = Vec::new();
    for cause in records.iter().filter_map(|r| r.cause.as_deref()) {
        if !causes.iter().any(|c| c == cause) {
            causes.push(cause.to_string());
        }
    }
    causes
}

/// Records of `cause` with the weather variable and both covariates present.
pub fn complete_cases<'a>(
    records: &'a [MergedRecord],
    cause: &str,
    variable: WeatherVariable,
) -> Vec<&'a MergedRecord> {
    records
        .iter()
        .filter(|r| r.cause.as_deref() == Some(cause))
        .filter(|r| {
            r.weather(variable).is_some() && r.gdp_per_capita.is_some() && r.haq_index.is_some()
        })
        .collect()
}

/// Fits `val ~ C(season) + <weather> + GDP_per_capita + HAQ_index` with a random
/// intercept per country, for every weather variable and cause among the rate rows.
pub fn run_mixed_models(
    records: &[MergedRecord],
    variables: &[WeatherVariable],
) -> Result<ModelResults<MixedLmFit>, ModelError> {
    let rates = rate_records(records);
    let causes = distinct_causes(&rates);
    let mut results = ModelResults::new();

    for &variable in variables {
        for cause in &causes {
            let rows = complete_cases(&rates, cause, variable);
            if rows.is_empty() {
                debug!("No complete rows for '{}' / '{}', skipping", variable, cause);
                continue;
            }
            let fit = fit_mixed_pair(&rows, variable).map_err(|source| ModelError::Fit {
                variable,
                cause: cause.clone(),
                source,
            })?;
            info!(
                "Fitted mixed model for '{}' / '{}' on {} rows",
                variable, cause, fit.nobs
            );
            results.insert(ResultKey::new(variable, cause.clone()), fit);
        }
    }
    Ok(results)
}

/// Fits `val ~ GDP_per_capita + HAQ_index`, then `resid ~ <weather>`, for every
/// weather variable and cause among the rate rows.
pub fn run_residual_analysis(
    records: &[MergedRecord],
    variables: &[WeatherVariable],
) -> Result<ModelResults<ResidualFit>, ModelError> {
    let rates = rate_records(records);
    let causes = distinct_causes(&rates);
    let mut results = ModelResults::new();

    for &variable in variables {
        for cause in &causes {
            let rows = complete_cases(&rates, cause, variable);
            if rows.is_empty() {
                debug!("No complete rows for '{}' / '{}', skipping", variable, cause);
                continue;
            }
            let fit = fit_residual_pair(&rows, variable).map_err(|source| ModelError::Fit {
                variable,
                cause: cause.clone(),
                source,
            })?;
            info!(
                "Fitted residual models for '{}' / '{}' on {} rows",
                variable, cause, fit.base.nobs
            );
            results.insert(ResultKey::new(variable, cause.clone()), fit);
        }
    }
    Ok(results)
}

fn fit_mixed_pair(rows: &[&MergedRecord], variable: WeatherVariable) -> Result<MixedLmFit, FitError> {
    let rows: Vec<&MergedRecord> = rows
        .iter()
        .copied()
        .filter(|r| r.val.is_some() && r.season.is_some() && r.iso_a3.is_some())
        .collect();
    let n = rows.len();
    let seasons: Vec<&str> = rows.iter().filter_map(|r| r.season.as_deref()).collect();
    let groups: Vec<String> = rows.iter().filter_map(|r| r.iso_a3.clone()).collect();

    let design = Design::builder(n)
        .intercept()
        .categorical("season", &seasons)
        .numeric(variable.column(), covariate(&rows, |r| r.weather(variable)))
        .numeric(GDP_COLUMN, covariate(&rows, |r| r.gdp_per_capita))
        .numeric(HAQ_COLUMN, covariate(&rows, |r| r.haq_index))
        .build()?;
    let y = DVector::from_vec(covariate(&rows, |r| r.val));

    fit_mixed_lm(RESPONSE_COLUMN, GROUP_COLUMN, &y, &design, &groups)
}

fn fit_residual_pair(rows: &[&MergedRecord], variable: WeatherVariable) -> Result<ResidualFit, FitError> {
    let rows: Vec<&MergedRecord> = rows.iter().copied().filter(|r| r.val.is_some()).collect();
    let n = rows.len();

    let base_design = Design::builder(n)
        .intercept()
        .numeric(GDP_COLUMN, covariate(&rows, |r| r.gdp_per_capita))
        .numeric(HAQ_COLUMN, covariate(&rows, |r| r.haq_index))
        .build()?;
    let y = DVector::from_vec(covariate(&rows, |r| r.val));
    let base = fit_ols(RESPONSE_COLUMN, &y, &base_design)?;

    let weather_design = Design::builder(n)
        .intercept()
        .numeric(variable.column(), covariate(&rows, |r| r.weather(variable)))
        .build()?;
    let weather = fit_ols("resid", &base.resid, &weather_design)?;

    Ok(ResidualFit { base, weather })
}

// Rows reaching here are complete for the requested field.
fn covariate(rows: &[&MergedRecord], field: impl Fn(&MergedRecord) -> Option<f64>) -> Vec<f64> {
    rows.iter().map(|r| field(r).unwrap_or(f64::NAN)).collect()
}
