use crate::types::weather_variable::WeatherVariable;
use thiserror::Error;

/// Failure of a single model fit.
#[derive(Debug, Error)]
pub enum FitError {
    #[error("{model}: design matrix is singular (collinear or constant regressors)")]
    Singular { model: &'static str },

    #[error("{model}: {observations} observations are not enough for {parameters} parameters")]
    InsufficientObservations {
        model: &'static str,
        observations: usize,
        parameters: usize,
    },

    #[error("{model}: likelihood optimisation did not converge")]
    NonConvergence { model: &'static str },

    #[error("Design column '{name}' has {found} values, expected {expected}")]
    ColumnLength {
        name: String,
        expected: usize,
        found: usize,
    },

    #[error("Invalid reference distribution")]
    Distribution(#[from] statrs::StatsError),
}

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("Fitting '{variable}' for cause '{cause}' failed")]
    Fit {
        variable: WeatherVariable,
        cause: String,
        #[source]
        source: FitError,
    },
}
