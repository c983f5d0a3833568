use polars::error::PolarsError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClimateError {
    #[cfg(feature = "netcdf")]
    #[error("Failed to open NetCDF file '{0}'")]
    NetcdfOpen(PathBuf, #[source] ::netcdf::Error),

    #[cfg(feature = "netcdf")]
    #[error("Failed to read variable '{variable}' from '{path}'")]
    NetcdfRead {
        path: PathBuf,
        variable: String,
        #[source]
        source: ::netcdf::Error,
    },

    #[error("Cannot read '{0}': built without the `netcdf` feature")]
    NetcdfDisabled(PathBuf),

    #[error("Variable '{variable}' not found in '{path}'")]
    MissingVariable { path: PathBuf, variable: String },

    #[error("Variable '{variable}' has unsupported dimensions {found:?}, expected (time, [level], lat, lon)")]
    UnexpectedDimensions { variable: String, found: Vec<String> },

    #[error("Values of field '{field}' do not match its coordinate lengths")]
    ShapeMismatch {
        field: String,
        #[source]
        source: ndarray::ShapeError,
    },

    #[error("Field '{field}' has no level {level}")]
    LevelNotFound { field: String, level: f64 },

    #[error("Field '{0}' still has a level dimension; select a level before sampling")]
    LevelNotSelected(String),

    #[error("Field '{0}' has an empty longitude or latitude axis")]
    EmptyGrid(String),

    #[error("Cannot sample field '{field}' at non-finite coordinates ({lon}, {lat})")]
    NonFiniteCoordinate { field: String, lon: f64, lat: f64 },

    #[error("Unsupported time units '{0}'")]
    InvalidTimeUnits(String),

    #[error("Time offset {value} in units '{units}' is out of range")]
    TimeOutOfRange { units: String, value: f64 },

    #[error("Failed building observation frame")]
    Frame(#[from] PolarsError),
}
