//! Reading gridded fields from NetCDF archives (`air.mon.mean.nc` and friends).
//!
//! The reader needs the system NetCDF library and is compiled only with the
//! `netcdf` feature. Without it, [`open_field`] reports [`ClimateError::NetcdfDisabled`].

use crate::climate::error::ClimateError;
use crate::climate::grid::GridField;
use std::path::Path;

#[cfg(feature = "netcdf")]
pub use reader::open_field;

#[cfg(not(feature = "netcdf"))]
pub fn open_field(path: &Path, _variable: &str) -> Result<GridField, ClimateError> {
    Err(ClimateError::NetcdfDisabled(path.to_path_buf()))
}

#[cfg(feature = "netcdf")]
mod reader {
    use super::*;
    use crate::climate::time_units::decode_cf_times;
    use ::netcdf::{AttributeValue, Variable};
    use log::info;

    const LON: &str = "lon";
    const LAT: &str = "lat";
    const TIME: &str = "time";
    const LEVEL: &str = "level";

    /// Opens `variable` from the NetCDF file at `path`.
    ///
    /// The variable must be laid out as `(time, [level], lat, lon)`. CF packing
    /// (`scale_factor`, `add_offset`) is applied and fill values become NaN.
    pub fn open_field(path: &Path, variable: &str) -> Result<GridField, ClimateError> {
        let file = ::netcdf::open(path)
            .map_err(|e| ClimateError::NetcdfOpen(path.to_path_buf(), e))?;
        let var = file
            .variable(variable)
            .ok_or_else(|| ClimateError::MissingVariable {
                path: path.to_path_buf(),
                variable: variable.to_string(),
            })?;

        let dims: Vec<String> = var.dimensions().iter().map(|d| d.name()).collect();
        let has_level = match dims.iter().map(String::as_str).collect::<Vec<_>>().as_slice() {
            [TIME, LAT, LON] => false,
            [TIME, LEVEL, LAT, LON] => true,
            _ => {
                return Err(ClimateError::UnexpectedDimensions {
                    variable: variable.to_string(),
                    found: dims,
                })
            }
        };

        let lons = read_values(path, &coordinate(&file, path, LON)?)?;
        let lats = read_values(path, &coordinate(&file, path, LAT)?)?;
        let time_var = coordinate(&file, path, TIME)?;
        let raw_times = read_values(path, &time_var)?;
        let units = string_attribute(&time_var, "units")
            .ok_or_else(|| ClimateError::InvalidTimeUnits(String::new()))?;
        let times = decode_cf_times(&raw_times, &units)?;
        let levels = if has_level {
            Some(read_values(path, &coordinate(&file, path, LEVEL)?)?)
        } else {
            None
        };

        let scale = numeric_attribute(&var, "scale_factor").unwrap_or(1.0);
        let offset = numeric_attribute(&var, "add_offset").unwrap_or(0.0);
        let fill = numeric_attribute(&var, "_FillValue");
        let missing = numeric_attribute(&var, "missing_value");
        let values: Vec<f64> = read_values(path, &var)?
            .into_iter()
            .map(|raw| {
                if Some(raw) == fill || Some(raw) == missing {
                    f64::NAN
                } else {
                    raw * scale + offset
                }
            })
            .collect();

        info!(
            "Read '{}' from {}: {} times, {} levels, {}x{} grid",
            variable,
            path.display(),
            times.len(),
            levels.as_ref().map_or(0, Vec::len),
            lats.len(),
            lons.len()
        );
        GridField::from_flat(variable, times, levels, lats, lons, values)
    }

    fn coordinate<'f>(
        file: &'f ::netcdf::File,
        path: &Path,
        name: &str,
    ) -> Result<Variable<'f>, ClimateError> {
        file.variable(name).ok_or_else(|| ClimateError::MissingVariable {
            path: path.to_path_buf(),
            variable: name.to_string(),
        })
    }

    fn read_values(path: &Path, var: &Variable<'_>) -> Result<Vec<f64>, ClimateError> {
        var.get_values::<f64, _>(..)
            .map_err(|e| ClimateError::NetcdfRead {
                path: path.to_path_buf(),
                variable: var.name(),
                source: e,
            })
    }

    fn numeric_attribute(var: &Variable<'_>, name: &str) -> Option<f64> {
        match var.attribute_value(name)?.ok()? {
            AttributeValue::Double(v) => Some(v),
            AttributeValue::Float(v) => Some(f64::from(v)),
            AttributeValue::Short(v) => Some(f64::from(v)),
            AttributeValue::Int(v) => Some(f64::from(v)),
            AttributeValue::Doubles(v) => v.first().copied(),
            AttributeValue::Floats(v) => v.first().copied().map(f64::from),
            _ => None,
        }
    }

    fn string_attribute(var: &Variable<'_>, name: &str) -> Option<String> {
        match var.attribute_value(name)?.ok()? {
            AttributeValue::Str(s) => Some(s),
            _ => None,
        }
    }
}
