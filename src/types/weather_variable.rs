//! The three climate variables carried through the pipeline and their fixed naming.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A gridded climate variable sampled at country centroids.
///
/// Each variable knows the name of its source array in the NetCDF archive, the
/// column it occupies in seasonal and merged tables, and the human-readable label
/// used for model results and summary file names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum WeatherVariable {
    /// Air temperature. Taken in its source unit; conversion to Celsius is assumed to
    /// have happened upstream.
    Temperature,
    /// Sea-level pressure, converted from Pa to hPa during sampling.
    Pressure,
    /// Specific humidity in kg/kg.
    Humidity,
}

impl WeatherVariable {
    pub const ALL: [WeatherVariable; 3] = [
        WeatherVariable::Temperature,
        WeatherVariable::Pressure,
        WeatherVariable::Humidity,
    ];

    pub fn label(self) -> &'static str {
        match self {
            WeatherVariable::Temperature => "Temperature (C)",
            WeatherVariable::Pressure => "Sea-level pressure (hPa)",
            WeatherVariable::Humidity => "Specific humidity (kg/kg)",
        }
    }

    /// Column name in the seasonal and merged tables.
    pub fn column(self) -> &'static str {
        match self {
            WeatherVariable::Temperature => "air_C",
            WeatherVariable::Pressure => "slp_hPa",
            WeatherVariable::Humidity => "shum_kgkg",
        }
    }

    /// Name of the data variable inside the NetCDF archive.
    pub fn source_variable(self) -> &'static str {
        match self {
            WeatherVariable::Temperature => "air",
            WeatherVariable::Pressure => "slp",
            WeatherVariable::Humidity => "shum",
        }
    }

    /// Raw grid values are divided by this during sampling.
    pub fn unit_divisor(self) -> f64 {
        match self {
            WeatherVariable::Pressure => 100.0,
            WeatherVariable::Temperature | WeatherVariable::Humidity => 1.0,
        }
    }

    pub fn archive_file_name(self) -> String {
        format!("{}.mon.mean.nc", self.source_variable())
    }

    pub fn seasonal_file_name(self) -> String {
        format!("seasonal_{}.csv", self.source_variable())
    }
}

impl fmt::Display for WeatherVariable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
