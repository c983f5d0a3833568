//! Country-level climate time series sampled at centroid grid points.

use crate::climate::error::ClimateError;
use crate::climate::grid::GridField;
use crate::types::centroid::CountryCentroid;
use crate::types::weather_variable::WeatherVariable;
use log::{debug, info, warn};
use polars::prelude::*;

/// The three gridded fields the pipeline samples.
#[derive(Debug, Clone)]
pub struct ClimateFields {
    pub air: GridField,
    pub slp: GridField,
    pub shum: GridField,
}

impl ClimateFields {
    pub fn get(&self, variable: WeatherVariable) -> &GridField {
        match variable {
            WeatherVariable::Temperature => &self.air,
            WeatherVariable::Pressure => &self.slp,
            WeatherVariable::Humidity => &self.shum,
        }
    }
}

/// Observation frames (`time, <value column>, iso_a3`), one per variable.
#[derive(Debug, Clone)]
pub struct WeatherSeries {
    pub air: DataFrame,
    pub slp: DataFrame,
    pub shum: DataFrame,
}

impl WeatherSeries {
    pub fn get(&self, variable: WeatherVariable) -> &DataFrame {
        match variable {
            WeatherVariable::Temperature => &self.air,
            WeatherVariable::Pressure => &self.slp,
            WeatherVariable::Humidity => &self.shum,
        }
    }
}

/// Samples all three fields at every centroid.
pub fn load_weather_timeseries(
    fields: &ClimateFields,
    centroids: &[CountryCentroid],
) -> Result<WeatherSeries, ClimateError> {
    Ok(WeatherSeries {
        air: sample_field(&fields.air, centroids, WeatherVariable::Temperature)?,
        slp: sample_field(&fields.slp, centroids, WeatherVariable::Pressure)?,
        shum: sample_field(&fields.shum, centroids, WeatherVariable::Humidity)?,
    })
}

/// Extracts the nearest-gridpoint series of `field` for each centroid.
///
/// The surface level is selected first when the field has a vertical dimension.
/// Values are divided by [`WeatherVariable::unit_divisor`]; NaN grid values become
/// nulls. A centroid without finite coordinates (no usable geometry) keeps its rows
/// but every value is null. The result has one row per timestamp per centroid, in centroid order, with
/// columns `time` (datetime), `variable.column()` and `iso_a3`.
pub fn sample_field(
    field: &GridField,
    centroids: &[CountryCentroid],
    variable: WeatherVariable,
) -> Result<DataFrame, ClimateError> {
    let field = field.select_surface()?;
    let divisor = variable.unit_divisor();
    let capacity = field.times.len() * centroids.len();

    let mut times: Vec<i64> = Vec::with_capacity(capacity);
    let mut values: Vec<Option<f64>> = Vec::with_capacity(capacity);
    let mut isos: Vec<Option<&str>> = Vec::with_capacity(capacity);

    for centroid in centroids {
        if !(centroid.lon.is_finite() && centroid.lat.is_finite()) {
            warn!(
                "Centroid {:?} has no finite coordinates; '{}' values will be null",
                centroid.iso_a3, field.name
            );
            for time in &field.times {
                times.push(time.and_utc().timestamp_millis());
                values.push(None);
                isos.push(centroid.iso_a3.as_deref());
            }
            continue;
        }
        let series = field.series_at(centroid.lon, centroid.lat)?;
        debug!(
            "Sampled {} values of '{}' for {:?}",
            series.len(),
            field.name,
            centroid.iso_a3
        );
        for (time, value) in field.times.iter().zip(series) {
            times.push(time.and_utc().timestamp_millis());
            values.push(Some(value / divisor).filter(|v| !v.is_nan()));
            isos.push(centroid.iso_a3.as_deref());
        }
    }

    let time = Series::new("time".into(), times)
        .cast(&DataType::Datetime(TimeUnit::Milliseconds, None))?;
    let df = DataFrame::new(vec![
        time.into_column(),
        Column::new(variable.column().into(), values),
        Column::new("iso_a3".into(), isos),
    ])?;
    info!(
        "Extracted {} '{}' observations for {} centroids",
        df.height(),
        variable.column(),
        centroids.len()
    );
    Ok(df)
}
