//! Typed view over rows of the merged health + weather table.

use crate::dataset::error::DatasetError;
use crate::types::weather_variable::WeatherVariable;
use polars::prelude::*;

/// Metric label selecting age-standardised rates in the health dataset.
pub const RATE_METRIC: &str = "Rate";

/// One row of `complete_dataset_with_weather.csv`.
///
/// Every field is optional: the health dataset is externally supplied, and weather
/// columns are null wherever the left join found no seasonal aggregate.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MergedRecord {
    pub iso_a3: Option<String>,
    pub year: Option<i64>,
    pub season: Option<String>,
    pub cause: Option<String>,
    pub metric: Option<String>,
    pub val: Option<f64>,
    pub gdp_per_capita: Option<f64>,
    pub haq_index: Option<f64>,
    pub air_c: Option<f64>,
    pub slp_hpa: Option<f64>,
    pub shum_kgkg: Option<f64>,
}

impl MergedRecord {
    pub fn weather(&self, variable: WeatherVariable) -> Option<f64> {
        match variable {
            WeatherVariable::Temperature => self.air_c,
            WeatherVariable::Pressure => self.slp_hpa,
            WeatherVariable::Humidity => self.shum_kgkg,
        }
    }

    /// Reads every row of a merged DataFrame.
    ///
    /// Columns are cast to the expected types first, so integer-valued floats and
    /// numeric-looking strings are accepted. NaN is treated as missing.
    pub fn from_frame(df: &DataFrame) -> Result<Vec<MergedRecord>, DatasetError> {
        let iso_a3 = string_values(df, "iso_a3")?;
        let year = int_values(df, "year")?;
        let season = string_values(df, "season")?;
        let cause = string_values(df, "cause")?;
        let metric = string_values(df, "metric")?;
        let val = float_values(df, "val")?;
        let gdp = float_values(df, "GDP_per_capita")?;
        let haq = float_values(df, "HAQ_index")?;
        let air = float_values(df, WeatherVariable::Temperature.column())?;
        let slp = float_values(df, WeatherVariable::Pressure.column())?;
        let shum = float_values(df, WeatherVariable::Humidity.column())?;

        let records = (0..df.height())
            .map(|i| MergedRecord {
                iso_a3: iso_a3[i].clone(),
                year: year[i],
                season: season[i].clone(),
                cause: cause[i].clone(),
                metric: metric[i].clone(),
                val: val[i],
                gdp_per_capita: gdp[i],
                haq_index: haq[i],
                air_c: air[i],
                slp_hpa: slp[i],
                shum_kgkg: shum[i],
            })
            .collect();
        Ok(records)
    }
}

/// Keeps only the records whose metric is [`RATE_METRIC`].
pub fn rate_records(records: &[MergedRecord]) -> Vec<MergedRecord> {
    records
        .iter()
        .filter(|r| r.metric.as_deref() == Some(RATE_METRIC))
        .cloned()
        .collect()
}

fn typed_column(df: &DataFrame, name: &str, dtype: &DataType) -> Result<Column, DatasetError> {
    let column = df
        .column(name)
        .map_err(|e| DatasetError::ColumnNotFound(name.to_string(), e))?;
    column.cast(dtype).map_err(|e| DatasetError::ColumnType {
        column: name.to_string(),
        source: e,
    })
}

fn string_values(df: &DataFrame, name: &str) -> Result<Vec<Option<String>>, DatasetError> {
    let column = typed_column(df, name, &DataType::String)?;
    let values = column.str().map_err(|e| DatasetError::ColumnType {
        column: name.to_string(),
        source: e,
    })?;
    Ok(values.into_iter().map(|v| v.map(str::to_string)).collect())
}

fn int_values(df: &DataFrame, name: &str) -> Result<Vec<Option<i64>>, DatasetError> {
    let column = typed_column(df, name, &DataType::Int64)?;
    let values = column.i64().map_err(|e| DatasetError::ColumnType {
        column: name.to_string(),
        source: e,
    })?;
    Ok(values.into_iter().collect())
}

fn float_values(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>, DatasetError> {
    let column = typed_column(df, name, &DataType::Float64)?;
    let values = column.f64().map_err(|e| DatasetError::ColumnType {
        column: name.to_string(),
        source: e,
    })?;
    Ok(values
        .into_iter()
        .map(|v| v.filter(|x| !x.is_nan()))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn merged_frame() -> PolarsResult<DataFrame> {
        df!(
            "iso_a3" => [Some("USA"), None],
            "year" => [2000i64, 2001],
            "season" => ["DJF", "MAM"],
            "cause" => ["Low back pain", "Migraine"],
            "metric" => ["Rate", "Number"],
            "val" => [Some(10.5), None],
            "GDP_per_capita" => [Some(40000.0), Some(f64::NAN)],
            "HAQ_index" => [80.0, 70.0],
            "air_C" => [Some(1.5), None],
            "slp_hPa" => [Some(1013.25), None],
            "shum_kgkg" => [Some(0.004), None],
        )
    }

    #[test]
    fn test_from_frame_reads_nulls_and_nan_as_missing() -> Result<(), Box<dyn std::error::Error>> {
        let records = MergedRecord::from_frame(&merged_frame()?)?;
        assert_eq!(records.len(), 2);

        assert_eq!(records[0].iso_a3.as_deref(), Some("USA"));
        assert_eq!(records[0].weather(WeatherVariable::Pressure), Some(1013.25));
        assert_eq!(records[1].iso_a3, None);
        assert_eq!(records[1].val, None);
        assert_eq!(records[1].gdp_per_capita, None);
        assert_eq!(records[1].weather(WeatherVariable::Temperature), None);
        Ok(())
    }

    #[test]
    fn test_rate_records_filters_metric() -> Result<(), Box<dyn std::error::Error>> {
        let records = MergedRecord::from_frame(&merged_frame()?)?;
        let rates = rate_records(&records);
        assert_eq!(rates.len(), 1);
        assert_eq!(rates[0].cause.as_deref(), Some("Low back pain"));
        Ok(())
    }

    #[test]
    fn test_missing_weather_column_is_an_error() -> Result<(), Box<dyn std::error::Error>> {
        let df = merged_frame()?.drop("shum_kgkg")?;
        let result = MergedRecord::from_frame(&df);
        assert!(matches!(result, Err(DatasetError::ColumnNotFound(ref c, _)) if c == "shum_kgkg"));
        Ok(())
    }
}
