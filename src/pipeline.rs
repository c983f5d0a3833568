//! The four run-to-completion stages and the full run.
//!
//! Each stage reads its inputs from disk and writes its outputs back, so stages can
//! be invoked independently in sequence.

use crate::climate::netcdf::open_field;
use crate::climate::sampler::{load_weather_timeseries, ClimateFields};
use crate::config::PipelineConfig;
use crate::dataset::io::{read_csv, write_csv};
use crate::error::PipelineError;
use crate::geometry::centroids::load_country_centroids;
use crate::merge::merger::merge_weather_with_health;
use crate::models::mixed::MixedLmFit;
use crate::models::runner::{run_mixed_models, run_residual_analysis, ModelResults, ResidualFit};
use crate::seasonal::aggregate::add_year_season;
use crate::seasonal::seasonal_frame::SeasonalFrame;
use crate::summaries::writer::{save_model_summaries, save_residual_summaries};
use crate::types::centroid::CountryCentroid;
use crate::types::merged_record::MergedRecord;
use crate::types::weather_variable::WeatherVariable;
use log::info;
use polars::prelude::DataFrame;

/// Stage 1: centroids and NetCDF archives to `seasonal_<var>.csv`.
pub fn process_weather(config: &PipelineConfig) -> Result<Vec<SeasonalFrame>, PipelineError> {
    let centroids = load_country_centroids(&config.shapefile_path())?;
    info!("Loaded {} country centroids", centroids.len());

    let open = |variable: WeatherVariable| {
        open_field(&config.archive_path(variable), variable.source_variable())
    };
    let fields = ClimateFields {
        air: open(WeatherVariable::Temperature)?,
        slp: open(WeatherVariable::Pressure)?,
        shum: open(WeatherVariable::Humidity)?,
    };
    process_weather_fields(config, &fields, &centroids)
}

/// Samples already-loaded fields, aggregates to seasons and writes the seasonal CSVs.
pub fn process_weather_fields(
    config: &PipelineConfig,
    fields: &ClimateFields,
    centroids: &[CountryCentroid],
) -> Result<Vec<SeasonalFrame>, PipelineError> {
    let series = load_weather_timeseries(fields, centroids)?;
    let mut seasonal = Vec::with_capacity(WeatherVariable::ALL.len());
    for variable in WeatherVariable::ALL {
        let mut frame = add_year_season(series.get(variable), variable.column())?;
        let path = config.seasonal_path(variable);
        write_csv(&mut frame, &path)?;
        info!("Saved {} seasonal rows to {}", frame.height(), path.display());
        seasonal.push(SeasonalFrame::new(variable, frame));
    }
    Ok(seasonal)
}

/// Reads the seasonal table of `variable` written by [`process_weather`].
pub fn load_seasonal(
    config: &PipelineConfig,
    variable: WeatherVariable,
) -> Result<SeasonalFrame, PipelineError> {
    let frame = read_csv(&config.seasonal_path(variable))?;
    Ok(SeasonalFrame::new(variable, frame))
}

/// Stage 2: left-joins the seasonal tables onto the health dataset.
pub fn merge_all_data(config: &PipelineConfig) -> Result<DataFrame, PipelineError> {
    let health = read_csv(&config.health_path())?;
    let air = load_seasonal(config, WeatherVariable::Temperature)?;
    let slp = load_seasonal(config, WeatherVariable::Pressure)?;
    let shum = load_seasonal(config, WeatherVariable::Humidity)?;

    let mut merged = merge_weather_with_health(&health, &air, &slp, &shum)?;
    let path = config.merged_path();
    write_csv(&mut merged, &path)?;
    info!("Saved merged dataset ({} rows) to {}", merged.height(), path.display());
    Ok(merged)
}

pub fn load_merged_records(config: &PipelineConfig) -> Result<Vec<MergedRecord>, PipelineError> {
    let merged = read_csv(&config.merged_path())?;
    Ok(MergedRecord::from_frame(&merged)?)
}

/// Stage 3: mixed-effects models and their summaries.
pub fn run_mixed_stage(
    config: &PipelineConfig,
) -> Result<ModelResults<MixedLmFit>, PipelineError> {
    let records = load_merged_records(config)?;
    let results = run_mixed_models(&records, &WeatherVariable::ALL)?;
    save_model_summaries(&results, &config.model_summaries_dir())?;
    Ok(results)
}

/// Stage 4: residual analysis and its summaries.
pub fn run_residual_stage(
    config: &PipelineConfig,
) -> Result<ModelResults<ResidualFit>, PipelineError> {
    let records = load_merged_records(config)?;
    let results = run_residual_analysis(&records, &WeatherVariable::ALL)?;
    save_residual_summaries(&results, &config.residual_results_dir())?;
    Ok(results)
}

/// Runs every stage in order.
pub fn run_all(config: &PipelineConfig) -> Result<(), PipelineError> {
    process_weather(config)?;
    merge_all_data(config)?;
    let mixed = run_mixed_stage(config)?;
    let residual = run_residual_stage(config)?;
    info!(
        "Pipeline finished: {} mixed models, {} residual analyses",
        mixed.len(),
        residual.len()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::climate::grid::GridField;
    use chrono::NaiveDate;
    use ndarray::Array3;
    use polars::prelude::{col, lit};
    use tempfile::tempdir;

    fn monthly_field(name: &str, base: f64) -> GridField {
        let times = (1..=12)
            .map(|m| {
                NaiveDate::from_ymd_opt(2000, m, 1)
                    .and_then(|d| d.and_hms_opt(0, 0, 0))
                    .unwrap()
            })
            .collect::<Vec<_>>();
        let values = Array3::from_shape_fn((12, 2, 2), |(t, y, x)| {
            base + t as f64 + 10.0 * y as f64 + 100.0 * x as f64
        });
        GridField::surface(name, times, vec![0.0, 10.0], vec![0.0, 10.0], values)
    }

    #[test]
    fn test_process_weather_fields_writes_seasonal_tables() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let config = PipelineConfig::builder()
            .processed_dir(dir.path().join("processed"))
            .build();
        let fields = ClimateFields {
            air: monthly_field("air", 0.0),
            slp: monthly_field("slp", 100_000.0),
            shum: monthly_field("shum", 0.0),
        };
        let centroids = vec![
            CountryCentroid::new(Some("AAA".into()), 1.0, 1.0),
            CountryCentroid::new(Some("BBB".into()), 9.0, 9.0),
        ];

        let seasonal = process_weather_fields(&config, &fields, &centroids)?;
        assert_eq!(seasonal.len(), 3);
        // two countries, one year, four seasons
        assert!(seasonal.iter().all(|s| s.height() == 8));
        for variable in WeatherVariable::ALL {
            assert!(config.seasonal_path(variable).is_file());
        }

        let slp = load_seasonal(&config, WeatherVariable::Pressure)?;
        let jja = slp
            .filter(col("iso_a3").eq(lit("AAA")).and(col("season").eq(lit("JJA"))))
            .collect()?;
        // months 6..8 are time indices 5..7, mean 6 Pa above base
        let value = jja.column("slp_hPa")?.f64()?.get(0).ok_or("missing JJA mean")?;
        assert!((value - 1000.06).abs() < 1e-9);
        Ok(())
    }

    #[test]
    fn test_missing_health_file_is_fatal() {
        let dir = tempdir().unwrap();
        let config = PipelineConfig::builder()
            .raw_dir(dir.path())
            .processed_dir(dir.path())
            .build();
        assert!(matches!(
            merge_all_data(&config),
            Err(PipelineError::Dataset(_))
        ));
    }
}
