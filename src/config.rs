//! Locations of every input, intermediate and output file.

use crate::types::weather_variable::WeatherVariable;
use bon::bon;
use std::path::PathBuf;

pub const DEFAULT_RAW_DIR: &str = "data/raw";
pub const DEFAULT_PROCESSED_DIR: &str = "data/processed";
pub const DEFAULT_RESULTS_DIR: &str = "results";
pub const DEFAULT_SHAPEFILE: &str = "ne_110m_admin_0_countries.shp";
pub const DEFAULT_HEALTH_FILE: &str = "complete_dataset_HAQ_GDP.csv";
pub const DEFAULT_MERGED_FILE: &str = "complete_dataset_with_weather.csv";

const MODEL_SUMMARIES_DIR: &str = "model_summaries";
const RESIDUAL_RESULTS_DIR: &str = "residual_results";

/// Directory layout of one pipeline run.
///
/// Every field has a default matching the relative layout the pipeline has always
/// used, so `PipelineConfig::default()` works from the project root.
///
/// # Example
///
/// ```
/// use climate_pain::{PipelineConfig, WeatherVariable};
/// use std::path::Path;
///
/// let config = PipelineConfig::builder().raw_dir("/tmp/raw").build();
/// assert_eq!(
///     config.archive_path(WeatherVariable::Pressure),
///     Path::new("/tmp/raw/slp.mon.mean.nc")
/// );
/// assert_eq!(config.processed_dir, Path::new("data/processed"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    pub raw_dir: PathBuf,
    pub processed_dir: PathBuf,
    pub results_dir: PathBuf,
    pub shapefile_name: String,
    pub health_file_name: String,
    pub merged_file_name: String,
}

#[bon]
impl PipelineConfig {
    #[builder]
    pub fn new(
        #[builder(default = PathBuf::from(DEFAULT_RAW_DIR), into)] raw_dir: PathBuf,
        #[builder(default = PathBuf::from(DEFAULT_PROCESSED_DIR), into)] processed_dir: PathBuf,
        #[builder(default = PathBuf::from(DEFAULT_RESULTS_DIR), into)] results_dir: PathBuf,
        #[builder(default = DEFAULT_SHAPEFILE.to_string(), into)] shapefile_name: String,
        #[builder(default = DEFAULT_HEALTH_FILE.to_string(), into)] health_file_name: String,
        #[builder(default = DEFAULT_MERGED_FILE.to_string(), into)] merged_file_name: String,
    ) -> Self {
        Self {
            raw_dir,
            processed_dir,
            results_dir,
            shapefile_name,
            health_file_name,
            merged_file_name,
        }
    }

    pub fn shapefile_path(&self) -> PathBuf {
        self.raw_dir.join(&self.shapefile_name)
    }

    pub fn archive_path(&self, variable: WeatherVariable) -> PathBuf {
        self.raw_dir.join(variable.archive_file_name())
    }

    pub fn health_path(&self) -> PathBuf {
        self.raw_dir.join(&self.health_file_name)
    }

    pub fn seasonal_path(&self, variable: WeatherVariable) -> PathBuf {
        self.processed_dir.join(variable.seasonal_file_name())
    }

    pub fn merged_path(&self) -> PathBuf {
        self.processed_dir.join(&self.merged_file_name)
    }

    pub fn model_summaries_dir(&self) -> PathBuf {
        self.results_dir.join(MODEL_SUMMARIES_DIR)
    }

    pub fn residual_results_dir(&self) -> PathBuf {
        self.results_dir.join(RESIDUAL_RESULTS_DIR)
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}
