pub mod climate;
pub mod config;
pub mod dataset;
mod error;
pub mod geometry;
pub mod merge;
pub mod models;
pub mod pipeline;
pub mod seasonal;
pub mod summaries;
mod types;

pub use config::PipelineConfig;
pub use error::PipelineError;
pub use pipeline::*;

pub use types::centroid::CountryCentroid;
pub use types::merged_record::{rate_records, MergedRecord, RATE_METRIC};
pub use types::season::{month_to_season, ParseSeasonError, Season};
pub use types::weather_variable::WeatherVariable;

pub use climate::error::ClimateError;
pub use climate::grid::GridField;
pub use climate::sampler::{load_weather_timeseries, ClimateFields, WeatherSeries};
pub use dataset::error::DatasetError;
pub use geometry::centroids::load_country_centroids;
pub use geometry::error::GeometryError;
pub use merge::error::MergeError;
pub use merge::merger::merge_weather_with_health;
pub use models::error::{FitError, ModelError};
pub use models::mixed::MixedLmFit;
pub use models::ols::OlsFit;
pub use models::runner::{run_mixed_models, run_residual_analysis, ModelResults, ResidualFit, ResultKey};
pub use seasonal::aggregate::add_year_season;
pub use seasonal::seasonal_frame::SeasonalFrame;
pub use summaries::error::SummaryError;
pub use summaries::writer::{save_model_summaries, save_residual_summaries, summary_file_name};
