use crate::climate::error::ClimateError;
use crate::dataset::error::DatasetError;
use crate::geometry::error::GeometryError;
use crate::merge::error::MergeError;
use crate::models::error::ModelError;
use crate::summaries::error::SummaryError;
use polars::error::PolarsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Climate(#[from] ClimateError),

    #[error(transparent)]
    Dataset(#[from] DatasetError),

    #[error(transparent)]
    Merge(#[from] MergeError),

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    Summary(#[from] SummaryError),

    #[error("DataFrame operation failed")]
    Frame(#[from] PolarsError),
}
