use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("Failed to open shapefile '{0}'")]
    ShapefileOpen(PathBuf, #[source] shapefile::Error),

    #[error("Failed to read record {index} of shapefile '{path}'")]
    ShapefileRecord {
        path: PathBuf,
        index: usize,
        #[source]
        source: shapefile::Error,
    },

    #[error("Failed to build centroid frame")]
    Frame(#[from] polars::error::PolarsError),
}
