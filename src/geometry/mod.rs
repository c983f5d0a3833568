pub mod centroids;
pub mod error;
