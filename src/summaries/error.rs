use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SummaryError {
    #[error("Failed to create summary directory '{0}'")]
    DirCreation(PathBuf, #[source] std::io::Error),

    #[error("Failed to write summary file '{0}'")]
    Write(PathBuf, #[source] std::io::Error),
}
