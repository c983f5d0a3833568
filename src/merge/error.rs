use polars::error::PolarsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MergeError {
    #[error("Failed joining '{column}' onto the health dataset")]
    Join {
        column: String,
        #[source]
        source: PolarsError,
    },

    #[error("Health dataset is missing key column '{0}'")]
    MissingKey(String, #[source] PolarsError),

    #[error("Health key column '{column}' cannot be read as an integer year")]
    KeyType {
        column: String,
        #[source]
        source: PolarsError,
    },

    #[error("Merged dataset has {found} rows, expected {expected}; duplicate seasonal keys?")]
    RowCountChanged { expected: usize, found: usize },
}
