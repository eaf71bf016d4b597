use thiserror::Error;

/// Error type that captures record store and persistence failures.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Invalid backup file: {0}")]
    InvalidDocument(String),
    #[error("Persistence error: {0}")]
    Persistence(String),
}
