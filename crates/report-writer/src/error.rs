use thiserror::Error;

#[derive(Error, Debug)]
pub enum WriterError {
    #[error("Failed to access the report file: {0}")]
    Io(#[from] std::io::Error),

    #[error("An error occurred during JSON serialization/deserialization: {0}")]
    Json(#[from] serde_json::Error),
}
