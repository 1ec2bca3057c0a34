use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("The request timed out: {0}")]
    Timeout(String),

    #[error("Failed to connect to the API: {0}")]
    Connection(String),

    #[error("The API answered with HTTP status {0}: {1}")]
    HttpStatus(u16, String),

    #[error("The API reported error {code}: {message}")]
    Upstream { code: i64, message: String },

    #[error("Failed to build or send the HTTP request: {0}")]
    Request(String),

    #[error("Failed to deserialize the API response: {0}")]
    Deserialization(String),

    #[error("Failed to read the snapshot file: {0}")]
    Io(#[from] std::io::Error),
}

impl ApiError {
    /// A short, stable label for log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::Timeout(_) => "timeout",
            ApiError::Connection(_) => "connection",
            ApiError::HttpStatus(..) => "http_status",
            ApiError::Upstream { .. } => "upstream",
            ApiError::Request(_) => "request",
            ApiError::Deserialization(_) => "deserialization",
            ApiError::Io(_) => "io",
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ApiError::Timeout(e.to_string())
        } else if e.is_connect() {
            ApiError::Connection(e.to_string())
        } else if let Some(status) = e.status() {
            ApiError::HttpStatus(status.as_u16(), e.to_string())
        } else if e.is_decode() {
            ApiError::Deserialization(e.to_string())
        } else {
            ApiError::Request(e.to_string())
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        ApiError::Deserialization(e.to_string())
    }
}
