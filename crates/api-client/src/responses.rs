use crate::error::ApiError;
use core_types::AssetRecord;
use serde::Deserialize;

/// The `status` block CoinMarketCap attaches to every response, successful or not.
#[derive(Debug, Clone, Deserialize)]
pub struct ResponseStatus {
    #[serde(default)]
    pub timestamp: Option<String>,
    pub error_code: i64,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub credit_count: Option<u32>,
}

/// The full response of `GET /v1/cryptocurrency/listings/latest`.
#[derive(Debug, Clone, Deserialize)]
pub struct ListingEnvelope {
    pub status: ResponseStatus,
    // Absent when the request was rejected.
    #[serde(default)]
    pub data: Vec<AssetRecord>,
}

impl ListingEnvelope {
    /// Unwraps the asset list, turning a non-zero `error_code` into an error.
    pub fn into_data(self) -> Result<Vec<AssetRecord>, ApiError> {
        if self.status.error_code == 0 {
            Ok(self.data)
        } else {
            Err(ApiError::Upstream {
                code: self.status.error_code,
                message: self
                    .status
                    .error_message
                    .unwrap_or_else(|| "no error message".to_string()),
            })
        }
    }
}

/// Decodes a listing response body received with the given HTTP status.
///
/// The envelope's own `error_code` wins over the HTTP status because it
/// carries the more precise message; a failed status with an undecodable
/// body is reported as `HttpStatus`.
pub fn decode_listing(status: u16, body: &str) -> Result<Vec<AssetRecord>, ApiError> {
    match serde_json::from_str::<ListingEnvelope>(body) {
        Ok(envelope) => {
            let assets = envelope.into_data()?;
            if (200..300).contains(&status) {
                Ok(assets)
            } else {
                Err(ApiError::HttpStatus(status, truncate(body)))
            }
        }
        Err(e) if (200..300).contains(&status) => Err(ApiError::Deserialization(e.to_string())),
        Err(_) => Err(ApiError::HttpStatus(status, truncate(body))),
    }
}

fn truncate(body: &str) -> String {
    body.chars().take(200).collect()
}
