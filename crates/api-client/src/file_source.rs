use crate::error::ApiError;
use crate::responses::ListingEnvelope;
use crate::MarketDataSource;
use async_trait::async_trait;
use core_types::AssetRecord;
use serde::Deserialize;
use std::path::PathBuf;

/// Serves a snapshot saved to disk, either a full API envelope or a bare `data` array.
#[derive(Debug, Clone)]
pub struct SnapshotFileSource {
    path: PathBuf,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SavedSnapshot {
    Envelope(ListingEnvelope),
    Data(Vec<AssetRecord>),
}

impl SnapshotFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl MarketDataSource for SnapshotFileSource {
    async fn fetch_snapshot(&self) -> Result<Vec<AssetRecord>, ApiError> {
        let text = tokio::fs::read_to_string(&self.path).await?;
        let assets = match serde_json::from_str::<SavedSnapshot>(&text)? {
            SavedSnapshot::Envelope(envelope) => envelope.into_data()?,
            SavedSnapshot::Data(data) => data,
        };
        tracing::info!(path = %self.path.display(), assets = assets.len(), "Loaded saved snapshot.");
        Ok(assets)
    }
}
