use crate::backend::ObjectStore;
use crate::config::{LakeConfig, RAW_DATA_KEY, RAW_DATA_PREFIX};
use crate::error::Result;
use crate::jsonl;
use crate::models::PopulatedDataset;
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

/// Where an upload landed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadReceipt {
    pub bucket: String,
    pub key: String,
    pub bytes: usize,
}

/// Writes the raw player data object
pub struct RawDataUploader {
    config: LakeConfig,
    store: Arc<dyn ObjectStore>,
}

impl RawDataUploader {
    pub fn new(config: LakeConfig, store: Arc<dyn ObjectStore>) -> Self {
        Self { config, store }
    }

    /// Encode `dataset` as line-delimited JSON and replace the raw data object with it
    pub async fn upload(&self, dataset: &PopulatedDataset) -> Result<UploadReceipt> {
        info!("Uploading data to S3 at '{}'...", RAW_DATA_PREFIX);
        let bucket = self.config.bucket()?;

        info!("Converting data to line-delimited JSON format...");
        let body = jsonl::to_line_delimited_json(dataset.records())?;
        let bytes = body.len();

        self.store.put_object(bucket, RAW_DATA_KEY, body.into_bytes()).await?;

        info!("Upload to S3 successful: {}", RAW_DATA_KEY);
        Ok(UploadReceipt { bucket: bucket.to_string(), key: RAW_DATA_KEY.to_string(), bytes })
    }
}
