//! The setup sequence: fetch, upload, register table, configure Athena
//!
//! Every step returns a typed result; this driver turns each one into a
//! logged [`StepOutcome`] and keeps going. Only an empty fetch changes the
//! path, and only by skipping the upload.

use crate::backend::LakeServices;
use crate::catalog::CatalogConfigurator;
use crate::config::LakeConfig;
use crate::error::LakeError;
use crate::fetcher::SportsDataIOFetcher;
use crate::models::Dataset;
use crate::uploader::RawDataUploader;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{error, info, warn};

/// What happened to one step of the run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum StepOutcome {
    Completed(String),
    Skipped(String),
    /// The target was provisioned by an earlier run
    AlreadyExists(String),
    Failed(String),
}

impl StepOutcome {
    fn from_error(err: &LakeError) -> Self {
        if err.is_already_exists() {
            StepOutcome::AlreadyExists(err.to_string())
        } else {
            StepOutcome::Failed(err.to_string())
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, StepOutcome::Failed(_))
    }

    pub fn label(&self) -> &'static str {
        match self {
            StepOutcome::Completed(_) => "completed",
            StepOutcome::Skipped(_) => "skipped",
            StepOutcome::AlreadyExists(_) => "already exists",
            StepOutcome::Failed(_) => "failed",
        }
    }
}

/// Outcome of a full setup run
#[derive(Debug, Clone, Serialize)]
pub struct SetupReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub records_fetched: usize,
    pub fetch: StepOutcome,
    pub upload: StepOutcome,
    pub table: StepOutcome,
    pub query_service: StepOutcome,
}

impl SetupReport {
    pub fn failed_steps(&self) -> usize {
        [&self.fetch, &self.upload, &self.table, &self.query_service]
            .iter()
            .filter(|outcome| outcome.is_failure())
            .count()
    }
}

pub struct SetupPipeline {
    fetcher: SportsDataIOFetcher,
    uploader: RawDataUploader,
    catalog: CatalogConfigurator,
}

impl SetupPipeline {
    pub fn new(config: LakeConfig, fetcher: SportsDataIOFetcher, services: LakeServices) -> Self {
        Self {
            fetcher,
            uploader: RawDataUploader::new(config.clone(), services.store),
            catalog: CatalogConfigurator::new(config, services.catalog, services.query),
        }
    }

    /// Run every step once, in order
    pub async fn run(&self) -> SetupReport {
        let started_at = Utc::now();
        info!("Starting NBA Data Lake setup.");

        let (dataset, fetch) = match self.fetcher.fetch_players().await {
            Ok(dataset) => {
                let outcome = StepOutcome::Completed(format!("{} records", dataset.len()));
                (dataset, outcome)
            }
            Err(e) => {
                error!("Error fetching NBA data: {}", e);
                (Dataset::empty(), StepOutcome::Failed(e.to_string()))
            }
        };
        let records_fetched = dataset.len();

        let upload = match dataset.populated() {
            Some(populated) => match self.uploader.upload(&populated).await {
                Ok(receipt) => StepOutcome::Completed(format!(
                    "s3://{}/{} ({} bytes)",
                    receipt.bucket, receipt.key, receipt.bytes
                )),
                Err(e) => {
                    error!("Error uploading data to S3: {}", e);
                    StepOutcome::from_error(&e)
                }
            },
            None => {
                info!("No data fetched. Skipping upload.");
                StepOutcome::Skipped("no data fetched".to_string())
            }
        };

        let table = match self.catalog.register_table().await {
            Ok(table) => StepOutcome::Completed(format!("{} at {}", table.name, table.location)),
            Err(e) if e.is_already_exists() => {
                warn!("Error creating Glue table: {}", e);
                StepOutcome::from_error(&e)
            }
            Err(e) => {
                error!("Error creating Glue table: {}", e);
                StepOutcome::from_error(&e)
            }
        };

        let query_service = match self.catalog.configure_query_service().await {
            Ok(execution_id) => StepOutcome::Completed(format!("query execution {}", execution_id)),
            Err(e) => {
                error!("Error configuring Athena: {}", e);
                StepOutcome::from_error(&e)
            }
        };

        info!("NBA Data Lake setup complete.");

        SetupReport {
            started_at,
            finished_at: Utc::now(),
            records_fetched,
            fetch,
            upload,
            table,
            query_service,
        }
    }
}
