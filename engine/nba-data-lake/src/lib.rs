//! NBA Data Lake Setup
//!
//! Pulls NBA player data from SportsDataIO, lands it in S3 as line-delimited
//! JSON, registers a Glue external table over it and points Athena's query
//! results at the same bucket. One pass, run from the `nba-data-lake-setup`
//! binary.

pub mod aws;
pub mod backend;
pub mod catalog;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod jsonl;
pub mod logging;
pub mod memory;
pub mod models;
pub mod pipeline;
pub mod uploader;

#[cfg(test)]
mod integration_tests;

pub use backend::{CatalogService, LakeServices, ObjectStore, QueryRequest, QueryService};
pub use catalog::{CatalogConfigurator, TableDefinition};
pub use config::LakeConfig;
pub use error::{LakeError, Result};
pub use fetcher::SportsDataIOFetcher;
pub use logging::{initialize_logging_with_config, LogFormat};
pub use models::{Dataset, PlayerRecord, PopulatedDataset};
pub use pipeline::{SetupPipeline, SetupReport, StepOutcome};
pub use uploader::{RawDataUploader, UploadReceipt};
