use crate::error::{LakeError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Object key the raw player data is written to
pub const RAW_DATA_KEY: &str = "nba/raw-data/nba_player_data.jsonl";

/// Prefix the external table reads from
pub const RAW_DATA_PREFIX: &str = "nba/raw-data/";

/// Prefix under the bucket where Athena writes query results
pub const ATHENA_RESULTS_PREFIX: &str = "athena-results/";

/// Configuration for the data lake setup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LakeConfig {
    /// AWS configuration
    pub aws: AwsConfig,

    /// SportsDataIO API configuration
    pub sportsdataio: SportsDataIOConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AwsConfig {
    /// AWS region for all three service clients
    pub region: String,

    /// Bucket holding raw data and Athena results
    pub bucket: Option<String>,

    /// Glue database the table is registered in
    pub glue_database: Option<String>,
}

#[derive(Clone, Serialize, Deserialize)]
pub struct SportsDataIOConfig {
    /// Full URL of the players endpoint
    pub endpoint: Option<String>,

    /// Subscription key sent as `Ocp-Apim-Subscription-Key`
    pub api_key: Option<String>,

    /// Request timeout in seconds (client default when unset)
    pub request_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Log format (json, pretty, compact)
    pub format: String,
}

impl Default for LakeConfig {
    fn default() -> Self {
        Self {
            aws: AwsConfig {
                region: "us-east-1".to_string(),
                bucket: None,
                glue_database: None,
            },
            sportsdataio: SportsDataIOConfig {
                endpoint: None,
                api_key: None,
                request_timeout_secs: None,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                format: "compact".to_string(),
            },
        }
    }
}

// The API key must never end up in logs.
impl std::fmt::Debug for SportsDataIOConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SportsDataIOConfig")
            .field("endpoint", &self.endpoint)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

impl LakeConfig {
    /// Load configuration from environment variables (and `.env` if present)
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build configuration from an arbitrary variable lookup
    ///
    /// Absent values are left unset rather than rejected; each step reports
    /// the variable it needed when it runs.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(region) = non_empty("AWS_REGION") {
            config.aws.region = region;
        }
        config.aws.bucket = non_empty("S3_BUCKET_NAME");
        config.aws.glue_database = non_empty("GLUE_DB_NAME");

        config.sportsdataio.api_key = non_empty("SPORTS_DATA_API_KEY");
        config.sportsdataio.endpoint = non_empty("NBA_ENDPOINT");
        config.sportsdataio.request_timeout_secs =
            non_empty("NBA_REQUEST_TIMEOUT_SECS").and_then(|v| v.parse().ok());

        if let Some(level) = non_empty("NBA_LAKE_LOG_LEVEL") {
            config.logging.level = level;
        }
        if let Some(format) = non_empty("NBA_LAKE_LOG_FORMAT") {
            config.logging.format = format;
        }

        config
    }

    /// Bucket name, or the error naming the missing variable
    pub fn bucket(&self) -> Result<&str> {
        self.aws.bucket.as_deref().ok_or(LakeError::MissingConfig("S3_BUCKET_NAME"))
    }

    /// Glue database name, or the error naming the missing variable
    pub fn glue_database(&self) -> Result<&str> {
        self.aws.glue_database.as_deref().ok_or(LakeError::MissingConfig("GLUE_DB_NAME"))
    }

    /// `s3://<bucket>/nba/raw-data/`
    pub fn raw_data_location(&self) -> Result<String> {
        Ok(format!("s3://{}/{}", self.bucket()?, RAW_DATA_PREFIX))
    }

    /// `s3://<bucket>/athena-results/`
    pub fn athena_output_location(&self) -> Result<String> {
        Ok(format!("s3://{}/{}", self.bucket()?, ATHENA_RESULTS_PREFIX))
    }
}

impl SportsDataIOConfig {
    pub fn endpoint(&self) -> Result<&str> {
        self.endpoint.as_deref().ok_or(LakeError::MissingConfig("NBA_ENDPOINT"))
    }

    pub fn api_key(&self) -> Result<&str> {
        self.api_key.as_deref().ok_or(LakeError::MissingConfig("SPORTS_DATA_API_KEY"))
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}
