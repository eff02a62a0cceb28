//! Service traits the setup steps talk to, and the bundle that wires them

use crate::catalog::TableDefinition;
use crate::config::LakeConfig;
use crate::error::Result;
use crate::memory::{MemoryCatalog, MemoryObjectStore, MemoryQueryService};
use std::sync::Arc;

/// Object storage (S3)
#[async_trait::async_trait]
pub trait ObjectStore: Send + Sync {
    /// Write `body` as the full content of `bucket/key`, replacing any existing object
    async fn put_object(&self, bucket: &str, key: &str, body: Vec<u8>) -> Result<()>;
}

/// Table catalog (Glue)
#[async_trait::async_trait]
pub trait CatalogService: Send + Sync {
    /// Create `table` in `database`
    ///
    /// Returns `LakeError::AlreadyExists` when a table with the same name is
    /// already registered; existing definitions are never updated.
    async fn create_table(&self, database: &str, table: &TableDefinition) -> Result<()>;
}

/// A statement submitted to the query service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryRequest {
    pub query: String,
    /// Database the statement executes against
    pub database: String,
    /// Where results (and the run's metadata) are written
    pub output_location: String,
}

/// Ad-hoc query engine (Athena)
#[async_trait::async_trait]
pub trait QueryService: Send + Sync {
    /// Start executing a statement and return its execution id
    async fn start_query_execution(&self, request: &QueryRequest) -> Result<String>;
}

/// The three service handles the pipeline needs
#[derive(Clone)]
pub struct LakeServices {
    pub store: Arc<dyn ObjectStore>,
    pub catalog: Arc<dyn CatalogService>,
    pub query: Arc<dyn QueryService>,
}

impl LakeServices {
    /// Real AWS clients for the configured region
    pub async fn aws(config: &LakeConfig) -> Self {
        let aws = crate::aws::AwsClients::connect(&config.aws.region).await;
        Self {
            store: Arc::new(aws.s3),
            catalog: Arc::new(aws.glue),
            query: Arc::new(aws.athena),
        }
    }

    /// In-memory backends; nothing leaves the process
    pub fn in_memory() -> (Self, InMemoryHandles) {
        let handles = InMemoryHandles {
            store: Arc::new(MemoryObjectStore::new()),
            catalog: Arc::new(MemoryCatalog::new()),
            query: Arc::new(MemoryQueryService::new()),
        };
        let services = Self {
            store: handles.store.clone(),
            catalog: handles.catalog.clone(),
            query: handles.query.clone(),
        };
        (services, handles)
    }
}

/// Concrete handles to the in-memory backends, for inspecting what was written
#[derive(Clone)]
pub struct InMemoryHandles {
    pub store: Arc<MemoryObjectStore>,
    pub catalog: Arc<MemoryCatalog>,
    pub query: Arc<MemoryQueryService>,
}
