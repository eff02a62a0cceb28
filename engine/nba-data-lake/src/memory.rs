//! In-memory service backends
//!
//! Used by `--dry-run` and by tests. They behave like the AWS services where
//! the setup flow can observe a difference: puts overwrite, a duplicate table
//! name is rejected, and every query start gets a fresh execution id.

use crate::backend::{CatalogService, ObjectStore, QueryRequest, QueryService};
use crate::catalog::TableDefinition;
use crate::error::{LakeError, Result};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Mutex;
use uuid::Uuid;

#[derive(Debug, Default)]
pub struct MemoryObjectStore {
    objects: Mutex<HashMap<(String, String), Vec<u8>>>,
    puts: AtomicUsize,
}

impl MemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current body of `bucket/key`
    pub async fn object(&self, bucket: &str, key: &str) -> Option<Vec<u8>> {
        self.objects.lock().await.get(&(bucket.to_string(), key.to_string())).cloned()
    }

    /// Number of `put_object` calls seen, successful or not
    pub fn put_count(&self) -> usize {
        self.puts.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn put_object(&self, bucket: &str, key: &str, body: Vec<u8>) -> Result<()> {
        self.puts.fetch_add(1, Ordering::SeqCst);
        self.objects.lock().await.insert((bucket.to_string(), key.to_string()), body);
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct MemoryCatalog {
    tables: Mutex<HashMap<(String, String), TableDefinition>>,
    creates: AtomicUsize,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn table(&self, database: &str, name: &str) -> Option<TableDefinition> {
        self.tables.lock().await.get(&(database.to_string(), name.to_string())).cloned()
    }

    pub fn create_calls(&self) -> usize {
        self.creates.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl CatalogService for MemoryCatalog {
    async fn create_table(&self, database: &str, table: &TableDefinition) -> Result<()> {
        self.creates.fetch_add(1, Ordering::SeqCst);

        let mut tables = self.tables.lock().await;
        let id = (database.to_string(), table.name.clone());
        if tables.contains_key(&id) {
            return Err(LakeError::already_exists(format!(
                "Table {} already exists in database {}",
                table.name, database
            )));
        }
        tables.insert(id, table.clone());
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct MemoryQueryService {
    executions: Mutex<Vec<(String, QueryRequest)>>,
}

impl MemoryQueryService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every started execution, oldest first, with its id
    pub async fn executions(&self) -> Vec<(String, QueryRequest)> {
        self.executions.lock().await.clone()
    }
}

#[async_trait::async_trait]
impl QueryService for MemoryQueryService {
    async fn start_query_execution(&self, request: &QueryRequest) -> Result<String> {
        let execution_id = Uuid::new_v4().to_string();
        self.executions.lock().await.push((execution_id.clone(), request.clone()));
        Ok(execution_id)
    }
}
