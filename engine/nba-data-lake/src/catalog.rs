//! External table registration and query-service setup

use crate::backend::{CatalogService, QueryRequest, QueryService};
use crate::config::LakeConfig;
use crate::error::Result;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use tracing::info;

pub const PLAYERS_TABLE: &str = "nba_players";
pub const ANALYTICS_DATABASE: &str = "nba_analytics";

pub const TEXT_INPUT_FORMAT: &str = "org.apache.hadoop.mapred.TextInputFormat";
pub const TEXT_OUTPUT_FORMAT: &str = "org.apache.hadoop.hive.ql.io.HiveIgnoreKeyTextOutputFormat";
pub const JSON_SERDE: &str = "org.openx.data.jsonserde.JsonSerDe";
pub const EXTERNAL_TABLE: &str = "EXTERNAL_TABLE";

/// Hive column types used by the players table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ColumnType {
    Int,
    String,
}

impl ColumnType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnType::Int => "int",
            ColumnType::String => "string",
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Column {
    pub name: String,
    pub column_type: ColumnType,
}

impl Column {
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self { name: name.into(), column_type }
    }
}

/// Schema-on-read table bound to a storage location
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableDefinition {
    pub name: String,
    pub columns: Vec<Column>,
    pub location: String,
    pub input_format: String,
    pub output_format: String,
    pub serialization_library: String,
    pub table_type: String,
}

impl TableDefinition {
    /// The `nba_players` table over `location`
    ///
    /// The column list mirrors the fields of [`crate::models::PlayerRecord`]
    /// by convention only; nothing checks the uploaded data against it.
    pub fn nba_players(location: impl Into<String>) -> Self {
        Self {
            name: PLAYERS_TABLE.to_string(),
            columns: vec![
                Column::new("PlayerID", ColumnType::Int),
                Column::new("FirstName", ColumnType::String),
                Column::new("LastName", ColumnType::String),
                Column::new("Team", ColumnType::String),
                Column::new("Position", ColumnType::String),
                Column::new("Points", ColumnType::Int),
            ],
            location: location.into(),
            input_format: TEXT_INPUT_FORMAT.to_string(),
            output_format: TEXT_OUTPUT_FORMAT.to_string(),
            serialization_library: JSON_SERDE.to_string(),
            table_type: EXTERNAL_TABLE.to_string(),
        }
    }
}

/// Registers the players table and prepares the query service
pub struct CatalogConfigurator {
    config: LakeConfig,
    catalog: Arc<dyn CatalogService>,
    query: Arc<dyn QueryService>,
}

impl CatalogConfigurator {
    pub fn new(
        config: LakeConfig,
        catalog: Arc<dyn CatalogService>,
        query: Arc<dyn QueryService>,
    ) -> Self {
        Self { config, catalog, query }
    }

    /// Create the external `nba_players` table in the Glue database
    pub async fn register_table(&self) -> Result<TableDefinition> {
        info!("Creating AWS Glue table...");

        let database = self.config.glue_database()?;
        let table = TableDefinition::nba_players(self.config.raw_data_location()?);
        self.catalog.create_table(database, &table).await?;

        info!("Glue table created: {}", table.name);
        Ok(table)
    }

    /// Ensure the analytics database exists, with results under the bucket's
    /// `athena-results/` prefix; returns the query execution id
    pub async fn configure_query_service(&self) -> Result<String> {
        info!("Setting Athena output configuration...");

        let request = QueryRequest {
            query: format!("CREATE DATABASE IF NOT EXISTS {}", ANALYTICS_DATABASE),
            database: self.config.glue_database()?.to_string(),
            output_location: self.config.athena_output_location()?,
        };
        let execution_id = self.query.start_query_execution(&request).await?;

        info!("Athena database '{}' configured.", ANALYTICS_DATABASE);
        Ok(execution_id)
    }
}
