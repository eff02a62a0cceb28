//! AWS-backed implementations of the service traits

use crate::backend::{CatalogService, ObjectStore, QueryRequest, QueryService};
use crate::catalog::TableDefinition;
use crate::error::{LakeError, Result};
use aws_config::{BehaviorVersion, Region};
use aws_sdk_athena::types::{QueryExecutionContext, ResultConfiguration};
use aws_sdk_glue::types::{Column, SerDeInfo, StorageDescriptor, TableInput};
use aws_sdk_s3::primitives::ByteStream;
use tracing::debug;

/// Clients built from one shared SDK configuration
pub struct AwsClients {
    pub s3: S3ObjectStore,
    pub glue: GlueCatalog,
    pub athena: AthenaQueryService,
}

impl AwsClients {
    /// Resolve credentials from the default provider chain for `region`
    pub async fn connect(region: &str) -> Self {
        let shared = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(region.to_string()))
            .load()
            .await;
        debug!("AWS clients configured for region {}", region);

        Self {
            s3: S3ObjectStore { client: aws_sdk_s3::Client::new(&shared) },
            glue: GlueCatalog { client: aws_sdk_glue::Client::new(&shared) },
            athena: AthenaQueryService { client: aws_sdk_athena::Client::new(&shared) },
        }
    }
}

pub struct S3ObjectStore {
    client: aws_sdk_s3::Client,
}

#[async_trait::async_trait]
impl ObjectStore for S3ObjectStore {
    async fn put_object(&self, bucket: &str, key: &str, body: Vec<u8>) -> Result<()> {
        self.client
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(ByteStream::from(body))
            .send()
            .await
            .map_err(|e| LakeError::storage(aws_sdk_s3::error::DisplayErrorContext(&e).to_string()))?;
        Ok(())
    }
}

pub struct GlueCatalog {
    client: aws_sdk_glue::Client,
}

impl GlueCatalog {
    fn table_input(table: &TableDefinition) -> Result<TableInput> {
        let columns = table
            .columns
            .iter()
            .map(|column| {
                Column::builder()
                    .name(&column.name)
                    .r#type(column.column_type.as_str())
                    .build()
                    .map_err(|e| LakeError::catalog(e.to_string()))
            })
            .collect::<Result<Vec<_>>>()?;

        let storage = StorageDescriptor::builder()
            .set_columns(Some(columns))
            .location(&table.location)
            .input_format(&table.input_format)
            .output_format(&table.output_format)
            .serde_info(
                SerDeInfo::builder().serialization_library(&table.serialization_library).build(),
            )
            .build();

        TableInput::builder()
            .name(&table.name)
            .storage_descriptor(storage)
            .table_type(&table.table_type)
            .build()
            .map_err(|e| LakeError::catalog(e.to_string()))
    }
}

#[async_trait::async_trait]
impl CatalogService for GlueCatalog {
    async fn create_table(&self, database: &str, table: &TableDefinition) -> Result<()> {
        let input = Self::table_input(table)?;

        match self.client.create_table().database_name(database).table_input(input).send().await {
            Ok(_) => Ok(()),
            Err(e) => {
                let already_exists =
                    e.as_service_error().map(|se| se.is_already_exists_exception()).unwrap_or(false);
                let message = aws_sdk_glue::error::DisplayErrorContext(&e).to_string();
                if already_exists {
                    Err(LakeError::already_exists(message))
                } else {
                    Err(LakeError::catalog(message))
                }
            }
        }
    }
}

pub struct AthenaQueryService {
    client: aws_sdk_athena::Client,
}

#[async_trait::async_trait]
impl QueryService for AthenaQueryService {
    async fn start_query_execution(&self, request: &QueryRequest) -> Result<String> {
        let output = self
            .client
            .start_query_execution()
            .query_string(&request.query)
            .query_execution_context(
                QueryExecutionContext::builder().database(&request.database).build(),
            )
            .result_configuration(
                ResultConfiguration::builder().output_location(&request.output_location).build(),
            )
            .send()
            .await
            .map_err(|e| LakeError::query(aws_sdk_athena::error::DisplayErrorContext(&e).to_string()))?;

        Ok(output.query_execution_id().unwrap_or_default().to_string())
    }
}
