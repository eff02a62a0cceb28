//! End-to-end runs of the setup pipeline against a mocked SportsDataIO
//! endpoint and the in-memory service backends

use crate::backend::{CatalogService, LakeServices};
use crate::catalog::TableDefinition;
use crate::config::{LakeConfig, RAW_DATA_KEY};
use crate::error::{LakeError, Result};
use crate::fetcher::SportsDataIOFetcher;
use crate::pipeline::{SetupPipeline, StepOutcome};
use serde_json::json;
use std::io;
use std::sync::{Arc, Mutex};
use tracing_subscriber::fmt::MakeWriter;
use wiremock::{
    matchers::{header, method, path},
    Mock, MockServer, ResponseTemplate,
};

const PLAYERS_PATH: &str = "/v3/nba/scores/json/Players";

fn config_for(server: &MockServer) -> LakeConfig {
    let endpoint = format!("{}{}", server.uri(), PLAYERS_PATH);
    LakeConfig::from_lookup(move |name| match name {
        "S3_BUCKET_NAME" => Some("lake-bucket".to_string()),
        "GLUE_DB_NAME" => Some("glue_nba".to_string()),
        "SPORTS_DATA_API_KEY" => Some("test-key".to_string()),
        "NBA_ENDPOINT" => Some(endpoint.clone()),
        _ => None,
    })
}

fn pipeline(config: &LakeConfig, services: LakeServices) -> SetupPipeline {
    let fetcher = SportsDataIOFetcher::new(config.sportsdataio.clone()).unwrap();
    SetupPipeline::new(config.clone(), fetcher, services)
}

async fn mount_players(server: &MockServer, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(PLAYERS_PATH))
        .and(header("Ocp-Apim-Subscription-Key", "test-key"))
        .respond_with(response)
        .mount(server)
        .await;
}

/// Collects formatted log output for assertions
#[derive(Clone, Default)]
struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl LogBuffer {
    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogBuffer {
    type Writer = LogBuffer;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

struct UnavailableCatalog;

#[async_trait::async_trait]
impl CatalogService for UnavailableCatalog {
    async fn create_table(&self, _database: &str, _table: &TableDefinition) -> Result<()> {
        Err(LakeError::catalog("EntityNotFoundException: Database glue_nba not found"))
    }
}

#[tokio::test]
async fn test_full_run_lands_data_and_provisions_catalog() {
    let server = MockServer::start().await;
    mount_players(
        &server,
        ResponseTemplate::new(200).set_body_json(json!([
            {"PlayerID": 1, "FirstName": "A", "LastName": "B", "Team": "X", "Position": "G", "Points": 10}
        ])),
    )
    .await;

    let config = config_for(&server);
    let (services, handles) = LakeServices::in_memory();
    let report = pipeline(&config, services).run().await;

    assert_eq!(report.records_fetched, 1);
    assert!(matches!(report.fetch, StepOutcome::Completed(_)));
    assert!(matches!(report.upload, StepOutcome::Completed(_)));
    assert!(matches!(report.table, StepOutcome::Completed(_)));
    assert!(matches!(report.query_service, StepOutcome::Completed(_)));
    assert_eq!(report.failed_steps(), 0);

    let body = handles.store.object("lake-bucket", RAW_DATA_KEY).await.unwrap();
    assert_eq!(
        String::from_utf8(body).unwrap(),
        r#"{"PlayerID": 1, "FirstName": "A", "LastName": "B", "Team": "X", "Position": "G", "Points": 10}"#
    );
    assert_eq!(handles.store.put_count(), 1);

    let table = handles.catalog.table("glue_nba", "nba_players").await.unwrap();
    assert_eq!(table.location, "s3://lake-bucket/nba/raw-data/");
    assert_eq!(table.columns.len(), 6);

    let executions = handles.query.executions().await;
    assert_eq!(executions.len(), 1);
    assert_eq!(executions[0].1.output_location, "s3://lake-bucket/athena-results/");
}

#[tokio::test]
async fn test_failed_fetch_skips_upload_and_still_configures_catalog() {
    let server = MockServer::start().await;
    mount_players(&server, ResponseTemplate::new(500)).await;

    let logs = LogBuffer::default();
    let subscriber = tracing_subscriber::fmt().with_writer(logs.clone()).with_ansi(false).finish();
    let _guard = tracing::subscriber::set_default(subscriber);

    let config = config_for(&server);
    let (services, handles) = LakeServices::in_memory();
    let report = pipeline(&config, services).run().await;

    assert_eq!(report.records_fetched, 0);
    assert!(report.fetch.is_failure());
    assert!(matches!(report.upload, StepOutcome::Skipped(_)));
    assert_eq!(handles.store.put_count(), 0);

    assert!(matches!(report.table, StepOutcome::Completed(_)));
    assert!(matches!(report.query_service, StepOutcome::Completed(_)));

    let output = logs.contents();
    assert!(output.contains("Error fetching NBA data"), "logs were: {}", output);
    assert!(output.contains("No data fetched. Skipping upload."));
    assert!(output.contains("NBA Data Lake setup complete."));
}

#[tokio::test]
async fn test_empty_feed_is_not_uploaded() {
    let server = MockServer::start().await;
    mount_players(&server, ResponseTemplate::new(200).set_body_json(json!([]))).await;

    let config = config_for(&server);
    let (services, handles) = LakeServices::in_memory();
    let report = pipeline(&config, services).run().await;

    assert!(matches!(report.fetch, StepOutcome::Completed(_)));
    assert!(matches!(report.upload, StepOutcome::Skipped(_)));
    assert_eq!(handles.store.put_count(), 0);
    assert!(handles.store.object("lake-bucket", RAW_DATA_KEY).await.is_none());
}

#[tokio::test]
async fn test_second_run_tolerates_existing_table() {
    let server = MockServer::start().await;
    mount_players(
        &server,
        ResponseTemplate::new(200).set_body_json(json!([{"PlayerID": 7, "Points": 12}])),
    )
    .await;

    let config = config_for(&server);
    let (services, handles) = LakeServices::in_memory();
    let setup = pipeline(&config, services);

    let first = setup.run().await;
    let second = setup.run().await;

    assert!(matches!(first.table, StepOutcome::Completed(_)));
    assert!(matches!(second.table, StepOutcome::AlreadyExists(_)));
    assert_eq!(second.failed_steps(), 0);

    // the data object is replaced, the query is simply issued again
    assert_eq!(handles.store.put_count(), 2);
    assert_eq!(handles.catalog.create_calls(), 2);
    assert_eq!(handles.query.executions().await.len(), 2);
}

#[tokio::test]
async fn test_catalog_failure_does_not_block_query_service() {
    let server = MockServer::start().await;
    mount_players(
        &server,
        ResponseTemplate::new(200).set_body_json(json!([{"PlayerID": 7, "Points": 12}])),
    )
    .await;

    let config = config_for(&server);
    let (mut services, handles) = LakeServices::in_memory();
    services.catalog = Arc::new(UnavailableCatalog);

    let report = pipeline(&config, services).run().await;

    assert!(report.table.is_failure());
    assert!(matches!(report.query_service, StepOutcome::Completed(_)));
    assert_eq!(handles.query.executions().await.len(), 1);
}

#[tokio::test]
async fn test_unconfigured_run_reports_every_step_without_panicking() {
    let config = LakeConfig::from_lookup(|_| None);
    let (services, handles) = LakeServices::in_memory();

    let report = pipeline(&config, services).run().await;

    assert!(report.fetch.is_failure());
    assert!(matches!(report.upload, StepOutcome::Skipped(_)));
    assert!(report.table.is_failure());
    assert!(report.query_service.is_failure());
    assert_eq!(report.failed_steps(), 3);
    assert_eq!(handles.catalog.create_calls(), 0);
    assert!(handles.query.executions().await.is_empty());
}
