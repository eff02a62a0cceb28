//! NBA Data Lake setup entry point
//!
//! Runs the whole provisioning sequence once. Step failures are logged and
//! summarised but never change the exit status.

use anyhow::Result;
use clap::Parser;
use tracing::info;

use nba_data_lake::backend::InMemoryHandles;
use nba_data_lake::catalog::PLAYERS_TABLE;
use nba_data_lake::config::RAW_DATA_KEY;
use nba_data_lake::{
    initialize_logging_with_config, LakeConfig, LakeServices, LogFormat, SetupPipeline,
    SportsDataIOFetcher,
};

#[derive(Parser, Debug)]
#[command(name = "nba-data-lake-setup", version, about = "Provision the NBA analytics data lake")]
struct Args {
    /// Fetch from SportsDataIO but keep S3, Glue and Athena writes in memory
    #[arg(long)]
    dry_run: bool,

    /// Log level (overrides NBA_LAKE_LOG_LEVEL)
    #[arg(long)]
    log_level: Option<String>,

    /// Log format: compact, pretty or json (overrides NBA_LAKE_LOG_FORMAT)
    #[arg(long)]
    log_format: Option<String>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();
    let mut config = LakeConfig::from_env();

    if let Some(level) = args.log_level {
        config.logging.level = level;
    }
    if let Some(format) = args.log_format {
        config.logging.format = format;
    }
    initialize_logging_with_config(&config.logging.level, LogFormat::parse(&config.logging.format))?;

    info!("NBA Data Lake setup v{}", env!("CARGO_PKG_VERSION"));
    info!("Loaded configuration: {:?}", config);

    let fetcher = SportsDataIOFetcher::new(config.sportsdataio.clone())?;

    let (services, dry_run_handles) = if args.dry_run {
        info!("Dry run: storage, catalog and query calls stay in memory");
        let (services, handles) = LakeServices::in_memory();
        (services, Some(handles))
    } else {
        (LakeServices::aws(&config).await, None)
    };

    let pipeline = SetupPipeline::new(config.clone(), fetcher, services);
    let report = pipeline.run().await;

    info!(
        "Summary: fetched {} records; fetch {}, upload {}, table {}, athena {} ({} failed)",
        report.records_fetched,
        report.fetch.label(),
        report.upload.label(),
        report.table.label(),
        report.query_service.label(),
        report.failed_steps(),
    );
    info!("Run took {} ms", (report.finished_at - report.started_at).num_milliseconds());

    if let Some(handles) = dry_run_handles {
        log_dry_run(&config, &handles).await;
    }

    Ok(())
}

/// Log what a real run would have written
async fn log_dry_run(config: &LakeConfig, handles: &InMemoryHandles) {
    if let Some(bucket) = config.aws.bucket.as_deref() {
        if let Some(body) = handles.store.object(bucket, RAW_DATA_KEY).await {
            info!("Dry run: would write {} bytes to s3://{}/{}", body.len(), bucket, RAW_DATA_KEY);
        }
    }
    if let Some(database) = config.aws.glue_database.as_deref() {
        if let Some(table) = handles.catalog.table(database, PLAYERS_TABLE).await {
            info!(
                "Dry run: would create {}.{} ({} columns) over {}",
                database,
                table.name,
                table.columns.len(),
                table.location
            );
        }
    }
    for (id, request) in handles.query.executions().await {
        info!(
            "Dry run: would start '{}' as {} (results to {})",
            request.query, id, request.output_location
        );
    }
}
