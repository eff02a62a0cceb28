//! Fetch the players feed and show what would be uploaded, without touching AWS

use nba_data_lake::jsonl;
use nba_data_lake::{initialize_logging_with_config, LakeConfig, LogFormat, SportsDataIOFetcher};
use tracing::{error, info};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let config = LakeConfig::from_env();
    initialize_logging_with_config(&config.logging.level, LogFormat::parse(&config.logging.format))?;

    info!("Previewing SportsDataIO players feed");

    let fetcher = SportsDataIOFetcher::new(config.sportsdataio.clone())?;
    let dataset = match fetcher.fetch_players().await {
        Ok(dataset) => dataset,
        Err(e) => {
            error!("❌ Error fetching NBA data: {}", e);
            return Ok(());
        }
    };

    info!("✅ Fetched {} player records", dataset.len());
    for (i, record) in dataset.records().iter().take(3).enumerate() {
        info!(
            "  {}. {} {} ({}, {}) - {} pts",
            i + 1,
            record.first_name().unwrap_or("?"),
            record.last_name().unwrap_or("?"),
            record.team().unwrap_or("-"),
            record.position().unwrap_or("-"),
            record.points().map(|p| p.to_string()).unwrap_or_else(|| "n/a".to_string())
        );
    }

    let encoded = jsonl::to_line_delimited_json(dataset.records())?;
    info!("Encoded payload: {} lines, {} bytes", dataset.len(), encoded.len());
    if let Some(first_line) = encoded.lines().next() {
        info!("First line: {}", first_line);
    }

    Ok(())
}
