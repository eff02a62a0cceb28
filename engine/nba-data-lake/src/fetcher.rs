use crate::config::SportsDataIOConfig;
use crate::error::{LakeError, Result};
use crate::models::Dataset;
use reqwest::Client;
use tracing::{debug, info};

/// Header SportsDataIO reads the subscription key from
pub const SUBSCRIPTION_KEY_HEADER: &str = "Ocp-Apim-Subscription-Key";

/// Pulls NBA player records from SportsDataIO
pub struct SportsDataIOFetcher {
    config: SportsDataIOConfig,
    client: Client,
}

impl SportsDataIOFetcher {
    /// Create a new fetcher instance
    pub fn new(config: SportsDataIOConfig) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(Self { config, client })
    }

    /// Fetch the full players array from the configured endpoint
    ///
    /// Any transport, status or decode failure is returned as-is; the caller
    /// decides whether to continue with an empty dataset.
    pub async fn fetch_players(&self) -> Result<Dataset> {
        info!("Fetching NBA data from SportsDataIO API...");

        let endpoint = self.config.endpoint()?;
        let api_key = self.config.api_key()?;
        debug!("GET {}", endpoint);

        let response =
            self.client.get(endpoint).header(SUBSCRIPTION_KEY_HEADER, api_key).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(LakeError::HttpStatus(status));
        }

        let body = response.bytes().await?;
        let dataset: Dataset = serde_json::from_slice(&body)?;

        info!("Fetched {} player records.", dataset.len());
        Ok(dataset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::{
        matchers::{header, method, path},
        Mock, MockServer, ResponseTemplate,
    };

    fn config_for(server: &MockServer) -> SportsDataIOConfig {
        SportsDataIOConfig {
            endpoint: Some(format!("{}/v3/nba/scores/json/Players", server.uri())),
            api_key: Some("test-key".to_string()),
            request_timeout_secs: Some(5),
        }
    }

    #[tokio::test]
    async fn test_fetch_players_success() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v3/nba/scores/json/Players"))
            .and(header("Ocp-Apim-Subscription-Key", "test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"PlayerID": 1, "FirstName": "A", "LastName": "B", "Team": "X", "Position": "G", "Points": 10},
                {"PlayerID": 2, "FirstName": "C", "LastName": "D", "Team": "Y", "Position": "C", "Points": 4}
            ])))
            .expect(1)
            .mount(&mock_server)
            .await;

        let fetcher = SportsDataIOFetcher::new(config_for(&mock_server)).unwrap();
        let dataset = fetcher.fetch_players().await.unwrap();

        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.records()[0].last_name(), Some("B"));
        assert_eq!(dataset.records()[1].points(), Some(4));
    }

    #[tokio::test]
    async fn test_fetch_players_http_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&mock_server)
            .await;

        let fetcher = SportsDataIOFetcher::new(config_for(&mock_server)).unwrap();
        let err = fetcher.fetch_players().await.unwrap_err();

        assert!(matches!(err, LakeError::HttpStatus(status) if status.as_u16() == 401));
    }

    #[tokio::test]
    async fn test_fetch_players_rejects_non_array_body() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"message": "quota exceeded"})),
            )
            .mount(&mock_server)
            .await;

        let fetcher = SportsDataIOFetcher::new(config_for(&mock_server)).unwrap();
        let err = fetcher.fetch_players().await.unwrap_err();

        assert!(matches!(err, LakeError::Serialization(_)));
    }

    #[tokio::test]
    async fn test_fetch_players_without_endpoint() {
        let fetcher = SportsDataIOFetcher::new(SportsDataIOConfig {
            endpoint: None,
            api_key: Some("test-key".to_string()),
            request_timeout_secs: None,
        })
        .unwrap();

        let err = fetcher.fetch_players().await.unwrap_err();
        assert!(matches!(err, LakeError::MissingConfig("NBA_ENDPOINT")));
    }
}
