//! HTTP retrieval of the campaign collection.
//!
//! One GET per call against `{base_url}/campaigns`. There is no retry and no
//! caching; every failure is reported to the caller as a [`RetrievalError`].

use crate::models::{Campaign, CampaignCollection};
use rust_decimal::Decimal;
use std::collections::HashSet;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Fixed path appended to the configured API origin.
pub const CAMPAIGNS_PATH: &str = "/campaigns";

/// Longest slice of an error body kept in a `Status` error.
const MAX_ERROR_BODY_CHARS: usize = 300;

/// Failure while obtaining the campaign collection.
#[derive(Debug, Error)]
pub enum RetrievalError {
    /// The request never produced a response.
    #[error("{0}")]
    Transport(String),

    /// The API answered with a non-success status.
    #[error("Campaign API error {status}: {body}")]
    Status { status: u16, body: String },

    /// The body was not a list of campaigns.
    #[error("Failed to parse campaign data: {0}")]
    Decode(String),

    /// A decoded record broke a field invariant.
    #[error("Malformed campaign record {id}: {reason}")]
    Malformed { id: i64, reason: String },
}

/// Configuration for the retriever.
#[derive(Debug, Clone)]
pub struct RetrieverConfig {
    /// Request timeout. `None` leaves the HTTP client default in place.
    pub timeout_seconds: Option<u64>,
    /// Reject records that decode but break field invariants.
    pub validate_records: bool,
}

impl Default for RetrieverConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: None,
            validate_records: true,
        }
    }
}

/// Build the retrieval endpoint from the configured origin.
pub fn campaigns_endpoint(base_url: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), CAMPAIGNS_PATH)
}

/// Fetches campaigns from the remote API.
pub struct CampaignRetriever {
    config: RetrieverConfig,
    http_client: reqwest::Client,
}

impl CampaignRetriever {
    /// Create a new retriever.
    pub fn new(config: RetrieverConfig) -> Result<Self, RetrievalError> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.timeout_seconds {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        let http_client = builder
            .build()
            .map_err(|e| RetrievalError::Transport(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            config,
            http_client,
        })
    }

    /// Fetch the campaign collection from `endpoint`.
    ///
    /// The records are returned in the order the API sent them.
    pub async fn fetch_campaigns(&self, endpoint: &str) -> Result<CampaignCollection, RetrievalError> {
        debug!("Fetching campaigns from {}", endpoint);

        let result = self.request(endpoint).await;
        match &result {
            Ok(campaigns) => info!("Fetched {} campaigns", campaigns.len()),
            Err(e) => warn!("Campaign retrieval failed: {}", e),
        }

        result
    }

    async fn request(&self, endpoint: &str) -> Result<CampaignCollection, RetrievalError> {
        let response = self.http_client.get(endpoint).send().await.map_err(|e| {
            if e.is_timeout() {
                RetrievalError::Transport(format!(
                    "Request timed out after {}s",
                    self.config.timeout_seconds.unwrap_or_default()
                ))
            } else if e.is_connect() {
                RetrievalError::Transport(format!(
                    "Cannot connect to campaign API at {}",
                    endpoint
                ))
            } else {
                RetrievalError::Transport(format!("Failed to send request: {}", e))
            }
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(RetrievalError::Status {
                status: status.as_u16(),
                body: truncate_body(body.trim()),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| RetrievalError::Transport(format!("Failed to read response body: {}", e)))?;

        let campaigns: CampaignCollection =
            serde_json::from_str(&body).map_err(|e| RetrievalError::Decode(e.to_string()))?;

        if self.config.validate_records {
            validate_campaigns(&campaigns)?;
        }

        Ok(campaigns)
    }
}

/// Keep the start of an error body so a full HTML error page never reaches the user.
fn truncate_body(body: &str) -> String {
    match body.char_indices().nth(MAX_ERROR_BODY_CHARS) {
        Some((cut, _)) => format!("{}...", &body[..cut]),
        None => body.to_string(),
    }
}

/// Check the invariants the decoder cannot express.
///
/// Counts are unsigned and every field is required, so decoding already
/// rules those out. What is left: cost sign, empty names, duplicate ids.
pub fn validate_campaigns(campaigns: &[Campaign]) -> Result<(), RetrievalError> {
    let mut seen = HashSet::new();

    for campaign in campaigns {
        if campaign.cost < Decimal::ZERO {
            return Err(RetrievalError::Malformed {
                id: campaign.id,
                reason: format!("negative cost {}", campaign.cost),
            });
        }
        if campaign.name.trim().is_empty() {
            return Err(RetrievalError::Malformed {
                id: campaign.id,
                reason: "empty name".to_string(),
            });
        }
        if !seen.insert(campaign.id) {
            return Err(RetrievalError::Malformed {
                id: campaign.id,
                reason: "duplicate id".to_string(),
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CampaignStatus;
    use serde_json::json;
    use tokio_test::{assert_err, assert_ok};
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn retriever() -> CampaignRetriever {
        CampaignRetriever::new(RetrieverConfig::default()).unwrap()
    }

    fn record(id: i64, status: &str, cost: f64) -> serde_json::Value {
        json!({
            "id": id,
            "name": format!("Campaign {}", id),
            "status": status,
            "clicks": 10,
            "cost": cost,
            "impressions": 100
        })
    }

    #[test]
    fn test_campaigns_endpoint() {
        assert_eq!(
            campaigns_endpoint("http://localhost:8000"),
            "http://localhost:8000/campaigns"
        );
        assert_eq!(
            campaigns_endpoint("https://api.example.com/"),
            "https://api.example.com/campaigns"
        );
    }

    #[tokio::test]
    async fn test_fetch_success_preserves_order() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/campaigns"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                record(3, "Paused", 1.5),
                record(1, "Active", 25.5),
                record(2, "Active", 10.0),
            ])))
            .expect(1)
            .mount(&mock_server)
            .await;

        let endpoint = campaigns_endpoint(&mock_server.uri());
        let campaigns = assert_ok!(retriever().fetch_campaigns(&endpoint).await);

        let ids: Vec<i64> = campaigns.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![3, 1, 2]);
        assert_eq!(campaigns[0].status, CampaignStatus::Paused);
        assert_eq!(campaigns[1].cost, Decimal::new(2550, 2));
    }

    #[tokio::test]
    async fn test_fetch_empty_list() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/campaigns"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&mock_server)
            .await;

        let endpoint = campaigns_endpoint(&mock_server.uri());
        let campaigns = assert_ok!(retriever().fetch_campaigns(&endpoint).await);
        assert!(campaigns.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_server_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
            .expect(1)
            .mount(&mock_server)
            .await;

        let endpoint = campaigns_endpoint(&mock_server.uri());
        let err = assert_err!(retriever().fetch_campaigns(&endpoint).await);

        match &err {
            RetrievalError::Status { status, body } => {
                assert_eq!(*status, 500);
                assert_eq!(body, "Internal Server Error");
            }
            other => panic!("expected status error, got {:?}", other),
        }
        assert!(err.to_string().contains("500"));
    }

    #[tokio::test]
    async fn test_fetch_error_body_is_truncated() {
        let mock_server = MockServer::start().await;
        let page = format!("<html>{}</html>", "x".repeat(5000));

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(502).set_body_string(page))
            .mount(&mock_server)
            .await;

        let endpoint = campaigns_endpoint(&mock_server.uri());
        let err = assert_err!(retriever().fetch_campaigns(&endpoint).await);

        match &err {
            RetrievalError::Status { status, body } => {
                assert_eq!(*status, 502);
                assert_eq!(body.chars().count(), MAX_ERROR_BODY_CHARS + 3);
                assert!(body.starts_with("<html>"));
                assert!(body.ends_with("..."));
            }
            other => panic!("expected status error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_fetch_times_out() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!([]))
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&mock_server)
            .await;

        let config = RetrieverConfig {
            timeout_seconds: Some(1),
            validate_records: true,
        };
        let retriever = CampaignRetriever::new(config).unwrap();

        let endpoint = campaigns_endpoint(&mock_server.uri());
        let err = assert_err!(retriever.fetch_campaigns(&endpoint).await);

        assert!(matches!(err, RetrievalError::Transport(_)));
        assert_eq!(err.to_string(), "Request timed out after 1s");
    }

    #[test]
    fn test_truncate_body_keeps_short_bodies() {
        assert_eq!(truncate_body("Internal Server Error"), "Internal Server Error");
        let accented = "é".repeat(MAX_ERROR_BODY_CHARS);
        assert_eq!(truncate_body(&accented), accented);
    }

    #[tokio::test]
    async fn test_fetch_undecodable_body() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "ok"})))
            .mount(&mock_server)
            .await;

        let endpoint = campaigns_endpoint(&mock_server.uri());
        let err = assert_err!(retriever().fetch_campaigns(&endpoint).await);

        assert!(matches!(err, RetrievalError::Decode(_)));
        assert!(!err.to_string().is_empty());
    }

    #[tokio::test]
    async fn test_fetch_rejects_negative_cost() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!([record(7, "Active", -4.0)])),
            )
            .mount(&mock_server)
            .await;

        let endpoint = campaigns_endpoint(&mock_server.uri());
        let err = assert_err!(retriever().fetch_campaigns(&endpoint).await);

        assert!(matches!(err, RetrievalError::Malformed { id: 7, .. }));
    }

    #[tokio::test]
    async fn test_fetch_trusts_shape_when_validation_disabled() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                record(1, "Active", -4.0),
                record(1, "Paused", 2.0),
            ])))
            .mount(&mock_server)
            .await;

        let config = RetrieverConfig {
            timeout_seconds: Some(5),
            validate_records: false,
        };
        let retriever = CampaignRetriever::new(config).unwrap();

        let endpoint = campaigns_endpoint(&mock_server.uri());
        let campaigns = assert_ok!(retriever.fetch_campaigns(&endpoint).await);
        assert_eq!(campaigns.len(), 2);
    }

    #[tokio::test]
    async fn test_fetch_connection_refused() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let endpoint = campaigns_endpoint(&format!("http://{}", addr));
        let err = assert_err!(retriever().fetch_campaigns(&endpoint).await);

        assert!(matches!(err, RetrievalError::Transport(_)));
        assert!(!err.to_string().is_empty());
    }

    #[test]
    fn test_validate_duplicate_ids() {
        let campaign = Campaign {
            id: 4,
            name: "Spring Fling".to_string(),
            status: CampaignStatus::Active,
            clicks: 80,
            cost: Decimal::new(2500, 2),
            impressions: 800,
        };
        let campaigns = vec![campaign.clone(), campaign];

        let err = validate_campaigns(&campaigns).unwrap_err();
        assert_eq!(err.to_string(), "Malformed campaign record 4: duplicate id");
    }
}
