use std::time::{Duration, Instant};

use reqwest::Client;
use tracing::{debug, warn};
use url::Url;

use super::normalize::{SearchOutcome, normalize};
use super::types::{HealthResponse, SearchRequest, SearchResponseBody};

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("search service returned HTTP {code}")]
    Status { code: u16 },

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("malformed response body: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Anything that can answer a search request.
/// Implemented by `ServiceClient` for production; mock implementations used in tests.
pub trait SearchBackend {
    async fn search(&self, request: &SearchRequest) -> Result<SearchOutcome, ServiceError>;
}

#[derive(Debug)]
pub struct HealthCheck {
    pub status: String,
    pub latency: Duration,
}

#[derive(Clone)]
pub struct ServiceClient {
    http: Client,
    base_url: Url,
}

impl ServiceClient {
    pub fn new(http: Client, base_url: Url) -> Self {
        Self { http, base_url }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url.as_str().trim_end_matches('/'))
    }

    /// `GET /health`. Unlike search, failures here are reported to the caller.
    pub async fn health(&self) -> Result<HealthCheck, ServiceError> {
        let start = Instant::now();
        let response = self
            .http
            .get(self.endpoint("/health"))
            .header("User-Agent", crate::USER_AGENT)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = %status, "health check failed");
            return Err(ServiceError::Status {
                code: status.as_u16(),
            });
        }

        let bytes = response.bytes().await?;
        let body: HealthResponse = serde_json::from_slice(&bytes).unwrap_or_default();
        Ok(HealthCheck {
            status: if body.status.is_empty() {
                "ok".to_string()
            } else {
                body.status
            },
            latency: start.elapsed(),
        })
    }
}

impl SearchBackend for ServiceClient {
    async fn search(&self, request: &SearchRequest) -> Result<SearchOutcome, ServiceError> {
        let response = self
            .http
            .post(self.endpoint("/search"))
            .header("User-Agent", crate::USER_AGENT)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ServiceError::Status {
                code: status.as_u16(),
            });
        }

        let bytes = response.bytes().await?;
        let body: SearchResponseBody = serde_json::from_slice(&bytes)?;
        debug!(mode = ?request.mode, bytes = bytes.len(), "search response received");
        Ok(normalize(body))
    }
}
