//! JSON fetching with a hard per-request timeout
//!
//! `JsonFetcher` is the seam the rest of the pipeline is driven and tested
//! through; `HttpJsonFetcher` is the production implementation.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CACHE_CONTROL;
use serde_json::Value;
use tracing::debug;

use crate::types::{PipelineError, PipelineResult};

/// Fetches one JSON document from a URL.
///
/// One call is one request: retrying is the business of the next polling
/// cycle, never of the fetcher itself.
#[async_trait]
pub trait JsonFetcher: Send + Sync {
    async fn fetch_json(&self, url: &str) -> PipelineResult<Value>;
}

/// Production fetcher backed by a shared reqwest client.
pub struct HttpJsonFetcher {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpJsonFetcher {
    /// Create a fetcher whose requests all abort after `timeout`.
    pub fn new(timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(timeout)
                .user_agent(concat!("gnkwatch/", env!("CARGO_PKG_VERSION")))
                .build()
                .expect("Failed to create HTTP client"),
            timeout,
        }
    }
}

#[async_trait]
impl JsonFetcher for HttpJsonFetcher {
    async fn fetch_json(&self, url: &str) -> PipelineResult<Value> {
        debug!("Fetching {}", url);

        let response = self
            .client
            .get(url)
            // The endpoints report live state; never accept a cached body.
            .header(CACHE_CONTROL, "no-cache, no-store")
            .send()
            .await
            .map_err(|e| classify_transport_error(url, self.timeout, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(PipelineError::Http {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| classify_transport_error(url, self.timeout, e))?;

        Ok(serde_json::from_str(&body)?)
    }
}

/// Split reqwest's error blob into the pipeline taxonomy: timeouts are their
/// own kind, everything else at the transport level is lumped together.
fn classify_transport_error(url: &str, timeout: Duration, err: reqwest::Error) -> PipelineError {
    if err.is_timeout() {
        PipelineError::Timeout {
            url: url.to_string(),
            timeout_ms: timeout.as_millis() as u64,
        }
    } else {
        PipelineError::Transport(err.to_string())
    }
}
