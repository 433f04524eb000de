//! Pipeline configuration and error types

use std::time::Duration;

use thiserror::Error;

/// Primary metrics endpoint: the current-epoch participant list.
pub const PARTICIPANTS_URL: &str = "https://node4.gonka.ai/v1/epochs/current/participants";

/// Wall-clock period between refresh passes.
pub const POLL_INTERVAL: Duration = Duration::from_millis(30_000);

/// Hard per-request timeout for both endpoints.
pub const FETCH_TIMEOUT: Duration = Duration::from_millis(8_000);

/// Pipeline error types
///
/// All of these are recovered within the pass that produced them: a failed
/// fetch degrades that pass's render, it never stops the loop.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("request to {url} timed out after {timeout_ms} ms")]
    Timeout { url: String, timeout_ms: u64 },

    #[error("HTTP {status} from {url}")]
    Http { url: String, status: u16 },

    #[error("invalid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("network error: {0}")]
    Transport(String),

    #[error("malformed override payload: {0}")]
    MalformedOverride(String),
}

pub type PipelineResult<T> = Result<T, PipelineError>;

/// Configuration for one pipeline instance.
///
/// The defaults are the compiled-in production constants; tests construct
/// their own instances around fake endpoints.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Primary metrics endpoint.
    pub participants_url: String,
    /// Optional override-weights document. Checked every pass until the
    /// first successful load makes the override sticky.
    pub override_weights_url: Option<String>,
    /// Period of the polling loop.
    pub poll_interval: Duration,
    /// Timeout applied to each fetch.
    pub fetch_timeout: Duration,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            participants_url: PARTICIPANTS_URL.to_string(),
            override_weights_url: None,
            poll_interval: POLL_INTERVAL,
            fetch_timeout: FETCH_TIMEOUT,
        }
    }
}
