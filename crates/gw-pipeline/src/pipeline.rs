//! One pipeline instance: owned state plus the single-pass refresh

use std::sync::Arc;

use chrono::Utc;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::epoch::extract_epoch_index;
use crate::fetch::JsonFetcher;
use crate::rank::{compute_rankings, render_to_sink};
use crate::sink::{EfficiencySink, SinkStatus};
use crate::types::{PipelineConfig, PipelineError, PipelineResult};
use crate::weights::{parse_weights_payload, WeightsState};

/// Message rendered into the status slot when the primary fetch fails.
const DEGRADED_MESSAGE: &str = "API unavailable — using fallback data";

/// The efficiency ranking pipeline.
///
/// Owns its weight state for the process lifetime. `refresh` runs one full
/// pass and recovers every failure into a degraded render, so it has no
/// error to return and the caller's loop can never be stopped by one.
pub struct EfficiencyPipeline {
    config: PipelineConfig,
    fetcher: Arc<dyn JsonFetcher>,
    sink: Arc<dyn EfficiencySink>,
    state: WeightsState,
}

impl EfficiencyPipeline {
    pub fn new(
        config: PipelineConfig,
        fetcher: Arc<dyn JsonFetcher>,
        sink: Arc<dyn EfficiencySink>,
    ) -> Self {
        Self {
            config,
            fetcher,
            sink,
            state: WeightsState::new(),
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Current weight state.
    pub fn state(&self) -> &WeightsState {
        &self.state
    }

    /// Run one pass: fetch, extract, load overrides, rank, render.
    ///
    /// The primary fetch is always issued before the override load is
    /// attempted, and both have finished before anything is rendered.
    pub async fn refresh(&mut self) {
        let started_at = Utc::now();
        self.sink.set_status(SinkStatus::Loading);

        match self.fetcher.fetch_json(&self.config.participants_url).await {
            Ok(response) => {
                let extracted = extract_epoch_index(&response);
                self.load_custom_weights_if_configured().await;

                let records = compute_rankings(&self.state);
                render_to_sink(
                    self.sink.as_ref(),
                    &records,
                    &self.state,
                    extracted.as_ref(),
                    started_at,
                );
                self.sink.set_status(SinkStatus::Success);
            }
            Err(e) => {
                warn!("Participants fetch failed: {}", e);
                self.load_custom_weights_if_configured().await;

                let records = compute_rankings(&self.state);
                render_to_sink(self.sink.as_ref(), &records, &self.state, None, started_at);
                self.sink
                    .set_status(SinkStatus::Error(DEGRADED_MESSAGE.to_string()));
            }
        }
    }

    /// Fetch and apply override weights, at most once per process.
    ///
    /// Nothing in here is allowed to escape: a failed or empty load leaves
    /// the fallback weights in force and the next pass free to retry.
    async fn load_custom_weights_if_configured(&mut self) {
        let Some(url) = self.config.override_weights_url.clone() else {
            return;
        };
        if self.state.custom_loaded() {
            return;
        }

        match self.try_load_custom_weights(&url).await {
            Ok(true) => info!("Loaded custom weights from {}", url),
            Ok(false) => debug!("Override payload from {} had no usable weights", url),
            Err(e) => warn!("Failed to load custom weights: {}", e),
        }
    }

    async fn try_load_custom_weights(&mut self, url: &str) -> PipelineResult<bool> {
        let payload = self.fetcher.fetch_json(url).await?;
        if !payload.is_object() {
            return Err(PipelineError::MalformedOverride(format!(
                "expected an object, got {}",
                json_type_name(&payload)
            )));
        }

        Ok(self.state.apply(parse_weights_payload(&payload)))
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
