//! End-to-end pipeline tests over scripted fetchers and a recording sink.
//!
//! No network, no timers: every pass is driven synchronously through
//! `EfficiencyPipeline::refresh` with canned fetch outcomes.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{json, Value};

use gw_catalog::GpuType;
use gw_pipeline::{
    EfficiencyPipeline, EfficiencySink, JsonFetcher, PipelineConfig, PipelineError,
    PipelineResult, SinkStatus,
};

const PRIMARY_URL: &str = "https://primary.test/participants";
const WEIGHTS_URL: &str = "https://weights.test/custom.json";

/// One canned fetch outcome.
#[derive(Clone)]
enum FetchScript {
    Json(Value),
    Timeout,
    Http(u16),
}

impl FetchScript {
    fn into_result(self, url: &str) -> PipelineResult<Value> {
        match self {
            FetchScript::Json(value) => Ok(value),
            FetchScript::Timeout => Err(PipelineError::Timeout {
                url: url.to_string(),
                timeout_ms: 8000,
            }),
            FetchScript::Http(status) => Err(PipelineError::Http {
                url: url.to_string(),
                status,
            }),
        }
    }
}

/// Fetcher that replays scripted outcomes per URL and counts calls.
///
/// Each call pops the next outcome for its URL; the last outcome repeats
/// once the queue is down to one entry.
#[derive(Default)]
struct ScriptedFetcher {
    scripts: Mutex<HashMap<String, VecDeque<FetchScript>>>,
    calls: Mutex<HashMap<String, usize>>,
}

impl ScriptedFetcher {
    fn new() -> Self {
        Self::default()
    }

    fn script(self, url: &str, outcomes: Vec<FetchScript>) -> Self {
        self.scripts
            .lock()
            .insert(url.to_string(), outcomes.into());
        self
    }

    fn calls(&self, url: &str) -> usize {
        self.calls.lock().get(url).copied().unwrap_or(0)
    }
}

#[async_trait]
impl JsonFetcher for ScriptedFetcher {
    async fn fetch_json(&self, url: &str) -> PipelineResult<Value> {
        *self.calls.lock().entry(url.to_string()).or_insert(0) += 1;

        let mut scripts = self.scripts.lock();
        let queue = scripts
            .get_mut(url)
            .unwrap_or_else(|| panic!("unscripted fetch of {url}"));
        let script = if queue.len() > 1 {
            queue.pop_front().unwrap()
        } else {
            queue
                .front()
                .cloned()
                .unwrap_or_else(|| panic!("script queue for {url} is empty"))
        };

        script.into_result(url)
    }
}

/// Everything a pass wrote into the sink.
#[derive(Debug, Default, Clone)]
struct Recorded {
    scores: HashMap<GpuType, String>,
    bars: HashMap<GpuType, f64>,
    ranks: HashMap<GpuType, usize>,
    epoch: Option<String>,
    updated: Option<String>,
    statuses: Vec<SinkStatus>,
}

#[derive(Default)]
struct RecordingSink {
    recorded: Mutex<Recorded>,
}

impl RecordingSink {
    fn new() -> Self {
        Self::default()
    }

    fn snapshot(&self) -> Recorded {
        self.recorded.lock().clone()
    }
}

impl EfficiencySink for RecordingSink {
    fn set_score(&self, gpu: GpuType, text: &str) {
        self.recorded.lock().scores.insert(gpu, text.to_string());
    }

    fn set_bar(&self, gpu: GpuType, pct: f64) {
        self.recorded.lock().bars.insert(gpu, pct);
    }

    fn set_rank(&self, gpu: GpuType, rank: usize) {
        self.recorded.lock().ranks.insert(gpu, rank);
    }

    fn set_epoch(&self, text: &str) {
        self.recorded.lock().epoch = Some(text.to_string());
    }

    fn set_updated(&self, text: &str) {
        self.recorded.lock().updated = Some(text.to_string());
    }

    fn set_status(&self, status: SinkStatus) {
        self.recorded.lock().statuses.push(status);
    }
}

fn participants_response(epoch_index: i64) -> Value {
    json!({
        "active_participants": {
            "participants": [
                { "seed": { "epoch_index": epoch_index } }
            ]
        }
    })
}

fn test_config(with_weights_url: bool) -> PipelineConfig {
    PipelineConfig {
        participants_url: PRIMARY_URL.to_string(),
        override_weights_url: with_weights_url.then(|| WEIGHTS_URL.to_string()),
        ..PipelineConfig::default()
    }
}

fn build_pipeline(
    fetcher: ScriptedFetcher,
    with_weights_url: bool,
) -> (EfficiencyPipeline, Arc<ScriptedFetcher>, Arc<RecordingSink>) {
    let fetcher = Arc::new(fetcher);
    let sink = Arc::new(RecordingSink::new());
    let pipeline = EfficiencyPipeline::new(
        test_config(with_weights_url),
        fetcher.clone(),
        sink.clone(),
    );
    (pipeline, fetcher, sink)
}

#[tokio::test]
async fn test_pass_renders_rankings_from_fallback_weights() {
    let fetcher = ScriptedFetcher::new().script(
        PRIMARY_URL,
        vec![FetchScript::Json(participants_response(42))],
    );
    let (mut pipeline, _fetcher, sink) = build_pipeline(fetcher, false);

    pipeline.refresh().await;

    let recorded = sink.snapshot();
    assert_eq!(recorded.statuses, vec![SinkStatus::Loading, SinkStatus::Success]);

    assert_eq!(recorded.ranks.get(&GpuType::H100), Some(&1));
    assert_eq!(recorded.ranks.get(&GpuType::B200), Some(&2));
    assert_eq!(recorded.ranks.get(&GpuType::A100), Some(&3));
    assert_eq!(recorded.ranks.get(&GpuType::H200), Some(&4));

    assert_eq!(recorded.scores.get(&GpuType::H100).unwrap(), "336.692");
    assert_eq!(recorded.scores.get(&GpuType::B200).unwrap(), "273.120");
    assert_eq!(recorded.scores.get(&GpuType::A100).unwrap(), "259.089");
    assert_eq!(recorded.scores.get(&GpuType::H200).unwrap(), "257.917");

    assert!((recorded.bars.get(&GpuType::H100).unwrap() - 100.0).abs() < 1e-9);

    assert_eq!(recorded.epoch.as_deref(), Some("42"));

    // UTC wall clock, zero-padded HH:MM:SS.
    let updated = recorded.updated.expect("updated slot written");
    assert_eq!(updated.len(), 8);
    assert_eq!(&updated[2..3], ":");
    assert_eq!(&updated[5..6], ":");
}

#[tokio::test]
async fn test_primary_failure_degrades_to_fallback_render() {
    let fetcher = ScriptedFetcher::new().script(PRIMARY_URL, vec![FetchScript::Timeout]);
    let (mut pipeline, _fetcher, sink) = build_pipeline(fetcher, false);

    pipeline.refresh().await;

    let recorded = sink.snapshot();
    assert_eq!(
        recorded.statuses,
        vec![
            SinkStatus::Loading,
            SinkStatus::Error("API unavailable — using fallback data".to_string()),
        ]
    );

    // Scores still render from the held weights; the epoch degrades to the
    // placeholder because nothing was extracted and no override is loaded.
    assert_eq!(recorded.scores.get(&GpuType::A100).unwrap(), "259.089");
    assert_eq!(recorded.epoch.as_deref(), Some("—"));

    let mut ranks: Vec<usize> = recorded.ranks.values().copied().collect();
    ranks.sort_unstable();
    assert_eq!(ranks, vec![1, 2, 3, 4]);
}

#[tokio::test]
async fn test_override_load_is_sticky_after_first_success() {
    let fetcher = ScriptedFetcher::new()
        .script(
            PRIMARY_URL,
            vec![FetchScript::Json(participants_response(42))],
        )
        .script(
            WEIGHTS_URL,
            vec![FetchScript::Json(json!({
                "epoch": 7,
                "weights": { "a100": "300" }
            }))],
        );
    let (mut pipeline, fetcher, sink) = build_pipeline(fetcher, true);

    pipeline.refresh().await;
    pipeline.refresh().await;

    // Two passes, two primary fetches, but only one override fetch.
    assert_eq!(fetcher.calls(PRIMARY_URL), 2);
    assert_eq!(fetcher.calls(WEIGHTS_URL), 1);
    assert!(pipeline.state().custom_loaded());

    let recorded = sink.snapshot();
    // The override epoch wins over the extracted one.
    assert_eq!(recorded.epoch.as_deref(), Some("7"));
    // A100 runs on the override weight, the rest on fallbacks.
    assert_eq!(recorded.scores.get(&GpuType::A100).unwrap(), "303.030");
    assert_eq!(recorded.scores.get(&GpuType::H100).unwrap(), "336.692");
}

#[tokio::test]
async fn test_empty_override_mapping_retries_next_pass() {
    let fetcher = ScriptedFetcher::new()
        .script(
            PRIMARY_URL,
            vec![FetchScript::Json(participants_response(42))],
        )
        .script(
            WEIGHTS_URL,
            vec![
                FetchScript::Json(json!({ "epoch": 9, "weights": {} })),
                FetchScript::Json(json!({ "weights": { "h100": 900 } })),
            ],
        );
    let (mut pipeline, fetcher, sink) = build_pipeline(fetcher, true);

    pipeline.refresh().await;
    assert!(!pipeline.state().custom_loaded());
    // The empty payload's epoch was not taken over; the extracted one shows.
    assert_eq!(sink.snapshot().epoch.as_deref(), Some("42"));

    pipeline.refresh().await;
    assert!(pipeline.state().custom_loaded());
    assert_eq!(fetcher.calls(WEIGHTS_URL), 2);

    let recorded = sink.snapshot();
    assert_eq!(recorded.scores.get(&GpuType::H100).unwrap(), "500.000");
    // This override carried no epoch, so the extracted epoch still shows.
    assert_eq!(recorded.epoch.as_deref(), Some("42"));
}

#[tokio::test]
async fn test_override_fetch_failure_keeps_fallback_weights() {
    let fetcher = ScriptedFetcher::new()
        .script(
            PRIMARY_URL,
            vec![FetchScript::Json(participants_response(42))],
        )
        .script(WEIGHTS_URL, vec![FetchScript::Http(500)]);
    let (mut pipeline, fetcher, sink) = build_pipeline(fetcher, true);

    pipeline.refresh().await;
    pipeline.refresh().await;

    // Failed loads are retried every pass and never poison the render.
    assert_eq!(fetcher.calls(WEIGHTS_URL), 2);
    assert!(!pipeline.state().custom_loaded());

    let recorded = sink.snapshot();
    assert_eq!(recorded.scores.get(&GpuType::H100).unwrap(), "336.692");
    assert_eq!(
        recorded.statuses,
        vec![
            SinkStatus::Loading,
            SinkStatus::Success,
            SinkStatus::Loading,
            SinkStatus::Success,
        ]
    );
}

#[tokio::test]
async fn test_non_object_override_payload_is_swallowed_and_retried() {
    let fetcher = ScriptedFetcher::new()
        .script(
            PRIMARY_URL,
            vec![FetchScript::Json(participants_response(42))],
        )
        .script(WEIGHTS_URL, vec![FetchScript::Json(json!([1, 2, 3]))]);
    let (mut pipeline, fetcher, sink) = build_pipeline(fetcher, true);

    pipeline.refresh().await;
    pipeline.refresh().await;

    assert_eq!(fetcher.calls(WEIGHTS_URL), 2);
    assert!(!pipeline.state().custom_loaded());
    assert_eq!(sink.snapshot().scores.get(&GpuType::A100).unwrap(), "259.089");
}

#[tokio::test]
async fn test_passes_are_idempotent_for_unchanged_inputs() {
    let fetcher = ScriptedFetcher::new().script(
        PRIMARY_URL,
        vec![FetchScript::Json(participants_response(42))],
    );
    let (mut pipeline, _fetcher, sink) = build_pipeline(fetcher, false);

    pipeline.refresh().await;
    let first = sink.snapshot();

    pipeline.refresh().await;
    let second = sink.snapshot();

    // Everything except the wall clock is reproduced exactly.
    assert_eq!(first.scores, second.scores);
    assert_eq!(first.bars, second.bars);
    assert_eq!(first.ranks, second.ranks);
    assert_eq!(first.epoch, second.epoch);
}
