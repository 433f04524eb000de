//! Efficiency ranking pipeline
//!
//! Polls the Gonka participants endpoint, holds the current weight state,
//! ranks the fixed GPU offerings by network-weight-per-dollar, and writes
//! the result into a presentation sink. Every failure is recovered inside
//! the pass that produced it; the polling loop itself never stops.

pub mod epoch;
pub mod fetch;
pub mod pipeline;
pub mod poller;
pub mod rank;
pub mod sink;
pub mod types;
pub mod weights;

pub use fetch::{HttpJsonFetcher, JsonFetcher};
pub use pipeline::EfficiencyPipeline;
pub use poller::{spawn_refresh_task, RefreshTask};
pub use rank::{compute_rankings, EfficiencyRecord, PLACEHOLDER};
pub use sink::{EfficiencySink, SinkStatus};
pub use types::{PipelineConfig, PipelineError, PipelineResult};
pub use weights::{parse_weights_payload, ParsedWeights, WeightsState};
