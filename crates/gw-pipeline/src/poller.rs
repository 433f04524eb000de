//! Polling driver for the pipeline
//!
//! One pass immediately at startup, then one per interval. A pass runs to
//! completion before the next tick is processed, so a slow pass delays the
//! next one instead of overlapping it.

use tokio::time::interval;
use tracing::info;

use crate::pipeline::EfficiencyPipeline;

/// Background task that refreshes the pipeline on a fixed period.
pub struct RefreshTask {
    pipeline: EfficiencyPipeline,
}

impl RefreshTask {
    pub fn new(pipeline: EfficiencyPipeline) -> Self {
        Self { pipeline }
    }

    /// Run the refresh loop; never returns.
    pub async fn run(mut self) {
        let period = self.pipeline.config().poll_interval;
        info!("Starting efficiency refresh loop (period {:?})", period);

        let mut timer = interval(period);

        loop {
            // The first tick completes immediately: the startup pass.
            timer.tick().await;
            self.pipeline.refresh().await;
        }
    }
}

/// Spawn the refresh loop in the background.
pub fn spawn_refresh_task(pipeline: EfficiencyPipeline) -> tokio::task::JoinHandle<()> {
    let task = RefreshTask::new(pipeline);
    tokio::spawn(async move {
        task.run().await;
    })
}
