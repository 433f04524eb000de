//! gnkwatch - terminal watcher for Gonka GPU value-for-money rankings
//!
//! Polls the network's participant endpoint, folds optional override weights
//! into the compiled-in catalog, and redraws a ranked table each pass.

mod cli;
mod output;

use std::sync::Arc;

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gw_pipeline::{spawn_refresh_task, EfficiencyPipeline, HttpJsonFetcher, PipelineConfig};

use cli::Cli;
use output::TerminalSink;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gnkwatch=info,gw_pipeline=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Cli::parse_args();

    let config = PipelineConfig {
        override_weights_url: args.weights_url,
        ..PipelineConfig::default()
    };

    info!("Starting gnkwatch...");
    info!("Participants endpoint: {}", config.participants_url);
    if let Some(url) = &config.override_weights_url {
        info!("Override weights source: {}", url);
    }

    let fetcher = Arc::new(HttpJsonFetcher::new(config.fetch_timeout));
    let sink = Arc::new(TerminalSink::new());
    let mut pipeline = EfficiencyPipeline::new(config, fetcher, sink);

    if args.once {
        pipeline.refresh().await;
        return Ok(());
    }

    let handle = spawn_refresh_task(pipeline);
    handle.await?;
    Ok(())
}
