//! CLI argument parsing for gnkwatch
//!
//! Two modes:
//! - Watch mode (default): refresh the table every poll interval
//! - One-shot mode (--once): run a single pass and exit

use clap::Parser;

/// gnkwatch - ranks Gonka GPU offerings by network weight per dollar
#[derive(Parser, Debug)]
#[command(name = "gnkwatch")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Fetch override weights from this URL on startup
    ///
    /// The payload is a JSON object with optional `epoch` and `weights`
    /// fields; weights are keyed by GPU model (case-insensitive). Once a
    /// payload with at least one usable weight has loaded, the overrides
    /// stick for the rest of the run.
    ///
    /// Example: gnkwatch --weights-url https://example.com/weights.json
    #[arg(long)]
    pub weights_url: Option<String>,

    /// Run a single refresh pass and exit instead of polling
    #[arg(long)]
    pub once: bool,
}

impl Cli {
    /// Parse CLI arguments from environment
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
