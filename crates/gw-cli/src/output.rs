//! Terminal presentation sink
//!
//! Buffers the per-offering slots a pass writes and redraws the whole table
//! once the pass finishes. `set_updated` is the final write of every pass,
//! so it doubles as the redraw trigger.

use std::collections::HashMap;

use parking_lot::RwLock;
use prettytable::{row, Table};

use gw_catalog::{offerings, GpuType};
use gw_pipeline::{EfficiencySink, SinkStatus, PLACEHOLDER};

/// Width of the value bar, in glyphs.
const BAR_CELLS: usize = 20;

#[derive(Debug, Default)]
struct Slots {
    scores: HashMap<GpuType, String>,
    bars: HashMap<GpuType, f64>,
    ranks: HashMap<GpuType, usize>,
    epoch: Option<String>,
    updated: Option<String>,
}

/// Sink that renders each completed pass as a table on stdout.
#[derive(Debug, Default)]
pub struct TerminalSink {
    slots: RwLock<Slots>,
}

impl TerminalSink {
    pub fn new() -> Self {
        Self::default()
    }

    fn draw(&self) {
        let slots = self.slots.read();

        // Catalog entries ordered by this pass's ranks.
        let mut ordered: Vec<_> = offerings().iter().collect();
        ordered.sort_by_key(|o| slots.ranks.get(&o.gpu).copied().unwrap_or(usize::MAX));

        let mut table = Table::new();
        table.add_row(row![
            "Rank",
            "Server",
            "$/GPU/hr",
            "$/month",
            "Efficiency",
            "Value"
        ]);
        for offering in ordered {
            let rank = slots
                .ranks
                .get(&offering.gpu)
                .map(|r| r.to_string())
                .unwrap_or_else(|| PLACEHOLDER.to_string());
            let score = slots
                .scores
                .get(&offering.gpu)
                .cloned()
                .unwrap_or_else(|| PLACEHOLDER.to_string());
            let bar = bar_glyphs(slots.bars.get(&offering.gpu).copied().unwrap_or(0.0));
            table.add_row(row![
                rank,
                offering.display_name(),
                format!("${:.2}", offering.price_per_gpu_hour),
                format_usd(offering.monthly_price()),
                score,
                bar
            ]);
        }
        table.printstd();

        println!(
            "epoch {}  updated {} UTC",
            slots.epoch.as_deref().unwrap_or(PLACEHOLDER),
            slots.updated.as_deref().unwrap_or(PLACEHOLDER)
        );
    }
}

impl EfficiencySink for TerminalSink {
    fn set_score(&self, gpu: GpuType, text: &str) {
        self.slots.write().scores.insert(gpu, text.to_string());
    }

    fn set_bar(&self, gpu: GpuType, pct: f64) {
        self.slots.write().bars.insert(gpu, pct);
    }

    fn set_rank(&self, gpu: GpuType, rank: usize) {
        self.slots.write().ranks.insert(gpu, rank);
    }

    fn set_epoch(&self, text: &str) {
        self.slots.write().epoch = Some(text.to_string());
    }

    fn set_updated(&self, text: &str) {
        self.slots.write().updated = Some(text.to_string());
        self.draw();
    }

    fn set_status(&self, status: SinkStatus) {
        // Loading/success churn stays quiet; only degraded passes get a line.
        if let SinkStatus::Error(message) = status {
            println!("! {message}");
        }
    }
}

/// Formats a dollar amount rounded to whole dollars with thousands separators.
fn format_usd(amount: f64) -> String {
    let whole = amount.round() as i64;
    let digits = whole.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if whole < 0 {
        format!("-${grouped}")
    } else {
        format!("${grouped}")
    }
}

/// Renders a 0..=100 percentage as a fixed-width block bar.
fn bar_glyphs(pct: f64) -> String {
    let filled = ((pct / 100.0) * BAR_CELLS as f64).round() as usize;
    let filled = filled.min(BAR_CELLS);
    let mut bar = String::with_capacity(BAR_CELLS * '█'.len_utf8());
    for _ in 0..filled {
        bar.push('█');
    }
    for _ in filled..BAR_CELLS {
        bar.push('░');
    }
    bar
}
