//! Presentation sink interface
//!
//! The renderer writes into these slots; it never owns the surface behind
//! them. The shipped binary backs the slots with a terminal table, tests
//! with a recording fake.

use gw_catalog::GpuType;

/// Status of the most recent pass, shown next to the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkStatus {
    /// A pass has started and is fetching.
    Loading,
    /// The last pass rendered from a successful primary fetch.
    Success,
    /// The last pass degraded to held data; carries the user-facing message.
    Error(String),
}

/// Narrow write-only surface the ranker projects into.
///
/// Within one pass the per-offering slots are written first, then the epoch
/// slot, then the updated-time slot, and finally the status slot.
pub trait EfficiencySink: Send + Sync {
    /// Formatted score text for one offering ("336.692", or the placeholder
    /// glyph when the score is unavailable).
    fn set_score(&self, gpu: GpuType, text: &str);

    /// Bar width percentage in 0..=100.
    fn set_bar(&self, gpu: GpuType, pct: f64);

    /// 1-based rank.
    fn set_rank(&self, gpu: GpuType, rank: usize);

    /// Display epoch text.
    fn set_epoch(&self, text: &str);

    /// Last-updated wall clock text (UTC, HH:MM:SS).
    fn set_updated(&self, text: &str);

    /// Pass status transition.
    fn set_status(&self, status: SinkStatus);
}
