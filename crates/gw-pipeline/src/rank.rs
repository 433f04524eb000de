//! Efficiency scoring, ranking, and sink projection
//!
//! One record per catalog offering, recomputed from scratch every pass.
//! Nothing here fails: inputs that cannot be scored surface as absent
//! scores, never as errors.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

use gw_catalog::{GpuType, OFFERINGS};

use crate::epoch::format_epoch;
use crate::sink::EfficiencySink;
use crate::weights::WeightsState;

/// Placeholder glyph shown wherever a value is unavailable.
pub const PLACEHOLDER: &str = "—";

/// One offering's standing in the current pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EfficiencyRecord {
    pub gpu: GpuType,
    /// weight / price-per-GPU-hour; absent unless both inputs are finite
    /// and positive and the quotient itself is finite.
    pub score: Option<f64>,
    /// 1-based position after the sort.
    pub rank: usize,
    /// Own score as a share of the best score, clamped to 0..=100.
    pub bar_pct: f64,
}

/// Score one offering against the current weights.
///
/// Only a finite positive weight over a finite positive price produces a
/// score, and only when the quotient itself stays finite; every other
/// combination is "unavailable" - never zero, never an error.
fn efficiency_score(weight: Option<f64>, price: f64) -> Option<f64> {
    let weight = weight.filter(|w| w.is_finite() && *w > 0.0)?;
    if !price.is_finite() || price <= 0.0 {
        return None;
    }
    // Finite inputs can still overflow the division for extreme weights.
    Some(weight / price).filter(|score| score.is_finite())
}

/// Rank all offerings under the given weight state.
///
/// The sort is stable over the canonical catalog order: present scores
/// descend, absent scores go last, ties and absent-absent pairs keep their
/// catalog position. Ranks are therefore always the permutation 1..=4.
pub fn compute_rankings(state: &WeightsState) -> Vec<EfficiencyRecord> {
    let mut records: Vec<EfficiencyRecord> = OFFERINGS
        .iter()
        .map(|offering| EfficiencyRecord {
            gpu: offering.gpu,
            score: efficiency_score(
                state.weight(offering.gpu.as_str()),
                offering.price_per_gpu_hour,
            ),
            rank: 0,
            bar_pct: 0.0,
        })
        .collect();

    records.sort_by(|a, b| match (a.score, b.score) {
        // Scores are filtered to finite values, so partial_cmp cannot fail.
        (Some(x), Some(y)) => y.partial_cmp(&x).unwrap_or(std::cmp::Ordering::Equal),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    });

    let max_score = records
        .iter()
        .filter_map(|r| r.score)
        .fold(0.0_f64, f64::max);

    for (index, record) in records.iter_mut().enumerate() {
        record.rank = index + 1;
        record.bar_pct = match record.score {
            Some(score) if max_score > 0.0 => (score / max_score * 100.0).clamp(0.0, 100.0),
            _ => 0.0,
        };
    }

    records
}

/// Project a computed ranking and the display metadata into a sink.
///
/// Per-offering slots are written first, then the epoch slot (the override
/// epoch wins over the extracted one), then the updated-time slot; the time
/// write is the final slot write of a pass.
pub fn render_to_sink(
    sink: &dyn EfficiencySink,
    records: &[EfficiencyRecord],
    state: &WeightsState,
    extracted_epoch: Option<&Value>,
    updated_at: DateTime<Utc>,
) {
    for record in records {
        let score_text = match record.score {
            Some(score) => format!("{:.3}", score),
            None => PLACEHOLDER.to_string(),
        };
        sink.set_score(record.gpu, &score_text);
        sink.set_bar(record.gpu, record.bar_pct);
        sink.set_rank(record.gpu, record.rank);
    }

    let epoch_text = state
        .epoch()
        .or(extracted_epoch)
        .map(format_epoch)
        .unwrap_or_else(|| PLACEHOLDER.to_string());
    sink.set_epoch(&epoch_text);

    sink.set_updated(&updated_at.format("%H:%M:%S").to_string());
}
