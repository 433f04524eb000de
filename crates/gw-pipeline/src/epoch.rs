//! Epoch extraction from the participants response
//!
//! The epoch is advisory display metadata only; it must never block a
//! render, so every failure mode here collapses to `None`.

use serde_json::Value;

/// Pull the epoch index out of the first participant's seed.
///
/// Expected response shape:
/// `{ "active_participants": { "participants": [ { "seed": { "epoch_index": … } }, … ] } }`
/// with any subset of those keys possibly absent.
pub fn extract_epoch_index(response: &Value) -> Option<Value> {
    let participants = response
        .get("active_participants")?
        .get("participants")?
        .as_array()?;

    participants
        .first()?
        .get("seed")?
        .get("epoch_index")
        .filter(|v| !v.is_null())
        .cloned()
}

/// Format an epoch scalar for display: strings render bare, every other
/// value through its JSON form.
pub fn format_epoch(epoch: &Value) -> String {
    match epoch {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
