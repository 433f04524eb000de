//! Override-weights state and payload normalization
//!
//! The pipeline starts from the catalog fallback weights. An operator can
//! point it at an override document; the first payload that yields at least
//! one usable entry replaces the mapping wholesale and is sticky for the
//! rest of the process lifetime.

use std::collections::HashMap;

use serde_json::Value;

use gw_catalog::OFFERINGS;

/// Parsed form of an override payload.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ParsedWeights {
    /// Epoch scalar, kept verbatim.
    pub epoch: Option<Value>,
    /// Uppercase key to finite weight.
    pub weights: HashMap<String, f64>,
}

/// Normalize a raw override payload.
///
/// `epoch` is kept verbatim when present and non-null. Every `weights`
/// entry is coerced to a finite number and stored under its upper-cased
/// key; entries that do not coerce are dropped one by one without failing
/// the rest of the payload. A payload that is not an object normalizes to
/// the empty result.
pub fn parse_weights_payload(payload: &Value) -> ParsedWeights {
    let mut result = ParsedWeights::default();

    let Some(object) = payload.as_object() else {
        return result;
    };

    result.epoch = object.get("epoch").filter(|v| !v.is_null()).cloned();

    if let Some(weights) = object.get("weights").and_then(Value::as_object) {
        for (key, value) in weights {
            if let Some(weight) = coerce_weight(value) {
                result.weights.insert(key.to_uppercase(), weight);
            }
        }
    }

    result
}

/// Number-like coercion: finite JSON numbers directly, strings via a
/// trimmed f64 parse. Everything else is not a weight.
fn coerce_weight(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64().filter(|f| f.is_finite()),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
        _ => None,
    }
}

/// Weight state owned by one pipeline instance.
#[derive(Debug, Clone)]
pub struct WeightsState {
    epoch: Option<Value>,
    weights: HashMap<String, f64>,
    custom_loaded: bool,
}

impl WeightsState {
    /// Fresh state holding every offering's fallback weight.
    pub fn new() -> Self {
        Self {
            epoch: None,
            weights: fallback_weights(),
            custom_loaded: false,
        }
    }

    /// Weight stored under an uppercase key.
    pub fn weight(&self, key: &str) -> Option<f64> {
        self.weights.get(key).copied()
    }

    /// Epoch scalar delivered by the applied override payload, if any.
    pub fn epoch(&self) -> Option<&Value> {
        self.epoch.as_ref()
    }

    /// Whether an override payload has already been applied (sticky).
    pub fn custom_loaded(&self) -> bool {
        self.custom_loaded
    }

    /// Apply a parsed override payload.
    ///
    /// A payload with no usable weight entries does not count as a load:
    /// nothing changes, the sticky flag stays unset, and a later pass is
    /// free to retry. Otherwise the whole mapping is rebuilt - fallback
    /// defaults overlaid with the parsed entries - and swapped in at once,
    /// the epoch is taken over, and the state becomes sticky.
    pub fn apply(&mut self, parsed: ParsedWeights) -> bool {
        if parsed.weights.is_empty() {
            return false;
        }

        let mut weights = fallback_weights();
        weights.extend(parsed.weights);

        self.weights = weights;
        self.epoch = parsed.epoch;
        self.custom_loaded = true;
        true
    }
}

impl Default for WeightsState {
    fn default() -> Self {
        Self::new()
    }
}

fn fallback_weights() -> HashMap<String, f64> {
    OFFERINGS
        .iter()
        .map(|o| (o.gpu.as_str().to_string(), o.fallback_weight))
        .collect()
}
