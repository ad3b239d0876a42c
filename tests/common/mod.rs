//! Shared intake fixtures for integration tests.

use std::collections::BTreeMap;

use powerquote::config::EngineConfig;
use powerquote::quote::{AnswerValue, QuoteEngine};

/// Engine over the baseline policy and compiled-in reference data.
pub fn baseline_engine() -> QuoteEngine {
    QuoteEngine::new(EngineConfig::baseline())
}

/// Builds an answer map from `(key, value)` pairs.
pub fn intake(pairs: &[(&str, AnswerValue)]) -> BTreeMap<String, AnswerValue> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}

/// Numeric answer.
pub fn num(v: f64) -> AnswerValue {
    AnswerValue::Number(v)
}

/// Text answer.
pub fn txt(s: &str) -> AnswerValue {
    AnswerValue::Text(s.to_string())
}

/// Boolean answer.
pub fn flag(b: bool) -> AnswerValue {
    AnswerValue::Flag(b)
}

/// The 150-room midscale hotel intake quoted throughout the suite:
/// pool and restaurant on, bill supplied, required universals answered.
/// Deliberately no metered peak, so the room-count model is what gets
/// exercised.
pub fn hotel_150_rooms() -> BTreeMap<String, AnswerValue> {
    intake(&[
        ("room_count", num(150.0)),
        ("hotel_class", txt("midscale")),
        ("has_pool", flag(true)),
        ("has_restaurant", flag(true)),
        ("has_laundry", flag(false)),
        ("occupancy_rate", num(0.72)),
        ("monthly_bill", num(21_000.0)),
        ("operating_hours", num(24.0)),
        ("grid_connection", txt("reliable")),
    ])
}
