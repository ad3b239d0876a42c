//! Intake normalization: canonical keys, scrubbed values, tracked defaults.

use std::collections::{BTreeMap, BTreeSet};

use crate::error::QuoteError;
use crate::industries::Industry;
use crate::quote::template::{IndustryTemplate, QuestionDef, QuestionKind};
use crate::quote::types::{AnswerValue, CalculationInput};

/// Derived field holding the peak estimated from the monthly bill. Synthetic:
/// always overwritten by the normalizer, never taken from the intake.
pub const BILL_ESTIMATED_PEAK_KW: &str = "bill_estimated_peak_kw";

/// Blended commercial rate used to back out annual kWh from a bill.
const BLENDED_RATE_USD_PER_KWH: f64 = 0.12;

/// Assumed load factor when estimating peak from average demand.
const ESTIMATE_LOAD_FACTOR: f64 = 0.45;

/// Fields that are fractions of 1; percent-style answers get divided down.
const FRACTION_FIELDS: &[&str] = &["critical_load_fraction", "occupancy_rate", "freezer_fraction"];

/// Normalizes one raw intake against an industry template.
///
/// Key canonicalization first (camelCase, synonyms), then per-question
/// scrubbing, then defaults for anything missing or rejected. Every
/// default is recorded in `defaulted_fields` so downstream validation can
/// tell estimated quotes from customer-anchored ones.
///
/// # Errors
///
/// Returns [`QuoteError::InputValidation`] when none of the template's
/// driver fields is supplied positive and there is no peak or bill anchor
/// to estimate from. Anything softer than that is a warning, not an error.
pub fn normalize(
    industry: Industry,
    raw: &BTreeMap<String, AnswerValue>,
    template: &IndustryTemplate,
) -> Result<CalculationInput, QuoteError> {
    let mut values: BTreeMap<String, AnswerValue> = BTreeMap::new();
    for (key, value) in raw {
        values.insert(canonical_key(key), value.clone());
    }
    // derived, never intake-supplied
    values.remove(BILL_ESTIMATED_PEAK_KW);

    let mut defaulted: BTreeSet<String> = BTreeSet::new();
    for question in template.all_questions() {
        match values.get(question.key).and_then(|v| scrub(question, v)) {
            Some(clean) => {
                values.insert(question.key.to_string(), clean);
            }
            None => {
                values.insert(question.key.to_string(), question.default_value());
                defaulted.insert(question.key.to_string());
            }
        }
    }

    let mut input = CalculationInput {
        industry,
        values,
        defaulted_fields: defaulted,
        missing_required: Vec::new(),
    };

    if input.number("monthly_bill") > 0.0 {
        let annual_kwh = input.number("monthly_bill") * 12.0 / BLENDED_RATE_USD_PER_KWH;
        let estimated_peak = annual_kwh / crate::industries::HOURS_PER_YEAR / ESTIMATE_LOAD_FACTOR;
        input
            .values
            .insert(BILL_ESTIMATED_PEAK_KW.to_string(), AnswerValue::Number(estimated_peak));
        input.defaulted_fields.insert(BILL_ESTIMATED_PEAK_KW.to_string());
    }

    let has_driver = template
        .driver_fields
        .iter()
        .any(|f| input.supplied_positive(f));
    let has_anchor =
        input.supplied_positive("peak_kw") || input.supplied_positive("monthly_bill");
    if !has_driver && !has_anchor {
        let missing: Vec<String> = template
            .driver_fields
            .iter()
            .map(|f| f.to_string())
            .collect();
        return Err(QuoteError::InputValidation { missing });
    }

    Ok(input)
}

/// Validates one raw value against its question; `None` means rejected
/// (caller substitutes the default).
fn scrub(question: &QuestionDef, value: &AnswerValue) -> Option<AnswerValue> {
    match question.kind {
        QuestionKind::Number { .. } => {
            let n = lenient_number(value)?;
            if !n.is_finite() || n < 0.0 {
                return None;
            }
            let n = if FRACTION_FIELDS.contains(&question.key) && n > 1.0 && n <= 100.0 {
                n / 100.0
            } else {
                n
            };
            Some(AnswerValue::Number(n))
        }
        QuestionKind::Select { options, .. } => {
            let text = match value {
                AnswerValue::Text(s) => s,
                _ => return None,
            };
            let canon = text.trim().to_lowercase().replace([' ', '-'], "_");
            options
                .iter()
                .find(|o| **o == canon)
                .map(|o| AnswerValue::Text((*o).to_string()))
        }
        QuestionKind::Flag { .. } => match value {
            AnswerValue::Flag(b) => Some(AnswerValue::Flag(*b)),
            AnswerValue::Number(n) if n.is_finite() => Some(AnswerValue::Flag(*n != 0.0)),
            AnswerValue::Text(s) => match s.trim().to_lowercase().as_str() {
                "true" | "yes" | "y" | "1" => Some(AnswerValue::Flag(true)),
                "false" | "no" | "n" | "0" => Some(AnswerValue::Flag(false)),
                _ => None,
            },
            AnswerValue::Number(_) => None,
        },
    }
}

/// Numeric reading that also accepts formatted strings ("$3,200", "85%").
fn lenient_number(value: &AnswerValue) -> Option<f64> {
    match value {
        AnswerValue::Number(n) => Some(*n),
        AnswerValue::Flag(_) => None,
        AnswerValue::Text(s) => {
            let cleaned: String = s
                .trim()
                .chars()
                .filter(|c| !matches!(c, '$' | ',' | '%' | ' '))
                .collect();
            cleaned.parse::<f64>().ok()
        }
    }
}

/// Maps a raw intake key to its canonical snake_case field name.
fn canonical_key(raw: &str) -> String {
    let snake = snake_case(raw.trim());
    match snake.as_str() {
        "sqft" | "square_feet" | "square_footage" | "building_sqft" => "facility_sqft",
        "hours" | "hours_per_day" | "daily_hours" => "operating_hours",
        "peak_demand_kw" | "peak_load_kw" | "demand_kw" => "peak_kw",
        "avg_monthly_bill" | "monthly_electric_bill" | "electric_bill" => "monthly_bill",
        "service_amps" | "main_breaker_amps" | "amps" => "electrical_service_amps",
        "grid" | "grid_reliability" => "grid_connection",
        "interconnection_limit_kw" | "grid_limit_kw" => "grid_capacity_kw",
        "goal" | "objective" | "use_case" => "primary_goal",
        "critical_load_pct" => "critical_load_fraction",
        "rooms" | "number_of_rooms" | "guest_rooms" => "room_count",
        "bays" | "num_bays" | "bay_count" => "wash_bays",
        "beds" | "licensed_beds" => "bed_count",
        "racks" => "rack_count",
        "seats" => "seat_count",
        "it_load" | "it_kw" => "it_load_kw",
        "level_2_count" | "l2_count" => "level2_count",
        "dcfc" | "fast_chargers" | "dc_fast_count" => "dcfc_count",
        "canopy_area_sqft" | "grow_area_sqft" => "canopy_sqft",
        "motor_hp" | "connected_hp" => "total_motor_hp",
        _ => return snake,
    }
    .to_string()
}

/// camelCase / PascalCase / kebab-case → snake_case.
fn snake_case(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len() + 4);
    let mut prev_lower = false;
    for c in raw.chars() {
        if c.is_ascii_uppercase() {
            if prev_lower {
                out.push('_');
            }
            out.push(c.to_ascii_lowercase());
            prev_lower = false;
        } else if c == '-' || c == ' ' {
            if !out.ends_with('_') {
                out.push('_');
            }
            prev_lower = false;
        } else {
            out.push(c);
            prev_lower = c.is_ascii_lowercase() || c.is_ascii_digit();
        }
    }
    out.trim_matches('_').to_string()
}
