use crate::industries::types::{IndustryCalculator, ProfileSpec, build_profile};
use crate::industries::Industry;
use crate::quote::normalize::BILL_ESTIMATED_PEAK_KW;
use crate::quote::types::{CalculationInput, LoadProfile};

/// Restaurant calculator. Kitchen line equipment scales with seats; a
/// quick-service kitchen carries a bigger fixed block (fryer/griddle
/// banks) but grows more slowly per seat than full service.
pub struct Restaurant;

const WALK_IN_KW: f64 = 8.0;

fn kitchen_kw(kitchen_type: &str, seats: f64) -> f64 {
    match kitchen_type {
        "quick_service" => 45.0 + seats * 0.25,
        // full_service default
        _ => 30.0 + seats * 0.45,
    }
}

impl IndustryCalculator for Restaurant {
    fn industry(&self) -> Industry {
        Industry::Restaurant
    }

    fn compute(&self, input: &CalculationInput) -> LoadProfile {
        let seats = input.number("seat_count");
        let kitchen_type = input.text("kitchen_type").unwrap_or("full_service");

        build_profile(ProfileSpec {
            contributors: vec![
                ("kitchen", kitchen_kw(kitchen_type, seats)),
                ("hvac", seats * 0.30),
                (
                    "refrigeration",
                    input.number("walk_in_coolers") * WALK_IN_KW + seats * 0.05,
                ),
                ("lighting", seats * 0.12),
            ],
            diversity: 0.80,
            floor_kw: 25.0,
            base_fraction: 0.30,
            duty_cycle: 0.35,
            fallback_peak_kw: input.number(BILL_ESTIMATED_PEAK_KW),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quote::types::AnswerValue;

    fn input(pairs: Vec<(&str, AnswerValue)>) -> CalculationInput {
        CalculationInput {
            industry: Industry::Restaurant,
            values: pairs.into_iter().map(|(k, v)| (k.to_string(), v)).collect(),
            defaulted_fields: Default::default(),
            missing_required: Vec::new(),
        }
    }

    #[test]
    fn eighty_seat_full_service() {
        let profile = Restaurant.compute(&input(vec![
            ("seat_count", AnswerValue::Number(80.0)),
            ("kitchen_type", AnswerValue::Text("full_service".into())),
            ("walk_in_coolers", AnswerValue::Number(2.0)),
        ]));
        // (66 + 24 + 20 + 9.6) * 0.8 = 95.68
        assert!((profile.peak_load_kw - 95.68).abs() < 1e-9);
        assert!(profile.contributor("kitchen") > profile.contributor("hvac"));
    }

    #[test]
    fn quick_service_fixed_block_shows_at_small_seat_counts() {
        let qsr = Restaurant.compute(&input(vec![
            ("seat_count", AnswerValue::Number(20.0)),
            ("kitchen_type", AnswerValue::Text("quick_service".into())),
        ]));
        let fsr = Restaurant.compute(&input(vec![
            ("seat_count", AnswerValue::Number(20.0)),
            ("kitchen_type", AnswerValue::Text("full_service".into())),
        ]));
        assert!(qsr.contributor("kitchen") > fsr.contributor("kitchen"));
    }

    #[test]
    fn seats_drive_peak() {
        let small = Restaurant.compute(&input(vec![("seat_count", AnswerValue::Number(40.0))]));
        let large = Restaurant.compute(&input(vec![("seat_count", AnswerValue::Number(160.0))]));
        assert!(large.peak_load_kw > small.peak_load_kw);
    }
}
