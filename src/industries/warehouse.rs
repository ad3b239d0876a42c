use crate::industries::types::{IndustryCalculator, ProfileSpec, build_profile};
use crate::industries::Industry;
use crate::quote::normalize::BILL_ESTIMATED_PEAK_KW;
use crate::quote::types::{CalculationInput, LoadProfile};

/// Dry-goods logistics warehouse: light W/sqft blocks plus dock and
/// forklift-charging adders.
pub struct Warehouse;

const LIGHTING_W_PER_SQFT: f64 = 0.8;
const HVAC_W_PER_SQFT: f64 = 1.2;
const KW_PER_DOCK_DOOR: f64 = 3.0;
const KW_PER_FORKLIFT: f64 = 3.0;

impl IndustryCalculator for Warehouse {
    fn industry(&self) -> Industry {
        Industry::Warehouse
    }

    fn compute(&self, input: &CalculationInput) -> LoadProfile {
        let sqft = input.number("facility_sqft");
        let duty = (input.number("operating_hours") / 24.0 * 0.6).clamp(0.10, 0.55);

        build_profile(ProfileSpec {
            contributors: vec![
                ("lighting", sqft * LIGHTING_W_PER_SQFT / 1000.0),
                ("hvac", sqft * HVAC_W_PER_SQFT / 1000.0),
                ("dock_equipment", input.number("dock_doors") * KW_PER_DOCK_DOOR),
                (
                    "forklift_charging",
                    input.number("forklift_count") * KW_PER_FORKLIFT,
                ),
            ],
            diversity: 0.90,
            floor_kw: 25.0,
            base_fraction: 0.20,
            duty_cycle: duty,
            fallback_peak_kw: input.number(BILL_ESTIMATED_PEAK_KW),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quote::types::AnswerValue;

    fn input(pairs: Vec<(&str, f64)>) -> CalculationInput {
        CalculationInput {
            industry: Industry::Warehouse,
            values: pairs
                .into_iter()
                .map(|(k, v)| (k.to_string(), AnswerValue::Number(v)))
                .collect(),
            defaulted_fields: Default::default(),
            missing_required: Vec::new(),
        }
    }

    #[test]
    fn distribution_center() {
        let profile = Warehouse.compute(&input(vec![
            ("facility_sqft", 100_000.0),
            ("dock_doors", 20.0),
            ("forklift_count", 15.0),
            ("operating_hours", 16.0),
        ]));
        // (80 + 120 + 60 + 45) * 0.9 = 274.5
        assert!((profile.peak_load_kw - 274.5).abs() < 1e-9);
        assert!((profile.duty_cycle - 0.4).abs() < 1e-9);
    }

    #[test]
    fn sqft_drives_peak() {
        let small = Warehouse.compute(&input(vec![("facility_sqft", 40_000.0)]));
        let large = Warehouse.compute(&input(vec![("facility_sqft", 120_000.0)]));
        assert!(large.peak_load_kw > small.peak_load_kw);
    }
}
