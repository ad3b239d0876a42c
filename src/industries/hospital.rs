use crate::industries::types::{IndustryCalculator, ProfileSpec, build_profile};
use crate::industries::Industry;
use crate::quote::normalize::BILL_ESTIMATED_PEAK_KW;
use crate::quote::types::{CalculationInput, LoadProfile};

/// Hospital load calculator.
///
/// Bed count drives the clinical, HVAC, and support blocks; imaging
/// suites and operating rooms come in as discrete high-draw adders binned
/// separately because they dominate resilience sizing conversations.
pub struct Hospital;

const CLINICAL_KW_PER_BED: f64 = 1.2;
const HVAC_KW_PER_BED: f64 = 0.9;
const SUPPORT_KW_PER_BED: f64 = 0.6;
const IMAGING_KW_PER_SUITE: f64 = 75.0;
const SURGICAL_KW_PER_OR: f64 = 15.0;

impl IndustryCalculator for Hospital {
    fn industry(&self) -> Industry {
        Industry::Hospital
    }

    fn compute(&self, input: &CalculationInput) -> LoadProfile {
        let beds = input.number("bed_count");

        build_profile(ProfileSpec {
            contributors: vec![
                ("clinical", beds * CLINICAL_KW_PER_BED),
                ("hvac", beds * HVAC_KW_PER_BED),
                ("support_services", beds * SUPPORT_KW_PER_BED),
                ("imaging", input.number("imaging_suites") * IMAGING_KW_PER_SUITE),
                ("surgical", input.number("operating_rooms") * SURGICAL_KW_PER_OR),
            ],
            diversity: 0.85,
            floor_kw: 150.0,
            base_fraction: 0.55,
            duty_cycle: 0.62,
            fallback_peak_kw: input.number(BILL_ESTIMATED_PEAK_KW),
        })
    }
}
