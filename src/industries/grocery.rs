use crate::industries::types::{IndustryCalculator, ProfileSpec, build_profile};
use crate::industries::Industry;
use crate::quote::normalize::BILL_ESTIMATED_PEAK_KW;
use crate::quote::types::{CalculationInput, LoadProfile};

/// Grocery store calculator. Refrigerated case lineups set the tone: they
/// run around the clock and usually carry 40-60% of peak.
pub struct Grocery;

const KW_PER_CASE_FT: f64 = 0.25;
const REFRIG_W_PER_SQFT: f64 = 4.5;
const HVAC_W_PER_SQFT: f64 = 2.5;
const LIGHTING_W_PER_SQFT: f64 = 1.5;
const PLUG_W_PER_SQFT: f64 = 1.0;
const DELI_BAKERY_KW: f64 = 40.0;

impl IndustryCalculator for Grocery {
    fn industry(&self) -> Industry {
        Industry::Grocery
    }

    fn compute(&self, input: &CalculationInput) -> LoadProfile {
        let sqft = input.number("facility_sqft");
        // Case footage is the better signal when the intake has it.
        let refrigeration = if input.number("refrigeration_linear_ft") > 0.0 {
            input.number("refrigeration_linear_ft") * KW_PER_CASE_FT
        } else {
            sqft * REFRIG_W_PER_SQFT / 1000.0
        };
        let deli = if input.flag("has_deli") { DELI_BAKERY_KW } else { 0.0 };

        build_profile(ProfileSpec {
            contributors: vec![
                ("refrigeration", refrigeration),
                ("hvac", sqft * HVAC_W_PER_SQFT / 1000.0),
                ("lighting", sqft * LIGHTING_W_PER_SQFT / 1000.0),
                ("deli_bakery", deli),
                ("plug_loads", sqft * PLUG_W_PER_SQFT / 1000.0),
            ],
            diversity: 0.90,
            floor_kw: 30.0,
            base_fraction: 0.55,
            duty_cycle: 0.60,
            fallback_peak_kw: input.number(BILL_ESTIMATED_PEAK_KW),
        })
    }
}
