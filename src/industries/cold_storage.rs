use crate::industries::types::{IndustryCalculator, ProfileSpec, build_profile};
use crate::industries::Industry;
use crate::quote::normalize::BILL_ESTIMATED_PEAK_KW;
use crate::quote::types::{CalculationInput, LoadProfile};

/// Cold-storage warehouse calculator. Compressor plant intensity depends
/// on the freezer/cooler split; freezer space draws roughly 6 W/sqft
/// against 3.5 W/sqft for coolers.
pub struct ColdStorage;

const FREEZER_W_PER_SQFT: f64 = 6.0;
const COOLER_W_PER_SQFT: f64 = 3.5;
const AIR_HANDLING_W_PER_SQFT: f64 = 0.8;
const LIGHTING_W_PER_SQFT: f64 = 0.6;
const FORKLIFT_W_PER_SQFT: f64 = 0.4;

impl IndustryCalculator for ColdStorage {
    fn industry(&self) -> Industry {
        Industry::ColdStorage
    }

    fn compute(&self, input: &CalculationInput) -> LoadProfile {
        let sqft = input.number("facility_sqft");
        let freezer_fraction = input.number("freezer_fraction").clamp(0.0, 1.0);
        let refrig_w =
            freezer_fraction * FREEZER_W_PER_SQFT + (1.0 - freezer_fraction) * COOLER_W_PER_SQFT;

        build_profile(ProfileSpec {
            contributors: vec![
                ("refrigeration", sqft * refrig_w / 1000.0),
                ("air_handling", sqft * AIR_HANDLING_W_PER_SQFT / 1000.0),
                ("lighting", sqft * LIGHTING_W_PER_SQFT / 1000.0),
                ("forklift_charging", sqft * FORKLIFT_W_PER_SQFT / 1000.0),
            ],
            diversity: 0.90,
            floor_kw: 40.0,
            base_fraction: 0.65,
            duty_cycle: 0.68,
            fallback_peak_kw: input.number(BILL_ESTIMATED_PEAK_KW),
        })
    }
}
