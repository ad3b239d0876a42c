use crate::industries::types::{IndustryCalculator, ProfileSpec, build_profile};
use crate::industries::Industry;
use crate::quote::normalize::BILL_ESTIMATED_PEAK_KW;
use crate::quote::types::{CalculationInput, LoadProfile};

/// Indoor-farm (controlled environment agriculture) calculator. Grow
/// lighting is sized from canopy area; everything else rides on it, since
/// dehumidification and cooling mostly reject the heat the lamps put in.
pub struct IndoorFarm;

const LED_W_PER_SQFT: f64 = 35.0;
const HPS_W_PER_SQFT: f64 = 55.0;
const DEHUMID_W_PER_SQFT: f64 = 8.0;
const HVAC_W_PER_SQFT: f64 = 10.0;
const PUMPS_CONTROLS_W_PER_SQFT: f64 = 2.0;

impl IndustryCalculator for IndoorFarm {
    fn industry(&self) -> Industry {
        Industry::IndoorFarm
    }

    fn compute(&self, input: &CalculationInput) -> LoadProfile {
        let canopy = input.number("canopy_sqft");
        let light_w = match input.text("light_type") {
            Some("hps") => HPS_W_PER_SQFT,
            _ => LED_W_PER_SQFT,
        };

        build_profile(ProfileSpec {
            contributors: vec![
                ("grow_lighting", canopy * light_w / 1000.0),
                ("dehumidification", canopy * DEHUMID_W_PER_SQFT / 1000.0),
                ("hvac", canopy * HVAC_W_PER_SQFT / 1000.0),
                ("pumps_controls", canopy * PUMPS_CONTROLS_W_PER_SQFT / 1000.0),
            ],
            diversity: 0.95,
            floor_kw: 40.0,
            base_fraction: 0.60,
            duty_cycle: 0.75,
            fallback_peak_kw: input.number(BILL_ESTIMATED_PEAK_KW),
        })
    }
}
