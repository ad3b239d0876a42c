use crate::industries::types::{IndustryCalculator, ProfileSpec, build_profile};
use crate::industries::Industry;
use crate::quote::normalize::BILL_ESTIMATED_PEAK_KW;
use crate::quote::types::{CalculationInput, LoadProfile};

/// EV charging hub calculator.
///
/// Charger nameplate dominates; the diversity factor reflects that a full
/// plaza rarely has every pedestal at max draw simultaneously. Site
/// services (kiosk, canopy lighting, comms) are a small flat block.
pub struct EvCharging;

const LEVEL2_KW: f64 = 7.2;
const DCFC_KW: f64 = 150.0;
const SITE_SERVICES_KW: f64 = 12.0;

impl IndustryCalculator for EvCharging {
    fn industry(&self) -> Industry {
        Industry::EvCharging
    }

    fn compute(&self, input: &CalculationInput) -> LoadProfile {
        let charging = input.number("level2_count") * LEVEL2_KW
            + input.number("dcfc_count") * DCFC_KW;

        build_profile(ProfileSpec {
            contributors: vec![
                ("charging", charging),
                ("site_services", SITE_SERVICES_KW),
            ],
            diversity: 0.80,
            floor_kw: 25.0,
            base_fraction: 0.10,
            duty_cycle: 0.25,
            fallback_peak_kw: input.number(BILL_ESTIMATED_PEAK_KW),
        })
    }
}
