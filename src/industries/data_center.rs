use crate::industries::types::{IndustryCalculator, ProfileSpec, build_profile};
use crate::industries::Industry;
use crate::quote::normalize::BILL_ESTIMATED_PEAK_KW;
use crate::quote::types::{CalculationInput, LoadProfile};

/// Data-center load calculator.
///
/// Facility demand is the IT load plus PUE overhead. The overhead block
/// `(pue - 1) x IT` is split into cooling, power-distribution losses, and
/// lighting/ancillary. Diversity scales every contributor alike, so
/// `peak / it_load contributor` still reproduces the design PUE.
pub struct DataCenter;

/// Overhead split of `(pue - 1) x IT`.
const COOLING_SHARE: f64 = 0.7;
const POWER_DIST_SHARE: f64 = 0.2;
const LIGHTING_SHARE: f64 = 0.1;

/// Design PUE by uptime tier, used when the intake gives no explicit PUE.
pub(crate) fn tier_pue(tier: &str) -> f64 {
    match tier {
        "tier_1" => 1.8,
        "tier_2" => 1.7,
        "tier_4" => 1.5,
        // tier_3 and anything unrecognized
        _ => 1.6,
    }
}

impl IndustryCalculator for DataCenter {
    fn industry(&self) -> Industry {
        Industry::DataCenter
    }

    fn compute(&self, input: &CalculationInput) -> LoadProfile {
        let it_load = if input.number("it_load_kw") > 0.0 {
            input.number("it_load_kw")
        } else {
            let per_rack = if input.number("kw_per_rack") > 0.0 {
                input.number("kw_per_rack")
            } else {
                8.0
            };
            input.number("rack_count") * per_rack
        };

        let pue = if input.number("pue") > 1.0 {
            input.number("pue")
        } else {
            tier_pue(input.text("tier").unwrap_or("tier_3"))
        };
        let overhead = it_load * (pue - 1.0);

        build_profile(ProfileSpec {
            contributors: vec![
                ("it_load", it_load),
                ("cooling", overhead * COOLING_SHARE),
                ("power_distribution", overhead * POWER_DIST_SHARE),
                ("lighting_ancillary", overhead * LIGHTING_SHARE),
            ],
            diversity: 0.80,
            floor_kw: 100.0,
            base_fraction: 0.90,
            duty_cycle: 0.88,
            fallback_peak_kw: input.number(BILL_ESTIMATED_PEAK_KW),
        })
    }
}
