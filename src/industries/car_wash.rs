use crate::industries::types::{IndustryCalculator, ProfileSpec, build_profile};
use crate::industries::Industry;
use crate::quote::normalize::BILL_ESTIMATED_PEAK_KW;
use crate::quote::types::{CalculationInput, LoadProfile};

/// Car-wash load calculator.
///
/// Reconstructs peak demand from per-bay equipment: blower/dryer banks,
/// high-pressure pump stations, vacuum islands, water treatment, and
/// building HVAC/lighting. Dryer banks dominate tunnel and in-bay sites,
/// which is what the domain invariant on the `dryer_bank` share checks.
///
/// Per-bay ratings by wash type:
///
/// | type       | dryers | pumps |
/// |------------|--------|-------|
/// | tunnel     | 12 kW  | 5 kW  |
/// | in_bay     | 15 kW  | 7 kW  |
/// | self_serve | none   | 3 kW  |
pub struct CarWash;

/// Simultaneity of wash equipment: conveyor sites stagger cars, so not
/// every dryer and pump peaks at once.
const DIVERSITY: f64 = 0.85;

/// Minimum credible peak for an operating wash site.
const FLOOR_KW: f64 = 25.0;

impl CarWash {
    fn per_bay_kw(wash_type: &str) -> (f64, f64) {
        match wash_type {
            "in_bay" => (15.0, 7.0),
            "self_serve" => (0.0, 3.0),
            // tunnel is the default for unrecognized answers
            _ => (12.0, 5.0),
        }
    }

    fn duty_cycle(wash_type: &str) -> f64 {
        match wash_type {
            "in_bay" => 0.28,
            "self_serve" => 0.22,
            _ => 0.32,
        }
    }
}

impl IndustryCalculator for CarWash {
    fn industry(&self) -> Industry {
        Industry::CarWash
    }

    fn compute(&self, input: &CalculationInput) -> LoadProfile {
        let bays = input.number("wash_bays");
        let wash_type = input.text("wash_type").unwrap_or("tunnel");
        let (dryer_per_bay, pump_per_bay) = Self::per_bay_kw(wash_type);

        let water_treatment = if input.flag("has_water_reclaim") {
            12.0
        } else {
            8.0
        };

        build_profile(ProfileSpec {
            contributors: vec![
                ("dryer_bank", bays * dryer_per_bay),
                ("pump_station", bays * pump_per_bay),
                ("vacuum_island", bays * 1.5),
                ("water_treatment", water_treatment),
                ("lighting_hvac", 10.0),
            ],
            diversity: DIVERSITY,
            floor_kw: FLOOR_KW,
            base_fraction: 0.12,
            duty_cycle: Self::duty_cycle(wash_type),
            fallback_peak_kw: input.number(BILL_ESTIMATED_PEAK_KW),
        })
    }
}
