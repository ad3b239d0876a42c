use crate::industries::types::{IndustryCalculator, ProfileSpec, build_profile};
use crate::industries::Industry;
use crate::quote::normalize::BILL_ESTIMATED_PEAK_KW;
use crate::quote::types::{CalculationInput, LoadProfile};

/// Fallback calculator for facilities outside the modeled industries.
/// A coarse W/sqft intensity tier is split into generic end-use blocks so
/// downstream invariants (contributor sum, nonzero peak) still hold.
pub struct Generic;

fn intensity_w_per_sqft(tier: &str) -> f64 {
    match tier {
        "low" => 5.0,
        "high" => 12.0,
        // medium default
        _ => 8.0,
    }
}

impl IndustryCalculator for Generic {
    fn industry(&self) -> Industry {
        Industry::Other
    }

    fn compute(&self, input: &CalculationInput) -> LoadProfile {
        let nameplate = input.number("facility_sqft")
            * intensity_w_per_sqft(input.text("load_intensity").unwrap_or("medium"))
            / 1000.0;
        let duty = (input.number("operating_hours") / 24.0 * 0.7).clamp(0.15, 0.65);

        build_profile(ProfileSpec {
            contributors: vec![
                ("hvac", nameplate * 0.40),
                ("lighting", nameplate * 0.25),
                ("plug_loads", nameplate * 0.25),
                ("process", nameplate * 0.10),
            ],
            diversity: 0.90,
            floor_kw: 25.0,
            base_fraction: 0.30,
            duty_cycle: duty,
            fallback_peak_kw: input.number(BILL_ESTIMATED_PEAK_KW),
        })
    }
}
