use crate::industries::types::{IndustryCalculator, ProfileSpec, build_profile};
use crate::industries::Industry;
use crate::quote::normalize::BILL_ESTIMATED_PEAK_KW;
use crate::quote::types::{CalculationInput, LoadProfile};

/// Manufacturing load calculator.
///
/// Motor horsepower converts at 746 W/hp nameplate; the plant-wide
/// diversity factor then absorbs the fact that connected motor load never
/// runs all at once. Shift count steers duty cycle and the overnight base
/// fraction rather than peak.
pub struct Manufacturing;

const KW_PER_HP: f64 = 0.746;
const HVAC_LIGHTING_W_PER_SQFT: f64 = 3.0;

fn shift_count(input: &CalculationInput) -> f64 {
    let shifts = input.number("shifts");
    if shifts >= 1.0 { shifts.min(3.0) } else { 1.0 }
}

impl IndustryCalculator for Manufacturing {
    fn industry(&self) -> Industry {
        Industry::Manufacturing
    }

    fn compute(&self, input: &CalculationInput) -> LoadProfile {
        let shifts = shift_count(input);
        let duty = match shifts as u32 {
            1 => 0.30,
            2 => 0.52,
            _ => 0.70,
        };
        let base_fraction = 0.25 + 0.15 * (shifts - 1.0);

        build_profile(ProfileSpec {
            contributors: vec![
                ("motors", input.number("total_motor_hp") * KW_PER_HP),
                ("process", input.number("process_kw")),
                (
                    "hvac_lighting",
                    input.number("facility_sqft") * HVAC_LIGHTING_W_PER_SQFT / 1000.0,
                ),
            ],
            diversity: 0.75,
            floor_kw: 40.0,
            base_fraction,
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
            industry: Industry::Manufacturing,
            values: pairs
                .into_iter()
                .map(|(k, v)| (k.to_string(), AnswerValue::Number(v)))
                .collect(),
            defaulted_fields: Default::default(),
            missing_required: Vec::new(),
        }
    }

    #[test]
    fn motor_heavy_plant() {
        let profile = Manufacturing.compute(&input(vec![
            ("total_motor_hp", 500.0),
            ("process_kw", 150.0),
            ("facility_sqft", 40_000.0),
        ]));
        // (373 + 150 + 120) * 0.75 = 482.25
        assert!((profile.peak_load_kw - 482.25).abs() < 1e-9);
        assert!(profile.contributor("motors") > profile.contributor("process"));
    }

    #[test]
    fn three_shift_plant_runs_flatter() {
        let one = Manufacturing.compute(&input(vec![
            ("total_motor_hp", 200.0),
            ("shifts", 1.0),
        ]));
        let three = Manufacturing.compute(&input(vec![
            ("total_motor_hp", 200.0),
            ("shifts", 3.0),
        ]));
        assert_eq!(one.peak_load_kw, three.peak_load_kw);
        assert!(three.base_load_kw > one.base_load_kw);
        assert!(three.annual_energy_kwh > one.annual_energy_kwh);
    }

    #[test]
    fn more_horsepower_more_peak() {
        let small = Manufacturing.compute(&input(vec![("total_motor_hp", 100.0)]));
        let large = Manufacturing.compute(&input(vec![("total_motor_hp", 400.0)]));
        assert!(large.peak_load_kw > small.peak_load_kw);
    }
}
