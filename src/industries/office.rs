use crate::industries::types::{IndustryCalculator, ProfileSpec, build_profile};
use crate::industries::Industry;
use crate::quote::normalize::BILL_ESTIMATED_PEAK_KW;
use crate::quote::types::{CalculationInput, LoadProfile};

/// Office load calculator: watts-per-square-foot blocks plus an optional
/// server-room adder. Duty cycle follows the stated operating schedule.
pub struct Office;

// W/sqft by end use
const HVAC_W: f64 = 3.5;
const LIGHTING_W: f64 = 1.2;
const PLUG_W: f64 = 2.0;
const VERTICAL_TRANSPORT_W: f64 = 0.5;

const SERVER_ROOM_KW: f64 = 15.0;

impl IndustryCalculator for Office {
    fn industry(&self) -> Industry {
        Industry::Office
    }

    fn compute(&self, input: &CalculationInput) -> LoadProfile {
        let sqft = input.number("facility_sqft");
        let server_room = if input.flag("has_server_room") {
            SERVER_ROOM_KW
        } else {
            0.0
        };
        let duty = (input.number("operating_hours") / 24.0 * 0.8).clamp(0.15, 0.70);

        build_profile(ProfileSpec {
            contributors: vec![
                ("hvac", sqft * HVAC_W / 1000.0),
                ("lighting", sqft * LIGHTING_W / 1000.0),
                ("plug_loads", sqft * PLUG_W / 1000.0),
                ("vertical_transport", sqft * VERTICAL_TRANSPORT_W / 1000.0),
                ("server_room", server_room),
            ],
            diversity: 0.90,
            floor_kw: 25.0,
            base_fraction: 0.25,
            duty_cycle: duty,
            fallback_peak_kw: input.number(BILL_ESTIMATED_PEAK_KW),
        })
    }
}
