use crate::industries::types::{IndustryCalculator, ProfileSpec, build_profile};
use crate::industries::Industry;
use crate::quote::normalize::BILL_ESTIMATED_PEAK_KW;
use crate::quote::types::{CalculationInput, LoadProfile};

/// Hotel load calculator.
///
/// The dominant driver is the guest-room block, modeled as a per-room
/// coincident demand factor by service class. The factors already account
/// for room-to-room diversity (not every PTAC and hair dryer runs at
/// once), so no further diversity is applied on top.
///
/// Amenity blocks (pool plant, restaurant kitchen, commercial laundry)
/// are flat adders switched by the intake flags.
pub struct Hotel;

/// Coincident kW per room by service class.
fn class_factor(hotel_class: &str) -> f64 {
    match hotel_class {
        "economy" => 1.5,
        "upscale" => 2.6,
        "luxury" => 3.2,
        // midscale is the default class
        _ => 2.0,
    }
}

impl IndustryCalculator for Hotel {
    fn industry(&self) -> Industry {
        Industry::Hotel
    }

    fn compute(&self, input: &CalculationInput) -> LoadProfile {
        let rooms = input.number("room_count");
        let class = input.text("hotel_class").unwrap_or("midscale");

        let pool = if input.flag("has_pool") { 50.0 } else { 0.0 };
        let restaurant = if input.flag("has_restaurant") { 75.0 } else { 0.0 };
        let laundry = if input.flag("has_laundry") { 40.0 } else { 0.0 };

        // Occupancy trims energy, not peak: a sold-out night sets the demand
        // charge, so duty cycle is scaled instead of the room block.
        let occupancy = input.number("occupancy_rate").clamp(0.0, 1.0);
        let duty = if occupancy > 0.0 {
            0.40 + 0.25 * occupancy
        } else {
            0.55
        };

        build_profile(ProfileSpec {
            contributors: vec![
                ("guest_rooms", rooms * class_factor(class)),
                ("pool_plant", pool),
                ("restaurant", restaurant),
                ("laundry", laundry),
            ],
            diversity: 1.0,
            floor_kw: 50.0,
            base_fraction: 0.45,
            duty_cycle: duty,
            fallback_peak_kw: input.number(BILL_ESTIMATED_PEAK_KW),
        })
    }
}
