use serde::{Deserialize, Serialize};

use crate::industries::car_wash::CarWash;
use crate::industries::cold_storage::ColdStorage;
use crate::industries::data_center::DataCenter;
use crate::industries::ev_charging::EvCharging;
use crate::industries::generic::Generic;
use crate::industries::grocery::Grocery;
use crate::industries::hospital::Hospital;
use crate::industries::hotel::Hotel;
use crate::industries::indoor_farm::IndoorFarm;
use crate::industries::manufacturing::Manufacturing;
use crate::industries::office::Office;
use crate::industries::restaurant::Restaurant;
use crate::industries::types::IndustryCalculator;
use crate::industries::warehouse::Warehouse;

/// Facility categories the quote engine understands.
///
/// The set is closed on purpose: adding an industry means adding a variant
/// here and wiring its calculator in [`Industry::calculator`], so an intake
/// slug can never dispatch to a calculator that was not reviewed in.
///
/// `Airport` and `Stadium` are recognized by intake but have no calculator
/// yet; quotes for them surface as coverage gaps rather than crashes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Industry {
    CarWash,
    Hotel,
    DataCenter,
    Hospital,
    Office,
    Manufacturing,
    EvCharging,
    Grocery,
    ColdStorage,
    Restaurant,
    IndoorFarm,
    Warehouse,
    Airport,
    Stadium,
    Other,
}

const ALL: [Industry; 15] = [
    Industry::CarWash,
    Industry::Hotel,
    Industry::DataCenter,
    Industry::Hospital,
    Industry::Office,
    Industry::Manufacturing,
    Industry::EvCharging,
    Industry::Grocery,
    Industry::ColdStorage,
    Industry::Restaurant,
    Industry::IndoorFarm,
    Industry::Warehouse,
    Industry::Airport,
    Industry::Stadium,
    Industry::Other,
];

impl Industry {
    /// All known industries, in stable report order.
    pub fn all() -> &'static [Industry] {
        &ALL
    }

    /// Canonical snake_case identifier used in templates, fixtures, and
    /// report rows.
    pub fn slug(&self) -> &'static str {
        match self {
            Industry::CarWash => "car_wash",
            Industry::Hotel => "hotel",
            Industry::DataCenter => "data_center",
            Industry::Hospital => "hospital",
            Industry::Office => "office",
            Industry::Manufacturing => "manufacturing",
            Industry::EvCharging => "ev_charging",
            Industry::Grocery => "grocery",
            Industry::ColdStorage => "cold_storage",
            Industry::Restaurant => "restaurant",
            Industry::IndoorFarm => "indoor_farm",
            Industry::Warehouse => "warehouse",
            Industry::Airport => "airport",
            Industry::Stadium => "stadium",
            Industry::Other => "other",
        }
    }

    /// Human-readable name for report headers.
    pub fn display_name(&self) -> &'static str {
        match self {
            Industry::CarWash => "Car Wash",
            Industry::Hotel => "Hotel",
            Industry::DataCenter => "Data Center",
            Industry::Hospital => "Hospital",
            Industry::Office => "Office",
            Industry::Manufacturing => "Manufacturing",
            Industry::EvCharging => "EV Charging",
            Industry::Grocery => "Grocery",
            Industry::ColdStorage => "Cold Storage",
            Industry::Restaurant => "Restaurant",
            Industry::IndoorFarm => "Indoor Farm",
            Industry::Warehouse => "Warehouse",
            Industry::Airport => "Airport",
            Industry::Stadium => "Stadium",
            Industry::Other => "Other",
        }
    }

    /// Exact slug lookup. Use [`Industry::resolve`] for intake strings.
    pub fn from_slug(slug: &str) -> Option<Industry> {
        ALL.iter().find(|i| i.slug() == slug).copied()
    }

    /// Resolves a raw intake string to an industry.
    ///
    /// Tolerates case, surrounding whitespace, and space/hyphen separators,
    /// and maps common trade synonyms ("supermarket", "qsr", "factory").
    /// Anything unrecognized lands on [`Industry::Other`] so a misspelled
    /// vertical still gets a generic quote instead of an error.
    pub fn resolve(raw: &str) -> Industry {
        let mut canon = raw.trim().to_lowercase();
        canon = canon.replace([' ', '-'], "_");
        while canon.contains("__") {
            canon = canon.replace("__", "_");
        }

        if let Some(industry) = Industry::from_slug(&canon) {
            return industry;
        }
        match canon.as_str() {
            "carwash" | "auto_wash" | "vehicle_wash" => Industry::CarWash,
            "motel" | "resort" | "lodging" => Industry::Hotel,
            "datacenter" | "colo" | "colocation" | "server_farm" => Industry::DataCenter,
            "medical" | "medical_center" | "clinic" => Industry::Hospital,
            "office_building" | "commercial_office" => Industry::Office,
            "factory" | "industrial" | "plant" => Industry::Manufacturing,
            "ev" | "evcharging" | "ev_charging_hub" | "charging_station" => Industry::EvCharging,
            "supermarket" | "grocery_store" => Industry::Grocery,
            "cold_storage_warehouse" | "refrigerated_warehouse" => Industry::ColdStorage,
            "qsr" | "cafe" | "diner" => Industry::Restaurant,
            "vertical_farm" | "cea" | "grow_facility" => Industry::IndoorFarm,
            "logistics" | "logistics_warehouse" | "distribution_center" => Industry::Warehouse,
            _ => Industry::Other,
        }
    }

    /// Load calculator for this industry, or `None` for recognized
    /// verticals that have no model yet.
    pub fn calculator(&self) -> Option<&'static dyn IndustryCalculator> {
        match self {
            Industry::CarWash => Some(&CarWash),
            Industry::Hotel => Some(&Hotel),
            Industry::DataCenter => Some(&DataCenter),
            Industry::Hospital => Some(&Hospital),
            Industry::Office => Some(&Office),
            Industry::Manufacturing => Some(&Manufacturing),
            Industry::EvCharging => Some(&EvCharging),
            Industry::Grocery => Some(&Grocery),
            Industry::ColdStorage => Some(&ColdStorage),
            Industry::Restaurant => Some(&Restaurant),
            Industry::IndoorFarm => Some(&IndoorFarm),
            Industry::Warehouse => Some(&Warehouse),
            Industry::Airport | Industry::Stadium => None,
            Industry::Other => Some(&Generic),
        }
    }

    /// True for industries the intake recognizes but no calculator covers.
    pub fn is_coverage_gap(&self) -> bool {
        self.calculator().is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugs_round_trip() {
        for industry in Industry::all() {
            assert_eq!(Industry::from_slug(industry.slug()), Some(*industry));
        }
    }

    #[test]
    fn resolve_tolerates_formatting() {
        assert_eq!(Industry::resolve("Car Wash"), Industry::CarWash);
        assert_eq!(Industry::resolve("  data-center "), Industry::DataCenter);
        assert_eq!(Industry::resolve("EV  Charging"), Industry::EvCharging);
    }

    #[test]
    fn resolve_maps_trade_synonyms() {
        assert_eq!(Industry::resolve("supermarket"), Industry::Grocery);
        assert_eq!(Industry::resolve("QSR"), Industry::Restaurant);
        assert_eq!(Industry::resolve("colo"), Industry::DataCenter);
        assert_eq!(Industry::resolve("vertical farm"), Industry::IndoorFarm);
    }

    #[test]
    fn unknown_slug_falls_back_to_other() {
        assert_eq!(Industry::resolve("bowling alley"), Industry::Other);
    }

    #[test]
    fn only_airport_and_stadium_lack_calculators() {
        let gaps: Vec<Industry> = Industry::all()
            .iter()
            .filter(|i| i.is_coverage_gap())
            .copied()
            .collect();
        assert_eq!(gaps, vec![Industry::Airport, Industry::Stadium]);
    }

    #[test]
    fn calculators_report_their_own_industry() {
        for industry in Industry::all() {
            if let Some(calc) = industry.calculator() {
                assert_eq!(calc.industry(), *industry);
            }
        }
    }

    #[test]
    fn serde_uses_snake_case() {
        let json = serde_json::to_string(&Industry::EvCharging).unwrap();
        assert_eq!(json, "\"ev_charging\"");
        let back: Industry = serde_json::from_str("\"cold_storage\"").unwrap();
        assert_eq!(back, Industry::ColdStorage);
    }
}
