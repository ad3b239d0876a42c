use crate::industries::Industry;
use crate::quote::types::{AnswerValue, CalculationInput};

/// Answer shape and default for one intake question.
#[derive(Debug, Clone, Copy)]
pub enum QuestionKind {
    Number {
        default: f64,
        unit: &'static str,
    },
    Select {
        options: &'static [&'static str],
        default: &'static str,
    },
    Flag {
        default: bool,
    },
}

/// One question in an industry intake template.
///
/// Questions are static data: the engine never prompts, it only uses the
/// template to default missing answers, reject malformed ones, and score
/// how much of the intake the customer actually filled in.
#[derive(Debug, Clone, Copy)]
pub struct QuestionDef {
    pub key: &'static str,
    pub prompt: &'static str,
    pub kind: QuestionKind,
}

impl QuestionDef {
    pub const fn number(key: &'static str, prompt: &'static str, unit: &'static str, default: f64) -> Self {
        QuestionDef {
            key,
            prompt,
            kind: QuestionKind::Number { default, unit },
        }
    }

    pub const fn select(
        key: &'static str,
        prompt: &'static str,
        options: &'static [&'static str],
        default: &'static str,
    ) -> Self {
        QuestionDef {
            key,
            prompt,
            kind: QuestionKind::Select { options, default },
        }
    }

    pub const fn flag(key: &'static str, prompt: &'static str, default: bool) -> Self {
        QuestionDef {
            key,
            prompt,
            kind: QuestionKind::Flag { default },
        }
    }

    /// Default answer materialized for a missing or rejected value.
    pub fn default_value(&self) -> AnswerValue {
        match self.kind {
            QuestionKind::Number { default, .. } => AnswerValue::Number(default),
            QuestionKind::Select { default, .. } => AnswerValue::Text(default.to_string()),
            QuestionKind::Flag { default } => AnswerValue::Flag(default),
        }
    }
}

/// Intake template for one industry.
///
/// `driver_fields` are the primary load drivers: a quote needs at least
/// one of them supplied positive, or a peak/bill anchor, before the
/// calculator can say anything defensible. The three field classes below
/// them feed the confidence score.
#[derive(Debug)]
pub struct IndustryTemplate {
    pub industry: Industry,
    pub questions: &'static [QuestionDef],
    pub driver_fields: &'static [&'static str],
    pub detail_fields: &'static [&'static str],
    pub throughput_fields: &'static [&'static str],
    pub motor_fields: &'static [&'static str],
}

impl IndustryTemplate {
    /// Universal questions followed by the industry-specific ones.
    pub fn all_questions(&self) -> impl Iterator<Item = &'static QuestionDef> {
        UNIVERSAL_QUESTIONS.iter().chain(self.questions.iter())
    }

    pub fn question(&self, key: &str) -> Option<&'static QuestionDef> {
        self.all_questions().find(|q| q.key == key)
    }
}

/// Universal questions the intake insists on. When these come back blank
/// the engine still defaults them, but the quote is flagged as estimated.
pub const REQUIRED_UNIVERSAL: &[&str] = &["operating_hours", "grid_connection"];

/// Questions asked of every facility regardless of industry.
pub const UNIVERSAL_QUESTIONS: &[QuestionDef] = &[
    QuestionDef::number("facility_sqft", "Facility floor area", "sqft", 10_000.0),
    QuestionDef::number("operating_hours", "Daily operating hours", "hours", 12.0),
    QuestionDef::number("peak_kw", "Metered peak demand, if known", "kW", 0.0),
    QuestionDef::number("monthly_bill", "Average monthly electric bill", "USD", 0.0),
    QuestionDef::number("electrical_service_amps", "Electrical service size", "A", 0.0),
    QuestionDef::select(
        "grid_connection",
        "Grid connection quality",
        &["reliable", "unreliable", "limited", "off_grid", "microgrid"],
        "reliable",
    ),
    QuestionDef::number("grid_capacity_kw", "Interconnection limit, 0 if none", "kW", 0.0),
    QuestionDef::select(
        "primary_goal",
        "Primary goal for the battery",
        &["peak_shaving", "arbitrage", "resilience"],
        "peak_shaving",
    ),
    QuestionDef::number("critical_load_fraction", "Share of load that must ride through an outage", "", 0.3),
    QuestionDef::number("backup_runtime_hours", "Required backup runtime", "hours", 4.0),
    QuestionDef::flag("expansion_plans", "Expansion planned within 5 years", false),
];

const CAR_WASH_QUESTIONS: &[QuestionDef] = &[
    QuestionDef::number("wash_bays", "Number of wash bays", "", 0.0),
    QuestionDef::select(
        "wash_type",
        "Wash format",
        &["tunnel", "in_bay", "self_serve"],
        "tunnel",
    ),
    QuestionDef::number("cars_per_day", "Cars washed per day", "", 0.0),
    QuestionDef::number("largest_motor_hp", "Largest single motor", "hp", 0.0),
    QuestionDef::flag("has_water_reclaim", "Water reclaim system installed", false),
];

const HOTEL_QUESTIONS: &[QuestionDef] = &[
    QuestionDef::number("room_count", "Number of guest rooms", "", 0.0),
    QuestionDef::select(
        "hotel_class",
        "Service class",
        &["economy", "midscale", "upscale", "luxury"],
        "midscale",
    ),
    QuestionDef::flag("has_pool", "Pool on site", false),
    QuestionDef::flag("has_restaurant", "Restaurant on site", false),
    QuestionDef::flag("has_laundry", "Commercial laundry on site", false),
    QuestionDef::number("occupancy_rate", "Typical occupancy", "", 0.7),
];

const DATA_CENTER_QUESTIONS: &[QuestionDef] = &[
    QuestionDef::number("it_load_kw", "Provisioned IT load", "kW", 0.0),
    QuestionDef::number("rack_count", "Rack count", "", 0.0),
    QuestionDef::number("kw_per_rack", "Average draw per rack", "kW", 8.0),
    QuestionDef::select(
        "tier",
        "Uptime tier",
        &["tier_1", "tier_2", "tier_3", "tier_4"],
        "tier_3",
    ),
    QuestionDef::number("pue", "Design PUE, 0 to derive from tier", "", 0.0),
];

const HOSPITAL_QUESTIONS: &[QuestionDef] = &[
    QuestionDef::number("bed_count", "Licensed beds", "", 0.0),
    QuestionDef::number("imaging_suites", "Imaging suites (MRI/CT)", "", 0.0),
    QuestionDef::number("operating_rooms", "Operating rooms", "", 0.0),
    QuestionDef::number("occupancy_rate", "Average census", "", 0.75),
];

const OFFICE_QUESTIONS: &[QuestionDef] = &[
    QuestionDef::flag("has_server_room", "On-premise server room", false),
];

const MANUFACTURING_QUESTIONS: &[QuestionDef] = &[
    QuestionDef::number("total_motor_hp", "Total connected motor load", "hp", 0.0),
    QuestionDef::number("process_kw", "Non-motor process load", "kW", 0.0),
    QuestionDef::number("shifts", "Production shifts per day", "", 1.0),
    QuestionDef::number("largest_motor_hp", "Largest single motor", "hp", 0.0),
];

const EV_CHARGING_QUESTIONS: &[QuestionDef] = &[
    QuestionDef::number("level2_count", "Level 2 pedestals", "", 0.0),
    QuestionDef::number("dcfc_count", "DC fast chargers", "", 0.0),
    QuestionDef::number("sessions_per_day", "Charging sessions per day", "", 0.0),
];

const GROCERY_QUESTIONS: &[QuestionDef] = &[
    QuestionDef::number("refrigeration_linear_ft", "Refrigerated case footage", "ft", 0.0),
    QuestionDef::flag("has_deli", "Deli or bakery on site", false),
    QuestionDef::number("daily_customers", "Customers per day", "", 0.0),
];

const COLD_STORAGE_QUESTIONS: &[QuestionDef] = &[
    QuestionDef::number("freezer_fraction", "Share of space held below freezing", "", 0.3),
    QuestionDef::number("largest_motor_hp", "Largest compressor motor", "hp", 0.0),
    QuestionDef::number("pallets_per_day", "Pallets moved per day", "", 0.0),
];

const RESTAURANT_QUESTIONS: &[QuestionDef] = &[
    QuestionDef::number("seat_count", "Seats", "", 0.0),
    QuestionDef::select(
        "kitchen_type",
        "Kitchen format",
        &["full_service", "quick_service"],
        "full_service",
    ),
    QuestionDef::number("walk_in_coolers", "Walk-in coolers/freezers", "", 0.0),
    QuestionDef::number("covers_per_day", "Covers per day", "", 0.0),
];

const INDOOR_FARM_QUESTIONS: &[QuestionDef] = &[
    QuestionDef::number("canopy_sqft", "Canopy area under lights", "sqft", 0.0),
    QuestionDef::select("light_type", "Grow light technology", &["led", "hps"], "led"),
    QuestionDef::number("harvest_cycles_per_year", "Harvest cycles per year", "", 0.0),
];

const WAREHOUSE_QUESTIONS: &[QuestionDef] = &[
    QuestionDef::number("dock_doors", "Dock doors", "", 0.0),
    QuestionDef::number("forklift_count", "Electric forklifts", "", 0.0),
    QuestionDef::number("pallets_per_day", "Pallets moved per day", "", 0.0),
];

const OTHER_QUESTIONS: &[QuestionDef] = &[
    QuestionDef::select(
        "load_intensity",
        "Rough electrical intensity",
        &["low", "medium", "high"],
        "medium",
    ),
];

static TEMPLATES: [IndustryTemplate; 15] = [
    IndustryTemplate {
        industry: Industry::CarWash,
        questions: CAR_WASH_QUESTIONS,
        driver_fields: &["wash_bays"],
        detail_fields: &["wash_bays", "wash_type", "has_water_reclaim"],
        throughput_fields: &["cars_per_day"],
        motor_fields: &["largest_motor_hp"],
    },
    IndustryTemplate {
        industry: Industry::Hotel,
        questions: HOTEL_QUESTIONS,
        driver_fields: &["room_count"],
        detail_fields: &["room_count", "hotel_class", "has_pool", "has_restaurant", "has_laundry"],
        throughput_fields: &["occupancy_rate"],
        motor_fields: &[],
    },
    IndustryTemplate {
        industry: Industry::DataCenter,
        questions: DATA_CENTER_QUESTIONS,
        driver_fields: &["it_load_kw", "rack_count"],
        detail_fields: &["it_load_kw", "rack_count", "tier", "pue"],
        throughput_fields: &[],
        motor_fields: &[],
    },
    IndustryTemplate {
        industry: Industry::Hospital,
        questions: HOSPITAL_QUESTIONS,
        driver_fields: &["bed_count"],
        detail_fields: &["bed_count", "imaging_suites", "operating_rooms"],
        throughput_fields: &["occupancy_rate"],
        motor_fields: &[],
    },
    IndustryTemplate {
        industry: Industry::Office,
        questions: OFFICE_QUESTIONS,
        driver_fields: &["facility_sqft"],
        detail_fields: &["facility_sqft", "has_server_room"],
        throughput_fields: &["operating_hours"],
        motor_fields: &[],
    },
    IndustryTemplate {
        industry: Industry::Manufacturing,
        questions: MANUFACTURING_QUESTIONS,
        driver_fields: &["total_motor_hp", "process_kw"],
        detail_fields: &["process_kw", "shifts", "facility_sqft"],
        throughput_fields: &["shifts"],
        motor_fields: &["total_motor_hp", "largest_motor_hp"],
    },
    IndustryTemplate {
        industry: Industry::EvCharging,
        questions: EV_CHARGING_QUESTIONS,
        driver_fields: &["level2_count", "dcfc_count"],
        detail_fields: &["level2_count", "dcfc_count"],
        throughput_fields: &["sessions_per_day"],
        motor_fields: &[],
    },
    IndustryTemplate {
        industry: Industry::Grocery,
        questions: GROCERY_QUESTIONS,
        driver_fields: &["facility_sqft"],
        detail_fields: &["refrigeration_linear_ft", "has_deli"],
        throughput_fields: &["daily_customers"],
        motor_fields: &[],
    },
    IndustryTemplate {
        industry: Industry::ColdStorage,
        questions: COLD_STORAGE_QUESTIONS,
        driver_fields: &["facility_sqft"],
        detail_fields: &["freezer_fraction"],
        throughput_fields: &["pallets_per_day"],
        motor_fields: &["largest_motor_hp"],
    },
    IndustryTemplate {
        industry: Industry::Restaurant,
        questions: RESTAURANT_QUESTIONS,
        driver_fields: &["seat_count"],
        detail_fields: &["seat_count", "kitchen_type", "walk_in_coolers"],
        throughput_fields: &["covers_per_day"],
        motor_fields: &[],
    },
    IndustryTemplate {
        industry: Industry::IndoorFarm,
        questions: INDOOR_FARM_QUESTIONS,
        driver_fields: &["canopy_sqft"],
        detail_fields: &["canopy_sqft", "light_type"],
        throughput_fields: &["harvest_cycles_per_year"],
        motor_fields: &[],
    },
    IndustryTemplate {
        industry: Industry::Warehouse,
        questions: WAREHOUSE_QUESTIONS,
        driver_fields: &["facility_sqft"],
        detail_fields: &["dock_doors", "forklift_count"],
        throughput_fields: &["pallets_per_day", "operating_hours"],
        motor_fields: &[],
    },
    IndustryTemplate {
        industry: Industry::Airport,
        questions: &[],
        driver_fields: &["facility_sqft"],
        detail_fields: &[],
        throughput_fields: &["operating_hours"],
        motor_fields: &[],
    },
    IndustryTemplate {
        industry: Industry::Stadium,
        questions: &[],
        driver_fields: &["facility_sqft"],
        detail_fields: &[],
        throughput_fields: &["operating_hours"],
        motor_fields: &[],
    },
    IndustryTemplate {
        industry: Industry::Other,
        questions: OTHER_QUESTIONS,
        driver_fields: &["facility_sqft"],
        detail_fields: &["load_intensity"],
        throughput_fields: &["operating_hours"],
        motor_fields: &[],
    },
];

/// Intake template for an industry. Every variant has one; coverage gaps
/// are a property of the calculator registry, not of the templates.
pub fn template_for(industry: Industry) -> &'static IndustryTemplate {
    TEMPLATES
        .iter()
        .find(|t| t.industry == industry)
        .unwrap_or(&TEMPLATES[TEMPLATES.len() - 1])
}

// Confidence weights. Service size and the bill are the two strongest
// anchors a customer can hand us; the rest measures intake completeness.
const WEIGHT_SERVICE: f64 = 0.25;
const WEIGHT_BILL: f64 = 0.25;
const WEIGHT_DETAIL: f64 = 0.20;
const WEIGHT_THROUGHPUT: f64 = 0.15;
const WEIGHT_MOTOR: f64 = 0.15;

/// Scores how well-anchored a quote is, in `[0, 1]`.
///
/// Classes a template does not have (a hotel has no motor schedule) drop
/// out of the denominator, so a fully-answered intake always scores 1.0.
pub fn confidence_score(template: &IndustryTemplate, input: &CalculationInput) -> f64 {
    let mut earned = 0.0;
    let mut applicable = 0.0;

    applicable += WEIGHT_SERVICE;
    if input.supplied_positive("peak_kw") || input.supplied_positive("electrical_service_amps") {
        earned += WEIGHT_SERVICE;
    }

    applicable += WEIGHT_BILL;
    if input.supplied_positive("monthly_bill") {
        earned += WEIGHT_BILL;
    }

    for (fields, weight) in [
        (template.detail_fields, WEIGHT_DETAIL),
        (template.throughput_fields, WEIGHT_THROUGHPUT),
        (template.motor_fields, WEIGHT_MOTOR),
    ] {
        if fields.is_empty() {
            continue;
        }
        applicable += weight;
        let supplied = fields.iter().filter(|f| input.supplied(f)).count();
        earned += weight * supplied as f64 / fields.len() as f64;
    }

    if applicable > 0.0 { earned / applicable } else { 0.0 }
}
