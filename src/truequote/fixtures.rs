//! Certification fixtures: curated baseline intakes plus seeded fuzz
//! variants.
//!
//! Baselines are realistic, fully-quotable customers, one per industry
//! (coverage-gap industries included, so the harness exercises its skip
//! path). Fuzz variants jitter the baselines to shake out brittle
//! assumptions while staying quotable: load drivers and the required
//! universal answers are never removed.

use std::collections::BTreeMap;

use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::config::FixtureConfig;
use crate::industries::Industry;
use crate::quote::template::{QuestionKind, REQUIRED_UNIVERSAL, template_for};
use crate::quote::types::AnswerValue;

/// One named certification intake.
#[derive(Debug, Clone)]
pub struct Fixture {
    /// Stable identifier used in reports (`"hotel_baseline"`, ...).
    pub label: String,
    pub industry: Industry,
    pub answers: BTreeMap<String, AnswerValue>,
}

fn num(v: f64) -> AnswerValue {
    AnswerValue::Number(v)
}

fn txt(s: &str) -> AnswerValue {
    AnswerValue::Text(s.to_string())
}

fn yes() -> AnswerValue {
    AnswerValue::Flag(true)
}

fn intake(pairs: &[(&str, AnswerValue)]) -> BTreeMap<String, AnswerValue> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}

fn baseline_answers(industry: Industry) -> BTreeMap<String, AnswerValue> {
    match industry {
        Industry::CarWash => intake(&[
            ("wash_bays", num(6.0)),
            ("wash_type", txt("tunnel")),
            ("cars_per_day", num(350.0)),
            ("largest_motor_hp", num(30.0)),
            ("has_water_reclaim", yes()),
            ("monthly_bill", num(3_800.0)),
            ("operating_hours", num(14.0)),
            ("grid_connection", txt("reliable")),
        ]),
        Industry::Hotel => intake(&[
            ("room_count", num(150.0)),
            ("hotel_class", txt("midscale")),
            ("has_pool", yes()),
            ("has_restaurant", yes()),
            ("occupancy_rate", num(0.72)),
            ("operating_hours", num(24.0)),
            ("grid_connection", txt("reliable")),
        ]),
        Industry::DataCenter => intake(&[
            ("it_load_kw", num(9_000.0)),
            ("rack_count", num(600.0)),
            ("pue", num(1.6)),
            ("tier", txt("tier_3")),
            ("primary_goal", txt("resilience")),
            ("critical_load_fraction", num(0.9)),
            ("backup_runtime_hours", num(6.0)),
            ("operating_hours", num(24.0)),
            ("grid_connection", txt("reliable")),
        ]),
        Industry::Hospital => intake(&[
            ("bed_count", num(220.0)),
            ("imaging_suites", num(4.0)),
            ("operating_rooms", num(8.0)),
            ("occupancy_rate", num(0.78)),
            ("primary_goal", txt("resilience")),
            ("critical_load_fraction", num(0.6)),
            ("backup_runtime_hours", num(8.0)),
            ("operating_hours", num(24.0)),
            ("grid_connection", txt("reliable")),
        ]),
        Industry::Office => intake(&[
            ("facility_sqft", num(120_000.0)),
            ("has_server_room", yes()),
            ("monthly_bill", num(14_000.0)),
            ("operating_hours", num(11.0)),
            ("grid_connection", txt("reliable")),
        ]),
        Industry::Manufacturing => intake(&[
            ("total_motor_hp", num(400.0)),
            ("process_kw", num(150.0)),
            ("facility_sqft", num(80_000.0)),
            ("shifts", num(2.0)),
            ("largest_motor_hp", num(75.0)),
            ("operating_hours", num(16.0)),
            ("grid_connection", txt("reliable")),
        ]),
        Industry::EvCharging => intake(&[
            ("level2_count", num(12.0)),
            ("dcfc_count", num(6.0)),
            ("sessions_per_day", num(140.0)),
            ("grid_connection", txt("limited")),
            ("grid_capacity_kw", num(400.0)),
            ("operating_hours", num(24.0)),
        ]),
        Industry::Grocery => intake(&[
            ("facility_sqft", num(45_000.0)),
            ("refrigeration_linear_ft", num(900.0)),
            ("has_deli", yes()),
            ("daily_customers", num(2_200.0)),
            ("operating_hours", num(17.0)),
            ("grid_connection", txt("reliable")),
        ]),
        Industry::ColdStorage => intake(&[
            ("facility_sqft", num(200_000.0)),
            ("freezer_fraction", num(0.4)),
            ("largest_motor_hp", num(100.0)),
            ("pallets_per_day", num(900.0)),
            ("operating_hours", num(24.0)),
            ("grid_connection", txt("reliable")),
        ]),
        Industry::Restaurant => intake(&[
            ("seat_count", num(120.0)),
            ("kitchen_type", txt("full_service")),
            ("walk_in_coolers", num(3.0)),
            ("covers_per_day", num(380.0)),
            ("operating_hours", num(14.0)),
            ("grid_connection", txt("reliable")),
        ]),
        Industry::IndoorFarm => intake(&[
            ("canopy_sqft", num(20_000.0)),
            ("light_type", txt("led")),
            ("harvest_cycles_per_year", num(10.0)),
            ("primary_goal", txt("arbitrage")),
            ("operating_hours", num(24.0)),
            ("grid_connection", txt("reliable")),
        ]),
        Industry::Warehouse => intake(&[
            ("facility_sqft", num(300_000.0)),
            ("dock_doors", num(24.0)),
            ("forklift_count", num(18.0)),
            ("pallets_per_day", num(1_500.0)),
            ("operating_hours", num(16.0)),
            ("grid_connection", txt("reliable")),
        ]),
        Industry::Airport => intake(&[
            ("facility_sqft", num(900_000.0)),
            ("operating_hours", num(20.0)),
            ("grid_connection", txt("reliable")),
        ]),
        Industry::Stadium => intake(&[
            ("facility_sqft", num(1_200_000.0)),
            ("operating_hours", num(8.0)),
            ("grid_connection", txt("reliable")),
        ]),
        Industry::Other => intake(&[
            ("facility_sqft", num(60_000.0)),
            ("load_intensity", txt("medium")),
            ("monthly_bill", num(9_000.0)),
            ("operating_hours", num(12.0)),
            ("grid_connection", txt("reliable")),
        ]),
    }
}

/// One curated baseline per industry, coverage gaps included.
pub fn baseline_fixtures() -> Vec<Fixture> {
    Industry::all()
        .iter()
        .map(|industry| Fixture {
            label: format!("{}_baseline", industry.slug()),
            industry: *industry,
            answers: baseline_answers(*industry),
        })
        .collect()
}

/// Seeded fuzz variants of the baselines for every quotable industry.
///
/// Same seed, same fixtures: each industry gets its own child rng derived
/// by offset, so adding an industry never shifts another one's draws.
pub fn fuzzed_fixtures(seed: u64, cases_per_industry: usize) -> Vec<Fixture> {
    let mut fixtures = Vec::new();
    for (offset, industry) in Industry::all().iter().enumerate() {
        if industry.is_coverage_gap() {
            continue;
        }
        let mut rng = StdRng::seed_from_u64(seed.wrapping_add(offset as u64));
        for case in 0..cases_per_industry {
            fixtures.push(Fixture {
                label: format!("{}_fuzz_{case}", industry.slug()),
                industry: *industry,
                answers: fuzz_intake(*industry, &mut rng),
            });
        }
    }
    fixtures
}

/// Baselines plus the configured number of fuzz cases.
pub fn fixture_set(config: &FixtureConfig) -> Vec<Fixture> {
    let mut fixtures = baseline_fixtures();
    fixtures.extend(fuzzed_fixtures(config.seed, config.fuzz_cases_per_industry));
    fixtures
}

fn fuzz_intake(industry: Industry, rng: &mut StdRng) -> BTreeMap<String, AnswerValue> {
    let template = template_for(industry);
    let mut answers = baseline_answers(industry);

    let keys: Vec<String> = answers.keys().cloned().collect();
    for key in keys {
        let protected = template.driver_fields.contains(&key.as_str())
            || REQUIRED_UNIVERSAL.contains(&key.as_str());
        if !protected && rng.random::<f64>() < 0.2 {
            answers.remove(&key);
            continue;
        }
        match answers.get(&key) {
            Some(AnswerValue::Number(v)) => {
                // fractions stay fractions; everything else scales freely
                let jittered = if key.ends_with("_rate") || key.ends_with("_fraction") {
                    (v * rng.random_range(0.6..=1.3)).min(0.95)
                } else {
                    v * rng.random_range(0.5..=2.5)
                };
                answers.insert(key, AnswerValue::Number(jittered));
            }
            Some(AnswerValue::Flag(_)) => {
                answers.insert(key, AnswerValue::Flag(rng.random::<f64>() < 0.5));
            }
            _ => {}
        }
    }

    for question in template.all_questions() {
        if let QuestionKind::Select { options, .. } = question.kind {
            if answers.contains_key(question.key) && rng.random::<f64>() < 0.35 {
                let pick = options[rng.random_range(0..options.len())];
                answers.insert(question.key.to_string(), AnswerValue::Text(pick.to_string()));
            }
        }
    }

    if rng.random::<f64>() < 0.3 {
        answers.insert(
            "monthly_bill".to_string(),
            AnswerValue::Number(rng.random_range(1_500.0..=60_000.0)),
        );
    }

    answers
}
