//! Integration tests for the full quote pipeline across industries.

mod common;

use powerquote::industries::Industry;
use powerquote::quote::PrimaryGoal;

use common::{baseline_engine, flag, hotel_150_rooms, intake, num, txt};

#[test]
fn hotel_150_rooms_matches_the_published_sizing() {
    let engine = baseline_engine();
    let result = engine
        .quote(Industry::Hotel, &hotel_150_rooms())
        .expect("complete hotel intake should quote");

    assert!(
        (result.profile.peak_load_kw - 425.0).abs() < 1e-9,
        "peak {} kW",
        result.profile.peak_load_kw
    );
    assert!((result.sizing.bess_kw - 170.0).abs() < 1e-9);
    assert!((result.sizing.bess_kwh - 680.0).abs() < 1e-9);
    assert!((result.sizing.duration_hours - 4.0).abs() < 1e-9);
    assert_eq!(result.sizing.goal, PrimaryGoal::PeakShaving);
    assert!(result.bom.total_capex > 0.0);
    assert!(result.financials.npv.is_finite());
    assert!(
        result.warnings.is_empty(),
        "unexpected warnings: {:?}",
        result.warnings
    );
}

#[test]
fn car_wash_six_bay_tunnel_lands_in_the_quote_band() {
    let engine = baseline_engine();
    let result = engine
        .quote(
            Industry::CarWash,
            &intake(&[
                ("wash_bays", num(6.0)),
                ("wash_type", txt("tunnel")),
                ("has_water_reclaim", flag(true)),
                ("operating_hours", num(14.0)),
                ("grid_connection", txt("reliable")),
            ]),
        )
        .expect("tunnel intake should quote");

    let peak = result.profile.peak_load_kw;
    assert!(
        (100.0..=150.0).contains(&peak),
        "6-bay tunnel peak {peak} kW outside 100-150"
    );
    assert!(
        result.profile.contributor("dryer_bank") > result.profile.contributor("pump_station"),
        "dryers should dominate a tunnel site"
    );
}

#[test]
fn data_center_sizing_follows_the_pue_math() {
    let engine = baseline_engine();
    let result = engine
        .quote(
            Industry::DataCenter,
            &intake(&[
                ("it_load_kw", num(9_000.0)),
                ("pue", num(1.6)),
                ("tier", txt("tier_3")),
                ("operating_hours", num(24.0)),
                ("grid_connection", txt("reliable")),
            ]),
        )
        .expect("data center intake should quote");

    // 9000 * 1.6 = 14400 kW connected, 0.80 diversity -> 11520 kW coincident
    assert!(
        (result.profile.peak_load_kw - 11_520.0).abs() < 1e-6,
        "peak {} kW",
        result.profile.peak_load_kw
    );
    assert_eq!(result.bom.vendor_category, "utility_scale");
}

#[test]
fn office_with_no_load_signal_is_rejected() {
    let engine = baseline_engine();
    let err = engine
        .quote(
            Industry::Office,
            &intake(&[("facility_sqft", num(0.0)), ("peak_kw", num(0.0))]),
        )
        .expect_err("zero-signal office intake must not quote");
    assert_eq!(err.kind(), "input_validation");
}

#[test]
fn quotes_are_deterministic_across_engine_instances() {
    let first = baseline_engine()
        .quote(Industry::Hotel, &hotel_150_rooms())
        .expect("first engine should quote");
    let second = baseline_engine()
        .quote(Industry::Hotel, &hotel_150_rooms())
        .expect("second engine should quote");

    assert_eq!(first, second);
    // serialized form is byte-identical too
    let a = serde_json::to_string(&first).expect("result should serialize");
    let b = serde_json::to_string(&second).expect("result should serialize");
    assert_eq!(a, b);
}

#[test]
fn more_rooms_never_shrink_the_system() {
    let engine = baseline_engine();
    let mut last_peak = 0.0;
    let mut last_kwh = 0.0;
    for rooms in [60.0, 150.0, 400.0] {
        let result = engine
            .quote(Industry::Hotel, &intake(&[("room_count", num(rooms))]))
            .expect("room-count intake should quote");
        assert!(
            result.profile.peak_load_kw > last_peak,
            "peak fell from {last_peak} at {rooms} rooms"
        );
        assert!(
            result.sizing.bess_kwh > last_kwh,
            "energy fell from {last_kwh} at {rooms} rooms"
        );
        last_peak = result.profile.peak_load_kw;
        last_kwh = result.sizing.bess_kwh;
    }
}

#[test]
fn bigger_systems_price_no_worse_per_kwh() {
    let engine = baseline_engine();
    let small = engine
        .quote(Industry::Hotel, &intake(&[("room_count", num(120.0))]))
        .expect("small hotel should quote");
    let large = engine
        .quote(Industry::Hotel, &intake(&[("room_count", num(800.0))]))
        .expect("large hotel should quote");

    let unit = |r: &powerquote::quote::QuoteResult| r.bom.lines[0].unit_cost;
    assert!(
        unit(&large) <= unit(&small) + 1e-9,
        "battery unit cost rose with size: {} -> {}",
        unit(&small),
        unit(&large)
    );
    assert!(large.bom.total_capex > small.bom.total_capex);
}

#[test]
fn off_grid_hotel_carries_full_peak_with_the_duration_floor() {
    let engine = baseline_engine();
    let mut answers = hotel_150_rooms();
    answers.insert("grid_connection".to_string(), txt("off_grid"));
    let result = engine
        .quote(Industry::Hotel, &answers)
        .expect("off-grid hotel should quote");

    assert!((result.sizing.bess_kw - 425.0).abs() < 1e-9);
    assert!((result.sizing.duration_hours - 8.0).abs() < 1e-9);
    assert!(
        result.sizing.rationale.iter().any(|r| r.contains("off-grid")),
        "rationale should record the off-grid rule: {:?}",
        result.sizing.rationale
    );
}

#[test]
fn resilience_goal_outsizes_peak_shaving() {
    let engine = baseline_engine();
    let shaving = engine
        .quote(Industry::Hotel, &hotel_150_rooms())
        .expect("default-goal hotel should quote");
    let mut answers = hotel_150_rooms();
    answers.insert("primary_goal".to_string(), txt("resilience"));
    let resilience = engine
        .quote(Industry::Hotel, &answers)
        .expect("resilience hotel should quote");

    assert_eq!(resilience.sizing.goal, PrimaryGoal::Resilience);
    assert!(resilience.sizing.bess_kw > shaving.sizing.bess_kw);
}

#[test]
fn intake_synonyms_normalize_to_the_same_quote() {
    let engine = baseline_engine();
    let canonical = engine
        .quote(
            Industry::Hotel,
            &intake(&[("room_count", num(150.0)), ("operating_hours", num(24.0))]),
        )
        .expect("canonical keys should quote");
    let aliased = engine
        .quote(
            Industry::Hotel,
            &intake(&[("rooms", num(150.0)), ("hours", num(24.0))]),
        )
        .expect("aliased keys should quote");

    assert_eq!(canonical, aliased);
    // both spellings collapse to one memoized entry
    assert_eq!(engine.cached_quotes(), 1);
}
