//! Integration tests for the TrueQuote certification harness.

mod common;

use std::fs;

use powerquote::config::EngineConfig;
use powerquote::industries::Industry;
use powerquote::io::export::export_csv;
use powerquote::quote::QuoteEngine;
use powerquote::truequote::fixtures::{Fixture, baseline_fixtures, fixture_set};
use powerquote::truequote::harness::{CertStatus, certify, run_batch};
use powerquote::truequote::report::{
    CertificationReport, Scoreboard, report_to_path, summary_to_path,
};

use common::{baseline_engine, flag, hotel_150_rooms, intake, num, txt};

#[test]
fn full_fixture_batch_is_releasable() {
    let config = EngineConfig::baseline();
    let fixtures = fixture_set(&config.fixtures);
    let engine = QuoteEngine::new(config);
    let rows = run_batch(&engine, &fixtures);
    let board = Scoreboard::tally(&rows);

    // 15 baselines plus 3 fuzz variants for each of the 13 covered verticals
    assert_eq!(board.total, 54);
    assert_eq!(board.skip, 2);
    assert!(
        board.is_acceptable(),
        "fail={} crash={}",
        board.fail,
        board.crash
    );
    assert_eq!(board.pass + board.pass_warn, 52);
}

#[test]
fn strict_ci_preset_batch_has_no_failures() {
    let config = EngineConfig::from_preset("strict_ci").expect("preset should exist");
    let fixtures = fixture_set(&config.fixtures);
    let engine = QuoteEngine::new(config);
    let rows = run_batch(&engine, &fixtures);
    let board = Scoreboard::tally(&rows);

    assert_eq!(board.total, 15 + 13 * 5);
    assert_eq!(board.fail, 0, "strict batch failed: {rows:?}");
    assert_eq!(board.crash, 0);
    assert_eq!(board.skip, 2);
}

#[test]
fn complete_hotel_intake_certifies_pass() {
    let engine = baseline_engine();
    let fixture = Fixture {
        label: "hotel_manual".to_string(),
        industry: Industry::Hotel,
        answers: hotel_150_rooms(),
    };
    let envelope = certify(&engine, &fixture);

    assert_eq!(
        envelope.status,
        CertStatus::Pass,
        "detail: {:?}",
        envelope.detail
    );
    assert!(!envelope.checks.is_empty());
    assert!(envelope.checks.iter().all(|c| c.passed));
    assert!(envelope.confidence.unwrap_or(0.0) > 0.5);
}

#[test]
fn defaulted_required_answers_fail_only_under_strict() {
    let partial = Fixture {
        label: "hotel_partial".to_string(),
        industry: Industry::Hotel,
        answers: intake(&[
            ("room_count", num(150.0)),
            ("hotel_class", txt("midscale")),
            ("has_pool", flag(true)),
        ]),
    };

    let lenient = certify(&baseline_engine(), &partial);
    assert_eq!(lenient.status, CertStatus::PassWarn);

    let mut config = EngineConfig::baseline();
    config.validation.strict = true;
    let strict = certify(&QuoteEngine::new(config), &partial);
    assert_eq!(strict.status, CertStatus::Fail);
    assert!(
        strict.detail.as_deref().unwrap_or("").contains("strict"),
        "detail: {:?}",
        strict.detail
    );
}

#[test]
fn skip_rows_name_the_uncovered_industries() {
    let rows = run_batch(&baseline_engine(), &baseline_fixtures());
    let skipped: Vec<&str> = rows
        .iter()
        .filter(|r| r.status == CertStatus::Skip)
        .map(|r| r.industry.slug())
        .collect();
    assert_eq!(skipped, vec!["airport", "stadium"]);
    for row in rows.iter().filter(|r| r.status == CertStatus::Skip) {
        assert!(
            row.detail.as_deref().unwrap_or("").contains("no calculator"),
            "detail: {:?}",
            row.detail
        );
    }
}

#[test]
fn report_and_csv_artifacts_round_trip() {
    let dir = std::env::temp_dir().join(format!("powerquote_tq_{}", std::process::id()));
    fs::create_dir_all(&dir).expect("temp dir should be creatable");

    let engine = baseline_engine();
    let rows = run_batch(&engine, &baseline_fixtures());

    let report_path = dir.join("truequote_report.json");
    let summary_path = dir.join("truequote_summary.json");
    let csv_path = dir.join("rows.csv");
    report_to_path(&report_path, &CertificationReport::new(&rows, false, 42))
        .expect("report should write");
    summary_to_path(&summary_path, &rows).expect("summary should write");
    export_csv(&rows, &csv_path).expect("csv should write");

    let report: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&report_path).expect("report should read"))
            .expect("report should be valid JSON");
    assert_eq!(report["scoreboard"]["total"], 15);
    assert_eq!(
        report["results"]
            .as_array()
            .expect("results should be an array")
            .len(),
        15
    );

    let summary: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&summary_path).expect("summary should read"))
            .expect("summary should be valid JSON");
    let records = summary.as_array().expect("summary should be an array");
    assert_eq!(records.len(), 15);
    assert_eq!(
        records.iter().filter(|r| r["status"] == "skip").count(),
        2
    );

    let csv = fs::read_to_string(&csv_path).expect("csv should read");
    assert!(csv.starts_with("fixture,industry,status"));
    assert_eq!(csv.lines().count(), 16);

    let _ = fs::remove_dir_all(&dir);
}
