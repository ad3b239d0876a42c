//! Physical and financial plausibility checks applied to every quote.
//!
//! Checks operate on the finished [`QuoteResult`] only, so they can run
//! against live engine output or against archived quotes alike. A failed
//! check means the published number is untrustworthy, not that the engine
//! crashed; crashes are handled one level up in the harness.

use serde::Serialize;

use crate::config::ValidationConfig;
use crate::industries::data_center::tier_pue;
use crate::industries::{HOURS_PER_YEAR, Industry};
use crate::quote::types::{CalculationInput, FinancialResult};
use crate::quote::QuoteResult;

/// Blended installed cost band considered physically plausible, USD/kWh.
/// Wide on purpose: it catches unit mistakes (Wh vs kWh, cents vs dollars),
/// not market drift.
const CAPEX_PER_KWH_MIN: f64 = 150.0;
const CAPEX_PER_KWH_MAX: f64 = 2500.0;

/// Upper bound on credible annual utilization of peak.
const DUTY_CYCLE_MAX: f64 = 1.25;

/// Longest simple payback considered publishable, years.
const PAYBACK_MAX_YEARS: f64 = 100.0;

/// Dryer-bank share of peak expected at conveyor and in-bay wash sites.
const DRYER_SHARE_MIN: f64 = 0.30;
const DRYER_SHARE_MAX: f64 = 0.85;

/// Minimum guest-room share of peak for a lodging property.
const GUEST_ROOM_SHARE_MIN: f64 = 0.35;

/// Outcome of one named plausibility check.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckOutcome {
    /// Stable check identifier.
    pub name: &'static str,
    pub passed: bool,
    /// Measured values, for the report; present for passes too.
    pub detail: String,
}

fn outcome(name: &'static str, passed: bool, detail: String) -> CheckOutcome {
    CheckOutcome {
        name,
        passed,
        detail,
    }
}

/// Recovers the discount rate from the year-1 cash-flow row, so checks
/// need no side channel to the financial constants the engine ran with.
fn implied_discount_rate(fin: &FinancialResult) -> Option<f64> {
    let first = fin.cash_flows.first()?;
    if first.discounted.abs() < 1e-9 {
        return None;
    }
    let rate = first.net_cash_flow / first.discounted - 1.0;
    rate.is_finite().then_some(rate)
}

/// Runs every applicable check against one quote.
///
/// Universal checks always run; industry checks run only when the intake
/// actually exercises the equipment they constrain (a self-serve wash has
/// no dryer bank to bound).
pub fn run_checks(result: &QuoteResult, validation: &ValidationConfig) -> Vec<CheckOutcome> {
    let mut checks = Vec::new();
    universal_checks(result, validation, &mut checks);
    industry_checks(result, validation, &mut checks);
    checks
}

fn universal_checks(
    result: &QuoteResult,
    validation: &ValidationConfig,
    checks: &mut Vec<CheckOutcome>,
) {
    let profile = &result.profile;
    let peak = profile.peak_load_kw;
    checks.push(outcome(
        "peak_load_physical",
        peak.is_finite() && peak > 0.0,
        format!("peak {peak:.2} kW"),
    ));
    checks.push(outcome(
        "base_load_below_peak",
        profile.base_load_kw.is_finite() && profile.base_load_kw <= peak * (1.0 + 1e-9),
        format!("base {:.2} kW vs peak {peak:.2} kW", profile.base_load_kw),
    ));

    let bad_contributors = profile
        .kw_contributors
        .values()
        .filter(|v| !v.is_finite() || **v < 0.0)
        .count();
    checks.push(outcome(
        "contributors_physical",
        bad_contributors == 0,
        format!(
            "{bad_contributors} of {} contributors non-finite or negative",
            profile.kw_contributors.len()
        ),
    ));

    let sum = profile.contributor_sum();
    let rel = if peak > 0.0 {
        (sum - peak).abs() / peak
    } else {
        f64::INFINITY
    };
    checks.push(outcome(
        "contributor_sum_consistent",
        rel <= validation.contributor_sum_tolerance,
        format!(
            "contributors {sum:.2} kW vs peak {peak:.2} kW ({:.1}% off)",
            rel * 100.0
        ),
    ));

    let annual = profile.annual_energy_kwh;
    checks.push(outcome(
        "annual_energy_bounded",
        annual > 0.0 && annual <= peak * HOURS_PER_YEAR * (1.0 + 1e-9),
        format!(
            "annual {annual:.0} kWh vs ceiling {:.0} kWh",
            peak * HOURS_PER_YEAR
        ),
    ));
    checks.push(outcome(
        "duty_cycle_in_band",
        (0.0..=DUTY_CYCLE_MAX).contains(&profile.duty_cycle),
        format!(
            "duty {:.2} (band 0-{DUTY_CYCLE_MAX})",
            profile.duty_cycle
        ),
    ));

    let sizing = &result.sizing;
    checks.push(outcome(
        "storage_sizing_positive",
        sizing.bess_kw > 0.0
            && sizing.bess_kwh > 0.0
            && sizing.duration_hours > 0.0
            && sizing.bess_kw.is_finite()
            && sizing.bess_kwh.is_finite(),
        format!(
            "{:.1} kW / {:.1} kWh / {:.1} h",
            sizing.bess_kw, sizing.bess_kwh, sizing.duration_hours
        ),
    ));
    let energy_gap = (sizing.bess_kwh - sizing.bess_kw * sizing.duration_hours).abs();
    checks.push(outcome(
        "storage_energy_consistent",
        energy_gap <= 1e-6 * sizing.bess_kwh.max(1.0),
        format!(
            "kWh {:.3} vs kW x h {:.3}",
            sizing.bess_kwh,
            sizing.bess_kw * sizing.duration_hours
        ),
    ));

    let bom = &result.bom;
    let lines_finite = bom.lines.iter().all(|l| l.total_cost.is_finite());
    checks.push(outcome(
        "capex_physical",
        bom.total_capex.is_finite() && bom.total_capex > 0.0 && lines_finite,
        format!("capex ${:.0}, {} lines", bom.total_capex, bom.lines.len()),
    ));
    if sizing.bess_kwh > 0.0 {
        let per_kwh = bom.total_capex / sizing.bess_kwh;
        checks.push(outcome(
            "capex_per_kwh_in_band",
            (CAPEX_PER_KWH_MIN..=CAPEX_PER_KWH_MAX).contains(&per_kwh),
            format!(
                "${per_kwh:.0}/kWh (band ${CAPEX_PER_KWH_MIN:.0}-${CAPEX_PER_KWH_MAX:.0})"
            ),
        ));
    }

    let fin = &result.financials;
    checks.push(outcome(
        "npv_finite",
        fin.npv.is_finite(),
        format!("NPV ${:.0}", fin.npv),
    ));
    match (fin.npv > 0.0, fin.irr, fin.irr_approximate) {
        (true, Some(irr), false) => {
            let passed = match implied_discount_rate(fin) {
                Some(rate) => irr > rate - 1e-6,
                // degenerate cash flows: nothing to compare against
                None => true,
            };
            checks.push(outcome(
                "irr_exceeds_discount_when_npv_positive",
                passed,
                format!("IRR {:.2}% with NPV ${:.0}", irr * 100.0, fin.npv),
            ));
        }
        (true, None, _) => {
            checks.push(outcome(
                "irr_exceeds_discount_when_npv_positive",
                false,
                format!("NPV ${:.0} positive but no IRR found", fin.npv),
            ));
        }
        _ => {
            checks.push(outcome(
                "irr_exceeds_discount_when_npv_positive",
                true,
                "not applicable".to_string(),
            ));
        }
    }
    match fin.simple_payback_years {
        Some(simple) => checks.push(outcome(
            "simple_payback_in_band",
            simple > 0.0 && simple < PAYBACK_MAX_YEARS,
            format!("simple payback {simple:.2} y (cap {PAYBACK_MAX_YEARS:.0} y)"),
        )),
        None => checks.push(outcome(
            "simple_payback_in_band",
            false,
            "year-1 cash flow cannot repay the system".to_string(),
        )),
    }
    if let (Some(simple), Some(discounted)) =
        (fin.simple_payback_years, fin.discounted_payback_years)
    {
        checks.push(outcome(
            "discounted_payback_not_before_simple",
            discounted >= simple - 1e-6,
            format!("simple {simple:.2} y, discounted {discounted:.2} y"),
        ));
    }

    checks.push(outcome(
        "confidence_in_unit_interval",
        (0.0..=1.0).contains(&result.confidence),
        format!("confidence {:.2}", result.confidence),
    ));
}

fn industry_checks(
    result: &QuoteResult,
    validation: &ValidationConfig,
    checks: &mut Vec<CheckOutcome>,
) {
    let input = &result.input;
    let profile = &result.profile;
    match result.industry {
        Industry::CarWash => {
            let wash_type = input.text("wash_type").unwrap_or("tunnel");
            let has_dryers = matches!(wash_type, "tunnel" | "in_bay");
            if has_dryers && input.number("wash_bays") > 0.0 {
                let share = profile.contributor("dryer_bank") / profile.peak_load_kw;
                checks.push(outcome(
                    "car_wash_dryer_share_in_band",
                    (DRYER_SHARE_MIN..=DRYER_SHARE_MAX).contains(&share),
                    format!(
                        "dryer share {:.0}% (band {:.0}-{:.0}%)",
                        share * 100.0,
                        DRYER_SHARE_MIN * 100.0,
                        DRYER_SHARE_MAX * 100.0
                    ),
                ));
            }
        }
        Industry::Hotel => {
            if input.number("room_count") > 0.0 {
                let share = profile.contributor("guest_rooms") / profile.peak_load_kw;
                checks.push(outcome(
                    "hotel_guest_room_share_dominant",
                    share >= GUEST_ROOM_SHARE_MIN,
                    format!(
                        "guest-room share {:.0}% (min {:.0}%)",
                        share * 100.0,
                        GUEST_ROOM_SHARE_MIN * 100.0
                    ),
                ));
            }
        }
        Industry::DataCenter => {
            let it = profile.contributor("it_load");
            if it > 0.0 {
                let implied = profile.peak_load_kw / it;
                let expected = expected_pue(input);
                let rel = (implied - expected).abs() / expected;
                checks.push(outcome(
                    "data_center_implied_pue_consistent",
                    rel <= validation.pue_tolerance,
                    format!(
                        "implied PUE {implied:.3} vs design {expected:.3} ({:.1}% off)",
                        rel * 100.0
                    ),
                ));
            }
        }
        Industry::EvCharging => {
            if !input.supplied_positive("level2_count") && !input.supplied_positive("dcfc_count") {
                let charging = profile.contributor("charging");
                checks.push(outcome(
                    "ev_no_phantom_charging_load",
                    charging == 0.0,
                    format!("charging contributor {charging:.2} kW with no chargers"),
                ));
            }
        }
        _ => {}
    }
}

/// Design PUE the calculator would have used, mirroring its input
/// precedence: an explicit PUE above 1.0 wins, otherwise the uptime tier.
fn expected_pue(input: &CalculationInput) -> f64 {
    if input.number("pue") > 1.0 {
        input.number("pue")
    } else {
        tier_pue(input.text("tier").unwrap_or("tier_3"))
    }
}
