//! Investment metrics: NPV, IRR, paybacks, LCOS, MACRS shield.

use crate::quote::types::{
    BillOfMaterials, FinancialResult, PrimaryGoal, SizingRecommendation, YearCashFlow,
};
use crate::store::FinancialConstants;

/// Fraction of rated power credited against the monthly demand charge.
/// Imperfect dispatch means a shaver never captures its full nameplate.
fn demand_effectiveness(goal: PrimaryGoal) -> f64 {
    match goal {
        PrimaryGoal::PeakShaving => 0.85,
        PrimaryGoal::Arbitrage => 0.50,
        PrimaryGoal::Resilience => 0.30,
    }
}

/// Fraction of the nominal cycle budget actually used for energy shifting.
/// A resilience system mostly sits in reserve.
fn cycling_utilization(goal: PrimaryGoal) -> f64 {
    match goal {
        PrimaryGoal::PeakShaving => 0.5,
        PrimaryGoal::Arbitrage => 1.0,
        PrimaryGoal::Resilience => 0.2,
    }
}

/// Runs the full financial model for one priced system.
///
/// Cash flows are built year by year: demand-charge savings escalate with
/// the tariff, energy-shift revenue additionally fades with capacity
/// degradation, O&M escalates, and the MACRS shield pays out over the
/// schedule with the basis reduced by half the ITC. Year 0 is the
/// post-ITC capex outlay.
pub fn evaluate(
    sizing: &SizingRecommendation,
    bom: &BillOfMaterials,
    k: &FinancialConstants,
) -> FinancialResult {
    let gross_capex = bom.total_capex;
    let net_capex = gross_capex * (1.0 - k.itc_fraction);
    let macrs_basis = gross_capex * (1.0 - k.itc_fraction / 2.0);

    let demand_savings_y1 = sizing.bess_kw
        * demand_effectiveness(sizing.goal)
        * k.demand_charge_usd_per_kw_month
        * 12.0;
    let energy_margin =
        k.discharge_value_usd_per_kwh - k.charge_cost_usd_per_kwh / k.round_trip_efficiency;
    let discharged_kwh_y1 = sizing.bess_kwh * k.cycles_per_year * cycling_utilization(sizing.goal);
    let energy_revenue_y1 = discharged_kwh_y1 * energy_margin;

    let mut cash_flows = Vec::with_capacity(k.project_years);
    let mut cumulative = -net_capex;
    let mut pv_om = 0.0;
    let mut pv_discharged_mwh = 0.0;

    for year in 1..=k.project_years {
        let escalation = (1.0 + k.escalation_rate).powi(year as i32 - 1);
        let fade = (1.0 - k.degradation_rate).powi(year as i32 - 1);

        let savings = demand_savings_y1 * escalation + energy_revenue_y1 * fade * escalation;
        let om_cost = sizing.bess_kwh * k.om_usd_per_kwh_year * escalation;
        let depreciation_shield = k
            .macrs_schedule
            .get(year - 1)
            .map_or(0.0, |fraction| macrs_basis * fraction * k.tax_rate);

        let net_cash_flow = savings - om_cost + depreciation_shield;
        let discount = (1.0 + k.discount_rate).powi(year as i32);
        let discounted = net_cash_flow / discount;
        cumulative += discounted;

        pv_om += om_cost / discount;
        pv_discharged_mwh += discharged_kwh_y1 * fade / 1000.0 / discount;

        cash_flows.push(YearCashFlow {
            year,
            savings,
            om_cost,
            depreciation_shield,
            net_cash_flow,
            discounted,
            cumulative_discounted: cumulative,
        });
    }

    let npv = cumulative;
    let annual_savings_year1 = demand_savings_y1 + energy_revenue_y1;

    let simple_payback_years = cash_flows.first().and_then(|y1| {
        if y1.net_cash_flow > 0.0 {
            Some(net_capex / y1.net_cash_flow)
        } else {
            None
        }
    });

    let discounted_payback_years = discounted_payback(net_capex, &cash_flows);

    let (irr, irr_approximate) = solve_irr(net_capex, &cash_flows, k.project_years);

    let lcos_per_mwh = if pv_discharged_mwh > 0.0 {
        (net_capex + pv_om) / pv_discharged_mwh
    } else {
        0.0
    };

    FinancialResult {
        npv,
        irr,
        irr_approximate,
        simple_payback_years,
        discounted_payback_years,
        lcos_per_mwh,
        annual_savings_year1,
        net_capex,
        cash_flows,
    }
}

/// First year the cumulative discounted position turns non-negative,
/// with linear interpolation inside that year.
fn discounted_payback(net_capex: f64, cash_flows: &[YearCashFlow]) -> Option<f64> {
    let mut previous = -net_capex;
    for flow in cash_flows {
        if flow.cumulative_discounted >= 0.0 {
            let recovered = flow.cumulative_discounted - previous;
            if recovered <= 0.0 {
                return Some(flow.year as f64);
            }
            return Some(flow.year as f64 - 1.0 + (-previous / recovered));
        }
        previous = flow.cumulative_discounted;
    }
    None
}

/// Newton-Raphson IRR with an annuity fallback.
///
/// One solver, one fallback: Newton from 10% against the undiscounted
/// flow series; when it fails to converge (pathological flows, flat
/// derivative), the annuity approximation `mean_cash / capex - 1 / years`
/// stands in and is flagged approximate. `(None, false)` means not even
/// the approximation produced a meaningful rate.
fn solve_irr(net_capex: f64, cash_flows: &[YearCashFlow], years: usize) -> (Option<f64>, bool) {
    if net_capex <= 0.0 || cash_flows.is_empty() {
        return (None, false);
    }

    let mut flows = Vec::with_capacity(cash_flows.len() + 1);
    flows.push(-net_capex);
    flows.extend(cash_flows.iter().map(|f| f.net_cash_flow));

    if let Some(rate) = newton(&flows) {
        return (Some(rate), false);
    }

    let mean_cash: f64 =
        cash_flows.iter().map(|f| f.net_cash_flow).sum::<f64>() / cash_flows.len() as f64;
    if mean_cash <= 0.0 {
        return (None, false);
    }
    let approx = mean_cash / net_capex - 1.0 / years as f64;
    if approx.is_finite() {
        (Some(approx), true)
    } else {
        (None, false)
    }
}

fn npv_at(rate: f64, flows: &[f64]) -> f64 {
    flows
        .iter()
        .enumerate()
        .map(|(year, cash)| cash / (1.0 + rate).powi(year as i32))
        .sum()
}

fn newton(flows: &[f64]) -> Option<f64> {
    let mut rate: f64 = 0.10;
    for _ in 0..100 {
        let value = npv_at(rate, flows);
        if value.abs() < 0.01 {
            return Some(rate);
        }
        let slope: f64 = flows
            .iter()
            .enumerate()
            .skip(1)
            .map(|(year, cash)| -(year as f64) * cash / (1.0 + rate).powi(year as i32 + 1))
            .sum();
        if slope.abs() < 1e-12 {
            return None;
        }
        let next = rate - value / slope;
        if !next.is_finite() || next <= -0.999 {
            return None;
        }
        rate = next;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quote::types::{BomLine, PrimaryGoal};

    fn bom(total: f64) -> BillOfMaterials {
        BillOfMaterials {
            lines: vec![BomLine {
                category: "battery_system".to_string(),
                quantity: 1.0,
                unit: "lot".to_string(),
                unit_cost: total,
                total_cost: total,
            }],
            vendor_category: "commercial_midmarket".to_string(),
            volume_discount: 0.0,
            total_capex: total,
        }
    }

    fn sizing(goal: PrimaryGoal, kw: f64, kwh: f64) -> SizingRecommendation {
        SizingRecommendation {
            bess_kw: kw,
            bess_kwh: kwh,
            duration_hours: kwh / kw,
            goal,
            rationale: Vec::new(),
            sources: Vec::new(),
        }
    }

    #[test]
    fn itc_and_macrs_basis_are_applied() {
        let k = FinancialConstants::default();
        let result = evaluate(&sizing(PrimaryGoal::PeakShaving, 200.0, 800.0), &bom(500_000.0), &k);

        assert!((result.net_capex - 350_000.0).abs() < 1e-6);
        // basis = 500k * 0.85; year 1 shield = basis * 0.20 * 0.21
        let expected_shield = 500_000.0 * 0.85 * 0.20 * 0.21;
        assert!((result.cash_flows[0].depreciation_shield - expected_shield).abs() < 1e-6);
        // schedule exhausted after six years
        assert_eq!(result.cash_flows[6].depreciation_shield, 0.0);
        assert_eq!(result.cash_flows.len(), k.project_years);
    }

    #[test]
    fn healthy_project_has_positive_npv_and_consistent_irr() {
        let k = FinancialConstants::default();
        let result = evaluate(&sizing(PrimaryGoal::PeakShaving, 170.0, 680.0), &bom(495_000.0), &k);

        assert!(result.npv > 0.0, "npv {}", result.npv);
        let irr = result.irr.expect("irr should converge");
        assert!(!result.irr_approximate);
        // NPV positive implies the return clears the discount rate
        assert!(irr > k.discount_rate, "irr {irr}");

        // the solved rate really zeroes the flow series
        let mut flows = vec![-result.net_capex];
        flows.extend(result.cash_flows.iter().map(|f| f.net_cash_flow));
        assert!(npv_at(irr, &flows).abs() < 0.01);
    }

    #[test]
    fn paybacks_are_ordered_and_plausible() {
        let k = FinancialConstants::default();
        let result = evaluate(&sizing(PrimaryGoal::PeakShaving, 170.0, 680.0), &bom(495_000.0), &k);

        let simple = result.simple_payback_years.expect("simple payback");
        let discounted = result.discounted_payback_years.expect("discounted payback");
        // discounting can only push recovery later
        assert!(discounted >= simple);
        assert!(simple > 1.0 && simple < 15.0, "simple {simple}");
        assert!(discounted <= k.project_years as f64);
    }

    #[test]
    fn resilience_heavy_system_can_be_underwater() {
        let k = FinancialConstants::default();
        let result = evaluate(
            &sizing(PrimaryGoal::Resilience, 400.0, 3_200.0),
            &bom(2_400_000.0),
            &k,
        );
        assert!(result.npv < 0.0);
        assert_eq!(result.discounted_payback_years, None);
        if let Some(irr) = result.irr {
            assert!(irr < k.discount_rate);
        }
    }

    #[test]
    fn no_revenue_means_no_payback_and_no_irr() {
        let k = FinancialConstants {
            demand_charge_usd_per_kw_month: 0.0,
            discharge_value_usd_per_kwh: 0.0,
            charge_cost_usd_per_kwh: 0.0,
            tax_rate: 0.0,
            ..FinancialConstants::default()
        };
        let result = evaluate(&sizing(PrimaryGoal::PeakShaving, 100.0, 400.0), &bom(300_000.0), &k);
        assert_eq!(result.simple_payback_years, None);
        assert_eq!(result.discounted_payback_years, None);
        assert_eq!(result.irr, None);
        assert!(result.npv < 0.0);
    }

    #[test]
    fn lcos_is_finite_and_in_a_sane_band() {
        let k = FinancialConstants::default();
        let result = evaluate(&sizing(PrimaryGoal::PeakShaving, 170.0, 680.0), &bom(495_000.0), &k);
        assert!(result.lcos_per_mwh.is_finite());
        assert!(
            result.lcos_per_mwh > 100.0 && result.lcos_per_mwh < 1_500.0,
            "lcos {}",
            result.lcos_per_mwh
        );
    }

    #[test]
    fn evaluation_is_deterministic() {
        let k = FinancialConstants::default();
        let s = sizing(PrimaryGoal::Arbitrage, 250.0, 1_000.0);
        let b = bom(700_000.0);
        assert_eq!(evaluate(&s, &b, &k), evaluate(&s, &b, &k));
    }

    #[test]
    fn annuity_fallback_is_flagged() {
        // a trickle of returns against a large outlay sends Newton far
        // below -100% and the annuity approximation takes over
        let flows: Vec<YearCashFlow> = (1..=25)
            .map(|year| YearCashFlow {
                year,
                savings: 1.0,
                om_cost: 0.0,
                depreciation_shield: 0.0,
                net_cash_flow: 1.0,
                discounted: 0.0,
                cumulative_discounted: 0.0,
            })
            .collect();
        let (irr, approximate) = solve_irr(1_000.0, &flows, 25);
        assert!(approximate);
        let rate = irr.expect("fallback rate");
        // mean/capex - 1/years = 0.001 - 0.04
        assert!((rate - (-0.039)).abs() < 1e-9);
    }
}
