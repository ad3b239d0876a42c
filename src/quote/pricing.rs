//! Equipment pricing: tiered battery costs, PCS, BOS/EPC, and markups.

use crate::config::PricingConfig;
use crate::quote::types::{BillOfMaterials, BomLine, SizingRecommendation};
use crate::store::TierTable;

/// Deterministic vendor/category pick for a system size. The bands track
/// how the supply chain actually segments: small commercial cabinets,
/// containerized mid-market, multi-container, and utility-scale blocks.
pub fn vendor_category(bess_kwh: f64) -> &'static str {
    if bess_kwh < 500.0 {
        "commercial_small"
    } else if bess_kwh < 2_000.0 {
        "commercial_midmarket"
    } else if bess_kwh < 10_000.0 {
        "commercial_large"
    } else {
        "utility_scale"
    }
}

/// Prices a sizing recommendation into an ordered bill of materials.
///
/// Battery cost interpolates the anchor curve in `table`; PCS switches to
/// the utility rate at the configured power threshold; BOS and EPC are
/// fractions of the running subtotal. Category markups are baked into the
/// line unit costs, and any volume discount lands as a trailing negative
/// line against the equipment subtotal.
pub fn price(
    sizing: &SizingRecommendation,
    table: &TierTable,
    cfg: &PricingConfig,
) -> BillOfMaterials {
    let kwh = sizing.bess_kwh;
    let kw = sizing.bess_kw;

    let battery_unit = table.usd_per_kwh(kwh) * (1.0 + cfg.battery_markup);
    let battery_total = kwh * battery_unit;

    let pcs_rate = if kw >= cfg.utility_threshold_kw {
        table.pcs_utility_usd_per_kw
    } else {
        table.pcs_commercial_usd_per_kw
    };
    let pcs_unit = pcs_rate * (1.0 + cfg.pcs_markup);
    let pcs_total = kw * pcs_unit;

    let equipment_subtotal = battery_total + pcs_total;
    let bos_total = equipment_subtotal * cfg.bos_fraction * (1.0 + cfg.bos_markup);
    let epc_total = (equipment_subtotal + bos_total) * cfg.epc_fraction * (1.0 + cfg.epc_markup);

    let mut lines = vec![
        BomLine {
            category: "battery_system".to_string(),
            quantity: kwh,
            unit: "kWh".to_string(),
            unit_cost: battery_unit,
            total_cost: battery_total,
        },
        BomLine {
            category: "pcs".to_string(),
            quantity: kw,
            unit: "kW".to_string(),
            unit_cost: pcs_unit,
            total_cost: pcs_total,
        },
        BomLine {
            category: "bos".to_string(),
            quantity: 1.0,
            unit: "lot".to_string(),
            unit_cost: bos_total,
            total_cost: bos_total,
        },
        BomLine {
            category: "epc".to_string(),
            quantity: 1.0,
            unit: "lot".to_string(),
            unit_cost: epc_total,
            total_cost: epc_total,
        },
    ];

    let volume_discount = table.volume_discount(kwh);
    if volume_discount > 0.0 {
        let credit = -(equipment_subtotal * volume_discount);
        lines.push(BomLine {
            category: "volume_discount".to_string(),
            quantity: 1.0,
            unit: "lot".to_string(),
            unit_cost: credit,
            total_cost: credit,
        });
    }

    let total_capex = lines.iter().map(|l| l.total_cost).sum();
    BillOfMaterials {
        lines,
        vendor_category: vendor_category(kwh).to_string(),
        volume_discount,
        total_capex,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quote::types::PrimaryGoal;

    fn sizing(kw: f64, kwh: f64) -> SizingRecommendation {
        SizingRecommendation {
            bess_kw: kw,
            bess_kwh: kwh,
            duration_hours: kwh / kw,
            goal: PrimaryGoal::PeakShaving,
            rationale: Vec::new(),
            sources: Vec::new(),
        }
    }

    #[test]
    fn commercial_bom_lines_and_total() {
        let bom = price(&sizing(170.0, 680.0), &TierTable::default(), &PricingConfig::default());

        let categories: Vec<&str> = bom.lines.iter().map(|l| l.category.as_str()).collect();
        assert_eq!(categories, vec!["battery_system", "pcs", "bos", "epc"]);

        // 680 kWh sits below the first anchor: 420 * 1.10 = 462 USD/kWh
        assert!((bom.lines[0].unit_cost - 462.0).abs() < 1e-9);
        // 170 kW is commercial: 240 * 1.10 = 264 USD/kW
        assert!((bom.lines[1].unit_cost - 264.0).abs() < 1e-9);

        let sum: f64 = bom.lines.iter().map(|l| l.total_cost).sum();
        assert!((bom.total_capex - sum).abs() < 1e-6);
        assert_eq!(bom.volume_discount, 0.0);
        assert_eq!(bom.vendor_category, "commercial_midmarket");
    }

    #[test]
    fn utility_scale_switches_pcs_rate_and_earns_discount() {
        let bom = price(
            &sizing(5_000.0, 20_000.0),
            &TierTable::default(),
            &PricingConfig::default(),
        );
        // 150 * 1.10 at utility scale
        assert!((bom.lines[1].unit_cost - 165.0).abs() < 1e-9);
        assert_eq!(bom.vendor_category, "utility_scale");
        assert!(bom.volume_discount > 0.0);

        let discount_line = bom.lines.last().unwrap();
        assert_eq!(discount_line.category, "volume_discount");
        assert!(discount_line.total_cost < 0.0);
    }

    #[test]
    fn bigger_batteries_get_cheaper_unit_prices() {
        let table = TierTable::default();
        let cfg = PricingConfig::default();
        let small = price(&sizing(500.0, 2_000.0), &table, &cfg);
        let large = price(&sizing(3_000.0, 12_000.0), &table, &cfg);
        assert!(large.lines[0].unit_cost < small.lines[0].unit_cost);
        // but the larger system still costs more overall
        assert!(large.total_capex > small.total_capex);
    }

    #[test]
    fn vendor_bands_cover_the_size_spectrum() {
        assert_eq!(vendor_category(100.0), "commercial_small");
        assert_eq!(vendor_category(500.0), "commercial_midmarket");
        assert_eq!(vendor_category(2_000.0), "commercial_large");
        assert_eq!(vendor_category(10_000.0), "utility_scale");
    }

    #[test]
    fn capex_is_positive_for_any_plausible_size() {
        let table = TierTable::default();
        let cfg = PricingConfig::default();
        for (kw, kwh) in [(10.0, 40.0), (170.0, 680.0), (8_000.0, 64_000.0)] {
            let bom = price(&sizing(kw, kwh), &table, &cfg);
            assert!(bom.total_capex > 0.0);
            assert!(bom.total_capex.is_finite());
        }
    }
}
