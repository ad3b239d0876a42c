//! Core pipeline types: inputs, load profiles, sizing, BOM, and financials.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::industries::Industry;

/// A single normalized answer value.
///
/// Raw wizard answers arrive as loosely-typed JSON; after normalization
/// every value is one of these three shapes. Numeric-looking strings have
/// already been scrubbed to `Number` by the normalizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
    /// Boolean toggle (checkbox questions).
    Flag(bool),
    /// Scalar numeric value (counts, kW, dollars).
    Number(f64),
    /// Free text or select-option value.
    Text(String),
}

impl AnswerValue {
    /// Numeric view: numbers pass through, flags map to 0/1, text to 0.
    pub fn as_number(&self) -> f64 {
        match self {
            Self::Number(v) => *v,
            Self::Flag(b) => {
                if *b {
                    1.0
                } else {
                    0.0
                }
            }
            Self::Text(_) => 0.0,
        }
    }
}

/// Canonical, immutable input record for one calculation request.
///
/// Built once by the normalizer and never mutated afterwards. BTree
/// containers keep iteration order (and therefore serialized bytes)
/// deterministic across runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationInput {
    /// Canonical industry this input was normalized against.
    pub industry: Industry,
    /// Canonical field name → normalized value.
    pub values: BTreeMap<String, AnswerValue>,
    /// Fields whose values came from template/question defaults rather
    /// than the user.
    pub defaulted_fields: BTreeSet<String>,
    /// Required question ids that resolved to no value at all.
    pub missing_required: Vec<String>,
}

impl CalculationInput {
    /// Numeric value for `key`, or 0.0 when absent.
    pub fn number(&self, key: &str) -> f64 {
        self.values.get(key).map_or(0.0, AnswerValue::as_number)
    }

    /// Text value for `key`, if present and textual.
    pub fn text(&self, key: &str) -> Option<&str> {
        match self.values.get(key) {
            Some(AnswerValue::Text(s)) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Boolean value for `key`; numbers count as true when non-zero.
    pub fn flag(&self, key: &str) -> bool {
        match self.values.get(key) {
            Some(AnswerValue::Flag(b)) => *b,
            Some(AnswerValue::Number(v)) => *v != 0.0,
            Some(AnswerValue::Text(s)) => s == "true" || s == "yes",
            None => false,
        }
    }

    /// True when the user supplied this field directly (present and not
    /// filled in from a default).
    pub fn supplied(&self, key: &str) -> bool {
        self.values.contains_key(key) && !self.defaulted_fields.contains(key)
    }

    /// True when the user supplied a strictly positive number for `key`.
    pub fn supplied_positive(&self, key: &str) -> bool {
        self.supplied(key) && self.number(key) > 0.0
    }

    /// True when the field value came from a default.
    pub fn is_defaulted(&self, key: &str) -> bool {
        self.defaulted_fields.contains(key)
    }

    /// Required fields that were filled from defaults instead of the user.
    pub fn defaulted_required(&self, required_ids: &BTreeSet<String>) -> Vec<String> {
        self.defaulted_fields
            .iter()
            .filter(|f| required_ids.contains(*f))
            .cloned()
            .collect()
    }
}

/// Bottom-up load reconstruction for one facility.
///
/// `kw_contributors` holds the coincident-peak contribution of each named
/// subsystem *after* the industry diversity factor, so the contributor sum
/// equals `peak_load_kw` by construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadProfile {
    /// Coincident peak demand (kW). Always > 0 and finite.
    pub peak_load_kw: f64,
    /// Overnight/minimum demand (kW). Never exceeds peak.
    pub base_load_kw: f64,
    /// Annual consumption (kWh). Bounded by `peak * 8760`.
    pub annual_energy_kwh: f64,
    /// Utilization of peak over the year, `annual / (peak * 8760)`.
    pub duty_cycle: f64,
    /// Named subsystem → coincident-peak kW.
    pub kw_contributors: BTreeMap<String, f64>,
}

impl LoadProfile {
    /// Contribution of the named subsystem, or 0.0 when absent.
    pub fn contributor(&self, name: &str) -> f64 {
        self.kw_contributors.get(name).copied().unwrap_or(0.0)
    }

    /// Sum of all named contributors.
    pub fn contributor_sum(&self) -> f64 {
        self.kw_contributors.values().sum()
    }

    /// Returns a copy rescaled so peak matches a metered anchor value.
    ///
    /// Contributors, base load, and annual energy scale proportionally;
    /// the duty cycle is shape-invariant and unchanged. Zero contributors
    /// stay zero. No-op for a non-positive target.
    pub fn rescaled_to_peak(&self, target_peak_kw: f64) -> Self {
        if target_peak_kw <= 0.0 || self.peak_load_kw <= 0.0 {
            return self.clone();
        }
        let scale = target_peak_kw / self.peak_load_kw;
        let kw_contributors = self
            .kw_contributors
            .iter()
            .map(|(k, v)| (k.clone(), v * scale))
            .collect();
        Self {
            peak_load_kw: target_peak_kw,
            base_load_kw: self.base_load_kw * scale,
            annual_energy_kwh: self.annual_energy_kwh * scale,
            duty_cycle: self.duty_cycle,
            kw_contributors,
        }
    }
}

/// Primary objective the storage system is sized for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrimaryGoal {
    /// Shave demand peaks to cut demand charges.
    PeakShaving,
    /// Time-of-use arbitrage: charge cheap, discharge expensive.
    Arbitrage,
    /// Backup power / outage ride-through.
    Resilience,
}

impl PrimaryGoal {
    /// Parses wizard answer strings, tolerating the aliases seen in the
    /// field (`"backup"`, `"tou_arbitrage"`, hyphenated forms). Unknown
    /// strings fall back to peak shaving, the most common goal.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "arbitrage" | "tou_arbitrage" | "energy_arbitrage" | "tou" => Self::Arbitrage,
            "resilience" | "backup" | "backup_power" | "outage_protection" | "island" => {
                Self::Resilience
            }
            _ => Self::PeakShaving,
        }
    }

    /// Canonical snake_case label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::PeakShaving => "peak_shaving",
            Self::Arbitrage => "arbitrage",
            Self::Resilience => "resilience",
        }
    }
}

/// BESS power/duration recommendation derived from a load profile and goal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SizingRecommendation {
    /// Recommended inverter power (kW).
    pub bess_kw: f64,
    /// Recommended energy capacity (kWh).
    pub bess_kwh: f64,
    /// Discharge duration at rated power (hours).
    pub duration_hours: f64,
    /// Goal the sizing was derived for.
    pub goal: PrimaryGoal,
    /// Human-readable sizing decisions, one entry per applied rule.
    pub rationale: Vec<String>,
    /// Citation strings backing the ratios used.
    pub sources: Vec<String>,
}

/// One priced line item of the bill of materials.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BomLine {
    /// Equipment category (`"battery_system"`, `"pcs"`, ...).
    pub category: String,
    /// Quantity in `unit`.
    pub quantity: f64,
    /// Unit of the quantity (`"kWh"`, `"kW"`, `"lot"`).
    pub unit: String,
    /// Cost per unit after markup (USD).
    pub unit_cost: f64,
    /// Extended cost (USD); negative for discounts.
    pub total_cost: f64,
}

/// Ordered bill of materials with resolved vendor category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BillOfMaterials {
    /// Line items in presentation order.
    pub lines: Vec<BomLine>,
    /// Deterministic vendor/category selection for this size band.
    pub vendor_category: String,
    /// Volume discount applied (fraction of equipment subtotal).
    pub volume_discount: f64,
    /// Sum of all line totals (USD).
    pub total_capex: f64,
}

/// One project year of the cash-flow series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearCashFlow {
    /// Project year, 1-based.
    pub year: usize,
    /// Gross savings this year (degradation and escalation applied).
    pub savings: f64,
    /// O&M cost this year.
    pub om_cost: f64,
    /// MACRS depreciation tax shield this year (0 after year 6).
    pub depreciation_shield: f64,
    /// Net cash flow: savings - O&M + shield.
    pub net_cash_flow: f64,
    /// Net cash flow discounted to year 0.
    pub discounted: f64,
    /// Running sum of discounted flows including `-net_capex` at year 0.
    pub cumulative_discounted: f64,
}

/// Investment-grade financial metrics for one quote.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialResult {
    /// Net present value at the configured discount rate (USD).
    pub npv: f64,
    /// Internal rate of return; `None` when neither the solver nor the
    /// annuity fallback produced a finite rate.
    pub irr: Option<f64>,
    /// True when `irr` came from the annuity fallback, not Newton-Raphson.
    pub irr_approximate: bool,
    /// Net capex / year-1 net cash flow; `None` when year 1 nets out
    /// non-positive.
    pub simple_payback_years: Option<f64>,
    /// First year the cumulative discounted cash flow turns non-negative.
    pub discounted_payback_years: Option<f64>,
    /// Levelized cost of storage (USD per MWh discharged).
    pub lcos_per_mwh: f64,
    /// Year-1 gross savings (USD).
    pub annual_savings_year1: f64,
    /// Capex after the investment tax credit (USD).
    pub net_capex: f64,
    /// Per-year cash-flow series, years 1..=project_years.
    pub cash_flows: Vec<YearCashFlow>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_input() -> CalculationInput {
        let mut values = BTreeMap::new();
        values.insert("room_count".to_string(), AnswerValue::Number(150.0));
        values.insert(
            "hotel_class".to_string(),
            AnswerValue::Text("midscale".to_string()),
        );
        values.insert("has_pool".to_string(), AnswerValue::Flag(true));
        values.insert("operating_hours".to_string(), AnswerValue::Number(24.0));
        let mut defaulted = BTreeSet::new();
        defaulted.insert("operating_hours".to_string());
        CalculationInput {
            industry: Industry::Hotel,
            values,
            defaulted_fields: defaulted,
            missing_required: Vec::new(),
        }
    }

    #[test]
    fn number_access_with_fallback() {
        let input = sample_input();
        assert_eq!(input.number("room_count"), 150.0);
        assert_eq!(input.number("nonexistent"), 0.0);
        // text values read as 0 through the numeric view
        assert_eq!(input.number("hotel_class"), 0.0);
    }

    #[test]
    fn supplied_excludes_defaulted_fields() {
        let input = sample_input();
        assert!(input.supplied("room_count"));
        assert!(!input.supplied("operating_hours"));
        assert!(!input.supplied("nonexistent"));
    }

    #[test]
    fn flag_accepts_numbers_and_text() {
        let input = sample_input();
        assert!(input.flag("has_pool"));
        assert!(input.flag("room_count")); // non-zero number
        assert!(!input.flag("nonexistent"));
    }

    #[test]
    fn rescale_preserves_contributor_shares() {
        let mut contributors = BTreeMap::new();
        contributors.insert("hvac".to_string(), 60.0);
        contributors.insert("lighting".to_string(), 40.0);
        contributors.insert("idle".to_string(), 0.0);
        let profile = LoadProfile {
            peak_load_kw: 100.0,
            base_load_kw: 30.0,
            annual_energy_kwh: 350_000.0,
            duty_cycle: 0.4,
            kw_contributors: contributors,
        };

        let scaled = profile.rescaled_to_peak(250.0);
        assert_eq!(scaled.peak_load_kw, 250.0);
        assert!((scaled.contributor("hvac") - 150.0).abs() < 1e-9);
        assert!((scaled.contributor("lighting") - 100.0).abs() < 1e-9);
        assert_eq!(scaled.contributor("idle"), 0.0);
        assert!((scaled.base_load_kw - 75.0).abs() < 1e-9);
        assert_eq!(scaled.duty_cycle, 0.4);
        assert!((scaled.contributor_sum() - scaled.peak_load_kw).abs() < 1e-9);
    }

    #[test]
    fn rescale_ignores_nonpositive_target() {
        let profile = LoadProfile {
            peak_load_kw: 100.0,
            base_load_kw: 30.0,
            annual_energy_kwh: 350_000.0,
            duty_cycle: 0.4,
            kw_contributors: BTreeMap::new(),
        };
        let same = profile.rescaled_to_peak(0.0);
        assert_eq!(same.peak_load_kw, 100.0);
    }

    #[test]
    fn goal_parsing_handles_aliases() {
        assert_eq!(PrimaryGoal::parse("peak_shaving"), PrimaryGoal::PeakShaving);
        assert_eq!(PrimaryGoal::parse("peak-shaving"), PrimaryGoal::PeakShaving);
        assert_eq!(PrimaryGoal::parse("TOU_Arbitrage"), PrimaryGoal::Arbitrage);
        assert_eq!(PrimaryGoal::parse("backup"), PrimaryGoal::Resilience);
        assert_eq!(PrimaryGoal::parse("garbage"), PrimaryGoal::PeakShaving);
    }

    #[test]
    fn answer_value_numeric_view() {
        assert_eq!(AnswerValue::Number(4.5).as_number(), 4.5);
        assert_eq!(AnswerValue::Flag(true).as_number(), 1.0);
        assert_eq!(AnswerValue::Flag(false).as_number(), 0.0);
        assert_eq!(AnswerValue::Text("abc".into()).as_number(), 0.0);
    }
}
