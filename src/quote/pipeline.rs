//! End-to-end quote pipeline: normalize, reconstruct load, size, price,
//! and evaluate financials for one intake.

use std::collections::BTreeMap;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::error::QuoteError;
use crate::industries::Industry;
use crate::quote::normalize::normalize;
use crate::quote::template::{REQUIRED_UNIVERSAL, confidence_score};
use crate::quote::types::{
    AnswerValue, BillOfMaterials, CalculationInput, FinancialResult, LoadProfile,
    SizingRecommendation,
};
use crate::quote::{finance, pricing, sizing};
use crate::store::{Provenance, ReferenceLibrary, ReferenceStore, TtlMap};

/// Everything the engine derived for one intake, in calculation order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteResult {
    /// Industry the quote was calculated for.
    pub industry: Industry,
    /// Normalized input the calculation ran on.
    pub input: CalculationInput,
    /// Reconstructed facility load profile.
    pub profile: LoadProfile,
    /// Battery power/duration recommendation.
    pub sizing: SizingRecommendation,
    /// Priced bill of materials.
    pub bom: BillOfMaterials,
    /// Investment metrics.
    pub financials: FinancialResult,
    /// Intake-completeness confidence in `[0, 1]`.
    pub confidence: f64,
    /// Non-fatal conditions a human should see alongside the numbers.
    pub warnings: Vec<String>,
}

/// The quote pipeline with its reference data and result cache.
///
/// Calculation stages are pure functions of the normalized input and the
/// reference data pulled up front, so a given engine instance always
/// returns byte-identical results for the same answers. `&self` methods
/// throughout; the interior mutability lives in the caches.
pub struct QuoteEngine {
    config: EngineConfig,
    library: ReferenceLibrary,
    cache: TtlMap<u64, QuoteResult>,
}

impl QuoteEngine {
    /// Engine over compiled-in reference data.
    pub fn new(config: EngineConfig) -> Self {
        let cache_ttl = Duration::from_secs(config.cache.quote_ttl_secs);
        QuoteEngine {
            config,
            library: ReferenceLibrary::with_defaults(),
            cache: TtlMap::new(cache_ttl),
        }
    }

    /// Engine over an injected reference store, wrapped in a TTL cache
    /// per the config's cache policy.
    pub fn with_store(config: EngineConfig, store: impl ReferenceStore + 'static) -> Self {
        let reference_ttl = Duration::from_secs(config.cache.reference_ttl_secs);
        let cache_ttl = Duration::from_secs(config.cache.quote_ttl_secs);
        let fallback = config.cache.fallback_to_builtin;
        QuoteEngine {
            config,
            library: ReferenceLibrary::cached(store, reference_ttl, fallback),
            cache: TtlMap::new(cache_ttl),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Produces a full quote for one raw intake.
    ///
    /// # Errors
    ///
    /// - [`QuoteError::MissingTemplate`] for industries with no calculator
    ///   coverage (airport, stadium).
    /// - [`QuoteError::InputValidation`] when the intake has no load
    ///   driver and no peak or bill anchor.
    /// - [`QuoteError::DataSourceUnavailable`] when the reference store is
    ///   down and fallback is disabled.
    /// - [`QuoteError::Calculation`] when a stage produces a non-physical
    ///   result.
    pub fn quote(
        &self,
        industry: Industry,
        answers: &BTreeMap<String, AnswerValue>,
    ) -> Result<QuoteResult, QuoteError> {
        let calculator = industry
            .calculator()
            .ok_or_else(|| QuoteError::MissingTemplate {
                slug: industry.slug().to_string(),
            })?;

        let mut warnings = Vec::new();
        let (template, template_prov) = self.library.template(industry)?;
        if template_prov == Provenance::BuiltinFallback {
            warnings.push("reference store unavailable; built-in template used".to_string());
        }

        let input = normalize(industry, answers, template)?;

        let key = fingerprint(&input);
        if let Some(cached) = self.cache.get(&key) {
            return Ok(cached);
        }

        let mut profile = calculator.compute(&input);
        if !profile.peak_load_kw.is_finite() || profile.peak_load_kw <= 0.0 {
            return Err(QuoteError::Calculation {
                stage: "load_profile",
                message: format!("non-physical peak {} kW", profile.peak_load_kw),
            });
        }
        if input.supplied_positive("peak_kw") {
            profile = profile.rescaled_to_peak(input.number("peak_kw"));
        } else if profile.kw_contributors.contains_key("facility_base") {
            if input.supplied_positive("monthly_bill") {
                warnings.push("load reconstructed from billing estimate".to_string());
            } else {
                warnings.push(
                    "load anchored to the industry floor; provide equipment counts or a bill"
                        .to_string(),
                );
            }
        }

        let sizing = sizing::recommend(&profile, &input, &self.config.sizing);
        if !sizing.bess_kw.is_finite() || sizing.bess_kw <= 0.0 {
            return Err(QuoteError::Calculation {
                stage: "sizing",
                message: format!("non-physical power {} kW", sizing.bess_kw),
            });
        }

        let (price_table, price_prov) = self.library.price_table()?;
        if price_prov == Provenance::BuiltinFallback {
            warnings.push("reference store unavailable; built-in price table used".to_string());
        }
        let bom = pricing::price(&sizing, &price_table, &self.config.pricing);
        if !bom.total_capex.is_finite() || bom.total_capex <= 0.0 {
            return Err(QuoteError::Calculation {
                stage: "pricing",
                message: format!("non-physical capex {}", bom.total_capex),
            });
        }

        let (constants, constants_prov) = self.library.financial_constants()?;
        if constants_prov == Provenance::BuiltinFallback {
            warnings.push("reference store unavailable; built-in financial constants used".to_string());
        }
        if constants.project_years == 0 {
            return Err(QuoteError::Calculation {
                stage: "financials",
                message: "project lifetime is zero years".to_string(),
            });
        }
        let financials = finance::evaluate(&sizing, &bom, &constants);
        if !financials.npv.is_finite() {
            return Err(QuoteError::Calculation {
                stage: "financials",
                message: format!("non-finite NPV {}", financials.npv),
            });
        }

        let confidence = confidence_score(template, &input);
        if confidence < self.config.validation.min_confidence_warn {
            warnings.push(format!(
                "low intake confidence {confidence:.2}; quote is a rough estimate"
            ));
        }
        let required: std::collections::BTreeSet<String> =
            REQUIRED_UNIVERSAL.iter().map(|f| f.to_string()).collect();
        for field in input.defaulted_required(&required) {
            warnings.push(format!("required answer \"{field}\" defaulted"));
        }

        let result = QuoteResult {
            industry,
            input,
            profile,
            sizing,
            bom,
            financials,
            confidence,
            warnings,
        };
        self.cache.insert(key, result.clone());
        Ok(result)
    }

    /// Number of memoized quotes currently held.
    pub fn cached_quotes(&self) -> usize {
        self.cache.len()
    }
}

/// Stable fingerprint of a normalized input, used as the memoization key.
/// BTree iteration order makes it deterministic; the defaulted-field set
/// participates because it feeds the confidence score.
fn fingerprint(input: &CalculationInput) -> u64 {
    let mut hasher = DefaultHasher::new();
    input.industry.slug().hash(&mut hasher);
    for (key, value) in &input.values {
        key.hash(&mut hasher);
        match value {
            AnswerValue::Flag(b) => {
                0u8.hash(&mut hasher);
                b.hash(&mut hasher);
            }
            AnswerValue::Number(n) => {
                1u8.hash(&mut hasher);
                n.to_bits().hash(&mut hasher);
            }
            AnswerValue::Text(s) => {
                2u8.hash(&mut hasher);
                s.hash(&mut hasher);
            }
        }
    }
    for field in &input.defaulted_fields {
        field.hash(&mut hasher);
    }
    hasher.finish()
}
