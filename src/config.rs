//! TOML-based engine configuration and preset definitions.

use std::fmt;
use std::fs;
use std::path::Path;

use serde::Deserialize;

/// Top-level engine configuration parsed from TOML.
///
/// All fields have defaults matching the baseline quoting policy. Load
/// from TOML with [`EngineConfig::from_toml_file`] or use
/// [`EngineConfig::baseline`] for the built-in default.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EngineConfig {
    /// BESS power/duration sizing rules.
    #[serde(default)]
    pub sizing: SizingConfig,
    /// Markups and cost fractions applied on top of the price table.
    #[serde(default)]
    pub pricing: PricingConfig,
    /// Contract-validation thresholds and strictness.
    #[serde(default)]
    pub validation: ValidationConfig,
    /// Reference-data and quote caching.
    #[serde(default)]
    pub cache: CacheConfig,
    /// Fixture generation for validation batches.
    #[serde(default)]
    pub fixtures: FixtureConfig,
}

/// BESS power/duration sizing rules.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SizingConfig {
    /// Power target as a fraction of peak for peak-shaving quotes.
    pub peak_shaving_ratio: f64,
    /// Power target as a fraction of peak for arbitrage quotes.
    pub arbitrage_ratio: f64,
    /// Power target as a fraction of peak for resilience quotes.
    pub resilience_ratio: f64,
    /// Standard discharge duration (hours).
    pub default_duration_hours: f64,
    /// Minimum duration for off-grid sites (hours).
    pub off_grid_duration_floor_hours: f64,
    /// Extra energy fraction reserved on unreliable grids.
    pub unreliable_energy_uplift: f64,
    /// Size headroom when the customer plans to expand.
    pub expansion_headroom: f64,
    /// Multiplier on largest-motor kW for starting surge.
    pub motor_surge_multiplier: f64,
}

impl Default for SizingConfig {
    fn default() -> Self {
        Self {
            peak_shaving_ratio: 0.40,
            arbitrage_ratio: 0.50,
            resilience_ratio: 0.70,
            default_duration_hours: 4.0,
            off_grid_duration_floor_hours: 8.0,
            unreliable_energy_uplift: 0.10,
            expansion_headroom: 0.20,
            motor_surge_multiplier: 1.25,
        }
    }
}

/// Markups and cost fractions applied on top of the price table.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PricingConfig {
    /// Margin on battery-system lines.
    pub battery_markup: f64,
    /// Margin on PCS lines.
    pub pcs_markup: f64,
    /// Margin on balance-of-system lines.
    pub bos_markup: f64,
    /// Margin on EPC lines.
    pub epc_markup: f64,
    /// Balance-of-system cost as a fraction of equipment.
    pub bos_fraction: f64,
    /// EPC cost as a fraction of equipment plus BOS.
    pub epc_fraction: f64,
    /// Power at or above which PCS prices at the utility rate (kW).
    pub utility_threshold_kw: f64,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            battery_markup: 0.10,
            pcs_markup: 0.10,
            bos_markup: 0.15,
            epc_markup: 0.18,
            bos_fraction: 0.12,
            epc_fraction: 0.18,
            utility_threshold_kw: 1_000.0,
        }
    }
}

/// Contract-validation thresholds and strictness.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ValidationConfig {
    /// When true, defaulted required answers fail certification instead
    /// of warning.
    pub strict: bool,
    /// Allowed relative gap between the contributor sum and peak.
    pub contributor_sum_tolerance: f64,
    /// Allowed relative error on implied PUE for data centers.
    pub pue_tolerance: f64,
    /// Quotes below this confidence earn a warning.
    pub min_confidence_warn: f64,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            strict: false,
            contributor_sum_tolerance: 0.05,
            pue_tolerance: 0.10,
            min_confidence_warn: 0.35,
        }
    }
}

/// Reference-data and quote caching.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CacheConfig {
    /// TTL for price tables and financial constants (seconds).
    pub reference_ttl_secs: u64,
    /// TTL for memoized quote results (seconds).
    pub quote_ttl_secs: u64,
    /// Fall back to compiled-in reference data when the store is down.
    pub fallback_to_builtin: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            reference_ttl_secs: 900,
            quote_ttl_secs: 300,
            fallback_to_builtin: true,
        }
    }
}

/// Fixture generation for validation batches.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FixtureConfig {
    /// Master random seed for fuzzed intakes.
    pub seed: u64,
    /// Fuzzed intakes generated per industry, on top of the baseline.
    pub fuzz_cases_per_industry: usize,
}

impl Default for FixtureConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            fuzz_cases_per_industry: 3,
        }
    }
}

/// Configuration error with field path and constraint description.
#[derive(Debug)]
pub struct ConfigError {
    /// Dotted field path (e.g., `"sizing.peak_shaving_ratio"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "config error: {} — {}", self.field, self.message)
    }
}

impl EngineConfig {
    /// Returns the baseline quoting policy.
    pub fn baseline() -> Self {
        Self {
            sizing: SizingConfig::default(),
            pricing: PricingConfig::default(),
            validation: ValidationConfig::default(),
            cache: CacheConfig::default(),
            fixtures: FixtureConfig::default(),
        }
    }

    /// Returns the conservative preset: longer durations, fatter margins,
    /// earlier warnings.
    pub fn conservative() -> Self {
        Self {
            sizing: SizingConfig {
                default_duration_hours: 6.0,
                off_grid_duration_floor_hours: 12.0,
                unreliable_energy_uplift: 0.20,
                ..SizingConfig::default()
            },
            pricing: PricingConfig {
                battery_markup: 0.15,
                pcs_markup: 0.15,
                bos_markup: 0.20,
                epc_markup: 0.22,
                ..PricingConfig::default()
            },
            validation: ValidationConfig {
                min_confidence_warn: 0.5,
                ..ValidationConfig::default()
            },
            cache: CacheConfig::default(),
            fixtures: FixtureConfig::default(),
        }
    }

    /// Returns the strict-CI preset: defaulted required answers fail, no
    /// caching, no fallback pricing data.
    pub fn strict_ci() -> Self {
        Self {
            sizing: SizingConfig::default(),
            pricing: PricingConfig::default(),
            validation: ValidationConfig {
                strict: true,
                ..ValidationConfig::default()
            },
            cache: CacheConfig {
                reference_ttl_secs: 0,
                quote_ttl_secs: 0,
                fallback_to_builtin: false,
            },
            fixtures: FixtureConfig {
                seed: 42,
                fuzz_cases_per_industry: 5,
            },
        }
    }

    /// Available preset names.
    pub const PRESETS: &[&str] = &["baseline", "conservative", "strict_ci"];

    /// Loads a configuration from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "baseline" => Ok(Self::baseline()),
            "conservative" => Ok(Self::conservative()),
            "strict_ci" => Ok(Self::strict_ci()),
            _ => Err(ConfigError {
                field: "preset".to_string(),
                message: format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            }),
        }
    }

    /// Parses a configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError {
            field: "config".to_string(),
            message: format!("cannot read \"{}\": {e}", path.display()),
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError {
            field: "toml".to_string(),
            message: e.to_string(),
        })
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        let s = &self.sizing;

        for (field, value) in [
            ("sizing.peak_shaving_ratio", s.peak_shaving_ratio),
            ("sizing.arbitrage_ratio", s.arbitrage_ratio),
            ("sizing.resilience_ratio", s.resilience_ratio),
        ] {
            if !(value > 0.0 && value <= 1.0) {
                errors.push(ConfigError {
                    field: field.into(),
                    message: "must be in (0.0, 1.0]".into(),
                });
            }
        }
        if s.default_duration_hours <= 0.0 {
            errors.push(ConfigError {
                field: "sizing.default_duration_hours".into(),
                message: "must be > 0".into(),
            });
        }
        if s.off_grid_duration_floor_hours < s.default_duration_hours {
            errors.push(ConfigError {
                field: "sizing.off_grid_duration_floor_hours".into(),
                message: "must be >= sizing.default_duration_hours".into(),
            });
        }
        if s.unreliable_energy_uplift < 0.0 || s.expansion_headroom < 0.0 {
            errors.push(ConfigError {
                field: "sizing.unreliable_energy_uplift".into(),
                message: "uplifts must be >= 0".into(),
            });
        }
        if s.motor_surge_multiplier < 1.0 {
            errors.push(ConfigError {
                field: "sizing.motor_surge_multiplier".into(),
                message: "must be >= 1.0".into(),
            });
        }

        let p = &self.pricing;
        for (field, value) in [
            ("pricing.battery_markup", p.battery_markup),
            ("pricing.pcs_markup", p.pcs_markup),
            ("pricing.bos_markup", p.bos_markup),
            ("pricing.epc_markup", p.epc_markup),
        ] {
            if !(0.0..1.0).contains(&value) {
                errors.push(ConfigError {
                    field: field.into(),
                    message: "must be in [0.0, 1.0)".into(),
                });
            }
        }
        if !(0.0..1.0).contains(&p.bos_fraction) || !(0.0..1.0).contains(&p.epc_fraction) {
            errors.push(ConfigError {
                field: "pricing.bos_fraction".into(),
                message: "cost fractions must be in [0.0, 1.0)".into(),
            });
        }
        if p.utility_threshold_kw <= 0.0 {
            errors.push(ConfigError {
                field: "pricing.utility_threshold_kw".into(),
                message: "must be > 0".into(),
            });
        }

        let v = &self.validation;
        if !(v.contributor_sum_tolerance > 0.0 && v.contributor_sum_tolerance < 1.0) {
            errors.push(ConfigError {
                field: "validation.contributor_sum_tolerance".into(),
                message: "must be in (0.0, 1.0)".into(),
            });
        }
        if !(v.pue_tolerance > 0.0 && v.pue_tolerance < 1.0) {
            errors.push(ConfigError {
                field: "validation.pue_tolerance".into(),
                message: "must be in (0.0, 1.0)".into(),
            });
        }
        if !(0.0..=1.0).contains(&v.min_confidence_warn) {
            errors.push(ConfigError {
                field: "validation.min_confidence_warn".into(),
                message: "must be in [0.0, 1.0]".into(),
            });
        }

        if self.fixtures.fuzz_cases_per_industry == 0 {
            errors.push(ConfigError {
                field: "fixtures.fuzz_cases_per_industry".into(),
                message: "must be > 0".into(),
            });
        }

        errors
    }
}
