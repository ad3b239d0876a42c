//! Error taxonomy shared across the quote pipeline.

use std::fmt;

/// Errors surfaced by the quote pipeline.
///
/// Invariant violations are *not* represented here: the TrueQuote harness
/// reports them as `Fail` rows inside the [`crate::truequote::ValidationEnvelope`]
/// rather than unwinding the pipeline.
#[derive(Debug, Clone, PartialEq)]
pub enum QuoteError {
    /// No load anchor at all: direct peak kW, monthly bill, and every
    /// industry scale count are absent or zero. Recoverable by re-prompting
    /// for one of the named fields.
    InputValidation {
        /// Canonical field names any one of which would anchor the quote.
        missing: Vec<String>,
    },
    /// Degenerate numeric input reached a calculation stage (e.g. zero
    /// project lifetime, non-positive capex). Never silently defaulted.
    Calculation {
        /// Pipeline stage that rejected the input.
        stage: &'static str,
        /// Constraint description.
        message: String,
    },
    /// The industry resolved to a variant with no registered calculator.
    ///
    /// Batch runs map this to `Skip` when the slug is on the expected-gap
    /// list, otherwise to `Crash`.
    MissingTemplate {
        /// Canonical industry slug.
        slug: String,
    },
    /// A reference-store read failed. The pipeline recovers with built-in
    /// conservative defaults and a `warnings` entry; this variant only
    /// escapes when a store implementation is queried directly.
    DataSourceUnavailable {
        /// Which lookup failed (`"industry_template"`, `"pricing_tiers"`,
        /// `"financial_constants"`).
        source: &'static str,
        /// Underlying failure description.
        message: String,
    },
}

impl fmt::Display for QuoteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InputValidation { missing } => {
                write!(
                    f,
                    "no load anchor: supply one of [{}] to derive peak demand",
                    missing.join(", ")
                )
            }
            Self::Calculation { stage, message } => {
                write!(f, "calculation error in {stage}: {message}")
            }
            Self::MissingTemplate { slug } => {
                write!(f, "no calculator registered for industry \"{slug}\"")
            }
            Self::DataSourceUnavailable { source, message } => {
                write!(f, "reference store read failed ({source}): {message}")
            }
        }
    }
}

impl QuoteError {
    /// Short machine-readable kind tag used in API error bodies and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InputValidation { .. } => "input_validation",
            Self::Calculation { .. } => "calculation",
            Self::MissingTemplate { .. } => "missing_template",
            Self::DataSourceUnavailable { .. } => "data_source_unavailable",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_validation_lists_anchor_fields() {
        let err = QuoteError::InputValidation {
            missing: vec!["peak_kw".into(), "monthly_bill".into(), "wash_bays".into()],
        };
        let msg = format!("{err}");
        assert!(msg.contains("peak_kw"));
        assert!(msg.contains("wash_bays"));
        assert_eq!(err.kind(), "input_validation");
    }

    #[test]
    fn calculation_error_names_stage() {
        let err = QuoteError::Calculation {
            stage: "finance",
            message: "project_years must be > 0".into(),
        };
        assert!(format!("{err}").contains("finance"));
        assert_eq!(err.kind(), "calculation");
    }

    #[test]
    fn missing_template_names_slug() {
        let err = QuoteError::MissingTemplate {
            slug: "airport".into(),
        };
        assert!(format!("{err}").contains("airport"));
    }
}
