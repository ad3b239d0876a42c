//! Certification harness: runs fixtures through the engine, classifies
//! each outcome, and keeps one bad fixture from taking down the batch.

use std::collections::BTreeSet;
use std::panic::{self, AssertUnwindSafe};

use serde::Serialize;

use crate::config::ValidationConfig;
use crate::error::QuoteError;
use crate::industries::Industry;
use crate::quote::normalize::BILL_ESTIMATED_PEAK_KW;
use crate::quote::template::REQUIRED_UNIVERSAL;
use crate::quote::{QuoteEngine, QuoteResult};
use crate::truequote::fixtures::Fixture;
use crate::truequote::invariants::{CheckOutcome, run_checks};

/// Certification contract version stamped on every envelope. Consumers
/// key their badge logic on `status` and this tag, never on the raw
/// numbers.
pub const CONTRACT_VERSION: &str = "v1";

/// Certification verdict for one fixture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CertStatus {
    /// Every check passed and the quote carries no warnings.
    Pass,
    /// Checks passed, but the quote leans on defaults or estimates.
    PassWarn,
    /// At least one plausibility check failed; the number is not
    /// publishable.
    Fail,
    /// Known coverage gap: the industry has no calculator yet.
    Skip,
    /// The engine returned an error or panicked instead of a verdict.
    Crash,
}

impl CertStatus {
    /// Fixed-width label for the scoreboard.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Pass => "PASS",
            Self::PassWarn => "WARN",
            Self::Fail => "FAIL",
            Self::Skip => "SKIP",
            Self::Crash => "CRASH",
        }
    }

    /// True for outcomes a release gate can accept.
    pub fn is_acceptable(&self) -> bool {
        !matches!(self, Self::Fail | Self::Crash)
    }
}

/// Condensed quote numbers carried in the report, so a reviewer can skim
/// a batch without unpacking full quote payloads.
#[derive(Debug, Clone, Serialize)]
pub struct QuoteSummary {
    pub peak_kw: f64,
    pub bess_kw: f64,
    pub bess_kwh: f64,
    pub total_capex: f64,
    pub npv: f64,
    pub simple_payback_years: Option<f64>,
}

impl From<&QuoteResult> for QuoteSummary {
    fn from(result: &QuoteResult) -> Self {
        QuoteSummary {
            peak_kw: result.profile.peak_load_kw,
            bess_kw: result.sizing.bess_kw,
            bess_kwh: result.sizing.bess_kwh,
            total_capex: result.bom.total_capex,
            npv: result.financials.npv,
            simple_payback_years: result.financials.simple_payback_years,
        }
    }
}

/// Full certification record for one fixture.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationEnvelope {
    /// Contract version the envelope was produced under.
    pub version: &'static str,
    /// Fixture label (`"hotel_baseline"`, `"car_wash_fuzz_2"`, ...).
    pub fixture: String,
    pub industry: Industry,
    pub status: CertStatus,
    /// Check outcomes; empty for skip and crash rows.
    pub checks: Vec<CheckOutcome>,
    /// Answers filled from template defaults, one line per field.
    pub assumptions: Vec<String>,
    /// Warnings the engine attached to the quote.
    pub warnings: Vec<String>,
    /// Intake confidence, when a quote was produced.
    pub confidence: Option<f64>,
    /// Skip reason, error, or panic message.
    pub detail: Option<String>,
    pub summary: Option<QuoteSummary>,
}

/// Certifies one fixture against the engine.
///
/// A [`QuoteError::MissingTemplate`] from a known coverage-gap industry is
/// an expected skip; the same error anywhere else, or any other engine
/// error, is a crash row. Strict mode additionally fails quotes whose
/// required universal answers had to be defaulted.
pub fn certify(engine: &QuoteEngine, fixture: &Fixture) -> ValidationEnvelope {
    match engine.quote(fixture.industry, &fixture.answers) {
        Ok(result) => classify(engine, fixture, &result),
        Err(QuoteError::MissingTemplate { slug }) if fixture.industry.is_coverage_gap() => {
            ValidationEnvelope {
                version: CONTRACT_VERSION,
                fixture: fixture.label.clone(),
                industry: fixture.industry,
                status: CertStatus::Skip,
                checks: Vec::new(),
                assumptions: Vec::new(),
                warnings: Vec::new(),
                confidence: None,
                detail: Some(format!("no calculator for \"{slug}\" yet")),
                summary: None,
            }
        }
        Err(err) => crash_row(fixture, format!("{} error: {err}", err.kind())),
    }
}

/// Certifies one already-computed quote, outside any fixture run.
///
/// This is the per-request path: the API attaches the returned verdict to
/// each response so the caller can pick a badge without re-deriving the
/// policy the batch harness uses.
pub fn certify_quote(result: &QuoteResult, validation: &ValidationConfig) -> QuoteCertification {
    let checks = run_checks(result, validation);
    let (status, detail) = verdict(result, validation, &checks);
    QuoteCertification {
        version: CONTRACT_VERSION,
        status,
        checks,
        confidence: result.confidence,
        assumptions: assumptions_for(result),
        warnings: result.warnings.clone(),
        detail,
    }
}

/// Certification verdict for one ad-hoc quote.
#[derive(Debug, Clone, Serialize)]
pub struct QuoteCertification {
    /// Contract version the verdict was produced under.
    pub version: &'static str,
    pub status: CertStatus,
    pub checks: Vec<CheckOutcome>,
    /// Intake confidence in `[0, 1]`.
    pub confidence: f64,
    /// Answers filled from template defaults, one line per field.
    pub assumptions: Vec<String>,
    pub warnings: Vec<String>,
    /// Populated when the verdict is not a clean pass.
    pub detail: Option<String>,
}

/// Shared status policy: check failures dominate, then strict-mode
/// defaulting, then warnings demote a pass.
fn verdict(
    result: &QuoteResult,
    validation: &ValidationConfig,
    checks: &[CheckOutcome],
) -> (CertStatus, Option<String>) {
    let any_failed = checks.iter().any(|c| !c.passed);

    let required: BTreeSet<String> = REQUIRED_UNIVERSAL.iter().map(|f| f.to_string()).collect();
    let defaulted_required = result.input.defaulted_required(&required);

    if any_failed {
        let names: Vec<&str> = checks
            .iter()
            .filter(|c| !c.passed)
            .map(|c| c.name)
            .collect();
        (CertStatus::Fail, Some(format!("failed: {}", names.join(", "))))
    } else if validation.strict && !defaulted_required.is_empty() {
        (
            CertStatus::Fail,
            Some(format!(
                "strict mode: required answers defaulted: {}",
                defaulted_required.join(", ")
            )),
        )
    } else if !result.warnings.is_empty() {
        (CertStatus::PassWarn, None)
    } else {
        (CertStatus::Pass, None)
    }
}

fn assumptions_for(result: &QuoteResult) -> Vec<String> {
    result
        .input
        .defaulted_fields
        .iter()
        .map(|field| {
            if field == BILL_ESTIMATED_PEAK_KW {
                "peak demand estimated from the monthly bill".to_string()
            } else {
                format!("\"{field}\" taken from the template default")
            }
        })
        .collect()
}

fn classify(engine: &QuoteEngine, fixture: &Fixture, result: &QuoteResult) -> ValidationEnvelope {
    let validation = &engine.config().validation;
    let checks = run_checks(result, validation);
    let (status, detail) = verdict(result, validation, &checks);

    ValidationEnvelope {
        version: CONTRACT_VERSION,
        fixture: fixture.label.clone(),
        industry: fixture.industry,
        status,
        checks,
        assumptions: assumptions_for(result),
        warnings: result.warnings.clone(),
        confidence: Some(result.confidence),
        detail,
        summary: Some(QuoteSummary::from(result)),
    }
}

fn crash_row(fixture: &Fixture, detail: String) -> ValidationEnvelope {
    ValidationEnvelope {
        version: CONTRACT_VERSION,
        fixture: fixture.label.clone(),
        industry: fixture.industry,
        status: CertStatus::Crash,
        checks: Vec::new(),
        assumptions: Vec::new(),
        warnings: Vec::new(),
        confidence: None,
        detail: Some(detail),
        summary: None,
    }
}

/// Certifies every fixture, isolating panics per fixture.
///
/// A panicking calculator produces one crash row and the batch keeps
/// going; the engine's caches tolerate a poisoned lock.
pub fn run_batch(engine: &QuoteEngine, fixtures: &[Fixture]) -> Vec<ValidationEnvelope> {
    fixtures
        .iter()
        .map(|fixture| run_isolated(|| certify(engine, fixture), fixture))
        .collect()
}

fn run_isolated(
    job: impl FnOnce() -> ValidationEnvelope,
    fixture: &Fixture,
) -> ValidationEnvelope {
    match panic::catch_unwind(AssertUnwindSafe(job)) {
        Ok(envelope) => envelope,
        Err(payload) => crash_row(
            fixture,
            format!("panic: {}", panic_message(payload.as_ref())),
        ),
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
