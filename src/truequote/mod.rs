//! TrueQuote certification: fixtures, invariant checks, harness, report.

pub mod fixtures;
pub mod harness;
pub mod invariants;
pub mod report;

pub use fixtures::{Fixture, baseline_fixtures, fixture_set, fuzzed_fixtures};
pub use harness::{
    CONTRACT_VERSION, CertStatus, QuoteCertification, ValidationEnvelope, certify, certify_quote,
    run_batch,
};
pub use report::{CertificationReport, Scoreboard, SummaryRow, render_table, summary_rows};
