//! Deterministic BESS sizing and valuation engine with TrueQuote
//! contract certification.

#[cfg(feature = "api")]
pub mod api;
pub mod config;
pub mod error;
pub mod industries;
pub mod io;
/// Quote pipeline: intake normalization, load modeling, sizing, pricing,
/// and financial metrics.
pub mod quote;
pub mod store;
/// Certification harness: fixtures, invariant checks, and the scoreboard.
pub mod truequote;
