//! API request and response types.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::industries::Industry;
use crate::quote::QuoteResult;
use crate::quote::types::AnswerValue;
use crate::truequote::harness::QuoteCertification;

/// Body of `POST /quote`: an industry name plus raw wizard answers.
///
/// The industry string is resolved through the same alias table the rest
/// of the engine uses, so `"Car Wash"`, `"carwash"`, and `"car_wash"` all
/// land on the same calculator.
#[derive(Debug, Deserialize)]
pub struct QuoteRequest {
    pub industry: String,
    /// Raw answers; keys are canonicalized server-side.
    #[serde(default)]
    pub answers: BTreeMap<String, AnswerValue>,
}

/// Body of a successful `POST /quote`.
///
/// The engine output is flattened at the top level; `validation` carries
/// the certification verdict, and callers decide what to label "verified"
/// from its `status` and `version` alone.
#[derive(Debug, Serialize)]
pub struct QuoteResponse {
    #[serde(flatten)]
    pub result: QuoteResult,
    pub validation: QuoteCertification,
}

/// One row of the `GET /industries` catalog.
#[derive(Debug, Serialize)]
pub struct IndustryRecord {
    /// Canonical slug accepted by `POST /quote`.
    pub slug: &'static str,
    pub display_name: &'static str,
    /// False for recognized industries that have no calculator yet.
    pub supported: bool,
    /// Primary load drivers the intake should supply.
    pub driver_fields: &'static [&'static str],
}

impl IndustryRecord {
    pub fn for_industry(industry: Industry) -> Self {
        IndustryRecord {
            slug: industry.slug(),
            display_name: industry.display_name(),
            supported: !industry.is_coverage_gap(),
            driver_fields: crate::quote::template_for(industry).driver_fields,
        }
    }
}

/// Error response body for non-200 outcomes.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Stable machine-readable error kind.
    pub kind: String,
    /// Human-readable error message.
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_row_flags_coverage_gaps() {
        let airport = IndustryRecord::for_industry(Industry::Airport);
        assert!(!airport.supported);
        let hotel = IndustryRecord::for_industry(Industry::Hotel);
        assert!(hotel.supported);
        assert_eq!(hotel.driver_fields, &["room_count"]);
    }

    #[test]
    fn quote_request_tolerates_missing_answers() {
        let req: QuoteRequest = serde_json::from_str(r#"{"industry": "hotel"}"#)
            .expect("body without answers should parse");
        assert!(req.answers.is_empty());
    }

    #[test]
    fn quote_request_answers_accept_mixed_shapes() {
        let req: QuoteRequest = serde_json::from_str(
            r#"{"industry": "car wash", "answers": {"wash_bays": 6, "wash_type": "tunnel", "has_water_reclaim": true}}"#,
        )
        .expect("mixed answer shapes should parse");
        assert_eq!(req.answers.len(), 3);
        assert_eq!(req.answers["wash_bays"], AnswerValue::Number(6.0));
        assert_eq!(req.answers["has_water_reclaim"], AnswerValue::Flag(true));
    }
}
