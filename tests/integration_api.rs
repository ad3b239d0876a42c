//! Integration tests for the REST API feature.

#![cfg(feature = "api")]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use tower::util::ServiceExt;

use powerquote::api::{AppState, router};
use powerquote::config::EngineConfig;
use powerquote::quote::QuoteEngine;

fn build_api_state() -> Arc<AppState> {
    Arc::new(AppState {
        engine: QuoteEngine::new(EngineConfig::baseline()),
    })
}

fn quote_request(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/quote")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn quote_round_trip_serializes_the_full_result() {
    let app = router(build_api_state());

    let resp = app
        .oneshot(quote_request(
            r#"{
                "industry": "hotel",
                "answers": {
                    "room_count": 150,
                    "hotel_class": "midscale",
                    "has_pool": true,
                    "has_restaurant": true,
                    "has_laundry": false,
                    "occupancy_rate": 0.72,
                    "monthly_bill": 21000,
                    "operating_hours": 24,
                    "grid_connection": "reliable"
                }
            }"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);

    let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(json["profile"]["peak_load_kw"], 425.0);
    assert_eq!(json["sizing"]["bess_kw"], 170.0);
    assert_eq!(json["sizing"]["bess_kwh"], 680.0);
    assert!(json["bom"]["total_capex"].as_f64().unwrap() > 0.0);
    assert!(json["financials"]["npv"].as_f64().unwrap().is_finite());
    assert!(json["warnings"].as_array().unwrap().is_empty());

    // every stage of the pipeline is visible in the payload
    for key in [
        "input",
        "profile",
        "sizing",
        "bom",
        "financials",
        "confidence",
        "validation",
    ] {
        assert!(json.get(key).is_some(), "missing payload key {key}");
    }

    // the badge contract: version + status, with all checks recorded
    assert_eq!(json["validation"]["version"], "v1");
    assert_eq!(json["validation"]["status"], "pass");
    let checks = json["validation"]["checks"].as_array().unwrap();
    assert!(!checks.is_empty());
    assert!(checks.iter().all(|c| c["passed"] == true));
    assert!(
        !json["validation"]["assumptions"]
            .as_array()
            .unwrap()
            .is_empty()
    );
}

#[tokio::test]
async fn industries_catalog_marks_coverage_gaps() {
    let app = router(build_api_state());

    let req = Request::builder()
        .uri("/industries")
        .body(Body::empty())
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);

    let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    let records: Vec<serde_json::Value> = serde_json::from_slice(&body).unwrap();

    assert_eq!(records.len(), 15);

    let airport = records
        .iter()
        .find(|r| r["slug"] == "airport")
        .expect("airport should be listed");
    assert_eq!(airport["supported"], false);

    let hotel = records
        .iter()
        .find(|r| r["slug"] == "hotel")
        .expect("hotel should be listed");
    assert_eq!(hotel["supported"], true);
    assert!(!hotel["driver_fields"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn unquotable_intake_maps_to_a_client_error() {
    let app = router(build_api_state());

    let resp = app
        .oneshot(quote_request(
            r#"{"industry": "office", "answers": {"facility_sqft": 0}}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["kind"], "input_validation");
    assert!(
        json["error"]
            .as_str()
            .unwrap()
            .contains("facility_sqft")
    );
}

#[tokio::test]
async fn coverage_gap_maps_to_not_found() {
    let app = router(build_api_state());

    let resp = app
        .oneshot(quote_request(
            r#"{"industry": "stadium", "answers": {"facility_sqft": 1200000}}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["kind"], "missing_template");
    assert!(json["error"].as_str().unwrap().contains("stadium"));
}
