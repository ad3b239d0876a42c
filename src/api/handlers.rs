//! Request handlers for the API endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;

use super::AppState;
use super::types::{ErrorResponse, IndustryRecord, QuoteRequest, QuoteResponse};
use crate::error::QuoteError;
use crate::industries::Industry;
use crate::truequote::harness::certify_quote;

/// Produces one quote from raw intake answers, certified.
///
/// `POST /quote` → 200 + `QuoteResponse` JSON
///
/// Error mapping follows the engine's taxonomy: unquotable intakes are
/// the client's problem (400), coverage gaps are 404, a dead reference
/// store without fallback is 503, and anything the calculators could not
/// handle is 500.
pub async fn post_quote(
    State(state): State<Arc<AppState>>,
    Json(request): Json<QuoteRequest>,
) -> impl IntoResponse {
    let industry = Industry::resolve(&request.industry);
    match state.engine.quote(industry, &request.answers) {
        Ok(result) => {
            let validation = certify_quote(&result, &state.engine.config().validation);
            Ok(Json(QuoteResponse { result, validation }))
        }
        Err(err) => Err((
            status_for(&err),
            Json(ErrorResponse {
                kind: err.kind().to_string(),
                error: err.to_string(),
            }),
        )),
    }
}

/// Returns the industry catalog with coverage flags.
///
/// `GET /industries` → 200 + `Vec<IndustryRecord>` JSON
pub async fn get_industries() -> Json<Vec<IndustryRecord>> {
    Json(
        Industry::all()
            .iter()
            .map(|i| IndustryRecord::for_industry(*i))
            .collect(),
    )
}

fn status_for(err: &QuoteError) -> StatusCode {
    match err {
        QuoteError::InputValidation { .. } => StatusCode::BAD_REQUEST,
        QuoteError::MissingTemplate { .. } => StatusCode::NOT_FOUND,
        QuoteError::DataSourceUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
        QuoteError::Calculation { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    }
}
