//! REST API for on-demand quoting.
//!
//! Provides two endpoints:
//! - `POST /quote` — produce one quote from raw intake answers
//! - `GET /industries` — industry catalog with coverage flags

mod handlers;
mod types;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};

use crate::quote::QuoteEngine;

/// Application state shared across all request handlers.
///
/// The engine's stages are pure and its caches lock internally, so one
/// instance behind an `Arc` serves concurrent requests without further
/// synchronization.
pub struct AppState {
    /// Engine every request quotes through.
    pub engine: QuoteEngine,
}

/// Builds the axum router with all API routes.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/quote", post(handlers::post_quote))
        .route("/industries", get(handlers::get_industries))
        .with_state(state)
}

/// Binds to the given address and serves the API.
///
/// # Panics
///
/// Panics if the TCP listener cannot bind to `addr`.
pub async fn serve(state: Arc<AppState>, addr: SocketAddr) {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind to {addr}: {e}"));
    eprintln!("API server listening on http://{addr}");
    axum::serve(listener, app)
        .await
        .unwrap_or_else(|e| panic!("server error: {e}"));
}
