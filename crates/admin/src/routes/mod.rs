//! HTTP route handlers for the catalog API.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                - Liveness check
//! GET    /health/ready          - Readiness check (catalog file readable)
//!
//! # Furniture (flat-file catalog)
//! GET    /api/furniture         - List entries (?status=Active|Inactive|Draft)
//! POST   /api/furniture         - Create entry (201 + created entry)
//! GET    /api/furniture/{id}    - Get entry
//! DELETE /api/furniture/{id}    - Delete entry (204 / 404)
//! ```

pub mod furniture;

use axum::{Router, extract::State, http::StatusCode, routing::get};

use crate::state::AppState;

/// Build the complete router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .merge(furniture::router())
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Returns 503 Service Unavailable if the catalog file cannot be read.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    match state.furniture().check().await {
        Ok(()) => StatusCode::OK,
        Err(e) => {
            tracing::warn!(error = %e, "Catalog not ready");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}
