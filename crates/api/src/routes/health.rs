//! Route definition for the health check.

use axum::routing::get;
use axum::Router;

use crate::handlers::health;
use crate::state::AppState;

/// Mounted at root level (not under `/api/v1`).
///
/// ```text
/// GET /health -> health_check
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health::health_check))
}
