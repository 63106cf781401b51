//! Liveness endpoint.

use axum::extract::State;
use axum::Json;
use serde_json::json;

use crate::state::AppState;

/// GET /health
///
/// Reports process liveness plus a database round-trip, so load balancers
/// and deploy checks see DB connectivity problems immediately.
pub async fn health_check(State(state): State<AppState>) -> Json<serde_json::Value> {
    let db_healthy = pilot_db::health_check(&state.pool).await.is_ok();

    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "db_healthy": db_healthy,
    }))
}
