//! Route definitions for administrative recovery tooling.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::maintenance;
use crate::state::AppState;

/// Routes mounted at `/maintenance`.
///
/// ```text
/// POST   /restore   -> restore  {org_id, from, to}
/// GET    /posted    -> inspect_posted (?org_id, ?from, ?to)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/restore", post(maintenance::restore))
        .route("/posted", get(maintenance::inspect_posted))
}
