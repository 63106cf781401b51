//! Route definitions for the `/campaigns` resource.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::campaigns;
use crate::state::AppState;

/// Routes mounted at `/campaigns`.
///
/// ```text
/// GET    /                 -> list_campaigns (?org_id)
/// POST   /                 -> create_campaign
/// GET    /{id}             -> get_campaign
/// PUT    /{id}/auto-post   -> set_auto_post
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(campaigns::list_campaigns).post(campaigns::create_campaign),
        )
        .route("/{id}", get(campaigns::get_campaign))
        .route("/{id}/auto-post", put(campaigns::set_auto_post))
}
