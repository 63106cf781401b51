//! Route definitions for the `/posts` resource (review/approval surface).

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::posts;
use crate::state::AppState;

/// Routes mounted at `/posts`.
///
/// ```text
/// GET    /                 -> list_posts (?org_id, ?status_id, ?from, ?to)
/// POST   /                 -> create_post
/// GET    /{id}             -> get_post
/// POST   /{id}/submit      -> submit_post
/// POST   /{id}/approve     -> approve_post
/// PUT    /{id}/content     -> update_content
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(posts::list_posts).post(posts::create_post))
        .route("/{id}", get(posts::get_post))
        .route("/{id}/submit", post(posts::submit_post))
        .route("/{id}/approve", post(posts::approve_post))
        .route("/{id}/content", put(posts::update_content))
}
