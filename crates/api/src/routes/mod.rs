//! Route tables, grouped by resource.

use axum::Router;

use crate::state::AppState;

pub mod campaigns;
pub mod health;
pub mod maintenance;
pub mod posts;

/// All routes mounted under `/api/v1`.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/campaigns", campaigns::router())
        .nest("/posts", posts::router())
        .nest("/maintenance", maintenance::router())
}
