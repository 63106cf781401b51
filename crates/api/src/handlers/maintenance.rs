//! Administrative recovery and inspection handlers.
//!
//! These replace the pile of one-off database scripts an operator would
//! otherwise accumulate: one parameterized, idempotent restore and one
//! windowed inspect.

use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;

use pilot_core::error::CoreError;
use pilot_db::models::post::{InspectQuery, PostListQuery, RestoreRequest};
use pilot_db::models::status::PostStatus;
use pilot_db::repositories::PostRepo;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/maintenance/restore
///
/// Bulk-revert erroneous publishes: every `posted` post for the org whose
/// `posted_at` falls in `[from, to]` goes back to `approved` with its
/// publish artifacts and slot cleared. Responds with the actual
/// matched/modified counts; a discrepancy is surfaced as an error, never
/// papered over, because the caller uses the count to confirm full
/// recovery.
pub async fn restore(
    State(state): State<AppState>,
    Json(input): Json<RestoreRequest>,
) -> AppResult<impl IntoResponse> {
    if input.from > input.to {
        return Err(AppError::Core(CoreError::Validation(
            "Restore window start must not be after its end".into(),
        )));
    }

    let outcome =
        PostRepo::restore_window(&state.pool, input.org_id, input.from, input.to).await?;

    if outcome.modified < outcome.matched {
        return Err(AppError::Core(CoreError::PartialUpdate {
            matched: outcome.matched,
            modified: outcome.modified,
        }));
    }

    tracing::info!(
        org_id = input.org_id,
        from = %input.from,
        to = %input.to,
        modified = outcome.modified,
        "Restored posted posts to approved",
    );

    Ok(Json(DataResponse { data: outcome }))
}

/// GET /api/v1/maintenance/posted?org_id=&from=&to=
///
/// Inspect an org's publish window before (or after) a restore:
/// posted posts, most recent first by `posted_at`.
pub async fn inspect_posted(
    State(state): State<AppState>,
    Query(params): Query<InspectQuery>,
) -> AppResult<impl IntoResponse> {
    let posts = PostRepo::list_by_status_in_window(
        &state.pool,
        &PostListQuery {
            org_id: params.org_id,
            status_id: PostStatus::Posted.id(),
            from: params.from,
            to: params.to,
            limit: params.limit,
            offset: params.offset,
        },
    )
    .await?;

    Ok(Json(DataResponse { data: posts }))
}
