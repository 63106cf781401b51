//! Handlers for the `/posts` resource: the review/approval surface.
//!
//! Posts are created by the generation service as drafts, submitted for
//! review, and approved here; the scheduler takes over from `approved`.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use validator::Validate;

use pilot_core::error::CoreError;
use pilot_core::profile::validate_profile_type;
use pilot_core::types::DbId;
use pilot_db::models::post::{CreatePost, Post, PostListQuery, UpdateContent};
use pilot_db::repositories::{CampaignRepo, PostRepo};

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Fetch a post or produce the standard 404.
async fn find_post(pool: &sqlx::PgPool, post_id: DbId) -> AppResult<Post> {
    PostRepo::find_by_id(pool, post_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Post",
            id: post_id,
        }))
}

// ---------------------------------------------------------------------------
// Create
// ---------------------------------------------------------------------------

/// POST /api/v1/posts
///
/// Create a draft post under an existing campaign. Returns 201 with the
/// created post; 404 if the campaign does not exist.
pub async fn create_post(
    State(state): State<AppState>,
    Json(input): Json<CreatePost>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    if let Some(profile_type) = &input.profile_type {
        validate_profile_type(profile_type)
            .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;
    }

    // Look the campaign up first so a dangling campaign_id is a clean 404
    // instead of a foreign-key error.
    let campaign = CampaignRepo::find_by_id(&state.pool, input.campaign_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Campaign",
            id: input.campaign_id,
        }))?;

    if campaign.org_id != input.org_id {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Campaign {} belongs to org {}, not org {}",
            campaign.id, campaign.org_id, input.org_id
        ))));
    }

    let post = PostRepo::create(&state.pool, &input).await?;

    tracing::info!(
        post_id = post.id,
        campaign_id = post.campaign_id,
        org_id = post.org_id,
        "Draft post created",
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: post })))
}

// ---------------------------------------------------------------------------
// Read
// ---------------------------------------------------------------------------

/// GET /api/v1/posts/{id}
pub async fn get_post(
    State(state): State<AppState>,
    Path(post_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let post = find_post(&state.pool, post_id).await?;
    Ok(Json(DataResponse { data: post }))
}

/// GET /api/v1/posts?org_id=&status_id=
///
/// Windowed, paginated listing. The review UI uses this both for the
/// approval queue (status 2) and the failed-posts view (status 6, where
/// each post carries its `failure_reason`).
pub async fn list_posts(
    State(state): State<AppState>,
    Query(params): Query<PostListQuery>,
) -> AppResult<impl IntoResponse> {
    let posts = PostRepo::list_by_status_in_window(&state.pool, &params).await?;
    Ok(Json(DataResponse { data: posts }))
}

// ---------------------------------------------------------------------------
// Lifecycle
// ---------------------------------------------------------------------------

/// POST /api/v1/posts/{id}/submit
///
/// Move a draft into the review queue. 409 if the post is not a draft.
pub async fn submit_post(
    State(state): State<AppState>,
    Path(post_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    find_post(&state.pool, post_id).await?;

    let submitted = PostRepo::submit_for_review(&state.pool, post_id).await?;
    if !submitted {
        return Err(AppError::Core(CoreError::Conflict(
            "Only draft posts can be submitted for review".into(),
        )));
    }

    tracing::info!(post_id, "Post submitted for review");

    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/posts/{id}/approve
///
/// Reviewer approval (from `pending_review`) or operator re-approval
/// (from `failed`). The scheduler picks the post up on its next tick.
/// 409 if the post is in any other state.
pub async fn approve_post(
    State(state): State<AppState>,
    Path(post_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    find_post(&state.pool, post_id).await?;

    let approved = PostRepo::approve(&state.pool, post_id).await?;
    if !approved {
        return Err(AppError::Core(CoreError::Conflict(
            "Only pending_review or failed posts can be approved".into(),
        )));
    }

    tracing::info!(post_id, "Post approved");

    Ok(StatusCode::NO_CONTENT)
}

/// PUT /api/v1/posts/{id}/content
///
/// Edit the text body. Only allowed while the post is draft,
/// pending_review, or approved; 409 once it is scheduled or later.
pub async fn update_content(
    State(state): State<AppState>,
    Path(post_id): Path<DbId>,
    Json(input): Json<UpdateContent>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    find_post(&state.pool, post_id).await?;

    let updated = PostRepo::update_content(&state.pool, post_id, &input.content).await?;
    if !updated {
        return Err(AppError::Core(CoreError::Conflict(
            "Content is frozen once a post has been scheduled".into(),
        )));
    }

    Ok(StatusCode::NO_CONTENT)
}
