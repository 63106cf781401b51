//! Post entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use pilot_core::types::{DbId, OrgId, Timestamp};

use super::status::StatusId;

/// A row from the `posts` table.
///
/// The three publish artifacts (`posted_at`, `linkedin_post_id`,
/// `platform_url`) are either all present or all absent; the table's CHECK
/// constraint enforces the grouping and the repository only ever writes
/// them together.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Post {
    pub id: DbId,
    pub org_id: OrgId,
    pub campaign_id: DbId,
    pub content: String,
    pub status_id: StatusId,
    /// Absent until the scheduler assigns a slot; cleared on restore.
    pub scheduled_for: Option<Timestamp>,
    pub image_url: Option<String>,
    /// Denormalized from the campaign at creation; must still agree with
    /// the campaign when the post is published.
    pub profile_type: String,
    pub posted_at: Option<Timestamp>,
    pub linkedin_post_id: Option<String>,
    pub platform_url: Option<String>,
    /// Adapter attempts so far; the scheduler stops retrying at the
    /// configured bound.
    pub publish_attempts: i16,
    /// Why the post is `failed` (e.g. `profile_mismatch`). Cleared on
    /// re-approval and restore.
    pub failure_reason: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Post {
    /// True when all three publish artifacts are present.
    pub fn has_publish_artifacts(&self) -> bool {
        self.posted_at.is_some() && self.linkedin_post_id.is_some() && self.platform_url.is_some()
    }

    /// True when no publish artifact is present.
    pub fn publish_artifacts_cleared(&self) -> bool {
        self.posted_at.is_none() && self.linkedin_post_id.is_none() && self.platform_url.is_none()
    }
}

/// DTO for creating a draft via `POST /api/v1/posts`.
///
/// `profile_type` defaults to the owning campaign's when omitted.
#[derive(Debug, Deserialize, Validate)]
pub struct CreatePost {
    pub org_id: OrgId,
    pub campaign_id: DbId,
    #[validate(length(min = 1, max = 3000))]
    pub content: String,
    #[validate(url)]
    pub image_url: Option<String>,
    pub profile_type: Option<String>,
}

/// Query parameters for `GET /api/v1/posts`.
#[derive(Debug, Deserialize)]
pub struct PostListQuery {
    pub org_id: OrgId,
    /// Filter by status ID (e.g. 3 = approved, 6 = failed).
    pub status_id: StatusId,
    /// Inclusive window start; applied to `posted_at` for posted posts,
    /// `updated_at` otherwise.
    pub from: Option<Timestamp>,
    /// Inclusive window end.
    pub to: Option<Timestamp>,
    /// Maximum number of results. Defaults to 50, capped at 100.
    pub limit: Option<i64>,
    /// Number of results to skip. Defaults to 0.
    pub offset: Option<i64>,
}

/// DTO for `PUT /api/v1/posts/{id}/content`.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateContent {
    #[validate(length(min = 1, max = 3000))]
    pub content: String,
}

/// DTO for `POST /api/v1/maintenance/restore`: the operator-specified org
/// and publish window to revert. Always explicit parameters, never a baked
/// in date range.
#[derive(Debug, Deserialize)]
pub struct RestoreRequest {
    pub org_id: OrgId,
    pub from: Timestamp,
    pub to: Timestamp,
}

/// Query parameters for `GET /api/v1/maintenance/posted`.
#[derive(Debug, Deserialize)]
pub struct InspectQuery {
    pub org_id: OrgId,
    pub from: Option<Timestamp>,
    pub to: Option<Timestamp>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Result of a bulk restore: how many `posted` rows the window matched and
/// how many were actually reverted. Callers compare the two to detect
/// partial failure.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct RestoreOutcome {
    pub matched: u64,
    pub modified: u64,
}
