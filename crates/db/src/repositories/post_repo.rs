//! Repository for the `posts` table.
//!
//! Every lifecycle mutation is a conditional update guarded on the current
//! status, so concurrent scheduler instances cannot double-assign or
//! double-publish a post. No magic numbers — every status literal goes
//! through `PostStatus`.

use sqlx::PgPool;

use pilot_core::types::{DbId, OrgId, Timestamp};

use crate::models::post::{CreatePost, Post, PostListQuery, RestoreOutcome};
use crate::models::status::{PostStatus, StatusId};

/// Column list for `posts` queries.
const COLUMNS: &str = "\
    id, org_id, campaign_id, content, status_id, scheduled_for, image_url, \
    profile_type, posted_at, linkedin_post_id, platform_url, \
    publish_attempts, failure_reason, created_at, updated_at";

/// Column list qualified with the `p.` alias, for joined queries.
const COLUMNS_P: &str = "\
    p.id, p.org_id, p.campaign_id, p.content, p.status_id, p.scheduled_for, \
    p.image_url, p.profile_type, p.posted_at, p.linkedin_post_id, \
    p.platform_url, p.publish_attempts, p.failure_reason, p.created_at, \
    p.updated_at";

/// Maximum page size for post listing.
const MAX_LIMIT: i64 = 100;

/// Default page size for post listing.
const DEFAULT_LIMIT: i64 = 50;

/// Provides lifecycle and query operations for posts.
pub struct PostRepo;

impl PostRepo {
    // -----------------------------------------------------------------------
    // Creation and lookup
    // -----------------------------------------------------------------------

    /// Create a new draft post.
    ///
    /// When the DTO omits `profile_type`, the owning campaign's value is
    /// denormalized onto the row.
    pub async fn create(pool: &PgPool, input: &CreatePost) -> Result<Post, sqlx::Error> {
        let query = format!(
            "INSERT INTO posts (org_id, campaign_id, content, status_id, image_url, profile_type) \
             VALUES ($1, $2, $3, $4, $5, \
                     COALESCE($6, (SELECT profile_type FROM campaigns WHERE id = $2))) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Post>(&query)
            .bind(input.org_id)
            .bind(input.campaign_id)
            .bind(&input.content)
            .bind(PostStatus::Draft.id())
            .bind(&input.image_url)
            .bind(&input.profile_type)
            .fetch_one(pool)
            .await
    }

    /// Find a post by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Post>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM posts WHERE id = $1");
        sqlx::query_as::<_, Post>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    // -----------------------------------------------------------------------
    // Review flow
    // -----------------------------------------------------------------------

    /// Move a draft into the review queue.
    ///
    /// Returns `false` if the post is not currently a draft.
    pub async fn submit_for_review(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE posts SET status_id = $2, updated_at = NOW() \
             WHERE id = $1 AND status_id = $3",
        )
        .bind(id)
        .bind(PostStatus::PendingReview.id())
        .bind(PostStatus::Draft.id())
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Approve a post for scheduling.
    ///
    /// Accepts posts in `pending_review` (reviewer approval) and `failed`
    /// (operator re-approval after fixing the record). Clears any stored
    /// failure reason, drops the stale slot, and resets the attempt budget
    /// so the post re-enters the assignment pass like any other approved
    /// post. Returns `false` if the post is in neither state.
    pub async fn approve(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE posts \
             SET status_id = $2, scheduled_for = NULL, publish_attempts = 0, \
                 failure_reason = NULL, updated_at = NOW() \
             WHERE id = $1 AND status_id IN ($3, $4)",
        )
        .bind(id)
        .bind(PostStatus::Approved.id())
        .bind(PostStatus::PendingReview.id())
        .bind(PostStatus::Failed.id())
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Replace a post's text body.
    ///
    /// Only allowed while the post is draft, pending_review, or approved;
    /// returns `false` once the post is scheduled or later.
    pub async fn update_content(
        pool: &PgPool,
        id: DbId,
        content: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE posts SET content = $2, updated_at = NOW() \
             WHERE id = $1 AND status_id IN ($3, $4, $5)",
        )
        .bind(id)
        .bind(content)
        .bind(PostStatus::Draft.id())
        .bind(PostStatus::PendingReview.id())
        .bind(PostStatus::Approved.id())
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    // -----------------------------------------------------------------------
    // Scheduler scans
    // -----------------------------------------------------------------------

    /// Approved posts with no slot yet, oldest update first so the backlog
    /// drains in order.
    pub async fn list_awaiting_slot(pool: &PgPool) -> Result<Vec<Post>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM posts \
             WHERE status_id = $1 AND scheduled_for IS NULL \
             ORDER BY updated_at ASC"
        );
        sqlx::query_as::<_, Post>(&query)
            .bind(PostStatus::Approved.id())
            .fetch_all(pool)
            .await
    }

    /// Scheduled posts whose slot has arrived, restricted to campaigns with
    /// automatic publishing enabled. Campaigns with `auto_post = false` are
    /// filtered out here so their posts are never even attempted.
    pub async fn list_due(pool: &PgPool, now: Timestamp) -> Result<Vec<Post>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS_P} FROM posts p \
             JOIN campaigns c ON c.id = p.campaign_id \
             WHERE p.status_id = $1 AND p.scheduled_for <= $2 AND c.auto_post = TRUE \
             ORDER BY p.scheduled_for ASC"
        );
        sqlx::query_as::<_, Post>(&query)
            .bind(PostStatus::Scheduled.id())
            .bind(now)
            .fetch_all(pool)
            .await
    }

    // -----------------------------------------------------------------------
    // Scheduler transitions (all conditional updates)
    // -----------------------------------------------------------------------

    /// Assign a publish slot: `approved -> scheduled`.
    ///
    /// Conditional on the post still being approved and slotless, so two
    /// scheduler instances racing on the same post produce one assignment.
    pub async fn assign_slot(
        pool: &PgPool,
        id: DbId,
        slot: Timestamp,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE posts SET status_id = $2, scheduled_for = $3, updated_at = NOW() \
             WHERE id = $1 AND status_id = $4 AND scheduled_for IS NULL",
        )
        .bind(id)
        .bind(PostStatus::Scheduled.id())
        .bind(slot)
        .bind(PostStatus::Approved.id())
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Claim a due post for one publish attempt.
    ///
    /// Compare-and-swap on `publish_attempts`: the update only applies if
    /// the post is still `scheduled` and the attempt counter has not moved
    /// since the caller read it. A `None` return means another instance got
    /// there first; the caller must skip the post, not publish it.
    pub async fn claim_for_publish(
        pool: &PgPool,
        id: DbId,
        expected_attempts: i16,
    ) -> Result<Option<Post>, sqlx::Error> {
        let query = format!(
            "UPDATE posts \
             SET publish_attempts = publish_attempts + 1, updated_at = NOW() \
             WHERE id = $1 AND status_id = $2 AND publish_attempts = $3 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Post>(&query)
            .bind(id)
            .bind(PostStatus::Scheduled.id())
            .bind(expected_attempts)
            .fetch_optional(pool)
            .await
    }

    /// Record a successful publish: `scheduled -> posted`.
    ///
    /// Sets all three publish artifacts in one statement; they are never
    /// written individually anywhere. Conditional on the post still being
    /// `scheduled`, so a duplicate completion is a no-op (`false`).
    pub async fn mark_posted(
        pool: &PgPool,
        id: DbId,
        linkedin_post_id: &str,
        platform_url: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE posts \
             SET status_id = $2, posted_at = NOW(), linkedin_post_id = $3, \
                 platform_url = $4, failure_reason = NULL, updated_at = NOW() \
             WHERE id = $1 AND status_id = $5",
        )
        .bind(id)
        .bind(PostStatus::Posted.id())
        .bind(linkedin_post_id)
        .bind(platform_url)
        .bind(PostStatus::Scheduled.id())
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Halt automatic processing: `scheduled -> failed`.
    ///
    /// No publish artifacts are touched; a failed post never has them.
    pub async fn mark_failed(
        pool: &PgPool,
        id: DbId,
        reason: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE posts SET status_id = $2, failure_reason = $3, updated_at = NOW() \
             WHERE id = $1 AND status_id = $4",
        )
        .bind(id)
        .bind(PostStatus::Failed.id())
        .bind(reason)
        .bind(PostStatus::Scheduled.id())
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    // -----------------------------------------------------------------------
    // Windowed listing (review UI + inspect tooling)
    // -----------------------------------------------------------------------

    /// List an organization's posts in one status, most recent first.
    ///
    /// The window and ordering use `posted_at` when querying posted posts
    /// and `updated_at` otherwise. A window that matches nothing yields an
    /// empty vec, not an error.
    pub async fn list_by_status_in_window(
        pool: &PgPool,
        params: &PostListQuery,
    ) -> Result<Vec<Post>, sqlx::Error> {
        let limit = params.limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT);
        let offset = params.offset.unwrap_or(0);

        let time_column = if params.status_id == PostStatus::Posted.id() {
            "posted_at"
        } else {
            "updated_at"
        };

        // Build the WHERE clause and track the next bind parameter index.
        let mut conditions = vec![
            "org_id = $1".to_string(),
            "status_id = $2".to_string(),
        ];
        let mut bind_idx: u32 = 3;

        if params.from.is_some() {
            conditions.push(format!("{time_column} >= ${bind_idx}"));
            bind_idx += 1;
        }
        if params.to.is_some() {
            conditions.push(format!("{time_column} <= ${bind_idx}"));
            bind_idx += 1;
        }

        let query = format!(
            "SELECT {COLUMNS} FROM posts \
             WHERE {} \
             ORDER BY {time_column} DESC \
             LIMIT ${bind_idx} OFFSET ${}",
            conditions.join(" AND "),
            bind_idx + 1,
        );

        let mut q = sqlx::query_as::<_, Post>(&query)
            .bind(params.org_id)
            .bind(params.status_id);

        if let Some(from) = params.from {
            q = q.bind(from);
        }
        if let Some(to) = params.to {
            q = q.bind(to);
        }

        q.bind(limit).bind(offset).fetch_all(pool).await
    }

    // -----------------------------------------------------------------------
    // Recovery
    // -----------------------------------------------------------------------

    /// Bulk-revert erroneous publishes: every `posted` post for the org
    /// whose `posted_at` falls in `[from, to]` goes back to `approved`,
    /// with `scheduled_for`, all publish artifacts, the failure reason, and
    /// the attempt counter cleared in the same statement.
    ///
    /// Runs inside one transaction that first counts the matching rows, so
    /// the caller can compare `matched` against `modified` and refuse to
    /// report an optimistic count. Idempotent: restored posts no longer
    /// match the filter, so a second invocation reports zero.
    pub async fn restore_window(
        pool: &PgPool,
        org_id: OrgId,
        from: Timestamp,
        to: Timestamp,
    ) -> Result<RestoreOutcome, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let matched: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM posts \
             WHERE org_id = $1 AND status_id = $2 \
               AND posted_at >= $3 AND posted_at <= $4",
        )
        .bind(org_id)
        .bind(PostStatus::Posted.id())
        .bind(from)
        .bind(to)
        .fetch_one(&mut *tx)
        .await?;

        let result = sqlx::query(
            "UPDATE posts \
             SET status_id = $5, scheduled_for = NULL, posted_at = NULL, \
                 linkedin_post_id = NULL, platform_url = NULL, \
                 publish_attempts = 0, failure_reason = NULL, \
                 updated_at = NOW() \
             WHERE org_id = $1 AND status_id = $2 \
               AND posted_at >= $3 AND posted_at <= $4",
        )
        .bind(org_id)
        .bind(PostStatus::Posted.id())
        .bind(from)
        .bind(to)
        .bind(PostStatus::Approved.id())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(RestoreOutcome {
            matched: matched as u64,
            modified: result.rows_affected(),
        })
    }

    /// Count posts in a status for an org. Used by maintenance tooling to
    /// sanity-check a window before and after a restore.
    pub async fn count_by_status(
        pool: &PgPool,
        org_id: OrgId,
        status_id: StatusId,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM posts WHERE org_id = $1 AND status_id = $2")
            .bind(org_id)
            .bind(status_id)
            .fetch_one(pool)
            .await
    }
}
