//! Integration tests for the post lifecycle against a real database:
//! conditional transition guards, the publish-attempt CAS claim, and the
//! publish-artifact grouping enforced by the schema.

use chrono::{Duration, Utc};
use sqlx::PgPool;

use pilot_db::models::campaign::CreateCampaign;
use pilot_db::models::post::{CreatePost, Post};
use pilot_db::models::status::PostStatus;
use pilot_db::repositories::{CampaignRepo, PostRepo};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_campaign(org_id: i64, name: &str, profile_type: &str) -> CreateCampaign {
    CreateCampaign {
        org_id,
        name: name.to_string(),
        profile_type: profile_type.to_string(),
        auto_post: true,
        linkedin_author_id: format!("urn:li:organization:{org_id}"),
    }
}

fn new_post(org_id: i64, campaign_id: i64, content: &str) -> CreatePost {
    CreatePost {
        org_id,
        campaign_id,
        content: content.to_string(),
        image_url: None,
        profile_type: None,
    }
}

/// Walk a freshly created draft to `scheduled` with a slot in the past,
/// ready for a publish attempt.
async fn schedule_post(pool: &PgPool, post_id: i64) {
    assert!(PostRepo::submit_for_review(pool, post_id).await.unwrap());
    assert!(PostRepo::approve(pool, post_id).await.unwrap());
    let slot = Utc::now() - Duration::minutes(1);
    assert!(PostRepo::assign_slot(pool, post_id, slot).await.unwrap());
}

async fn fetch(pool: &PgPool, post_id: i64) -> Post {
    PostRepo::find_by_id(pool, post_id).await.unwrap().unwrap()
}

// ---------------------------------------------------------------------------
// Creation
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn create_starts_as_draft_without_schedule(pool: PgPool) {
    let campaign = CampaignRepo::create(&pool, &new_campaign(1, "Launch", "company"))
        .await
        .unwrap();
    let post = PostRepo::create(&pool, &new_post(1, campaign.id, "Hello"))
        .await
        .unwrap();

    assert_eq!(post.status_id, PostStatus::Draft.id());
    assert!(post.scheduled_for.is_none());
    assert!(post.publish_artifacts_cleared());
    assert_eq!(post.publish_attempts, 0);
}

#[sqlx::test(migrations = "./migrations")]
async fn create_inherits_campaign_profile_type(pool: PgPool) {
    let campaign = CampaignRepo::create(&pool, &new_campaign(1, "Personal brand", "personal"))
        .await
        .unwrap();
    let post = PostRepo::create(&pool, &new_post(1, campaign.id, "Hello"))
        .await
        .unwrap();

    assert_eq!(post.profile_type, "personal");
}

// ---------------------------------------------------------------------------
// Review flow guards
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn submit_only_moves_drafts(pool: PgPool) {
    let campaign = CampaignRepo::create(&pool, &new_campaign(1, "Launch", "company"))
        .await
        .unwrap();
    let post = PostRepo::create(&pool, &new_post(1, campaign.id, "Hello"))
        .await
        .unwrap();

    assert!(PostRepo::submit_for_review(&pool, post.id).await.unwrap());
    // Second submit is a no-op: the post is no longer a draft.
    assert!(!PostRepo::submit_for_review(&pool, post.id).await.unwrap());
}

#[sqlx::test(migrations = "./migrations")]
async fn approve_requires_pending_review_or_failed(pool: PgPool) {
    let campaign = CampaignRepo::create(&pool, &new_campaign(1, "Launch", "company"))
        .await
        .unwrap();
    let post = PostRepo::create(&pool, &new_post(1, campaign.id, "Hello"))
        .await
        .unwrap();

    // Draft cannot skip review.
    assert!(!PostRepo::approve(&pool, post.id).await.unwrap());

    assert!(PostRepo::submit_for_review(&pool, post.id).await.unwrap());
    assert!(PostRepo::approve(&pool, post.id).await.unwrap());
    assert_eq!(fetch(&pool, post.id).await.status_id, PostStatus::Approved.id());
}

#[sqlx::test(migrations = "./migrations")]
async fn content_editable_until_scheduled(pool: PgPool) {
    let campaign = CampaignRepo::create(&pool, &new_campaign(1, "Launch", "company"))
        .await
        .unwrap();
    let post = PostRepo::create(&pool, &new_post(1, campaign.id, "v1"))
        .await
        .unwrap();

    assert!(PostRepo::update_content(&pool, post.id, "v2").await.unwrap());

    schedule_post(&pool, post.id).await;
    assert!(!PostRepo::update_content(&pool, post.id, "v3").await.unwrap());
    assert_eq!(fetch(&pool, post.id).await.content, "v2");
}

// ---------------------------------------------------------------------------
// Scheduler transitions
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn assign_slot_is_single_winner(pool: PgPool) {
    let campaign = CampaignRepo::create(&pool, &new_campaign(1, "Launch", "company"))
        .await
        .unwrap();
    let post = PostRepo::create(&pool, &new_post(1, campaign.id, "Hello"))
        .await
        .unwrap();
    assert!(PostRepo::submit_for_review(&pool, post.id).await.unwrap());
    assert!(PostRepo::approve(&pool, post.id).await.unwrap());

    let slot = Utc::now() + Duration::hours(1);
    assert!(PostRepo::assign_slot(&pool, post.id, slot).await.unwrap());
    // A racing second assignment finds the post already scheduled.
    assert!(!PostRepo::assign_slot(&pool, post.id, slot).await.unwrap());

    let stored = fetch(&pool, post.id).await;
    assert_eq!(stored.status_id, PostStatus::Scheduled.id());
    assert!(stored.scheduled_for.is_some());
}

#[sqlx::test(migrations = "./migrations")]
async fn claim_for_publish_detects_stale_counter(pool: PgPool) {
    let campaign = CampaignRepo::create(&pool, &new_campaign(1, "Launch", "company"))
        .await
        .unwrap();
    let post = PostRepo::create(&pool, &new_post(1, campaign.id, "Hello"))
        .await
        .unwrap();
    schedule_post(&pool, post.id).await;

    let claimed = PostRepo::claim_for_publish(&pool, post.id, 0).await.unwrap();
    assert_eq!(claimed.unwrap().publish_attempts, 1);

    // Another instance that read publish_attempts = 0 loses the race.
    let stale = PostRepo::claim_for_publish(&pool, post.id, 0).await.unwrap();
    assert!(stale.is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn mark_posted_sets_all_artifacts_atomically(pool: PgPool) {
    let campaign = CampaignRepo::create(&pool, &new_campaign(1, "Launch", "company"))
        .await
        .unwrap();
    let post = PostRepo::create(&pool, &new_post(1, campaign.id, "Hello"))
        .await
        .unwrap();
    schedule_post(&pool, post.id).await;

    assert!(
        PostRepo::mark_posted(&pool, post.id, "urn:li:share:42", "https://example.test/42")
            .await
            .unwrap()
    );

    let stored = fetch(&pool, post.id).await;
    assert_eq!(stored.status_id, PostStatus::Posted.id());
    assert!(stored.has_publish_artifacts());
    // The slot that produced the publish is retained.
    assert!(stored.scheduled_for.is_some());

    // A duplicate completion is a no-op, not a second publish.
    assert!(
        !PostRepo::mark_posted(&pool, post.id, "urn:li:share:43", "https://example.test/43")
            .await
            .unwrap()
    );
    assert_eq!(
        fetch(&pool, post.id).await.linkedin_post_id.as_deref(),
        Some("urn:li:share:42")
    );
}

#[sqlx::test(migrations = "./migrations")]
async fn mark_posted_requires_scheduled(pool: PgPool) {
    let campaign = CampaignRepo::create(&pool, &new_campaign(1, "Launch", "company"))
        .await
        .unwrap();
    let post = PostRepo::create(&pool, &new_post(1, campaign.id, "Hello"))
        .await
        .unwrap();

    assert!(
        !PostRepo::mark_posted(&pool, post.id, "urn:li:share:42", "https://example.test/42")
            .await
            .unwrap()
    );
    assert!(fetch(&pool, post.id).await.publish_artifacts_cleared());
}

#[sqlx::test(migrations = "./migrations")]
async fn mark_failed_records_reason_and_reapproval_clears_it(pool: PgPool) {
    let campaign = CampaignRepo::create(&pool, &new_campaign(1, "Launch", "company"))
        .await
        .unwrap();
    let post = PostRepo::create(&pool, &new_post(1, campaign.id, "Hello"))
        .await
        .unwrap();
    schedule_post(&pool, post.id).await;

    assert!(PostRepo::mark_failed(&pool, post.id, "profile_mismatch").await.unwrap());

    let stored = fetch(&pool, post.id).await;
    assert_eq!(stored.status_id, PostStatus::Failed.id());
    assert_eq!(stored.failure_reason.as_deref(), Some("profile_mismatch"));
    assert!(stored.publish_artifacts_cleared());

    // Operator fixes the record and re-approves: the stale slot and the
    // attempt budget go with the failure reason, so the post re-enters the
    // assignment pass cleanly.
    assert!(PostRepo::approve(&pool, post.id).await.unwrap());
    let stored = fetch(&pool, post.id).await;
    assert_eq!(stored.status_id, PostStatus::Approved.id());
    assert!(stored.failure_reason.is_none());
    assert!(stored.scheduled_for.is_none());
    assert_eq!(stored.publish_attempts, 0);
}

// ---------------------------------------------------------------------------
// Scheduler scans
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn list_due_skips_future_and_manual_campaigns(pool: PgPool) {
    let auto = CampaignRepo::create(&pool, &new_campaign(1, "Auto", "company"))
        .await
        .unwrap();
    let mut manual_input = new_campaign(1, "Manual", "company");
    manual_input.auto_post = false;
    let manual = CampaignRepo::create(&pool, &manual_input).await.unwrap();

    let due = PostRepo::create(&pool, &new_post(1, auto.id, "due"))
        .await
        .unwrap();
    schedule_post(&pool, due.id).await;

    let future = PostRepo::create(&pool, &new_post(1, auto.id, "future"))
        .await
        .unwrap();
    assert!(PostRepo::submit_for_review(&pool, future.id).await.unwrap());
    assert!(PostRepo::approve(&pool, future.id).await.unwrap());
    let far = Utc::now() + Duration::hours(6);
    assert!(PostRepo::assign_slot(&pool, future.id, far).await.unwrap());

    let held = PostRepo::create(&pool, &new_post(1, manual.id, "held"))
        .await
        .unwrap();
    schedule_post(&pool, held.id).await;

    let found = PostRepo::list_due(&pool, Utc::now()).await.unwrap();
    let ids: Vec<i64> = found.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![due.id]);
}

#[sqlx::test(migrations = "./migrations")]
async fn list_awaiting_slot_only_returns_slotless_approved(pool: PgPool) {
    let campaign = CampaignRepo::create(&pool, &new_campaign(1, "Launch", "company"))
        .await
        .unwrap();

    let waiting = PostRepo::create(&pool, &new_post(1, campaign.id, "waiting"))
        .await
        .unwrap();
    assert!(PostRepo::submit_for_review(&pool, waiting.id).await.unwrap());
    assert!(PostRepo::approve(&pool, waiting.id).await.unwrap());

    let draft = PostRepo::create(&pool, &new_post(1, campaign.id, "draft"))
        .await
        .unwrap();

    let found = PostRepo::list_awaiting_slot(&pool).await.unwrap();
    let ids: Vec<i64> = found.iter().map(|p| p.id).collect();
    assert!(ids.contains(&waiting.id));
    assert!(!ids.contains(&draft.id));
}

// ---------------------------------------------------------------------------
// Schema-level invariants
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn partial_publish_artifacts_rejected_by_schema(pool: PgPool) {
    let campaign = CampaignRepo::create(&pool, &new_campaign(1, "Launch", "company"))
        .await
        .unwrap();
    let post = PostRepo::create(&pool, &new_post(1, campaign.id, "Hello"))
        .await
        .unwrap();

    // Bypass the repository and try to set a single artifact.
    let result = sqlx::query("UPDATE posts SET linkedin_post_id = 'urn:li:share:1' WHERE id = $1")
        .bind(post.id)
        .execute(&pool)
        .await;

    assert!(result.is_err());
}

#[sqlx::test(migrations = "./migrations")]
async fn draft_cannot_carry_schedule_at_schema_level(pool: PgPool) {
    let campaign = CampaignRepo::create(&pool, &new_campaign(1, "Launch", "company"))
        .await
        .unwrap();
    let post = PostRepo::create(&pool, &new_post(1, campaign.id, "Hello"))
        .await
        .unwrap();

    let result = sqlx::query("UPDATE posts SET scheduled_for = NOW() WHERE id = $1")
        .bind(post.id)
        .execute(&pool)
        .await;

    assert!(result.is_err());
}
