//! The tick loop: slot assignment and due-post publishing.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use pilot_core::profile::check_profile_match;
use pilot_core::publish::{PublishError, PublishRequest, Publisher};
use pilot_db::models::campaign::Campaign;
use pilot_db::models::post::Post;
use pilot_db::repositories::{CampaignRepo, PostRepo};
use pilot_db::DbPool;

use crate::cadence::CadenceStrategy;
use crate::config::SchedulerConfig;

/// Failure reason stored when a post's profile disagrees with its campaign.
pub const REASON_PROFILE_MISMATCH: &str = "profile_mismatch";

/// What one tick did, for logging and tests.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TickSummary {
    /// Posts that received a slot this tick.
    pub assigned: usize,
    /// Posts published successfully.
    pub published: usize,
    /// Posts that failed transiently and stay scheduled for the next tick.
    pub retried: usize,
    /// Posts parked as failed (mismatch, rejection, or exhausted retries).
    pub failed: usize,
    /// Due posts lost to another scheduler instance or already handled.
    pub skipped: usize,
}

/// Outcome of one publish attempt, folded into the tick summary.
enum PublishOutcome {
    Published,
    Retried,
    Failed,
    Skipped,
}

/// The periodic assignment-and-publish task.
pub struct Scheduler {
    pool: DbPool,
    publisher: Arc<dyn Publisher>,
    cadence: Arc<dyn CadenceStrategy>,
    config: SchedulerConfig,
}

impl Scheduler {
    pub fn new(
        pool: DbPool,
        publisher: Arc<dyn Publisher>,
        cadence: Arc<dyn CadenceStrategy>,
        config: SchedulerConfig,
    ) -> Self {
        Self {
            pool,
            publisher,
            cadence,
            config,
        }
    }

    /// Run ticks on the configured interval until `cancel` is triggered.
    pub async fn run(self, cancel: CancellationToken) {
        tracing::info!(
            interval_secs = self.config.tick_interval_secs,
            max_publish_attempts = self.config.max_publish_attempts,
            "Scheduler started"
        );

        let mut interval =
            tokio::time::interval(Duration::from_secs(self.config.tick_interval_secs));

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!("Scheduler stopping");
                    break;
                }
                _ = interval.tick() => {
                    match self.tick().await {
                        Ok(summary) => {
                            if summary != TickSummary::default() {
                                tracing::info!(
                                    assigned = summary.assigned,
                                    published = summary.published,
                                    retried = summary.retried,
                                    failed = summary.failed,
                                    skipped = summary.skipped,
                                    "Tick complete"
                                );
                            } else {
                                tracing::debug!("Tick complete: nothing to do");
                            }
                        }
                        Err(e) => {
                            // A failed scan leaves the posts untouched; the
                            // next tick simply sees them again.
                            tracing::error!(error = %e, "Tick failed");
                        }
                    }
                }
            }
        }
    }

    /// One full scan: assignment pass, then publish pass.
    ///
    /// Errors from individual posts are absorbed and logged inside each
    /// pass; only scan-level database errors bubble up.
    pub async fn tick(&self) -> Result<TickSummary, sqlx::Error> {
        let mut summary = TickSummary::default();
        self.assignment_pass(&mut summary).await?;
        self.publish_pass(&mut summary).await?;
        Ok(summary)
    }

    // -----------------------------------------------------------------------
    // Pass 1: give approved posts a slot
    // -----------------------------------------------------------------------

    async fn assignment_pass(&self, summary: &mut TickSummary) -> Result<(), sqlx::Error> {
        let waiting = PostRepo::list_awaiting_slot(&self.pool).await?;

        for post in waiting {
            let campaign = match CampaignRepo::find_by_id(&self.pool, post.campaign_id).await {
                Ok(Some(campaign)) => campaign,
                Ok(None) => {
                    // Orphaned post; leave it approved and let an operator
                    // repoint or delete it.
                    tracing::warn!(
                        post_id = post.id,
                        campaign_id = post.campaign_id,
                        "Campaign missing, cannot assign slot"
                    );
                    continue;
                }
                Err(e) => {
                    tracing::error!(post_id = post.id, error = %e, "Campaign lookup failed");
                    continue;
                }
            };

            let slot = self.cadence.next_slot(&campaign, Utc::now());

            match PostRepo::assign_slot(&self.pool, post.id, slot).await {
                Ok(true) => {
                    summary.assigned += 1;
                    tracing::info!(
                        post_id = post.id,
                        campaign_id = campaign.id,
                        scheduled_for = %slot,
                        "Slot assigned"
                    );
                }
                Ok(false) => {
                    // Another instance scheduled it between scan and update.
                    tracing::debug!(post_id = post.id, "Lost assignment race");
                }
                Err(e) => {
                    tracing::error!(post_id = post.id, error = %e, "Slot assignment failed");
                }
            }
        }

        Ok(())
    }

    // -----------------------------------------------------------------------
    // Pass 2: publish due posts
    // -----------------------------------------------------------------------

    async fn publish_pass(&self, summary: &mut TickSummary) -> Result<(), sqlx::Error> {
        let due = PostRepo::list_due(&self.pool, Utc::now()).await?;

        for post in due {
            let post_id = post.id;
            match self.publish_one(post).await {
                Ok(PublishOutcome::Published) => summary.published += 1,
                Ok(PublishOutcome::Retried) => summary.retried += 1,
                Ok(PublishOutcome::Failed) => summary.failed += 1,
                Ok(PublishOutcome::Skipped) => summary.skipped += 1,
                Err(e) => {
                    // Isolated: this post stays scheduled and is retried on
                    // the next tick; the rest of the batch continues.
                    summary.retried += 1;
                    tracing::error!(post_id, error = %e, "Publish attempt errored");
                }
            }
        }

        Ok(())
    }

    async fn publish_one(&self, post: Post) -> Result<PublishOutcome, sqlx::Error> {
        // Claim the attempt first so concurrent instances call the adapter
        // at most once between them.
        let Some(post) =
            PostRepo::claim_for_publish(&self.pool, post.id, post.publish_attempts).await?
        else {
            tracing::debug!(post_id = post.id, "Lost publish claim");
            return Ok(PublishOutcome::Skipped);
        };

        let Some(campaign) = CampaignRepo::find_by_id(&self.pool, post.campaign_id).await? else {
            tracing::warn!(
                post_id = post.id,
                campaign_id = post.campaign_id,
                "Campaign missing at publish time"
            );
            return Ok(PublishOutcome::Retried);
        };

        // Fail closed on a stale denormalized profile rather than posting
        // to the wrong account.
        if let Err(detail) = check_profile_match(&post.profile_type, &campaign.profile_type) {
            tracing::warn!(
                post_id = post.id,
                campaign_id = campaign.id,
                detail = %detail,
                "Refusing to publish: profile mismatch"
            );
            PostRepo::mark_failed(&self.pool, post.id, REASON_PROFILE_MISMATCH).await?;
            return Ok(PublishOutcome::Failed);
        }

        let request = PublishRequest {
            content: post.content.clone(),
            image_url: post.image_url.clone(),
            // Target identity comes from the campaign, the sole owner of
            // publishing configuration.
            profile_type: campaign.profile_type.clone(),
            author_id: campaign.linkedin_author_id.clone(),
            client_request_id: Uuid::new_v4(),
        };

        let deadline = Duration::from_secs(self.config.publish_timeout_secs);
        let result = match tokio::time::timeout(deadline, self.publisher.publish(&request)).await {
            Ok(result) => result,
            Err(_) => Err(PublishError::Timeout {
                secs: self.config.publish_timeout_secs,
            }),
        };

        match result {
            Ok(receipt) => {
                let updated = PostRepo::mark_posted(
                    &self.pool,
                    post.id,
                    &receipt.platform_post_id,
                    &receipt.platform_url,
                )
                .await?;

                if updated {
                    tracing::info!(
                        post_id = post.id,
                        campaign_id = campaign.id,
                        platform_post_id = %receipt.platform_post_id,
                        "Post published"
                    );
                    Ok(PublishOutcome::Published)
                } else {
                    // The post left `scheduled` under us (operator action or
                    // a concurrent restore). The platform post exists; the
                    // record is whatever the operator made it.
                    tracing::warn!(
                        post_id = post.id,
                        platform_post_id = %receipt.platform_post_id,
                        "Published but record no longer scheduled"
                    );
                    Ok(PublishOutcome::Skipped)
                }
            }
            Err(err) => {
                self.handle_publish_failure(&post, &campaign, err).await
            }
        }
    }

    async fn handle_publish_failure(
        &self,
        post: &Post,
        campaign: &Campaign,
        err: PublishError,
    ) -> Result<PublishOutcome, sqlx::Error> {
        // `publish_attempts` already includes this attempt (bumped by the
        // claim).
        let attempts_left =
            err.is_retryable() && post.publish_attempts < self.config.max_publish_attempts;

        if attempts_left {
            tracing::warn!(
                post_id = post.id,
                campaign_id = campaign.id,
                attempt = post.publish_attempts,
                max = self.config.max_publish_attempts,
                error = %err,
                "Publish failed, will retry next tick"
            );
            return Ok(PublishOutcome::Retried);
        }

        let reason = if err.is_retryable() {
            format!("retry limit exceeded: {err}")
        } else {
            err.to_string()
        };

        tracing::error!(
            post_id = post.id,
            campaign_id = campaign.id,
            attempt = post.publish_attempts,
            reason = %reason,
            "Publish failed permanently"
        );
        PostRepo::mark_failed(&self.pool, post.id, &reason).await?;
        Ok(PublishOutcome::Failed)
    }
}
