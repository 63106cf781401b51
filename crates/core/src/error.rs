use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    /// A post's denormalized profile type disagrees with its campaign's.
    /// Fatal for the record: the scheduler refuses to publish and an
    /// operator has to correct the post before re-approval.
    #[error(
        "Profile mismatch on post {post_id}: post says '{post_profile}', \
         campaign says '{campaign_profile}'"
    )]
    ProfileMismatch {
        post_id: DbId,
        post_profile: String,
        campaign_profile: String,
    },

    /// A bulk update modified fewer records than it matched. The actual
    /// modified count is carried so callers can report it instead of an
    /// optimistic one.
    #[error("Bulk update matched {matched} records but modified only {modified}")]
    PartialUpdate { matched: u64, modified: u64 },

    #[error("Internal error: {0}")]
    Internal(String),
}
