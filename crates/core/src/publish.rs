//! Publisher adapter contract.
//!
//! The scheduler talks to the social platform exclusively through the
//! [`Publisher`] trait so the network integration can be swapped out in
//! tests. The real implementation lives in the `pilot-linkedin` crate.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Request / receipt
// ---------------------------------------------------------------------------

/// Everything an adapter needs to put one post on the platform.
///
/// `author_id` and `profile_type` come from the owning campaign at publish
/// time, never from the post record alone.
#[derive(Debug, Clone, Serialize)]
pub struct PublishRequest {
    pub content: String,
    /// Carried through to the platform as attached media when present.
    pub image_url: Option<String>,
    pub profile_type: String,
    pub author_id: String,
    /// Client-generated idempotency key, one per publish attempt batch.
    pub client_request_id: Uuid,
}

/// Returned by an adapter on successful publish.
#[derive(Debug, Clone, Deserialize)]
pub struct PublishReceipt {
    pub platform_post_id: String,
    pub platform_url: String,
}

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Why a publish attempt did not produce a receipt.
#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    /// The platform rejected the request outright (bad payload, revoked
    /// authorization). Retrying the same request will not help.
    #[error("Publish rejected: {reason}")]
    Rejected { reason: String },

    /// The platform answered with a non-2xx status.
    #[error("Platform returned HTTP {status}")]
    Http { status: u16 },

    /// The request never completed (DNS, connect, TLS, reset).
    #[error("Network error: {0}")]
    Network(String),

    /// The adapter call exceeded its deadline. Treated as a failure and
    /// never as success; the post stays eligible for retry.
    #[error("Publish attempt timed out after {secs}s")]
    Timeout { secs: u64 },
}

impl PublishError {
    /// Whether the scheduler should retry this attempt on a later tick.
    ///
    /// Server-side errors, rate limiting, transport failures, and timeouts
    /// are transient. Explicit rejections and client errors are not.
    pub fn is_retryable(&self) -> bool {
        match self {
            PublishError::Rejected { .. } => false,
            PublishError::Http { status } => *status >= 500 || *status == 429,
            PublishError::Network(_) => true,
            PublishError::Timeout { .. } => true,
        }
    }
}

// ---------------------------------------------------------------------------
// Trait
// ---------------------------------------------------------------------------

/// A platform integration able to publish one post.
#[async_trait::async_trait]
pub trait Publisher: Send + Sync {
    /// Publish the request, returning platform identifiers on success.
    async fn publish(&self, request: &PublishRequest) -> Result<PublishReceipt, PublishError>;
}
