//! Slot assignment policy.
//!
//! The scheduler does not decide *when* a campaign wants to publish; it
//! asks an injected [`CadenceStrategy`]. The default implementation is a
//! fixed lead time, which matches how operators expect a freshly approved
//! post to go out "within the hour" unless the campaign says otherwise.

use chrono::Duration;

use pilot_core::types::Timestamp;
use pilot_db::models::campaign::Campaign;

/// Produces the next publish slot for a post under the given campaign.
pub trait CadenceStrategy: Send + Sync {
    fn next_slot(&self, campaign: &Campaign, now: Timestamp) -> Timestamp;
}

/// Fixed lead time from the moment of assignment.
pub struct FixedLeadCadence {
    lead: Duration,
}

impl FixedLeadCadence {
    pub fn new(lead: Duration) -> Self {
        Self { lead }
    }

    pub fn from_minutes(minutes: i64) -> Self {
        Self::new(Duration::minutes(minutes))
    }
}

impl CadenceStrategy for FixedLeadCadence {
    fn next_slot(&self, _campaign: &Campaign, now: Timestamp) -> Timestamp {
        now + self.lead
    }
}
