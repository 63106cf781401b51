//! Post lifecycle state machine.
//!
//! This module lives in `core` (zero internal deps) so it can be used by
//! the API/repository layer, the scheduler, and any CLI tooling.

// ---------------------------------------------------------------------------
// State machine
// ---------------------------------------------------------------------------

/// Post status IDs matching `post_statuses` seed data (1-based SMALLSERIAL).
///
/// The IDs are intentionally duplicated from the `db` crate's `PostStatus`
/// enum because `core` must have zero internal deps.
pub mod state_machine {
    /// Returns the set of valid target status IDs reachable from `from_status`.
    ///
    /// The only backward edges are `posted -> approved` (operator recovery)
    /// and `failed -> approved` (operator re-approval after fixing the
    /// record). Everything else moves strictly forward.
    pub fn valid_transitions(from_status: i16) -> &'static [i16] {
        match from_status {
            // Draft -> PendingReview
            1 => &[2],
            // PendingReview -> Approved
            2 => &[3],
            // Approved -> Scheduled
            3 => &[4],
            // Scheduled -> Posted, Failed
            4 => &[5, 6],
            // Posted -> Approved (recovery only)
            5 => &[3],
            // Failed -> Approved (operator re-approval)
            6 => &[3],
            // Unknown status: no transitions allowed
            _ => &[],
        }
    }

    /// Check whether a transition from `from` to `to` is valid.
    pub fn can_transition(from: i16, to: i16) -> bool {
        valid_transitions(from).contains(&to)
    }

    /// Validate a state transition, returning an error message for invalid ones.
    pub fn validate_transition(from: i16, to: i16) -> Result<(), String> {
        if can_transition(from, to) {
            Ok(())
        } else {
            let from_name = status_name(from);
            let to_name = status_name(to);
            Err(format!(
                "Invalid transition: {from_name} ({from}) -> {to_name} ({to})"
            ))
        }
    }

    /// A post's text body may only be edited before it is scheduled:
    /// draft, pending_review, or approved.
    pub fn content_editable(status: i16) -> bool {
        matches!(status, 1 | 2 | 3)
    }

    /// Statuses that may carry a `scheduled_for` timestamp. A post gets its
    /// slot on the `approved -> scheduled` transition and loses it whenever
    /// it comes back to `approved` (restore or re-approval), so everything
    /// before `scheduled` must not have one.
    pub fn carries_schedule(status: i16) -> bool {
        matches!(status, 4 | 5 | 6)
    }

    /// Human-readable name for a status ID (for error messages).
    fn status_name(id: i16) -> &'static str {
        match id {
            1 => "Draft",
            2 => "PendingReview",
            3 => "Approved",
            4 => "Scheduled",
            5 => "Posted",
            6 => "Failed",
            _ => "Unknown",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::state_machine::*;

    // -----------------------------------------------------------------------
    // Valid transitions
    // -----------------------------------------------------------------------

    #[test]
    fn draft_to_pending_review() {
        assert!(can_transition(1, 2));
    }

    #[test]
    fn pending_review_to_approved() {
        assert!(can_transition(2, 3));
    }

    #[test]
    fn approved_to_scheduled() {
        assert!(can_transition(3, 4));
    }

    #[test]
    fn scheduled_to_posted() {
        assert!(can_transition(4, 5));
    }

    #[test]
    fn scheduled_to_failed() {
        assert!(can_transition(4, 6));
    }

    #[test]
    fn posted_to_approved_is_recovery() {
        assert!(can_transition(5, 3));
    }

    #[test]
    fn failed_to_approved_is_reapproval() {
        assert!(can_transition(6, 3));
    }

    // -----------------------------------------------------------------------
    // Invalid transitions
    // -----------------------------------------------------------------------

    #[test]
    fn draft_cannot_skip_review() {
        assert!(!can_transition(1, 3));
    }

    #[test]
    fn approved_cannot_skip_scheduling() {
        assert!(!can_transition(3, 5));
    }

    #[test]
    fn posted_cannot_go_back_to_scheduled() {
        // Restore lands on approved; the post must pass through the
        // assignment pass again before it can be republished.
        assert!(!can_transition(5, 4));
    }

    #[test]
    fn posted_cannot_repost() {
        assert!(!can_transition(5, 5));
    }

    #[test]
    fn failed_cannot_go_directly_to_scheduled() {
        assert!(!can_transition(6, 4));
    }

    #[test]
    fn pending_review_cannot_revert_to_draft() {
        assert!(!can_transition(2, 1));
    }

    #[test]
    fn scheduled_cannot_revert_to_approved() {
        assert!(!can_transition(4, 3));
    }

    // -----------------------------------------------------------------------
    // validate_transition returns descriptive error
    // -----------------------------------------------------------------------

    #[test]
    fn validate_transition_ok() {
        assert!(validate_transition(2, 3).is_ok());
    }

    #[test]
    fn validate_transition_err() {
        let err = validate_transition(5, 4).unwrap_err();
        assert!(err.contains("Posted"));
        assert!(err.contains("Scheduled"));
    }

    // -----------------------------------------------------------------------
    // Content editability
    // -----------------------------------------------------------------------

    #[test]
    fn content_editable_before_scheduling() {
        assert!(content_editable(1));
        assert!(content_editable(2));
        assert!(content_editable(3));
    }

    #[test]
    fn content_frozen_from_scheduled_onwards() {
        assert!(!content_editable(4));
        assert!(!content_editable(5));
        assert!(!content_editable(6));
    }

    // -----------------------------------------------------------------------
    // scheduled_for presence rule
    // -----------------------------------------------------------------------

    #[test]
    fn statuses_before_scheduled_never_carry_schedule() {
        assert!(!carries_schedule(1));
        assert!(!carries_schedule(2));
        assert!(!carries_schedule(3));
    }

    #[test]
    fn scheduled_and_later_may_carry_schedule() {
        assert!(carries_schedule(4));
        assert!(carries_schedule(5));
        assert!(carries_schedule(6));
    }

    // -----------------------------------------------------------------------
    // Unknown status ID
    // -----------------------------------------------------------------------

    #[test]
    fn unknown_status_has_no_transitions() {
        assert!(valid_transitions(99).is_empty());
    }
}
