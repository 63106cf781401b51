//! Publishing profile constants and validation.
//!
//! A campaign publishes either as a company page or as a personal profile.
//! The campaign owns the target configuration; posts carry a denormalized
//! copy that must agree with the campaign before anything is published.

/// Publish through the organization's company page.
pub const PROFILE_COMPANY: &str = "company";

/// Publish through a personal member profile.
pub const PROFILE_PERSONAL: &str = "personal";

/// All valid profile type values.
pub const VALID_PROFILE_TYPES: &[&str] = &[PROFILE_COMPANY, PROFILE_PERSONAL];

/// Validate that a profile type string is one of the accepted values.
pub fn validate_profile_type(profile_type: &str) -> Result<(), String> {
    if VALID_PROFILE_TYPES.contains(&profile_type) {
        Ok(())
    } else {
        Err(format!(
            "Invalid profile type '{profile_type}'. Must be one of: {}",
            VALID_PROFILE_TYPES.join(", ")
        ))
    }
}

/// Publish-time consistency check between a post and its owning campaign.
///
/// The scheduler refuses to publish when the two disagree instead of
/// trusting either value; a stale denormalized copy on the post would
/// otherwise target the wrong account.
pub fn check_profile_match(post_profile: &str, campaign_profile: &str) -> Result<(), String> {
    if post_profile == campaign_profile {
        Ok(())
    } else {
        Err(format!(
            "Post profile '{post_profile}' does not match campaign profile '{campaign_profile}'"
        ))
    }
}
