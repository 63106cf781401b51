//! Campaign entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use pilot_core::types::{DbId, OrgId, Timestamp};

/// A row from the `campaigns` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Campaign {
    pub id: DbId,
    pub org_id: OrgId,
    pub name: String,
    /// `company` or `personal`; see `pilot_core::profile`.
    pub profile_type: String,
    /// When false, posts under this campaign are never auto-published,
    /// even once due.
    pub auto_post: bool,
    /// Platform account identifier (member or organization URN).
    pub linkedin_author_id: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a campaign via `POST /api/v1/campaigns`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCampaign {
    pub org_id: OrgId,
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    pub profile_type: String,
    #[serde(default = "default_true")]
    pub auto_post: bool,
    #[validate(length(min = 1))]
    pub linkedin_author_id: String,
}

/// DTO for `PUT /api/v1/campaigns/{id}/auto-post`.
#[derive(Debug, Deserialize)]
pub struct SetAutoPost {
    pub enabled: bool,
}

/// Query parameters for `GET /api/v1/campaigns`.
#[derive(Debug, Deserialize)]
pub struct CampaignListQuery {
    pub org_id: OrgId,
}

fn default_true() -> bool {
    true
}
