//! Repository for the `campaigns` table.

use sqlx::PgPool;

use pilot_core::types::{DbId, OrgId};

use crate::models::campaign::{Campaign, CreateCampaign};

/// Column list for `campaigns` queries.
const COLUMNS: &str = "\
    id, org_id, name, profile_type, auto_post, linkedin_author_id, \
    created_at, updated_at";

/// CRUD for campaigns, the publishing configuration groups.
pub struct CampaignRepo;

impl CampaignRepo {
    /// Create a new campaign.
    pub async fn create(pool: &PgPool, input: &CreateCampaign) -> Result<Campaign, sqlx::Error> {
        let query = format!(
            "INSERT INTO campaigns (org_id, name, profile_type, auto_post, linkedin_author_id) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Campaign>(&query)
            .bind(input.org_id)
            .bind(&input.name)
            .bind(&input.profile_type)
            .bind(input.auto_post)
            .bind(&input.linkedin_author_id)
            .fetch_one(pool)
            .await
    }

    /// Find a campaign by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Campaign>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM campaigns WHERE id = $1");
        sqlx::query_as::<_, Campaign>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List an organization's campaigns, newest first.
    pub async fn list_by_org(pool: &PgPool, org_id: OrgId) -> Result<Vec<Campaign>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM campaigns \
             WHERE org_id = $1 \
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Campaign>(&query)
            .bind(org_id)
            .fetch_all(pool)
            .await
    }

    /// Toggle automatic publishing for a campaign.
    ///
    /// Returns `false` if the campaign does not exist.
    pub async fn set_auto_post(
        pool: &PgPool,
        id: DbId,
        enabled: bool,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE campaigns SET auto_post = $2, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .bind(enabled)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
