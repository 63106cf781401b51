//! Handlers for the `/campaigns` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use validator::Validate;

use pilot_core::error::CoreError;
use pilot_core::profile::validate_profile_type;
use pilot_core::types::DbId;
use pilot_db::models::campaign::{CampaignListQuery, CreateCampaign, SetAutoPost};
use pilot_db::repositories::CampaignRepo;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/campaigns
///
/// Register a publishing configuration group. Returns 201 with the created
/// campaign.
pub async fn create_campaign(
    State(state): State<AppState>,
    Json(input): Json<CreateCampaign>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    validate_profile_type(&input.profile_type)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    let campaign = CampaignRepo::create(&state.pool, &input).await?;

    tracing::info!(
        campaign_id = campaign.id,
        org_id = campaign.org_id,
        profile_type = %campaign.profile_type,
        "Campaign created",
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: campaign })))
}

/// GET /api/v1/campaigns/{id}
pub async fn get_campaign(
    State(state): State<AppState>,
    Path(campaign_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let campaign = CampaignRepo::find_by_id(&state.pool, campaign_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Campaign",
            id: campaign_id,
        }))?;

    Ok(Json(DataResponse { data: campaign }))
}

/// GET /api/v1/campaigns?org_id=
pub async fn list_campaigns(
    State(state): State<AppState>,
    Query(params): Query<CampaignListQuery>,
) -> AppResult<impl IntoResponse> {
    let campaigns = CampaignRepo::list_by_org(&state.pool, params.org_id).await?;
    Ok(Json(DataResponse { data: campaigns }))
}

/// PUT /api/v1/campaigns/{id}/auto-post
///
/// Toggle automatic publishing. Posts under a disabled campaign stay
/// scheduled indefinitely until it is re-enabled.
pub async fn set_auto_post(
    State(state): State<AppState>,
    Path(campaign_id): Path<DbId>,
    Json(input): Json<SetAutoPost>,
) -> AppResult<impl IntoResponse> {
    let updated = CampaignRepo::set_auto_post(&state.pool, campaign_id, input.enabled).await?;

    if !updated {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Campaign",
            id: campaign_id,
        }));
    }

    tracing::info!(campaign_id, enabled = input.enabled, "Campaign auto-post toggled");

    Ok(StatusCode::NO_CONTENT)
}
