//! # Social Impact API Handler
//!
//! This module contains the handler aggregating recent jobs and pending
//! maintenance alerts into a single payload.

use crate::error::ApiError;
use crate::server::AppState;
use axum::{extract::State, response::Json};
use mongodb::bson::Document;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Combined payload for the social impact endpoint
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SocialImpactResponse {
    /// Always `"success"` on the 200 path
    #[schema(example = "success")]
    pub status: String,
    /// Human-readable summary
    #[schema(example = "Social impact data retrieved successfully.")]
    pub message: String,
    /// Up to 5 most recent jobs, newest first
    #[schema(value_type = Vec<Object>)]
    pub latest_jobs: Vec<Document>,
    /// Up to 5 pending maintenance alerts
    #[schema(value_type = Vec<Object>)]
    pub maintenance_alerts: Vec<Document>,
}

/// Aggregate recent jobs and pending maintenance alerts
///
/// Both reads must succeed; a failure in either aborts the request with a
/// 500 and no partial payload. Empty collections are not an error.
#[utoipa::path(
    get,
    path = "/api/social_impact_data",
    responses(
        (status = 200, description = "Combined jobs and maintenance payload", body = SocialImpactResponse),
        (status = 500, description = "Either read failed, `{status, message}` body")
    ),
    tag = "social-impact"
)]
pub async fn social_impact_data(
    State(state): State<AppState>,
) -> Result<Json<SocialImpactResponse>, ApiError> {
    let latest_jobs = state.social.latest_jobs().await.map_err(|err| {
        ApiError::dependency(err, "Internal Server Error during data retrieval.")
    })?;

    let maintenance_alerts = state.social.pending_alerts().await.map_err(|err| {
        ApiError::dependency(err, "Internal Server Error during data retrieval.")
    })?;

    Ok(Json(SocialImpactResponse {
        status: "success".to_string(),
        message: "Social impact data retrieved successfully.".to_string(),
        latest_jobs,
        maintenance_alerts,
    }))
}
