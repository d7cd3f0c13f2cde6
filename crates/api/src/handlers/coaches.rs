//! Handlers for joining a coach by code.

use axum::extract::State;
use axum::Json;
use coachsync_core::capacity::ClientLink;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct JoinCoachRequest {
    pub code: String,
}

/// POST /api/v1/coaches/join
///
/// Link the calling client to the coach owning `code`. Joining the same
/// coach again returns the existing link.
pub async fn join_coach(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(body): Json<JoinCoachRequest>,
) -> AppResult<Json<DataResponse<ClientLink>>> {
    if body.code.trim().is_empty() {
        return Err(AppError::BadRequest("Coach code must not be empty".into()));
    }
    let link = state.engine.join_coach(&body.code, auth.profile_id).await?;
    Ok(Json(DataResponse { data: link }))
}
