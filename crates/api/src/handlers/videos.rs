//! Handlers for form-check videos: client uploads and coach views.

use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::Json;
use coachsync_core::types::DbId;
use coachsync_core::video::VideoArtifact;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Name of the multipart field carrying the video.
const FILE_FIELD: &str = "file";

/// POST /api/v1/programs/{id}/exercises/{exercise_id}/videos
///
/// Multipart upload with a single `file` field. The extension of the
/// uploaded file name selects the stored extension.
pub async fn upload_video(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((program_id, exercise_id)): Path<(DbId, String)>,
    mut multipart: Multipart,
) -> AppResult<(StatusCode, Json<DataResponse<VideoArtifact>>)> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let extension = field
            .file_name()
            .and_then(|name| name.rsplit_once('.'))
            .map(|(_, ext)| ext.to_string())
            .ok_or_else(|| {
                AppError::BadRequest("Uploaded file name must have an extension".into())
            })?;

        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?;

        let artifact = state
            .engine
            .upload_video(auth.actor(), program_id, &exercise_id, &data, &extension)
            .await?;
        return Ok((StatusCode::CREATED, Json(DataResponse { data: artifact })));
    }

    Err(AppError::BadRequest(format!(
        "Missing multipart field '{FILE_FIELD}'"
    )))
}

/// POST /api/v1/videos/{filename}/viewed
///
/// Record that the owning coach opened the video. Viewing again is a no-op.
pub async fn mark_viewed(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> AppResult<Json<DataResponse<VideoArtifact>>> {
    let artifact = state.engine.open_video(auth.actor(), &filename).await?;
    Ok(Json(DataResponse { data: artifact }))
}
