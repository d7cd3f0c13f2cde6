//! Handlers for the `/programs` resource.
//!
//! Saves go through the engine, which diffs against the stored version,
//! notifies the counterpart and promotes personal records.

use axum::extract::{Path, State};
use axum::Json;
use coachsync_core::diff::DiffScope;
use coachsync_core::engine::{authorize_program_access, ProgramDeletion, SaveOutcome};
use coachsync_core::error::CoreError;
use coachsync_core::program::Program;
use coachsync_core::store::ProgramStore;
use coachsync_core::types::DbId;
use serde::Deserialize;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Body of `PUT /programs/{id}`: the whole program document plus the
/// week/day the caller was editing, if any.
#[derive(Debug, Deserialize)]
pub struct SaveProgramRequest {
    #[serde(flatten)]
    pub program: Program,
    #[serde(default)]
    pub editing: Option<DiffScope>,
}

/// GET /api/v1/programs/{id}
pub async fn get_program(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Program>>> {
    let program = state
        .engine
        .store()
        .load_program(id)
        .await?
        .ok_or_else(|| CoreError::not_found("Program", id))?;
    authorize_program_access(&auth.actor(), &program)?;
    Ok(Json(DataResponse { data: program }))
}

/// PUT /api/v1/programs/{id}
///
/// Replace the program document. The path id wins over any id in the body.
pub async fn save_program(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(body): Json<SaveProgramRequest>,
) -> AppResult<Json<DataResponse<SaveOutcome>>> {
    let mut program = body.program;
    program.id = id;

    let outcome = state
        .engine
        .save_program(auth.actor(), program, body.editing)
        .await?;

    tracing::info!(
        program_id = id,
        profile_id = auth.profile_id,
        role = %auth.role,
        notifications = outcome.notifications.len(),
        promoted = outcome.promoted.len(),
        "Program saved",
    );
    Ok(Json(DataResponse { data: outcome }))
}

/// DELETE /api/v1/programs/{id}
///
/// Owning coach only. Removes the program's videos and notifications too.
pub async fn delete_program(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<ProgramDeletion>>> {
    let deletion = state.engine.delete_program(auth.actor(), id).await?;
    Ok(Json(DataResponse { data: deletion }))
}
