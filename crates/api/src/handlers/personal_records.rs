//! Handlers for the `/personal-records` resource.

use axum::extract::State;
use axum::Json;
use coachsync_core::personal_records::{best_weight, LiftType, PersonalRecord};
use coachsync_core::store::RecordStore;
use serde::Serialize;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct LiftBest {
    pub lift_type: LiftType,
    /// `0.0` when no record exists for the lift.
    pub weight: f64,
}

#[derive(Debug, Serialize)]
pub struct PersonalRecordsResponse {
    pub best: Vec<LiftBest>,
    pub records: Vec<PersonalRecord>,
}

/// GET /api/v1/personal-records
///
/// The caller's record history with the current best per lift.
pub async fn list_personal_records(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<PersonalRecordsResponse>>> {
    let records = state.engine.store().list_prs(auth.profile_id).await?;
    let best = LiftType::ALL
        .iter()
        .map(|lift| LiftBest {
            lift_type: *lift,
            weight: best_weight(&records, *lift),
        })
        .collect();

    Ok(Json(DataResponse {
        data: PersonalRecordsResponse { best, records },
    }))
}
