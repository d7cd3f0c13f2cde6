use coachsync_core::error::CoreError;
use coachsync_core::program::{Program, ProgramStatus, Week};
use coachsync_core::types::{DbId, Timestamp};
use sqlx::FromRow;
use sqlx::types::Json;

/// A row from the `programs` table. The week tree lives in one JSONB column.
#[derive(Debug, Clone, FromRow)]
pub struct ProgramRow {
    pub id: DbId,
    pub title: String,
    pub description: String,
    pub weeks: Json<Vec<Week>>,
    pub days_per_week: i32,
    pub status: String,
    pub coach_id: DbId,
    pub client_id: Option<DbId>,
    pub share_code: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl TryFrom<ProgramRow> for Program {
    type Error = CoreError;

    fn try_from(row: ProgramRow) -> Result<Self, Self::Error> {
        Ok(Program {
            id: row.id,
            title: row.title,
            description: row.description,
            weeks: row.weeks.0,
            days_per_week: row.days_per_week,
            status: ProgramStatus::from_name(&row.status)?,
            coach_id: row.coach_id,
            client_id: row.client_id,
            share_code: row.share_code,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}
