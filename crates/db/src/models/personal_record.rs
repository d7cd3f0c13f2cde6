use coachsync_core::error::CoreError;
use coachsync_core::personal_records::{LiftType, PersonalRecord};
use coachsync_core::profile::WeightUnit;
use coachsync_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A row from the `personal_records` table.
#[derive(Debug, Clone, FromRow)]
pub struct PersonalRecordRow {
    pub id: DbId,
    pub profile_id: DbId,
    pub lift_type: String,
    pub weight: f64,
    pub unit: String,
    pub recorded_at: Timestamp,
    pub notes: String,
}

impl TryFrom<PersonalRecordRow> for PersonalRecord {
    type Error = CoreError;

    fn try_from(row: PersonalRecordRow) -> Result<Self, Self::Error> {
        Ok(PersonalRecord {
            id: row.id,
            profile_id: row.profile_id,
            lift_type: LiftType::from_name(&row.lift_type)?,
            weight: row.weight,
            unit: WeightUnit::from_name(&row.unit)?,
            recorded_at: row.recorded_at,
            notes: row.notes,
        })
    }
}
