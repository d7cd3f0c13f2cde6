use coachsync_core::error::CoreError;
use coachsync_core::profile::{Profile, WeightUnit};
use coachsync_core::roles::Role;
use coachsync_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A row from the `profiles` table.
#[derive(Debug, Clone, FromRow)]
pub struct ProfileRow {
    pub id: DbId,
    pub display_name: String,
    pub role: String,
    pub coach_code: Option<String>,
    pub plan_name: String,
    pub plan_user_limit: i32,
    pub weight_unit: String,
    pub created_at: Timestamp,
}

impl TryFrom<ProfileRow> for Profile {
    type Error = CoreError;

    fn try_from(row: ProfileRow) -> Result<Self, Self::Error> {
        Ok(Profile {
            id: row.id,
            display_name: row.display_name,
            role: Role::from_name(&row.role)?,
            coach_code: row.coach_code,
            plan_name: row.plan_name,
            plan_user_limit: row.plan_user_limit,
            weight_unit: WeightUnit::from_name(&row.weight_unit)?,
            created_at: row.created_at,
        })
    }
}

/// DTO for inserting a profile.
#[derive(Debug, Clone)]
pub struct CreateProfile {
    pub display_name: String,
    pub role: Role,
    pub coach_code: Option<String>,
    pub plan_name: String,
    pub plan_user_limit: i32,
    pub weight_unit: WeightUnit,
}
