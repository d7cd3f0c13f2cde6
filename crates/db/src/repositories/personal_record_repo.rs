//! Repository for the `personal_records` table.

use coachsync_core::personal_records::NewPersonalRecord;
use coachsync_core::types::DbId;
use sqlx::PgPool;

use crate::models::personal_record::PersonalRecordRow;

/// Column list for `personal_records` queries.
const COLUMNS: &str = "id, profile_id, lift_type, weight, unit, recorded_at, notes";

pub struct PersonalRecordRepo;

impl PersonalRecordRepo {
    /// Every record of a profile, newest first.
    pub async fn list_for_profile(
        pool: &PgPool,
        profile_id: DbId,
    ) -> Result<Vec<PersonalRecordRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM personal_records \
             WHERE profile_id = $1 \
             ORDER BY recorded_at DESC, id DESC"
        );
        sqlx::query_as::<_, PersonalRecordRow>(&query)
            .bind(profile_id)
            .fetch_all(pool)
            .await
    }

    pub async fn create(
        pool: &PgPool,
        input: &NewPersonalRecord,
    ) -> Result<PersonalRecordRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO personal_records (profile_id, lift_type, weight, unit, recorded_at, notes) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, PersonalRecordRow>(&query)
            .bind(input.profile_id)
            .bind(input.lift_type.as_str())
            .bind(input.weight)
            .bind(input.unit.as_str())
            .bind(input.recorded_at)
            .bind(&input.notes)
            .fetch_one(pool)
            .await
    }
}
