//! Repository for the `profiles` table.

use coachsync_core::types::DbId;
use sqlx::PgPool;

use crate::models::profile::{CreateProfile, ProfileRow};

/// Column list for `profiles` queries.
const COLUMNS: &str =
    "id, display_name, role, coach_code, plan_name, plan_user_limit, weight_unit, created_at";

pub struct ProfileRepo;

impl ProfileRepo {
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<ProfileRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM profiles WHERE id = $1");
        sqlx::query_as::<_, ProfileRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find the coach owning `code`, ignoring case and surrounding
    /// whitespace.
    pub async fn find_coach_by_code(
        pool: &PgPool,
        code: &str,
    ) -> Result<Option<ProfileRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM profiles \
             WHERE role = 'coach' AND UPPER(coach_code) = UPPER(TRIM($1))"
        );
        sqlx::query_as::<_, ProfileRow>(&query)
            .bind(code)
            .fetch_optional(pool)
            .await
    }

    pub async fn create(pool: &PgPool, input: &CreateProfile) -> Result<ProfileRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO profiles \
                (display_name, role, coach_code, plan_name, plan_user_limit, weight_unit) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ProfileRow>(&query)
            .bind(&input.display_name)
            .bind(input.role.as_str())
            .bind(&input.coach_code)
            .bind(&input.plan_name)
            .bind(input.plan_user_limit)
            .bind(input.weight_unit.as_str())
            .fetch_one(pool)
            .await
    }
}
