//! Repository for the `programs` table.
//!
//! Saves replace the whole document. There is no merge and no version
//! check; the last write wins.

use coachsync_core::program::Program;
use coachsync_core::types::DbId;
use sqlx::types::Json;
use sqlx::PgPool;

use crate::models::program::ProgramRow;

/// Column list for `programs` queries.
const COLUMNS: &str = "id, title, description, weeks, days_per_week, status, coach_id, \
                       client_id, share_code, created_at, updated_at";

pub struct ProgramRepo;

impl ProgramRepo {
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<ProgramRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM programs WHERE id = $1");
        sqlx::query_as::<_, ProgramRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Insert a new program. The `id` and timestamps of `program` are
    /// ignored.
    pub async fn create(pool: &PgPool, program: &Program) -> Result<ProgramRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO programs \
                (title, description, weeks, days_per_week, status, coach_id, client_id, share_code) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ProgramRow>(&query)
            .bind(&program.title)
            .bind(&program.description)
            .bind(Json(&program.weeks))
            .bind(program.days_per_week)
            .bind(program.status.as_str())
            .bind(program.coach_id)
            .bind(program.client_id)
            .bind(&program.share_code)
            .fetch_one(pool)
            .await
    }

    /// Overwrite every mutable column of an existing program.
    ///
    /// Returns `None` if the program does not exist.
    pub async fn replace(
        pool: &PgPool,
        program: &Program,
    ) -> Result<Option<ProgramRow>, sqlx::Error> {
        let query = format!(
            "UPDATE programs SET \
                title = $2, description = $3, weeks = $4, days_per_week = $5, \
                status = $6, client_id = $7, share_code = $8, updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ProgramRow>(&query)
            .bind(program.id)
            .bind(&program.title)
            .bind(&program.description)
            .bind(Json(&program.weeks))
            .bind(program.days_per_week)
            .bind(program.status.as_str())
            .bind(program.client_id)
            .bind(&program.share_code)
            .fetch_optional(pool)
            .await
    }

    /// Returns `true` if a row was deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM programs WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
