//! Repository for the `video_artifacts` table.

use coachsync_core::types::{DbId, Timestamp};
use coachsync_core::video::NewVideoArtifact;
use sqlx::PgPool;

use crate::models::video_artifact::VideoArtifactRow;

/// Column list for `video_artifacts` queries.
const COLUMNS: &str =
    "id, filename, program_id, exercise_id, uploader_id, coach_id, coach_viewed_at, uploaded_at";

pub struct VideoArtifactRepo;

impl VideoArtifactRepo {
    pub async fn create(
        pool: &PgPool,
        input: &NewVideoArtifact,
    ) -> Result<VideoArtifactRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO video_artifacts \
                (filename, program_id, exercise_id, uploader_id, coach_id, uploaded_at) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, VideoArtifactRow>(&query)
            .bind(&input.filename)
            .bind(input.program_id)
            .bind(&input.exercise_id)
            .bind(input.uploader_id)
            .bind(input.coach_id)
            .bind(input.uploaded_at)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_filename(
        pool: &PgPool,
        filename: &str,
    ) -> Result<Option<VideoArtifactRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM video_artifacts WHERE filename = $1");
        sqlx::query_as::<_, VideoArtifactRow>(&query)
            .bind(filename)
            .fetch_optional(pool)
            .await
    }

    /// Set `coach_viewed_at` if it is still null.
    ///
    /// Returns `true` if the row was updated, `false` if it was missing or
    /// already viewed.
    pub async fn mark_viewed(
        pool: &PgPool,
        filename: &str,
        viewed_at: Timestamp,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE video_artifacts SET coach_viewed_at = $2 \
             WHERE filename = $1 AND coach_viewed_at IS NULL",
        )
        .bind(filename)
        .bind(viewed_at)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn list_viewed_before(
        pool: &PgPool,
        cutoff: Timestamp,
    ) -> Result<Vec<VideoArtifactRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM video_artifacts \
             WHERE coach_viewed_at IS NOT NULL AND coach_viewed_at < $1 \
             ORDER BY coach_viewed_at"
        );
        sqlx::query_as::<_, VideoArtifactRow>(&query)
            .bind(cutoff)
            .fetch_all(pool)
            .await
    }

    pub async fn list_unviewed_uploaded_before(
        pool: &PgPool,
        cutoff: Timestamp,
    ) -> Result<Vec<VideoArtifactRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM video_artifacts \
             WHERE coach_viewed_at IS NULL AND uploaded_at < $1 \
             ORDER BY uploaded_at"
        );
        sqlx::query_as::<_, VideoArtifactRow>(&query)
            .bind(cutoff)
            .fetch_all(pool)
            .await
    }

    pub async fn list_for_program(
        pool: &PgPool,
        program_id: DbId,
    ) -> Result<Vec<VideoArtifactRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM video_artifacts WHERE program_id = $1 ORDER BY uploaded_at"
        );
        sqlx::query_as::<_, VideoArtifactRow>(&query)
            .bind(program_id)
            .fetch_all(pool)
            .await
    }

    /// Returns `true` if a row was deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM video_artifacts WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
