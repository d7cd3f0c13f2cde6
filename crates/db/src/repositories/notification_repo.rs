//! Repository for the `notifications` table.

use coachsync_core::feedback::NewNotification;
use coachsync_core::types::DbId;
use sqlx::PgPool;

use crate::models::notification::NotificationRow;

/// Column list for `notifications` queries.
const COLUMNS: &str = "id, profile_id, kind, title, message, program_id, program_title, \
                       exercise_name, from_role, is_read, created_at";

/// Provides CRUD operations for notifications.
pub struct NotificationRepo;

impl NotificationRepo {
    pub async fn create(
        pool: &PgPool,
        input: &NewNotification,
    ) -> Result<NotificationRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO notifications \
                (profile_id, kind, title, message, program_id, program_title, exercise_name, from_role) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, NotificationRow>(&query)
            .bind(input.profile_id)
            .bind(input.kind.as_str())
            .bind(&input.title)
            .bind(&input.message)
            .bind(input.program_id)
            .bind(&input.program_title)
            .bind(&input.exercise_name)
            .bind(input.from_role.as_str())
            .fetch_one(pool)
            .await
    }

    /// List notifications for a profile, newest first.
    ///
    /// When `unread_only` is `true`, only notifications with `is_read = false`
    /// are returned.
    pub async fn list_for_profile(
        pool: &PgPool,
        profile_id: DbId,
        unread_only: bool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<NotificationRow>, sqlx::Error> {
        let filter = if unread_only {
            "AND is_read = false"
        } else {
            ""
        };
        let query = format!(
            "SELECT {COLUMNS} FROM notifications \
             WHERE profile_id = $1 {filter} \
             ORDER BY created_at DESC, id DESC \
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, NotificationRow>(&query)
            .bind(profile_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Delete the notifications about `program_id` addressed to
    /// `profile_id`. Returns the number deleted.
    pub async fn delete_for_program(
        pool: &PgPool,
        program_id: DbId,
        profile_id: DbId,
    ) -> Result<u64, sqlx::Error> {
        let result =
            sqlx::query("DELETE FROM notifications WHERE program_id = $1 AND profile_id = $2")
                .bind(program_id)
                .bind(profile_id)
                .execute(pool)
                .await?;
        Ok(result.rows_affected())
    }
}
