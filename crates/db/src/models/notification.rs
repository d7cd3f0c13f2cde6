use coachsync_core::error::CoreError;
use coachsync_core::feedback::{Notification, NotificationKind};
use coachsync_core::roles::Role;
use coachsync_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A row from the `notifications` table.
#[derive(Debug, Clone, FromRow)]
pub struct NotificationRow {
    pub id: DbId,
    pub profile_id: DbId,
    pub kind: String,
    pub title: String,
    pub message: String,
    pub program_id: Option<DbId>,
    pub program_title: Option<String>,
    pub exercise_name: Option<String>,
    pub from_role: String,
    pub is_read: bool,
    pub created_at: Timestamp,
}

impl TryFrom<NotificationRow> for Notification {
    type Error = CoreError;

    fn try_from(row: NotificationRow) -> Result<Self, Self::Error> {
        Ok(Notification {
            id: row.id,
            profile_id: row.profile_id,
            kind: NotificationKind::from_name(&row.kind)?,
            title: row.title,
            message: row.message,
            program_id: row.program_id,
            program_title: row.program_title,
            exercise_name: row.exercise_name,
            from_role: Role::from_name(&row.from_role)?,
            is_read: row.is_read,
            created_at: row.created_at,
        })
    }
}
