use coachsync_core::types::{DbId, Timestamp};
use coachsync_core::video::VideoArtifact;
use sqlx::FromRow;

/// A row from the `video_artifacts` table.
#[derive(Debug, Clone, FromRow)]
pub struct VideoArtifactRow {
    pub id: DbId,
    pub filename: String,
    pub program_id: DbId,
    pub exercise_id: String,
    pub uploader_id: DbId,
    pub coach_id: DbId,
    pub coach_viewed_at: Option<Timestamp>,
    pub uploaded_at: Timestamp,
}

impl From<VideoArtifactRow> for VideoArtifact {
    fn from(row: VideoArtifactRow) -> Self {
        VideoArtifact {
            id: row.id,
            filename: row.filename,
            program_id: row.program_id,
            exercise_id: row.exercise_id,
            uploader_id: row.uploader_id,
            coach_id: row.coach_id,
            coach_viewed_at: row.coach_viewed_at,
            uploaded_at: row.uploaded_at,
        }
    }
}
