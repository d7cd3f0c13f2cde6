//! Form-check video artifacts and their expiry policy.
//!
//! Artifacts expire on two independent clocks: a reviewed video is kept for
//! a short time after the coach opened it, an ignored one for a longer time
//! after upload. The sweep itself lives in [`crate::engine`].

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::program::Program;
use crate::types::{DbId, Timestamp};

/// Default days a video is kept after the coach viewed it.
pub const DEFAULT_VIEWED_RETENTION_DAYS: i64 = 3;

/// Default days an unviewed video is kept after upload.
pub const DEFAULT_UNVIEWED_RETENTION_DAYS: i64 = 7;

/// Accepted upload extensions.
pub const VIDEO_EXTENSIONS: &[&str] = &["mp4", "mov", "m4v", "webm"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoArtifact {
    pub id: DbId,
    pub filename: String,
    pub program_id: DbId,
    pub exercise_id: String,
    pub uploader_id: DbId,
    pub coach_id: DbId,
    pub coach_viewed_at: Option<Timestamp>,
    pub uploaded_at: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewVideoArtifact {
    pub filename: String,
    pub program_id: DbId,
    pub exercise_id: String,
    pub uploader_id: DbId,
    pub coach_id: DbId,
    pub uploaded_at: Timestamp,
}

/// Validate and normalize an upload extension (lowercase, no leading dot).
pub fn validate_video_extension(extension: &str) -> Result<String, CoreError> {
    let ext = extension.trim().trim_start_matches('.').to_lowercase();
    if VIDEO_EXTENSIONS.contains(&ext.as_str()) {
        Ok(ext)
    } else {
        Err(CoreError::Validation(format!(
            "Unsupported video type '{extension}'. Must be one of: {}",
            VIDEO_EXTENSIONS.join(", ")
        )))
    }
}

// ---------------------------------------------------------------------------
// Expiry policy
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpiryPolicy {
    pub viewed_retention: Duration,
    pub unviewed_retention: Duration,
}

impl Default for ExpiryPolicy {
    fn default() -> Self {
        Self::from_days(DEFAULT_VIEWED_RETENTION_DAYS, DEFAULT_UNVIEWED_RETENTION_DAYS)
    }
}

impl ExpiryPolicy {
    pub fn from_days(viewed: i64, unviewed: i64) -> Self {
        Self {
            viewed_retention: Duration::days(viewed),
            unviewed_retention: Duration::days(unviewed),
        }
    }

    /// Viewed artifacts whose view time is before this instant are expired.
    pub fn viewed_cutoff(&self, now: Timestamp) -> Timestamp {
        now - self.viewed_retention
    }

    /// Unviewed artifacts uploaded before this instant are expired.
    pub fn unviewed_cutoff(&self, now: Timestamp) -> Timestamp {
        now - self.unviewed_retention
    }

    /// The rule the sweep applies to every selected artifact.
    pub fn is_expired(&self, artifact: &VideoArtifact, now: Timestamp) -> bool {
        match artifact.coach_viewed_at {
            Some(viewed) => viewed < self.viewed_cutoff(now),
            None => artifact.uploaded_at < self.unviewed_cutoff(now),
        }
    }
}

// ---------------------------------------------------------------------------
// Reference scrubbing
// ---------------------------------------------------------------------------

/// Whether an exercise video reference points at `filename`.
///
/// References are either the bare filename or a URL whose last path
/// segment is the filename.
pub fn references_filename(video_url: &str, filename: &str) -> bool {
    if video_url.is_empty() || filename.is_empty() {
        return false;
    }
    let path = video_url.split(['?', '#']).next().unwrap_or(video_url);
    path == filename || path.rsplit('/').next() == Some(filename)
}

/// Blank every exercise video reference to `filename`. Returns how many
/// references were cleared.
pub fn scrub_video_references(program: &mut Program, filename: &str) -> usize {
    let mut cleared = 0;
    for exercise in program.exercises_mut() {
        if references_filename(&exercise.video_url, filename) {
            exercise.video_url.clear();
            cleared += 1;
        }
    }
    cleared
}

/// Outcome of one expiry sweep.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SweepReport {
    pub selected: usize,
    pub artifacts_deleted: usize,
    pub files_deleted: usize,
    pub programs_updated: usize,
    pub references_cleared: usize,
    pub errors: Vec<String>,
}
