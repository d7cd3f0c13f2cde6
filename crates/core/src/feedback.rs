//! Turning program diffs into notifications for the other side.
//!
//! [`draft_notifications`] applies the per-field rules to a transition list.
//! Persisting the drafts and resolving who receives them is done by
//! [`crate::engine`].

use serde::{Deserialize, Serialize};

use crate::diff::FieldTransition;
use crate::error::CoreError;
use crate::program::{ExerciseField, FieldValue, Program};
use crate::roles::Role;
use crate::types::{DbId, Timestamp};

/// Notification messages quote at most this many characters of user text.
pub const MESSAGE_PREVIEW_CHARS: usize = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Video,
    Notes,
    Comment,
    Completion,
    Chat,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Video => "video",
            Self::Notes => "notes",
            Self::Comment => "comment",
            Self::Completion => "completion",
            Self::Chat => "chat",
        }
    }

    pub fn from_name(name: &str) -> Result<Self, CoreError> {
        match name {
            "video" => Ok(Self::Video),
            "notes" => Ok(Self::Notes),
            "comment" => Ok(Self::Comment),
            "completion" => Ok(Self::Completion),
            "chat" => Ok(Self::Chat),
            other => Err(CoreError::Validation(format!(
                "Unknown notification type '{other}'"
            ))),
        }
    }
}

/// A persisted notification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: DbId,
    pub profile_id: DbId,
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub program_id: Option<DbId>,
    pub program_title: Option<String>,
    pub exercise_name: Option<String>,
    pub from_role: Role,
    pub is_read: bool,
    pub created_at: Timestamp,
}

/// A notification about to be persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewNotification {
    pub profile_id: DbId,
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub program_id: Option<DbId>,
    pub program_title: Option<String>,
    pub exercise_name: Option<String>,
    pub from_role: Role,
}

/// Cut `text` to [`MESSAGE_PREVIEW_CHARS`] characters, marking the cut with
/// `...`. Counts chars, not bytes.
pub fn truncate_preview(text: &str) -> String {
    let text = text.trim();
    if text.chars().count() <= MESSAGE_PREVIEW_CHARS {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(MESSAGE_PREVIEW_CHARS).collect();
    cut.push_str("...");
    cut
}

/// Apply the notification rules to `transitions` made by `role`.
///
/// Every draft is addressed to `recipient_id`. Transitions that match no
/// rule (e.g. a coach changing a target weight) produce nothing.
pub fn draft_notifications(
    transitions: &[FieldTransition],
    role: Role,
    recipient_id: DbId,
    program: &Program,
) -> Vec<NewNotification> {
    transitions
        .iter()
        .filter_map(|t| {
            let (kind, title, message) = match_rule(t, role)?;
            Some(NewNotification {
                profile_id: recipient_id,
                kind,
                title: title.to_string(),
                message,
                program_id: Some(program.id),
                program_title: Some(program.title.clone()),
                exercise_name: Some(t.exercise_name.clone()),
                from_role: role,
            })
        })
        .collect()
}

fn match_rule(t: &FieldTransition, role: Role) -> Option<(NotificationKind, &'static str, String)> {
    if !t.field.is_writable_by(role) {
        return None;
    }
    let exercise = &t.exercise_name;

    match (t.field, &t.new) {
        (ExerciseField::ClientNotes, FieldValue::Text(note)) if !note.trim().is_empty() => Some((
            NotificationKind::Notes,
            "New client notes",
            format!(
                "Client added notes on {exercise}: \"{}\"",
                truncate_preview(note)
            ),
        )),
        (ExerciseField::VideoUrl, FieldValue::Text(url)) if !url.trim().is_empty() => Some((
            NotificationKind::Video,
            "New form check video",
            format!("Client uploaded a video for {exercise}"),
        )),
        (ExerciseField::IsCompleted, FieldValue::Flag(true))
            if t.old == FieldValue::Flag(false) =>
        {
            Some((
                NotificationKind::Completion,
                "Exercise completed",
                format!("Client completed {exercise}"),
            ))
        }
        (ExerciseField::CoachComment, FieldValue::Text(comment)) if !comment.trim().is_empty() => {
            Some((
                NotificationKind::Comment,
                "New coach comment",
                format!(
                    "Coach commented on {exercise}: \"{}\"",
                    truncate_preview(comment)
                ),
            ))
        }
        _ => None,
    }
}
