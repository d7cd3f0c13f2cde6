//! The nested training program document: Program -> Week -> Day -> Exercise.
//!
//! A program is persisted as one document and always replaced wholesale on
//! save. Field ownership between coach and client is described by
//! [`ExerciseField`] and enforced when diffing, not when persisting.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::roles::Role;
use crate::types::{DbId, Timestamp};

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

pub const STATUS_DRAFT: &str = "draft";
pub const STATUS_ACTIVE: &str = "active";
pub const STATUS_COMPLETED: &str = "completed";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgramStatus {
    #[default]
    Draft,
    Active,
    Completed,
}

impl ProgramStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => STATUS_DRAFT,
            Self::Active => STATUS_ACTIVE,
            Self::Completed => STATUS_COMPLETED,
        }
    }

    pub fn from_name(name: &str) -> Result<Self, CoreError> {
        match name {
            STATUS_DRAFT => Ok(Self::Draft),
            STATUS_ACTIVE => Ok(Self::Active),
            STATUS_COMPLETED => Ok(Self::Completed),
            other => Err(CoreError::Validation(format!(
                "Invalid program status '{other}'"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Document
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Program {
    #[serde(default)]
    pub id: DbId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub weeks: Vec<Week>,
    pub days_per_week: i32,
    #[serde(default)]
    pub status: ProgramStatus,
    #[serde(default)]
    pub coach_id: DbId,
    #[serde(default)]
    pub client_id: Option<DbId>,
    #[serde(default)]
    pub share_code: String,
    #[serde(default)]
    pub created_at: Timestamp,
    #[serde(default)]
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Week {
    pub week_number: i32,
    #[serde(default)]
    pub days: Vec<Day>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Day {
    pub day_number: i32,
    #[serde(default)]
    pub exercises: Vec<Exercise>,
}

/// Leaf unit of a program.
///
/// String fields use `""` for "not set"; the video reference is the stored
/// filename (or a URL ending in it) of an uploaded form-check video.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Exercise {
    pub id: String,
    pub name: String,
    /// Reps x sets notation, e.g. `"5x5"`.
    pub reps: String,
    pub weight: String,
    pub rpe: String,
    pub is_completed: bool,
    pub notes: String,
    pub client_notes: String,
    pub coach_comment: String,
    pub video_url: String,
}

/// Position of an exercise inside a program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Slot {
    pub week_number: i32,
    pub day_number: i32,
    pub index: usize,
}

impl Week {
    pub fn day(&self, day_number: i32) -> Option<&Day> {
        self.days.iter().find(|d| d.day_number == day_number)
    }
}

impl Program {
    pub fn week(&self, week_number: i32) -> Option<&Week> {
        self.weeks.iter().find(|w| w.week_number == week_number)
    }

    /// The exercise at a slot, if the week, day and index all exist.
    pub fn exercise_at(&self, slot: Slot) -> Option<&Exercise> {
        self.week(slot.week_number)?
            .day(slot.day_number)?
            .exercises
            .get(slot.index)
    }

    /// Every exercise in week -> day -> index traversal order.
    pub fn exercises(&self) -> impl Iterator<Item = (Slot, &Exercise)> {
        self.weeks.iter().flat_map(|week| {
            week.days.iter().flat_map(move |day| {
                day.exercises.iter().enumerate().map(move |(index, ex)| {
                    (
                        Slot {
                            week_number: week.week_number,
                            day_number: day.day_number,
                            index,
                        },
                        ex,
                    )
                })
            })
        })
    }

    pub fn exercises_mut(&mut self) -> impl Iterator<Item = &mut Exercise> {
        self.weeks
            .iter_mut()
            .flat_map(|w| w.days.iter_mut())
            .flat_map(|d| d.exercises.iter_mut())
    }

    pub fn find_exercise(&self, exercise_id: &str) -> Option<&Exercise> {
        self.exercises()
            .map(|(_, ex)| ex)
            .find(|ex| ex.id == exercise_id)
    }

    /// Check the structural invariants of the week/day tree.
    ///
    /// Weeks are numbered `1..=n` in order with no gaps; day numbers are
    /// 1-based, unique within a week and never exceed `days_per_week`.
    pub fn validate_structure(&self) -> Result<(), CoreError> {
        if self.title.trim().is_empty() {
            return Err(CoreError::Validation("Program title must not be empty".into()));
        }
        if self.days_per_week < 1 || self.days_per_week > 7 {
            return Err(CoreError::Validation(format!(
                "days_per_week must be between 1 and 7, got {}",
                self.days_per_week
            )));
        }

        for (i, week) in self.weeks.iter().enumerate() {
            let expected = i as i32 + 1;
            if week.week_number != expected {
                return Err(CoreError::Validation(format!(
                    "Week numbers must be sequential from 1: expected {expected}, got {}",
                    week.week_number
                )));
            }

            let mut seen = Vec::with_capacity(week.days.len());
            for day in &week.days {
                if day.day_number < 1 || day.day_number > self.days_per_week {
                    return Err(CoreError::Validation(format!(
                        "Week {} has day {} outside 1..={}",
                        week.week_number, day.day_number, self.days_per_week
                    )));
                }
                if seen.contains(&day.day_number) {
                    return Err(CoreError::Validation(format!(
                        "Week {} repeats day {}",
                        week.week_number, day.day_number
                    )));
                }
                seen.push(day.day_number);
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Field ownership
// ---------------------------------------------------------------------------

/// A diffable exercise field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExerciseField {
    Name,
    Reps,
    Weight,
    Rpe,
    Notes,
    CoachComment,
    IsCompleted,
    ClientNotes,
    VideoUrl,
}

/// Fields only the coach may write.
pub const COACH_FIELDS: &[ExerciseField] = &[
    ExerciseField::Name,
    ExerciseField::Reps,
    ExerciseField::Weight,
    ExerciseField::Rpe,
    ExerciseField::Notes,
    ExerciseField::CoachComment,
];

/// Fields only the client may write.
pub const CLIENT_FIELDS: &[ExerciseField] = &[
    ExerciseField::IsCompleted,
    ExerciseField::ClientNotes,
    ExerciseField::VideoUrl,
];

/// The value of one exercise field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Flag(bool),
}

impl ExerciseField {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Reps => "reps",
            Self::Weight => "weight",
            Self::Rpe => "rpe",
            Self::Notes => "notes",
            Self::CoachComment => "coach_comment",
            Self::IsCompleted => "is_completed",
            Self::ClientNotes => "client_notes",
            Self::VideoUrl => "video_url",
        }
    }

    /// The fields `role` is allowed to write.
    pub fn writable_by(role: Role) -> &'static [ExerciseField] {
        match role {
            Role::Coach => COACH_FIELDS,
            Role::Client => CLIENT_FIELDS,
        }
    }

    pub fn is_writable_by(&self, role: Role) -> bool {
        Self::writable_by(role).contains(self)
    }

    pub fn read(&self, exercise: &Exercise) -> FieldValue {
        let text = |s: &String| FieldValue::Text(s.clone());
        match self {
            Self::Name => text(&exercise.name),
            Self::Reps => text(&exercise.reps),
            Self::Weight => text(&exercise.weight),
            Self::Rpe => text(&exercise.rpe),
            Self::Notes => text(&exercise.notes),
            Self::CoachComment => text(&exercise.coach_comment),
            Self::IsCompleted => FieldValue::Flag(exercise.is_completed),
            Self::ClientNotes => text(&exercise.client_notes),
            Self::VideoUrl => text(&exercise.video_url),
        }
    }
}
