//! Positional diff between a persisted program and its candidate replacement.
//!
//! Exercises are paired by (week number, day number, index), never by id.
//! Only fields writable by the acting role are compared, so a transition is
//! always something that role was entitled to change. Reordering or deleting
//! rows mid-edit shifts the pairing; that limitation is accepted.

use serde::Serialize;

use crate::program::{Exercise, ExerciseField, FieldValue, Program, Slot};
use crate::roles::Role;

/// One changed, role-writable field on one exercise.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldTransition {
    pub slot: Slot,
    pub exercise_id: String,
    /// Name of the exercise as it appears in the candidate document.
    pub exercise_name: String,
    pub field: ExerciseField,
    pub old: FieldValue,
    pub new: FieldValue,
}

/// Restricts reported transitions to the week/day edited in the current
/// session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize, Serialize)]
pub struct DiffScope {
    pub week_number: i32,
    pub day_number: i32,
}

impl DiffScope {
    fn contains(&self, slot: &Slot) -> bool {
        slot.week_number == self.week_number && slot.day_number == self.day_number
    }
}

/// Compare `previous` against `candidate` from the point of view of `role`.
///
/// Transitions come back in week -> day -> exercise order, one per changed
/// writable field. Exercises whose name is empty on both sides are skipped.
/// A slot missing from `previous` is compared against an empty exercise.
pub fn diff_programs(
    previous: &Program,
    candidate: &Program,
    role: Role,
    scope: Option<DiffScope>,
) -> Vec<FieldTransition> {
    let empty = Exercise::default();
    let fields = ExerciseField::writable_by(role);
    let mut transitions = Vec::new();

    for (slot, new_ex) in candidate.exercises() {
        if scope.is_some_and(|s| !s.contains(&slot)) {
            continue;
        }

        let old_ex = previous.exercise_at(slot).unwrap_or(&empty);
        if old_ex.name.is_empty() && new_ex.name.is_empty() {
            continue;
        }

        for field in fields {
            let old = field.read(old_ex);
            let new = field.read(new_ex);
            if old != new {
                transitions.push(FieldTransition {
                    slot,
                    exercise_id: new_ex.id.clone(),
                    exercise_name: new_ex.name.clone(),
                    field: *field,
                    old,
                    new,
                });
            }
        }
    }

    transitions
}
