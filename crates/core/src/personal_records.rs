//! Personal-record ledger types and automatic PR promotion.
//!
//! A profile may hold many records per lift; its "best" is always the
//! heaviest one. [`scan_for_promotions`] walks a saved program and proposes
//! a new record for every completed lift that beats the running best.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::profile::WeightUnit;
use crate::program::Program;
use crate::types::{DbId, Timestamp};

// ---------------------------------------------------------------------------
// Ledger types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LiftType {
    Squat,
    Bench,
    Deadlift,
}

impl LiftType {
    pub const ALL: [LiftType; 3] = [LiftType::Squat, LiftType::Bench, LiftType::Deadlift];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Squat => "squat",
            Self::Bench => "bench",
            Self::Deadlift => "deadlift",
        }
    }

    pub fn from_name(name: &str) -> Result<Self, CoreError> {
        match name {
            "squat" => Ok(Self::Squat),
            "bench" => Ok(Self::Bench),
            "deadlift" => Ok(Self::Deadlift),
            other => Err(CoreError::Validation(format!("Unknown lift type '{other}'"))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonalRecord {
    pub id: DbId,
    pub profile_id: DbId,
    pub lift_type: LiftType,
    pub weight: f64,
    pub unit: WeightUnit,
    pub recorded_at: Timestamp,
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewPersonalRecord {
    pub profile_id: DbId,
    pub lift_type: LiftType,
    pub weight: f64,
    pub unit: WeightUnit,
    pub recorded_at: Timestamp,
    pub notes: String,
}

/// Heaviest recorded weight for `lift`, or `0.0` when there is none.
pub fn best_weight(records: &[PersonalRecord], lift: LiftType) -> f64 {
    records
        .iter()
        .filter(|r| r.lift_type == lift)
        .map(|r| r.weight)
        .fold(0.0, f64::max)
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

/// Maps an exercise name to the lift it trains, if any.
pub trait LiftClassifier: Send + Sync {
    fn classify(&self, exercise_name: &str) -> Option<LiftType>;
}

/// Default keyword table. Entries are checked in order with a
/// case-insensitive substring match.
pub const DEFAULT_LIFT_KEYWORDS: &[(&str, LiftType)] = &[
    ("front squat", LiftType::Squat),
    ("back squat", LiftType::Squat),
    ("squat", LiftType::Squat),
    ("bench press", LiftType::Bench),
    ("bench", LiftType::Bench),
    ("sumo deadlift", LiftType::Deadlift),
    ("deadlift", LiftType::Deadlift),
];

/// Substring classifier over a keyword table.
#[derive(Debug, Clone)]
pub struct KeywordLiftClassifier {
    keywords: Vec<(String, LiftType)>,
}

impl KeywordLiftClassifier {
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = (S, LiftType)>,
        S: Into<String>,
    {
        Self {
            keywords: keywords
                .into_iter()
                .map(|(k, lift)| (k.into().to_lowercase(), lift))
                .collect(),
        }
    }
}

impl Default for KeywordLiftClassifier {
    fn default() -> Self {
        Self::new(DEFAULT_LIFT_KEYWORDS.iter().copied())
    }
}

impl LiftClassifier for KeywordLiftClassifier {
    fn classify(&self, exercise_name: &str) -> Option<LiftType> {
        let name = exercise_name.trim().to_lowercase();
        if name.is_empty() {
            return None;
        }
        self.keywords
            .iter()
            .find(|(keyword, _)| name.contains(keyword.as_str()))
            .map(|(_, lift)| *lift)
    }
}

// ---------------------------------------------------------------------------
// Scanning
// ---------------------------------------------------------------------------

/// Parse a logged weight. Returns `None` for empty, non-numeric, non-finite
/// or non-positive values.
pub fn parse_weight(raw: &str) -> Option<f64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    raw.parse::<f64>()
        .ok()
        .filter(|w| w.is_finite() && *w > 0.0)
}

/// Propose new records for completed lifts in `program` that beat the best
/// in `existing`.
///
/// The running best includes records proposed earlier in the same scan, so
/// re-scanning an unchanged program against the updated ledger proposes
/// nothing. Malformed weights are skipped.
pub fn scan_for_promotions(
    program: &Program,
    profile_id: DbId,
    unit: WeightUnit,
    existing: &[PersonalRecord],
    classifier: &dyn LiftClassifier,
    now: Timestamp,
) -> Vec<NewPersonalRecord> {
    let mut best: Vec<(LiftType, f64)> = LiftType::ALL
        .iter()
        .map(|lift| (*lift, best_weight(existing, *lift)))
        .collect();
    let mut promotions = Vec::new();

    for (_, exercise) in program.exercises() {
        if !exercise.is_completed {
            continue;
        }
        let Some(lift) = classifier.classify(&exercise.name) else {
            continue;
        };
        let Some(weight) = parse_weight(&exercise.weight) else {
            if !exercise.weight.trim().is_empty() {
                tracing::debug!(
                    program_id = program.id,
                    exercise = %exercise.name,
                    weight = %exercise.weight,
                    "Skipping unparseable weight"
                );
            }
            continue;
        };

        let Some(entry) = best.iter_mut().find(|(l, _)| *l == lift) else {
            continue;
        };
        if weight > entry.1 {
            entry.1 = weight;
            promotions.push(NewPersonalRecord {
                profile_id,
                lift_type: lift,
                weight,
                unit,
                recorded_at: now,
                notes: format!(
                    "Auto-recorded from \"{}\" ({})",
                    program.title, exercise.name
                ),
            });
        }
    }

    promotions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::program::{Day, Exercise, ProgramStatus, Week};

    fn completed(name: &str, weight: &str) -> Exercise {
        Exercise {
            id: name.to_lowercase(),
            name: name.into(),
            weight: weight.into(),
            is_completed: true,
            ..Default::default()
        }
    }

    fn program(exercises: Vec<Exercise>) -> Program {
        let now = chrono::Utc::now();
        Program {
            id: 3,
            title: "Hypertrophy".into(),
            description: String::new(),
            weeks: vec![Week {
                week_number: 1,
                days: vec![Day {
                    day_number: 1,
                    exercises,
                }],
            }],
            days_per_week: 4,
            status: ProgramStatus::Active,
            coach_id: 1,
            client_id: Some(2),
            share_code: String::new(),
            created_at: now,
            updated_at: now,
        }
    }

    fn record(lift: LiftType, weight: f64) -> PersonalRecord {
        PersonalRecord {
            id: 1,
            profile_id: 2,
            lift_type: lift,
            weight,
            unit: WeightUnit::Kg,
            recorded_at: chrono::Utc::now(),
            notes: String::new(),
        }
    }

    fn scan(p: &Program, existing: &[PersonalRecord]) -> Vec<NewPersonalRecord> {
        scan_for_promotions(
            p,
            2,
            WeightUnit::Kg,
            existing,
            &KeywordLiftClassifier::default(),
            chrono::Utc::now(),
        )
    }

    #[test]
    fn classifier_matches_keywords_case_insensitively() {
        let c = KeywordLiftClassifier::default();
        assert_eq!(c.classify("  Front SQUAT "), Some(LiftType::Squat));
        assert_eq!(c.classify("Paused Bench Press"), Some(LiftType::Bench));
        assert_eq!(c.classify("Sumo Deadlift"), Some(LiftType::Deadlift));
        assert_eq!(c.classify("Overhead Press"), None);
        assert_eq!(c.classify(""), None);
    }

    #[test]
    fn custom_classifier_table() {
        let c = KeywordLiftClassifier::new([("hack", LiftType::Squat)]);
        assert_eq!(c.classify("Hack Machine"), Some(LiftType::Squat));
        assert_eq!(c.classify("Squat"), None);
    }

    #[test]
    fn parse_weight_rejects_malformed_values() {
        assert_eq!(parse_weight("100"), Some(100.0));
        assert_eq!(parse_weight(" 102.5 "), Some(102.5));
        assert_eq!(parse_weight(""), None);
        assert_eq!(parse_weight("heavy"), None);
        assert_eq!(parse_weight("100kg"), None);
        assert_eq!(parse_weight("NaN"), None);
        assert_eq!(parse_weight("-5"), None);
    }

    #[test]
    fn first_completed_squat_becomes_pr() {
        let p = program(vec![completed("Squat", "100")]);
        let promotions = scan(&p, &[]);
        assert_eq!(promotions.len(), 1);
        assert_eq!(promotions[0].lift_type, LiftType::Squat);
        assert_eq!(promotions[0].weight, 100.0);
        assert!(promotions[0].notes.contains("Hypertrophy"));
    }

    #[test]
    fn equal_weight_is_not_a_pr() {
        let p = program(vec![completed("Squat", "100")]);
        assert!(scan(&p, &[record(LiftType::Squat, 100.0)]).is_empty());
    }

    #[test]
    fn incomplete_and_unrecognized_are_ignored() {
        let mut not_done = completed("Bench Press", "90");
        not_done.is_completed = false;
        let p = program(vec![not_done, completed("Lunge", "200")]);
        assert!(scan(&p, &[]).is_empty());
    }

    #[test]
    fn malformed_weight_is_skipped_not_fatal() {
        let p = program(vec![completed("Deadlift", "a lot"), completed("Bench", "70")]);
        let promotions = scan(&p, &[]);
        assert_eq!(promotions.len(), 1);
        assert_eq!(promotions[0].lift_type, LiftType::Bench);
    }

    #[test]
    fn running_best_includes_this_scan() {
        let p = program(vec![
            completed("Squat", "100"),
            completed("Back Squat", "95"),
            completed("Front Squat", "110"),
        ]);
        let weights: Vec<_> = scan(&p, &[]).iter().map(|r| r.weight).collect();
        assert_eq!(weights, [100.0, 110.0]);
    }

    #[test]
    fn best_weight_defaults_to_zero() {
        assert_eq!(best_weight(&[], LiftType::Deadlift), 0.0);
        let records = [record(LiftType::Deadlift, 180.0), record(LiftType::Deadlift, 200.0)];
        assert_eq!(best_weight(&records, LiftType::Deadlift), 200.0);
    }
}
