// Path: crates/types/src/app/evaluation.rs
//! Evaluation records and the bounded score type they carry.

use crate::app::{AccountId, EvaluationId, RecorderId, StudentId, StudentText};
use crate::error::GradeBookError;
use parity_scale_codec::{Decode, Encode};
use serde::{Serialize, Serializer};
use std::fmt;

/// The factor between a decimal grade and its stored representation.
pub const SCORE_SCALE: f64 = 10.0;

/// Names the five score fields of an evaluation, for error reporting.
#[derive(Encode, Decode, Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum ScoreField {
    /// Activity complexity.
    Complexity,
    /// Effort put into the activity.
    Effort,
    /// Weight of the activity in the course.
    Weight,
    /// Raw points obtained.
    Points,
    /// Points after weighting.
    WeightedPoints,
}

impl fmt::Display for ScoreField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ScoreField::Complexity => "complexity",
            ScoreField::Effort => "effort",
            ScoreField::Weight => "weight",
            ScoreField::Points => "points",
            ScoreField::WeightedPoints => "weighted_points",
        })
    }
}

/// A decimal grade scaled by ten and stored in a single byte (0.0 to 25.5, step 0.1).
#[derive(Encode, Decode, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
pub struct Score(pub u8);

impl Score {
    /// Validates a raw scaled value. Values outside `[0, 255]` are rejected, never wrapped.
    pub fn try_from_raw(field: ScoreField, raw: i64) -> Result<Self, GradeBookError> {
        u8::try_from(raw)
            .map(Score)
            .map_err(|_| GradeBookError::ScoreOutOfRange { field, value: raw })
    }

    /// Converts a decimal grade (e.g. `7.4`) to its stored form (`74`).
    pub fn from_decimal(field: ScoreField, decimal: f64) -> Result<Self, GradeBookError> {
        Self::try_from_raw(field, scale_decimal(decimal))
    }

    /// The decimal grade this score represents.
    pub fn as_decimal(self) -> f64 {
        f64::from(self.0) / SCORE_SCALE
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.0 / 10, self.0 % 10)
    }
}

/// Serializes as the decimal grade (`74` becomes `7.4`), the same form the CLI accepts.
impl Serialize for Score {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.as_decimal())
    }
}

/// Scales a decimal grade by ten, rounding to the nearest step.
///
/// Non-finite input maps to `i64::MIN` so it always fails range validation.
pub fn scale_decimal(decimal: f64) -> i64 {
    if !decimal.is_finite() {
        return i64::MIN;
    }
    (decimal * SCORE_SCALE).round() as i64
}

/// The five validated scores of an evaluation.
#[derive(Encode, Decode, Serialize, Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct Scores {
    /// Activity complexity.
    pub complexity: Score,
    /// Effort put into the activity.
    pub effort: Score,
    /// Weight of the activity in the course.
    pub weight: Score,
    /// Raw points obtained.
    pub points: Score,
    /// Points after weighting.
    pub weighted_points: Score,
}

impl Scores {
    /// The scores in field order.
    pub fn as_array(&self) -> [Score; 5] {
        [
            self.complexity,
            self.effort,
            self.weight,
            self.points,
            self.weighted_points,
        ]
    }
}

/// Unvalidated scaled scores as submitted by a caller.
#[derive(Encode, Decode, Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct ScoreInput {
    /// Activity complexity, scaled by ten.
    pub complexity: i64,
    /// Effort, scaled by ten.
    pub effort: i64,
    /// Weight, scaled by ten.
    pub weight: i64,
    /// Points, scaled by ten.
    pub points: i64,
    /// Weighted points, scaled by ten.
    pub weighted_points: i64,
}

impl ScoreInput {
    /// Builds an input from already-scaled values in field order.
    pub fn new(raw: [i64; 5]) -> Self {
        let [complexity, effort, weight, points, weighted_points] = raw;
        Self {
            complexity,
            effort,
            weight,
            points,
            weighted_points,
        }
    }

    /// Builds an input from decimal grades in field order.
    pub fn from_decimals(decimals: [f64; 5]) -> Self {
        Self::new(decimals.map(scale_decimal))
    }

    /// Checks every field against the byte range, reporting the first offender.
    pub fn validate(&self) -> Result<Scores, GradeBookError> {
        Ok(Scores {
            complexity: Score::try_from_raw(ScoreField::Complexity, self.complexity)?,
            effort: Score::try_from_raw(ScoreField::Effort, self.effort)?,
            weight: Score::try_from_raw(ScoreField::Weight, self.weight)?,
            points: Score::try_from_raw(ScoreField::Points, self.points)?,
            weighted_points: Score::try_from_raw(
                ScoreField::WeightedPoints,
                self.weighted_points,
            )?,
        })
    }
}

impl From<Scores> for ScoreInput {
    fn from(scores: Scores) -> Self {
        Self::new(scores.as_array().map(|s| i64::from(s.0)))
    }
}

/// An evaluation as stored in the log. Immutable once appended.
#[derive(Encode, Decode, Clone, Copy, PartialEq, Eq, Debug)]
pub struct EvaluationRecord {
    /// The recorder that submitted the evaluation.
    pub recorder_id: RecorderId,
    /// The evaluated student.
    pub student_id: StudentId,
    /// The graded activity.
    pub activity_id: u64,
    /// The validated scores.
    pub scores: Scores,
}

/// The full view of an evaluation, with recorder identity and student text decoded.
#[derive(Serialize, Clone, PartialEq, Eq, Debug)]
pub struct EvaluationDetails {
    /// Position in the global log.
    pub evaluation_id: EvaluationId,
    /// The recorder that submitted the evaluation.
    pub recorder_id: RecorderId,
    /// The recorder's identity token.
    pub recorder: AccountId,
    /// The evaluated student.
    pub student_id: StudentId,
    /// The student's text identifier.
    pub student_text: StudentText,
    /// The graded activity.
    pub activity_id: u64,
    /// The validated scores.
    pub scores: Scores,
}

/// An evaluation reached through a recorder's index. Recorder fields are omitted
/// because the caller supplied them.
#[derive(Serialize, Clone, PartialEq, Eq, Debug)]
pub struct RecorderEvaluation {
    /// Position in the global log.
    pub evaluation_id: EvaluationId,
    /// The evaluated student.
    pub student_id: StudentId,
    /// The student's text identifier.
    pub student_text: StudentText,
    /// The graded activity.
    pub activity_id: u64,
    /// The validated scores.
    pub scores: Scores,
}

/// An evaluation reached through a student's index. Student fields are omitted
/// because the caller supplied them.
#[derive(Serialize, Clone, PartialEq, Eq, Debug)]
pub struct StudentEvaluation {
    /// Position in the global log.
    pub evaluation_id: EvaluationId,
    /// The recorder that submitted the evaluation.
    pub recorder_id: RecorderId,
    /// The recorder's identity token.
    pub recorder: AccountId,
    /// The graded activity.
    pub activity_id: u64,
    /// The validated scores.
    pub scores: Scores,
}
