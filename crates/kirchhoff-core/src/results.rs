//! Derived records: rendered problems, canonical answers, verdicts, and the
//! instance/attempt records handed to the store.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::{ParameterAssignment, SolutionSpec};

/// Learner-facing output of one generation call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderedProblem {
    pub prompt: String,
    pub params: ParameterAssignment,
    pub expected_units: String,
}

/// The authoritative answer for a parameter assignment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalAnswer {
    pub value: f64,
    /// Canonical unit symbol (e.g. "V").
    pub unit: String,
    /// Name of the quantity being solved for, used in feedback (e.g. "Vx").
    pub quantity: String,
}

impl CanonicalAnswer {
    /// The value rounded to four decimals, as reported to learners.
    pub fn rounded(&self) -> f64 {
        (self.value * 10_000.0).round() / 10_000.0
    }
}

/// Why a submission was judged incorrect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorTag {
    UnitsError,
    AlgebraError,
}

impl ErrorTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorTag::UnitsError => "units_error",
            ErrorTag::AlgebraError => "algebra_error",
        }
    }
}

/// Outcome of comparing a submission to a canonical answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradeVerdict {
    pub is_correct: bool,
    /// 1.0 when correct, 0.0 otherwise.
    pub score: f64,
    pub error_tags: BTreeSet<ErrorTag>,
    pub feedback: String,
}

/// A learner's answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Submission {
    pub value: f64,
    #[serde(default = "default_units")]
    pub units: String,
}

impl Submission {
    pub fn new(value: f64, units: impl Into<String>) -> Self {
        Self {
            value,
            units: units.into(),
        }
    }
}

fn default_units() -> String {
    "V".to_string()
}

/// Opaque identifier of an authenticated caller. Only used for attribution.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CallerId(pub String);

impl CallerId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A persisted realization of a template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProblemInstance {
    pub id: Uuid,
    pub template_id: String,
    pub objective_id: String,
    pub params: ParameterAssignment,
    pub rendered: RenderedProblem,
    pub answer_key: SolutionSpec,
    pub created_at: DateTime<Utc>,
}

/// A persisted, graded submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attempt {
    pub id: Uuid,
    pub user_id: CallerId,
    pub problem_id: Uuid,
    pub answer: Submission,
    pub is_correct: bool,
    pub score: f64,
    pub error_tags: BTreeSet<ErrorTag>,
    pub feedback: String,
    pub created_at: DateTime<Utc>,
}

/// Response of the generation flow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedProblem {
    pub problem_id: Uuid,
    pub objective_code: String,
    pub prompt: String,
    pub params: ParameterAssignment,
    pub expected_units: String,
}

/// Response of the grading flow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradeOutcome {
    pub is_correct: bool,
    pub your_value: f64,
    pub your_units: String,
    /// Canonical value rounded to four decimals.
    pub correct_value: f64,
    pub feedback: String,
    pub error_tags: BTreeSet<ErrorTag>,
    pub attempt_id: Uuid,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_tags_serialize_snake_case() {
        let tags: BTreeSet<ErrorTag> = [ErrorTag::UnitsError].into_iter().collect();
        assert_eq!(serde_json::to_string(&tags).unwrap(), r#"["units_error"]"#);
        assert_eq!(ErrorTag::AlgebraError.as_str(), "algebra_error");
    }

    #[test]
    fn rounded_keeps_four_decimals() {
        let answer = CanonicalAnswer {
            value: 5.689655172,
            unit: "V".into(),
            quantity: "Vx".into(),
        };
        assert_eq!(answer.rounded(), 5.6897);
    }

    #[test]
    fn submission_units_default_to_volts() {
        let sub: Submission = serde_json::from_str(r#"{"value": 5.69}"#).unwrap();
        assert_eq!(sub.units, "V");
    }
}
