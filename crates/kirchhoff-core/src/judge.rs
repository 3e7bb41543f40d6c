//! Tolerance-based, unit-aware grading.
//!
//! A submission is correct when its unit names the canonical unit and its
//! value lies within `max(abs, rel * |canonical|)` of the canonical value.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::results::{CanonicalAnswer, ErrorTag, GradeVerdict, Submission};
use crate::units::unit_matches;

/// Absolute tolerance applied to every answer.
pub const DEFAULT_TOL_ABS: f64 = 0.05;
/// Relative tolerance, as a fraction of the canonical magnitude.
pub const DEFAULT_TOL_REL: f64 = 0.02;

/// Combined absolute/relative acceptance band.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tolerance {
    #[serde(default = "default_abs")]
    pub abs: f64,
    #[serde(default = "default_rel")]
    pub rel: f64,
}

fn default_abs() -> f64 {
    DEFAULT_TOL_ABS
}

fn default_rel() -> f64 {
    DEFAULT_TOL_REL
}

impl Default for Tolerance {
    fn default() -> Self {
        Self {
            abs: DEFAULT_TOL_ABS,
            rel: DEFAULT_TOL_REL,
        }
    }
}

impl Tolerance {
    /// Half-width of the acceptance band around `canonical`.
    pub fn band(&self, canonical: f64) -> f64 {
        self.abs.max(self.rel * canonical.abs())
    }

    pub fn accepts(&self, submitted: f64, canonical: f64) -> bool {
        (submitted - canonical).abs() <= self.band(canonical)
    }
}

/// Reject submissions that cannot be graded at all.
pub fn validate_submission(submission: &Submission) -> CoreResult<()> {
    if !submission.value.is_finite() {
        return Err(CoreError::Validation(format!(
            "value must be a finite number, got {}",
            submission.value
        )));
    }
    if submission.units.trim().is_empty() {
        return Err(CoreError::Validation("units must not be empty".into()));
    }
    Ok(())
}

/// Grade a submission against the canonical answer.
///
/// Tags are not additive: a submission with the wrong unit is tagged
/// `units_error` only, whatever its value.
pub fn grade(
    submission: &Submission,
    answer: &CanonicalAnswer,
    tolerance: &Tolerance,
) -> GradeVerdict {
    let units_ok = unit_matches(&submission.units, &answer.unit);
    let value_ok = tolerance.accepts(submission.value, answer.value);
    let is_correct = units_ok && value_ok;

    let mut error_tags = BTreeSet::new();
    if !is_correct {
        error_tags.insert(if units_ok {
            ErrorTag::AlgebraError
        } else {
            ErrorTag::UnitsError
        });
    }

    GradeVerdict {
        is_correct,
        score: if is_correct { 1.0 } else { 0.0 },
        error_tags,
        feedback: feedback(answer, is_correct),
    }
}

fn feedback(answer: &CanonicalAnswer, is_correct: bool) -> String {
    let verdict = if is_correct {
        "✅ Nice work."
    } else {
        "❌ Recheck your setup/units."
    };
    format!(
        "Correct {} ≈ {:.2} {}. {verdict}",
        answer.quantity, answer.value, answer.unit
    )
}
