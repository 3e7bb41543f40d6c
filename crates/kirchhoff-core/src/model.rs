//! Core data model types for kirchhoff.
//!
//! Objectives, problem templates and the parameter schemas that drive
//! sampling. Templates are read-only inputs to the engine; where they come
//! from is up to the store implementation.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// Standard preferred resistor values drawn for component parameters.
pub const PREFERRED_VALUES: [f64; 9] = [
    100.0, 220.0, 330.0, 470.0, 680.0, 1000.0, 2200.0, 3300.0, 4700.0,
];

/// Lower bound used when a constraint omits `minimum`.
pub const DEFAULT_MINIMUM: f64 = 1.0;
/// Upper bound used when a constraint omits `maximum`.
pub const DEFAULT_MAXIMUM: f64 = 10.0;

/// Solver family used when a template's solution spec names none.
pub const DEFAULT_FAMILY: &str = "voltage_divider_parallel";

/// A named learning goal that problem templates are attached to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Objective {
    pub id: String,
    /// Short code used to request problems (e.g. "KCL-01").
    pub code: String,
    #[serde(default)]
    pub statement: String,
}

/// How a parameter's value is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterKind {
    /// Uniform integer within the constraint bounds.
    Quantity,
    /// One value from a discrete catalog of preferred component values.
    Component,
}

impl ParameterKind {
    /// Kind implied by a parameter name when the schema does not say.
    ///
    /// Resistor parameters are conventionally named `R`, `R1`, `R2`, ...
    pub fn from_legacy_name(name: &str) -> Self {
        if name.starts_with('R') {
            ParameterKind::Component
        } else {
            ParameterKind::Quantity
        }
    }
}

impl fmt::Display for ParameterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParameterKind::Quantity => write!(f, "quantity"),
            ParameterKind::Component => write!(f, "component"),
        }
    }
}

/// Constraint on a single parameter.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParamConstraint {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maximum: Option<f64>,
    /// Explicit kind; `None` falls back to the naming convention.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<ParameterKind>,
    /// Per-parameter override of [`PREFERRED_VALUES`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalog: Option<Vec<f64>>,
}

impl ParamConstraint {
    pub fn bounded(minimum: f64, maximum: f64) -> Self {
        Self {
            minimum: Some(minimum),
            maximum: Some(maximum),
            ..Default::default()
        }
    }

    pub fn component() -> Self {
        Self {
            kind: Some(ParameterKind::Component),
            ..Default::default()
        }
    }

    pub fn lower(&self) -> f64 {
        self.minimum.unwrap_or(DEFAULT_MINIMUM)
    }

    pub fn upper(&self) -> f64 {
        self.maximum.unwrap_or(DEFAULT_MAXIMUM)
    }

    pub fn kind_for(&self, name: &str) -> ParameterKind {
        self.kind.unwrap_or_else(|| ParameterKind::from_legacy_name(name))
    }

    pub fn catalog(&self) -> &[f64] {
        self.catalog.as_deref().unwrap_or(&PREFERRED_VALUES)
    }
}

/// Parameter constraints plus the set of parameters that must be generated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParameterSchema {
    #[serde(default)]
    pub properties: BTreeMap<String, ParamConstraint>,
    #[serde(default)]
    pub required: Vec<String>,
}

impl ParameterSchema {
    /// Builder-style helper: add a required parameter with its constraint.
    pub fn with_param(mut self, name: &str, constraint: ParamConstraint) -> Self {
        self.properties.insert(name.to_string(), constraint);
        if !self.required.iter().any(|r| r == name) {
            self.required.push(name.to_string());
        }
        self
    }
}

/// A concrete value for every required parameter of a schema.
///
/// Built once per generation call and never mutated afterwards.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParameterAssignment(BTreeMap<String, f64>);

impl ParameterAssignment {
    pub fn get(&self, name: &str) -> Option<f64> {
        self.0.get(name).copied()
    }

    /// Look up a parameter a solver cannot do without.
    pub fn require(&self, name: &str) -> CoreResult<f64> {
        self.get(name)
            .ok_or_else(|| CoreError::Schema(format!("missing parameter `{name}`")))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, f64)> for ParameterAssignment {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

/// Which solver computes the answer, and in what unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolutionSpec {
    #[serde(default = "default_family")]
    pub family: String,
    #[serde(default = "default_unit")]
    pub unit: String,
}

impl Default for SolutionSpec {
    fn default() -> Self {
        Self {
            family: default_family(),
            unit: default_unit(),
        }
    }
}

fn default_family() -> String {
    DEFAULT_FAMILY.to_string()
}

fn default_unit() -> String {
    "V".to_string()
}

/// A reusable problem blueprint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProblemTemplate {
    pub id: String,
    pub objective_id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default = "default_difficulty")]
    pub difficulty: u8,
    pub params_schema: ParameterSchema,
    /// Prompt text containing `{{name}}` placeholders.
    pub prompt_template: String,
    #[serde(default)]
    pub answer_units: String,
    #[serde(default)]
    pub solution_spec: SolutionSpec,
}

fn default_difficulty() -> u8 {
    1
}

/// A parsed catalog file: one objective and its templates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    pub objective: Objective,
    #[serde(default)]
    pub templates: Vec<ProblemTemplate>,
}
