//! Canonical answer computation.
//!
//! Solvers are pure functions of a parameter assignment, registered under a
//! family identifier carried by each template's solution spec.

use std::collections::HashMap;
use std::fmt;

use crate::error::{CoreError, CoreResult};
use crate::model::{ParameterAssignment, SolutionSpec, DEFAULT_FAMILY};
use crate::results::CanonicalAnswer;

/// A pure solver for one problem family.
pub type SolverFn = fn(&ParameterAssignment) -> CoreResult<CanonicalAnswer>;

#[derive(Clone, Copy)]
struct Registered {
    solve: SolverFn,
    /// Unit every answer of the family is expressed in.
    unit: &'static str,
}

/// Maps family identifiers to solver functions and their output units.
#[derive(Clone)]
pub struct SolverRegistry {
    solvers: HashMap<String, Registered>,
}

impl fmt::Debug for SolverRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SolverRegistry")
            .field("families", &self.families())
            .finish()
    }
}

impl SolverRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self {
            solvers: HashMap::new(),
        }
    }

    /// Register (or replace) the solver for `family`, whose answers are in `unit`.
    pub fn register(
        &mut self,
        family: impl Into<String>,
        unit: &'static str,
        solver: SolverFn,
    ) -> &mut Self {
        self.solvers.insert(
            family.into(),
            Registered {
                solve: solver,
                unit,
            },
        );
        self
    }

    pub fn contains(&self, family: &str) -> bool {
        self.solvers.contains_key(family)
    }

    /// Output unit of `family`, if registered.
    pub fn unit(&self, family: &str) -> Option<&'static str> {
        self.solvers.get(family).map(|r| r.unit)
    }

    /// Registered family identifiers, sorted.
    pub fn families(&self) -> Vec<&str> {
        let mut families: Vec<&str> = self.solvers.keys().map(String::as_str).collect();
        families.sort_unstable();
        families
    }

    fn lookup(&self, family: &str) -> CoreResult<&Registered> {
        self.solvers.get(family).ok_or_else(|| {
            CoreError::Schema(format!("no solver registered for family `{family}`"))
        })
    }

    /// An answer key for `family` in the family's own unit.
    pub fn answer_key(&self, family: &str) -> CoreResult<SolutionSpec> {
        let registered = self.lookup(family)?;
        Ok(SolutionSpec {
            family: family.to_string(),
            unit: registered.unit.to_string(),
        })
    }

    /// Compute the canonical answer for `params` under `family`.
    pub fn solve(&self, params: &ParameterAssignment, family: &str) -> CoreResult<CanonicalAnswer> {
        (self.lookup(family)?.solve)(params)
    }
}

impl Default for SolverRegistry {
    /// A registry holding the built-in families.
    fn default() -> Self {
        let mut registry = Self::new();
        registry.register(DEFAULT_FAMILY, "V", voltage_divider_parallel);
        registry
    }
}

/// Equivalent resistance of two resistors in parallel.
pub fn parallel(r_a: f64, r_b: f64) -> f64 {
    1.0 / (1.0 / r_a + 1.0 / r_b)
}

fn resistance(params: &ParameterAssignment, name: &str) -> CoreResult<f64> {
    let value = params.require(name)?;
    if !value.is_finite() {
        return Err(CoreError::Domain(format!("{name} is not a finite resistance")));
    }
    if value < 0.0 {
        return Err(CoreError::Domain(format!(
            "{name} = {value} is a negative resistance"
        )));
    }
    Ok(value)
}

/// Voltage `Vx` across `R2 ∥ R3` when `Vs` drives `R1` in series with the pair.
///
/// `Req = 1 / (1/R2 + 1/R3)`, `Vx = Vs * Req / (R1 + Req)`.
pub fn voltage_divider_parallel(params: &ParameterAssignment) -> CoreResult<CanonicalAnswer> {
    let vs = params.require("Vs")?;
    if !vs.is_finite() {
        return Err(CoreError::Domain("Vs is not a finite voltage".into()));
    }
    let r1 = resistance(params, "R1")?;
    let r2 = resistance(params, "R2")?;
    let r3 = resistance(params, "R3")?;
    for (name, value) in [("R2", r2), ("R3", r3)] {
        if value == 0.0 {
            return Err(CoreError::Domain(format!(
                "{name} = 0 leaves the parallel resistance undefined"
            )));
        }
    }

    let req = parallel(r2, r3);
    Ok(CanonicalAnswer {
        value: vs * req / (r1 + req),
        unit: "V".into(),
        quantity: "Vx".into(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn divider(vs: f64, r1: f64, r2: f64, r3: f64) -> ParameterAssignment {
        [("Vs", vs), ("R1", r1), ("R2", r2), ("R3", r3)]
            .into_iter()
            .collect()
    }

    #[test]
    fn reference_divider_value() {
        let answer = voltage_divider_parallel(&divider(10.0, 100.0, 220.0, 330.0)).unwrap();
        assert!((answer.value - 5.689655).abs() < 1e-5, "got {}", answer.value);
        assert_eq!(answer.unit, "V");
        assert_eq!(answer.quantity, "Vx");
    }

    #[test]
    fn parallel_of_equal_resistors_halves() {
        assert!((parallel(1000.0, 1000.0) - 500.0).abs() < 1e-9);
    }

    #[test]
    fn zero_series_resistor_passes_full_source() {
        let answer = voltage_divider_parallel(&divider(9.0, 0.0, 470.0, 470.0)).unwrap();
        assert!((answer.value - 9.0).abs() < 1e-12);
    }

    #[test]
    fn zero_parallel_branch_is_domain_error() {
        let err = voltage_divider_parallel(&divider(10.0, 100.0, 0.0, 330.0)).unwrap_err();
        assert!(matches!(err, CoreError::Domain(_)));
        let err = voltage_divider_parallel(&divider(10.0, 100.0, 220.0, 0.0)).unwrap_err();
        assert!(matches!(err, CoreError::Domain(_)));
    }

    #[test]
    fn negative_resistance_is_domain_error() {
        let err = voltage_divider_parallel(&divider(10.0, -100.0, 220.0, 330.0)).unwrap_err();
        assert!(err.to_string().contains("negative"));
    }

    #[test]
    fn missing_parameter_is_schema_error() {
        let params: ParameterAssignment = [("Vs", 10.0), ("R1", 100.0)].into_iter().collect();
        assert!(matches!(
            voltage_divider_parallel(&params),
            Err(CoreError::Schema(_))
        ));
    }

    #[test]
    fn registry_dispatches_by_family() {
        let registry = SolverRegistry::default();
        assert_eq!(registry.families(), vec![DEFAULT_FAMILY]);
        assert!(registry.contains(DEFAULT_FAMILY));
        assert_eq!(registry.answer_key(DEFAULT_FAMILY).unwrap(), SolutionSpec::default());
        assert!(matches!(
            registry.answer_key("thevenin"),
            Err(CoreError::Schema(_))
        ));
        let params = divider(10.0, 100.0, 220.0, 330.0);
        let a = registry.solve(&params, DEFAULT_FAMILY).unwrap();
        let b = registry.solve(&params, DEFAULT_FAMILY).unwrap();
        assert_eq!(a.value.to_bits(), b.value.to_bits());
        assert!(registry.solve(&params, "thevenin").is_err());
    }

    #[test]
    fn custom_family_can_be_registered() {
        fn ohms_law(params: &ParameterAssignment) -> CoreResult<CanonicalAnswer> {
            Ok(CanonicalAnswer {
                value: params.require("V")? / params.require("R")?,
                unit: "A".into(),
                quantity: "I".into(),
            })
        }
        let mut registry = SolverRegistry::default();
        registry.register("ohms_law", "A", ohms_law);
        let params: ParameterAssignment = [("V", 10.0), ("R", 5.0)].into_iter().collect();
        assert_eq!(registry.solve(&params, "ohms_law").unwrap().value, 2.0);
        assert_eq!(registry.unit("ohms_law"), Some("A"));
        assert_eq!(registry.unit(DEFAULT_FAMILY), Some("V"));
        assert_eq!(registry.unit("thevenin"), None);
    }
}
