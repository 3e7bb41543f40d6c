//! Parameter sampling under schema constraints.
//!
//! The random source is always passed in, so callers decide between a
//! fresh entropy-seeded generator per call and a seeded one for
//! reproducible problems.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::{CoreError, CoreResult};
use crate::model::{ParamConstraint, ParameterAssignment, ParameterKind, ParameterSchema};

/// Draw a value for every required parameter of `schema`.
///
/// Optional parameters (present in `properties` but not in `required`) are
/// never generated.
pub fn sample<R: Rng>(
    schema: &ParameterSchema,
    rng: &mut R,
) -> CoreResult<ParameterAssignment> {
    schema
        .required
        .iter()
        .map(|name| {
            let constraint = schema.properties.get(name).ok_or_else(|| {
                CoreError::Schema(format!("required parameter `{name}` has no constraint"))
            })?;
            let value = sample_one(name, constraint, rng)?;
            Ok::<_, CoreError>((name.as_str(), value))
        })
        .collect()
}

fn sample_one<R: Rng>(
    name: &str,
    constraint: &ParamConstraint,
    rng: &mut R,
) -> CoreResult<f64> {
    match constraint.kind_for(name) {
        ParameterKind::Component => constraint
            .catalog()
            .choose(rng)
            .copied()
            .ok_or_else(|| CoreError::Schema(format!("parameter `{name}` has an empty catalog"))),
        ParameterKind::Quantity => {
            let (lo, hi) = integer_bounds(name, constraint)?;
            Ok(rng.gen_range(lo..=hi) as f64)
        }
    }
}

/// Inclusive integer range `[floor(lower), floor(upper)]` for a quantity.
pub fn integer_bounds(name: &str, constraint: &ParamConstraint) -> CoreResult<(i64, i64)> {
    let (lower, upper) = (constraint.lower(), constraint.upper());
    if !lower.is_finite() || !upper.is_finite() {
        return Err(CoreError::Schema(format!(
            "parameter `{name}` has non-finite bounds"
        )));
    }
    let (lo, hi) = (lower.floor() as i64, upper.floor() as i64);
    if lo > hi {
        return Err(CoreError::Schema(format!(
            "parameter `{name}` has minimum {lower} above maximum {upper}"
        )));
    }
    Ok((lo, hi))
}
