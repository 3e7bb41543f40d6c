pub mod generate;
pub mod grade;
pub mod init;
pub mod objectives;
pub mod practice;
pub mod solve;
pub mod validate;

use std::path::PathBuf;

use anyhow::Result;
use rand::rngs::StdRng;
use rand::SeedableRng;

use kirchhoff_core::model::ParameterAssignment;
use kirchhoff_store::{load_config_from, KirchhoffConfig};

/// Parse a `NAME=VALUE` parameter argument.
pub fn parse_param(arg: &str) -> Result<(String, f64), String> {
    let (name, value) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got `{arg}`"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("missing parameter name in `{arg}`"));
    }
    let value: f64 = value
        .trim()
        .parse()
        .map_err(|_| format!("`{}` is not a number", value.trim()))?;
    Ok((name.to_string(), value))
}

/// Load config, then apply command-line overrides.
pub fn load_settings(
    catalog: Option<PathBuf>,
    seed: Option<u64>,
    config_path: Option<PathBuf>,
) -> Result<KirchhoffConfig> {
    let mut config = load_config_from(config_path.as_deref())?;
    if let Some(dir) = catalog {
        config.catalog_dir = dir;
    }
    if seed.is_some() {
        config.seed = seed;
    }
    tracing::debug!(
        catalog_dir = %config.catalog_dir.display(),
        seed = ?config.seed,
        "resolved settings"
    );
    Ok(config)
}

/// Seeded generator when a seed is configured, entropy otherwise.
pub fn rng_for(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

pub fn assignment(params: Vec<(String, f64)>) -> ParameterAssignment {
    params.into_iter().collect()
}

pub fn format_params(params: &ParameterAssignment) -> String {
    params
        .iter()
        .map(|(name, value)| format!("{name}={value}"))
        .collect::<Vec<_>>()
        .join(", ")
}
