//! Configuration loading.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use kirchhoff_core::judge::Tolerance;
use kirchhoff_core::render::RenderMode;
use kirchhoff_core::EngineConfig;

/// Top-level kirchhoff configuration.
///
/// Note: Custom Debug impl masks tokens to prevent accidental exposure in logs.
#[derive(Clone, Serialize, Deserialize)]
pub struct KirchhoffConfig {
    /// Directory of TOML template catalogs.
    #[serde(default = "default_catalog_dir")]
    pub catalog_dir: PathBuf,
    /// Grading tolerance.
    #[serde(default)]
    pub tolerance: Tolerance,
    /// Seed for reproducible problem generation.
    #[serde(default)]
    pub seed: Option<u64>,
    /// Fail generation when a prompt placeholder has no parameter.
    #[serde(default)]
    pub strict_render: bool,
    /// Bearer tokens accepted by the static verifier, mapped to user IDs.
    #[serde(default)]
    pub tokens: HashMap<String, String>,
}

impl std::fmt::Debug for KirchhoffConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let masked: Vec<(&str, &str)> = self.tokens.values().map(|u| ("***", u.as_str())).collect();
        f.debug_struct("KirchhoffConfig")
            .field("catalog_dir", &self.catalog_dir)
            .field("tolerance", &self.tolerance)
            .field("seed", &self.seed)
            .field("strict_render", &self.strict_render)
            .field("tokens", &masked)
            .finish()
    }
}

fn default_catalog_dir() -> PathBuf {
    PathBuf::from("./catalog")
}

impl Default for KirchhoffConfig {
    fn default() -> Self {
        Self {
            catalog_dir: default_catalog_dir(),
            tolerance: Tolerance::default(),
            seed: None,
            strict_render: false,
            tokens: HashMap::new(),
        }
    }
}

impl KirchhoffConfig {
    /// Engine settings derived from this configuration.
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            tolerance: self.tolerance,
            render_mode: if self.strict_render {
                RenderMode::Strict
            } else {
                RenderMode::Lenient
            },
        }
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
///
/// Substituted values are copied verbatim and never rescanned.
fn resolve_env_vars(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(start) = rest.find("${") {
        let Some(end) = rest[start..].find('}') else {
            break;
        };
        result.push_str(&rest[..start]);
        let var_name = &rest[start + 2..start + end];
        result.push_str(&std::env::var(var_name).unwrap_or_default());
        rest = &rest[start + end + 1..];
    }
    result.push_str(rest);
    result
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `kirchhoff.toml` in the current directory
/// 2. `~/.config/kirchhoff/config.toml`
///
/// Environment variable overrides: `KIRCHHOFF_SEED`, `KIRCHHOFF_CATALOG_DIR`.
pub fn load_config() -> Result<KirchhoffConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<KirchhoffConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("kirchhoff.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            let config = parse_config_str(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?;
            tracing::debug!("loaded config from {}", path.display());
            config
        }
        None => KirchhoffConfig::default(),
    };

    apply_env_overrides(&mut config)?;
    Ok(config)
}

/// Parse a TOML config string, resolving `${VAR}` references.
pub fn parse_config_str(content: &str) -> Result<KirchhoffConfig> {
    let mut config: KirchhoffConfig = toml::from_str(content)?;

    let Tolerance { abs, rel } = config.tolerance;
    anyhow::ensure!(
        abs >= 0.0 && rel >= 0.0,
        "tolerance must be non-negative (abs = {abs}, rel = {rel})"
    );

    config.catalog_dir = PathBuf::from(resolve_env_vars(&config.catalog_dir.to_string_lossy()));
    config.tokens = config
        .tokens
        .iter()
        .map(|(token, user)| (resolve_env_vars(token), resolve_env_vars(user)))
        .collect();

    Ok(config)
}

fn apply_env_overrides(config: &mut KirchhoffConfig) -> Result<()> {
    if let Ok(seed) = std::env::var("KIRCHHOFF_SEED") {
        config.seed = Some(
            seed.trim()
                .parse()
                .with_context(|| format!("KIRCHHOFF_SEED is not an integer: {seed}"))?,
        );
    }

    if let Ok(dir) = std::env::var("KIRCHHOFF_CATALOG_DIR") {
        config.catalog_dir = PathBuf::from(dir);
    }

    Ok(())
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("kirchhoff"))
}
