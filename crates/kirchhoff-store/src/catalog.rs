//! Seeding a store from TOML catalogs and wiring an engine over it.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};

use kirchhoff_core::model::Catalog;
use kirchhoff_core::parser::{load_catalog_dir, validate_catalog};
use kirchhoff_core::solver::SolverRegistry;
use kirchhoff_core::PracticeEngine;

use crate::config::KirchhoffConfig;
use crate::memory::MemoryStore;

/// Build a store from already-parsed catalogs.
///
/// Validation warnings are logged, not fatal; duplicate objectives or
/// templates across catalogs are errors.
pub fn store_from_catalogs(catalogs: Vec<Catalog>, solvers: &SolverRegistry) -> Result<MemoryStore> {
    let store = MemoryStore::new();

    for catalog in catalogs {
        for warning in validate_catalog(&catalog, solvers) {
            match &warning.template_id {
                Some(id) => tracing::warn!(
                    "{} [{id}]: {}",
                    catalog.objective.code,
                    warning.message
                ),
                None => tracing::warn!("{}: {}", catalog.objective.code, warning.message),
            }
        }

        let code = catalog.objective.code.clone();
        let templates = catalog.templates.len();
        store
            .add_catalog(catalog)
            .with_context(|| format!("failed to load objective {code}"))?;
        tracing::debug!(objective = %code, templates, "loaded catalog");
    }

    Ok(store)
}

/// Load every catalog under `dir` into a fresh store.
pub fn load_store(dir: &Path, solvers: &SolverRegistry) -> Result<MemoryStore> {
    let catalogs = load_catalog_dir(dir)
        .with_context(|| format!("failed to load catalogs from {}", dir.display()))?;
    store_from_catalogs(catalogs, solvers)
}

/// Build an engine over a memory store seeded from `config.catalog_dir`.
///
/// The store is returned too so callers can inspect what was persisted.
pub fn open_engine(config: &KirchhoffConfig) -> Result<(PracticeEngine, Arc<MemoryStore>)> {
    let solvers = SolverRegistry::default();
    let store = Arc::new(load_store(&config.catalog_dir, &solvers)?);
    let engine = PracticeEngine::new(
        store.clone(),
        store.clone(),
        store.clone(),
        config.engine_config(),
    )
    .with_solvers(solvers);
    Ok((engine, store))
}
