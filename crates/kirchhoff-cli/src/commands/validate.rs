//! The `kirchhoff validate` command.

use std::path::PathBuf;

use anyhow::Result;

use kirchhoff_core::parser::{load_catalog_dir, parse_catalog, validate_catalog};
use kirchhoff_core::solver::SolverRegistry;

pub fn execute(catalog_path: PathBuf) -> Result<()> {
    let catalogs = if catalog_path.is_dir() {
        load_catalog_dir(&catalog_path)?
    } else {
        vec![parse_catalog(&catalog_path)?]
    };

    let solvers = SolverRegistry::default();
    let mut total_warnings = 0;

    for catalog in &catalogs {
        println!(
            "Objective: {} ({} templates)",
            catalog.objective.code,
            catalog.templates.len()
        );

        let warnings = validate_catalog(catalog, &solvers);
        for w in &warnings {
            let prefix = w
                .template_id
                .as_ref()
                .map(|id| format!("  [{id}]"))
                .unwrap_or_else(|| "  ".to_string());
            println!("{prefix} WARNING: {}", w.message);
        }
        total_warnings += warnings.len();
    }

    if total_warnings == 0 {
        println!("All catalogs valid.");
    } else {
        println!("\n{total_warnings} warning(s) found.");
    }

    Ok(())
}
