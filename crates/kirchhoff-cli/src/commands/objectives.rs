//! The `kirchhoff objectives` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::Table;

use kirchhoff_core::traits::TemplateStore;
use kirchhoff_store::open_engine;

pub async fn execute(catalog: Option<PathBuf>, config_path: Option<PathBuf>) -> Result<()> {
    let config = super::load_settings(catalog, None, config_path)?;
    let (engine, store) = open_engine(&config)?;

    let objectives = engine.list_objectives().await?;
    if objectives.is_empty() {
        println!(
            "No objectives found in {}. Run `kirchhoff init` to create an example catalog.",
            config.catalog_dir.display()
        );
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["Code", "Templates", "Statement"]);
    for objective in &objectives {
        let templates = store.templates_for(&objective.id).await?;
        table.add_row(vec![
            objective.code.clone(),
            templates.len().to_string(),
            objective.statement.clone(),
        ]);
    }
    println!("{table}");

    Ok(())
}
