//! The `kirchhoff generate` command.

use std::path::PathBuf;

use anyhow::Result;

use kirchhoff_store::open_engine;

pub async fn execute(
    objective: String,
    count: usize,
    seed: Option<u64>,
    format: String,
    catalog: Option<PathBuf>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    anyhow::ensure!(count >= 1, "count must be at least 1");
    anyhow::ensure!(
        matches!(format.as_str(), "text" | "json"),
        "unknown format: {format} (expected text or json)"
    );

    let config = super::load_settings(catalog, seed, config_path)?;
    let (engine, _store) = open_engine(&config)?;
    let mut rng = super::rng_for(config.seed);

    let mut problems = Vec::with_capacity(count);
    for _ in 0..count {
        problems.push(engine.generate_with_rng(&objective, &mut rng).await?);
    }

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&problems)?);
        return Ok(());
    }

    for (i, problem) in problems.iter().enumerate() {
        if count > 1 {
            println!("Problem {} of {count}", i + 1);
        }
        println!("  id:      {}", problem.problem_id);
        println!("  prompt:  {}", problem.prompt);
        println!("  params:  {}", super::format_params(&problem.params));
        println!("  units:   {}", problem.expected_units);
        println!();
    }

    Ok(())
}
