//! The `kirchhoff init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    if std::path::Path::new("kirchhoff.toml").exists() {
        println!("kirchhoff.toml already exists, skipping.");
    } else {
        std::fs::write("kirchhoff.toml", SAMPLE_CONFIG)?;
        println!("Created kirchhoff.toml");
    }

    std::fs::create_dir_all("catalog")?;
    let example_path = std::path::Path::new("catalog/kcl-01.toml");
    if example_path.exists() {
        println!("catalog/kcl-01.toml already exists, skipping.");
    } else {
        std::fs::write(example_path, EXAMPLE_CATALOG)?;
        println!("Created catalog/kcl-01.toml");
    }

    println!("\nNext steps:");
    println!("  1. Run: kirchhoff validate --catalog catalog");
    println!("  2. Run: kirchhoff generate --objective KCL-01");
    println!("  3. Run: kirchhoff practice --objective KCL-01");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# kirchhoff configuration

catalog_dir = "./catalog"
strict_render = false
# seed = 42

[tolerance]
abs = 0.05
rel = 0.02

[tokens]
# "${KIRCHHOFF_DEV_TOKEN}" = "dev-learner"
"#;

const EXAMPLE_CATALOG: &str = r#"[objective]
id = "obj-kcl-01"
code = "KCL-01"
statement = "Find a node voltage in a loaded divider"

[[templates]]
id = "kcl-01-divider"
title = "Divider with parallel load"
difficulty = 2
answer_units = "V"
prompt_template = "A {{Vs}} V source drives R1 = {{R1}} Ω in series with R2 = {{R2}} Ω in parallel with R3 = {{R3}} Ω. Find Vx."

[templates.params.Vs]
minimum = 5
maximum = 24

[templates.params.R1]
kind = "component"

[templates.params.R2]
kind = "component"

[templates.params.R3]
kind = "component"

[templates.solution]
family = "voltage_divider_parallel"
unit = "V"
"#;
