//! kirchhoff CLI: generate, solve and grade circuit-analysis practice problems.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "kirchhoff", version, about = "Circuit-analysis practice engine")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate template catalog TOML files
    Validate {
        /// Path to a catalog file or directory
        #[arg(long)]
        catalog: PathBuf,
    },

    /// List objectives in the catalog
    Objectives {
        /// Catalog directory (overrides config)
        #[arg(long)]
        catalog: Option<PathBuf>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Generate problem instances for an objective
    Generate {
        /// Objective code (e.g. "KCL-01")
        #[arg(long)]
        objective: String,

        /// Number of problems to generate
        #[arg(long, default_value = "1")]
        count: usize,

        /// RNG seed for reproducible problems (overrides config)
        #[arg(long)]
        seed: Option<u64>,

        /// Output format: text, json
        #[arg(long, default_value = "text")]
        format: String,

        /// Catalog directory (overrides config)
        #[arg(long)]
        catalog: Option<PathBuf>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Compute the canonical answer for a parameter set
    Solve {
        /// Parameter assignment, repeatable (e.g. --param Vs=10)
        #[arg(long = "param", value_parser = commands::parse_param)]
        params: Vec<(String, f64)>,

        /// Solution family
        #[arg(long, default_value = kirchhoff_core::model::DEFAULT_FAMILY)]
        family: String,
    },

    /// Grade an answer against a parameter set
    Grade {
        /// Parameter assignment, repeatable (e.g. --param Vs=10)
        #[arg(long = "param", value_parser = commands::parse_param)]
        params: Vec<(String, f64)>,

        /// Submitted value
        #[arg(long, allow_hyphen_values = true)]
        value: f64,

        /// Submitted units
        #[arg(long, default_value = "V")]
        units: String,

        /// Solution family
        #[arg(long, default_value = kirchhoff_core::model::DEFAULT_FAMILY)]
        family: String,

        /// Output format: text, json
        #[arg(long, default_value = "text")]
        format: String,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Generate a problem and grade answers read from stdin
    Practice {
        /// Objective code (e.g. "KCL-01")
        #[arg(long)]
        objective: String,

        /// RNG seed (overrides config)
        #[arg(long)]
        seed: Option<u64>,

        /// Bearer token identifying the learner (checked against config tokens)
        #[arg(long)]
        token: Option<String>,

        /// Catalog directory (overrides config)
        #[arg(long)]
        catalog: Option<PathBuf>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Create starter config and example catalog
    Init,
}

#[tokio::main]
async fn main() {
    let filter = match "kirchhoff=info".parse() {
        Ok(directive) => EnvFilter::from_default_env().add_directive(directive),
        Err(_) => EnvFilter::from_default_env(),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Validate { catalog } => commands::validate::execute(catalog),
        Commands::Objectives { catalog, config } => {
            commands::objectives::execute(catalog, config).await
        }
        Commands::Generate {
            objective,
            count,
            seed,
            format,
            catalog,
            config,
        } => commands::generate::execute(objective, count, seed, format, catalog, config).await,
        Commands::Solve { params, family } => commands::solve::execute(params, family),
        Commands::Grade {
            params,
            value,
            units,
            family,
            format,
            config,
        } => commands::grade::execute(params, value, units, family, format, config),
        Commands::Practice {
            objective,
            seed,
            token,
            catalog,
            config,
        } => commands::practice::execute(objective, seed, token, catalog, config).await,
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
