//! The `kirchhoff practice` command: an interactive generate-then-grade loop.

use std::io::BufRead;
use std::path::PathBuf;

use anyhow::Result;

use kirchhoff_core::error::{classify, ErrorStatus};
use kirchhoff_core::results::{CallerId, ErrorTag, Submission};
use kirchhoff_core::traits::{authenticate, AttemptStore};
use kirchhoff_store::{open_engine, StaticTokenVerifier};

const LOCAL_USER: &str = "local";

/// Split `"5.69 V"` into a submission; units default to volts.
fn parse_answer(line: &str) -> Option<Submission> {
    let mut parts = line.split_whitespace();
    let value: f64 = parts.next()?.parse().ok()?;
    let units = parts.collect::<Vec<_>>().join(" ");
    if units.is_empty() {
        Some(Submission::new(value, "V"))
    } else {
        Some(Submission::new(value, units))
    }
}

pub async fn execute(
    objective: String,
    seed: Option<u64>,
    token: Option<String>,
    catalog: Option<PathBuf>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = super::load_settings(catalog, seed, config_path)?;

    let caller = match token {
        Some(token) => {
            let verifier = StaticTokenVerifier::new(config.tokens.clone());
            let header = format!("Bearer {token}");
            authenticate(&verifier, Some(header.as_str())).await?
        }
        None => CallerId(LOCAL_USER.to_string()),
    };

    let (engine, store) = open_engine(&config)?;
    let mut rng = super::rng_for(config.seed);
    let problem = engine.generate_with_rng(&objective, &mut rng).await?;

    println!("[{}] {}", problem.objective_code, problem.prompt);
    println!("Answer as VALUE [UNITS] (units default to V), or `q` to quit.");

    for line in std::io::stdin().lock().lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line.eq_ignore_ascii_case("q") || line.eq_ignore_ascii_case("quit") {
            break;
        }

        let Some(submission) = parse_answer(line) else {
            println!("Could not read `{line}`; expected VALUE [UNITS].");
            continue;
        };

        let outcome = match engine.grade(problem.problem_id, submission, &caller).await {
            Ok(outcome) => outcome,
            Err(e) if classify(&e) == ErrorStatus::BadRequest => {
                println!("Rejected: {e}");
                continue;
            }
            Err(e) => return Err(e),
        };

        println!("{}", outcome.feedback);
        if !outcome.error_tags.is_empty() {
            let tags: Vec<&str> = outcome.error_tags.iter().map(ErrorTag::as_str).collect();
            println!("Tags: {}", tags.join(", "));
        }
        if outcome.is_correct {
            break;
        }
    }

    let attempts = store.attempts_for(problem.problem_id).await?;
    let solved = attempts.iter().any(|a| a.is_correct);
    println!(
        "{} attempt(s) by {}, {}.",
        attempts.len(),
        caller.as_str(),
        if solved { "solved" } else { "not solved" }
    );

    Ok(())
}
