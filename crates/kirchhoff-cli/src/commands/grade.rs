//! The `kirchhoff grade` command.

use std::path::PathBuf;

use anyhow::Result;
use serde::Serialize;

use kirchhoff_core::engine::check_answer;
use kirchhoff_core::results::{ErrorTag, Submission};
use kirchhoff_core::solver::SolverRegistry;

/// Machine-readable grading report.
#[derive(Debug, Serialize)]
struct GradeReport {
    is_correct: bool,
    score: f64,
    your_value: f64,
    your_units: String,
    correct_value: f64,
    correct_units: String,
    error_tags: Vec<ErrorTag>,
    feedback: String,
}

pub fn execute(
    params: Vec<(String, f64)>,
    value: f64,
    units: String,
    family: String,
    format: String,
    config_path: Option<PathBuf>,
) -> Result<()> {
    anyhow::ensure!(
        matches!(format.as_str(), "text" | "json"),
        "unknown format: {format} (expected text or json)"
    );

    let config = super::load_settings(None, None, config_path)?;
    let solvers = SolverRegistry::default();
    let submission = Submission::new(value, units);

    let answer_key = solvers.answer_key(&family)?;

    let (answer, verdict) = check_answer(
        &solvers,
        &super::assignment(params),
        &answer_key,
        &submission,
        &config.tolerance,
    )?;

    let report = GradeReport {
        is_correct: verdict.is_correct,
        score: verdict.score,
        your_value: submission.value,
        your_units: submission.units,
        correct_value: answer.rounded(),
        correct_units: answer.unit,
        error_tags: verdict.error_tags.into_iter().collect(),
        feedback: verdict.feedback,
    };

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("{}", report.feedback);
    if !report.error_tags.is_empty() {
        let tags: Vec<&str> = report.error_tags.iter().map(ErrorTag::as_str).collect();
        println!("Tags: {}", tags.join(", "));
    }
    println!("Score: {:.1}", report.score);

    Ok(())
}
