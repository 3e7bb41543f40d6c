//! End-to-end generation and grading through the engine and memory store.

use std::path::PathBuf;
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::SeedableRng;
use uuid::Uuid;

use kirchhoff_core::error::{classify, ErrorStatus};
use kirchhoff_core::parser::parse_catalog_str;
use kirchhoff_core::results::{CallerId, ErrorTag, Submission};
use kirchhoff_core::solver::SolverRegistry;
use kirchhoff_core::traits::AttemptStore;
use kirchhoff_core::{EngineConfig, PracticeEngine};
use kirchhoff_store::{store_from_catalogs, MemoryStore};

/// A catalog whose constraints pin Vs=10, R1=100, R2=220, R3=330.
const PINNED_TOML: &str = r#"
[objective]
code = "KCL-01"
statement = "Loaded voltage divider"

[[templates]]
id = "kcl-01-pinned"
answer_units = "V"
prompt_template = "Vs = {{Vs}} V, R1 = {{R1}} Ω, R2 = {{R2}} Ω, R3 = {{R3}} Ω. Find Vx."

[templates.params.Vs]
minimum = 10
maximum = 10

[templates.params.R1]
catalog = [100]

[templates.params.R2]
catalog = [220]

[templates.params.R3]
catalog = [330]

[[templates]]
id = "kcl-01-never-picked"
answer_units = "V"
prompt_template = "{{Vs}}"
[templates.params.Vs]
"#;

const RANDOM_TOML: &str = r#"
[objective]
code = "KCL-02"

[[templates]]
id = "kcl-02-random"
answer_units = "V"
prompt_template = "Vs = {{Vs}}, R1 = {{R1}}, R2 = {{R2}}, R3 = {{R3}}"

[templates.params.Vs]
minimum = 5
maximum = 24
[templates.params.R1]
[templates.params.R2]
[templates.params.R3]
"#;

const BROKEN_TOML: &str = r#"
[objective]
code = "BROKEN-01"

[[templates]]
id = "zero-branch"
answer_units = "V"
prompt_template = "{{Vs}} {{R1}} {{R2}} {{R3}}"

[templates.params.Vs]
[templates.params.R1]
[templates.params.R2]
catalog = [0]
[templates.params.R3]
"#;

/// Promises amps, but the default family answers in volts.
const AMP_TOML: &str = r#"
[objective]
code = "AMP-01"

[[templates]]
id = "amp-01"
answer_units = "A"
prompt_template = "Vs = {{Vs}}, R1 = {{R1}}, R2 = {{R2}}, R3 = {{R3}}"

[templates.params.Vs]
minimum = 10
maximum = 10
[templates.params.R1]
catalog = [100]
[templates.params.R2]
catalog = [220]
[templates.params.R3]
catalog = [330]
"#;

const EMPTY_TOML: &str = r#"
[objective]
code = "EMPTY-01"
"#;

fn build_engine() -> (PracticeEngine, Arc<MemoryStore>) {
    let catalogs = [PINNED_TOML, RANDOM_TOML, BROKEN_TOML, AMP_TOML, EMPTY_TOML]
        .iter()
        .map(|toml| parse_catalog_str(toml, &PathBuf::from("test.toml")).unwrap())
        .collect();
    let store = Arc::new(store_from_catalogs(catalogs, &SolverRegistry::default()).unwrap());
    let engine = PracticeEngine::new(
        store.clone(),
        store.clone(),
        store.clone(),
        EngineConfig::default(),
    );
    (engine, store)
}

fn learner() -> CallerId {
    CallerId("learner-1".into())
}

#[tokio::test]
async fn reference_scenario_grades_all_three_outcomes() {
    let (engine, store) = build_engine();

    let problem = engine.generate("KCL-01").await.unwrap();
    assert_eq!(problem.objective_code, "KCL-01");
    assert_eq!(problem.expected_units, "V");
    assert_eq!(
        problem.prompt,
        "Vs = 10 V, R1 = 100 Ω, R2 = 220 Ω, R3 = 330 Ω. Find Vx."
    );
    assert_eq!(store.problem_count().unwrap(), 1);

    let correct = engine
        .grade(problem.problem_id, Submission::new(5.69, "V"), &learner())
        .await
        .unwrap();
    assert!(correct.is_correct);
    assert!(correct.error_tags.is_empty());
    assert_eq!(correct.correct_value, 5.6897);
    assert_eq!(correct.feedback, "Correct Vx ≈ 5.69 V. ✅ Nice work.");

    let wrong_units = engine
        .grade(problem.problem_id, Submission::new(5.69, "A"), &learner())
        .await
        .unwrap();
    assert!(!wrong_units.is_correct);
    assert!(wrong_units.error_tags.contains(&ErrorTag::UnitsError));
    assert_eq!(wrong_units.error_tags.len(), 1);

    let wrong_value = engine
        .grade(problem.problem_id, Submission::new(4.0, "V"), &learner())
        .await
        .unwrap();
    assert!(!wrong_value.is_correct);
    assert!(wrong_value.error_tags.contains(&ErrorTag::AlgebraError));
    assert_eq!(wrong_value.your_value, 4.0);
    assert_eq!(wrong_value.your_units, "V");

    let attempts = store.attempts_for(problem.problem_id).await.unwrap();
    assert_eq!(attempts.len(), 3);
    assert!(attempts.iter().all(|a| a.user_id == learner()));
    assert_eq!(attempts[0].score, 1.0);
    assert_eq!(attempts[1].score, 0.0);
    assert_eq!(attempts[0].id, correct.attempt_id);
}

#[tokio::test]
async fn seeded_generation_is_reproducible() {
    let (engine, _) = build_engine();

    let a = engine
        .generate_with_rng("KCL-02", &mut StdRng::seed_from_u64(99))
        .await
        .unwrap();
    let b = engine
        .generate_with_rng("KCL-02", &mut StdRng::seed_from_u64(99))
        .await
        .unwrap();

    assert_eq!(a.params, b.params);
    assert_eq!(a.prompt, b.prompt);
    assert_ne!(a.problem_id, b.problem_id);
}

#[tokio::test]
async fn unknown_objective_is_not_found() {
    let (engine, _) = build_engine();
    let err = engine.generate("KCL-99").await.unwrap_err();
    assert_eq!(classify(&err), ErrorStatus::NotFound);
    assert!(err.to_string().contains("KCL-99"));
}

#[tokio::test]
async fn objective_without_templates_is_not_found() {
    let (engine, _) = build_engine();
    let err = engine.generate("EMPTY-01").await.unwrap_err();
    assert_eq!(classify(&err), ErrorStatus::NotFound);
    assert!(err.to_string().contains("problem template"));
}

#[tokio::test]
async fn unknown_problem_is_not_found() {
    let (engine, store) = build_engine();
    let err = engine
        .grade(Uuid::new_v4(), Submission::new(1.0, "V"), &learner())
        .await
        .unwrap_err();
    assert_eq!(classify(&err), ErrorStatus::NotFound);
    assert_eq!(store.attempt_count().unwrap(), 0);
}

#[tokio::test]
async fn malformed_submission_is_bad_request() {
    let (engine, store) = build_engine();
    let problem = engine.generate("KCL-01").await.unwrap();
    let err = engine
        .grade(problem.problem_id, Submission::new(f64::NAN, "V"), &learner())
        .await
        .unwrap_err();
    assert_eq!(classify(&err), ErrorStatus::BadRequest);
    assert_eq!(store.attempt_count().unwrap(), 0);
}

#[tokio::test]
async fn corrupted_instance_is_data_integrity_fault() {
    let (engine, store) = build_engine();
    let problem = engine.generate("BROKEN-01").await.unwrap();
    let err = engine
        .grade(problem.problem_id, Submission::new(1.0, "V"), &learner())
        .await
        .unwrap_err();
    assert_eq!(classify(&err), ErrorStatus::DataIntegrity);
    assert_eq!(store.attempt_count().unwrap(), 0);
}

#[tokio::test]
async fn answer_key_unit_disagreeing_with_solver_is_data_integrity_fault() {
    let (engine, store) = build_engine();
    let problem = engine.generate("AMP-01").await.unwrap();
    assert_eq!(problem.expected_units, "A");

    let err = engine
        .grade(problem.problem_id, Submission::new(5.69, "A"), &learner())
        .await
        .unwrap_err();
    assert_eq!(classify(&err), ErrorStatus::DataIntegrity);
    assert!(err.to_string().contains("answers in `V`"));
    assert_eq!(store.attempt_count().unwrap(), 0);
}

#[tokio::test]
async fn concurrent_grading_is_independent() {
    let (engine, store) = build_engine();
    let engine = Arc::new(engine);
    let problem_id = engine.generate("KCL-01").await.unwrap().problem_id;

    let mut handles = Vec::new();
    for i in 0..16 {
        let engine = Arc::clone(&engine);
        let value = if i % 2 == 0 { 5.69 } else { 4.0 };
        handles.push(tokio::spawn(async move {
            engine
                .grade(
                    problem_id,
                    Submission::new(value, "V"),
                    &CallerId(format!("learner-{i}")),
                )
                .await
        }));
    }

    let mut correct = 0;
    for handle in handles {
        if handle.await.unwrap().unwrap().is_correct {
            correct += 1;
        }
    }
    assert_eq!(correct, 8);
    assert_eq!(store.attempt_count().unwrap(), 16);
}
