//! Central practice engine.
//!
//! Two independent flows share nothing mutable:
//!
//! - generation: objective → template → sample → render → persist instance
//! - grading: stored instance → solve → judge → persist attempt

use std::sync::Arc;

use anyhow::Result;
use chrono::Utc;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use uuid::Uuid;

use crate::error::{CoreError, CoreResult, ResourceKind};
use crate::judge::{self, Tolerance};
use crate::model::{Objective, ParameterAssignment, ProblemTemplate, SolutionSpec};
use crate::render::{render_with, RenderMode};
use crate::results::{
    Attempt, CallerId, CanonicalAnswer, GeneratedProblem, GradeOutcome, GradeVerdict,
    ProblemInstance, RenderedProblem, Submission,
};
use crate::sampler::sample;
use crate::solver::SolverRegistry;
use crate::traits::{AttemptStore, ProblemStore, TemplateStore};
use crate::units::unit_matches;

/// Configuration for the practice engine.
#[derive(Debug, Clone, Default)]
pub struct EngineConfig {
    /// Acceptance band used when grading.
    pub tolerance: Tolerance,
    /// Handling of placeholders without a parameter.
    pub render_mode: RenderMode,
}

/// Sample parameters for `template` and render its prompt.
pub fn instantiate<R: Rng>(
    template: &ProblemTemplate,
    rng: &mut R,
    mode: RenderMode,
) -> CoreResult<RenderedProblem> {
    let params = sample(&template.params_schema, rng)?;
    let prompt = render_with(&template.prompt_template, &params, mode)?;
    Ok(RenderedProblem {
        prompt,
        params,
        expected_units: template.answer_units.clone(),
    })
}

/// Solve `params` under the answer key's family and judge `submission`
/// against the result.
///
/// The solver's unit must agree with `answer_key.unit`; otherwise the key is
/// inconsistent and the answer is not judged.
pub fn check_answer(
    solvers: &SolverRegistry,
    params: &ParameterAssignment,
    answer_key: &SolutionSpec,
    submission: &Submission,
    tolerance: &Tolerance,
) -> CoreResult<(CanonicalAnswer, GradeVerdict)> {
    judge::validate_submission(submission)?;
    let answer = solvers.solve(params, &answer_key.family)?;
    if !unit_matches(&answer.unit, &answer_key.unit) {
        return Err(CoreError::Schema(format!(
            "family `{}` answers in `{}` but the answer key expects `{}`",
            answer_key.family, answer.unit, answer_key.unit
        )));
    }
    let verdict = judge::grade(submission, &answer, tolerance);
    Ok((answer, verdict))
}

/// The practice engine: generates problem instances and grades attempts.
pub struct PracticeEngine {
    templates: Arc<dyn TemplateStore>,
    problems: Arc<dyn ProblemStore>,
    attempts: Arc<dyn AttemptStore>,
    solvers: SolverRegistry,
    config: EngineConfig,
}

impl PracticeEngine {
    pub fn new(
        templates: Arc<dyn TemplateStore>,
        problems: Arc<dyn ProblemStore>,
        attempts: Arc<dyn AttemptStore>,
        config: EngineConfig,
    ) -> Self {
        Self {
            templates,
            problems,
            attempts,
            solvers: SolverRegistry::default(),
            config,
        }
    }

    /// Replace the built-in solver registry.
    pub fn with_solvers(mut self, solvers: SolverRegistry) -> Self {
        self.solvers = solvers;
        self
    }

    pub fn solvers(&self) -> &SolverRegistry {
        &self.solvers
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub async fn list_objectives(&self) -> Result<Vec<Objective>> {
        self.templates.list_objectives().await
    }

    /// Generate a problem for `objective_code` from a fresh entropy-seeded RNG.
    pub async fn generate(&self, objective_code: &str) -> Result<GeneratedProblem> {
        let mut rng = StdRng::from_entropy();
        self.generate_with_rng(objective_code, &mut rng).await
    }

    /// Generate a problem drawing parameters from `rng`.
    pub async fn generate_with_rng<R: Rng + Send>(
        &self,
        objective_code: &str,
        rng: &mut R,
    ) -> Result<GeneratedProblem> {
        let objective = self
            .templates
            .objective_by_code(objective_code)
            .await?
            .ok_or_else(|| CoreError::not_found(ResourceKind::Objective, objective_code))?;

        let template = self
            .templates
            .templates_for(&objective.id)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| CoreError::not_found(ResourceKind::Template, objective_code))?;

        let rendered = instantiate(&template, rng, self.config.render_mode)?;

        let problem = ProblemInstance {
            id: Uuid::new_v4(),
            template_id: template.id.clone(),
            objective_id: objective.id.clone(),
            params: rendered.params.clone(),
            rendered: rendered.clone(),
            answer_key: template.solution_spec.clone(),
            created_at: Utc::now(),
        };
        let problem_id = problem.id;
        self.problems.insert_problem(problem).await?;

        tracing::info!(
            %problem_id,
            objective = objective_code,
            template = %template.id,
            "generated problem"
        );

        Ok(GeneratedProblem {
            problem_id,
            objective_code: objective.code,
            prompt: rendered.prompt,
            params: rendered.params,
            expected_units: rendered.expected_units,
        })
    }

    /// Grade `submission` against stored problem `problem_id` and record the attempt.
    pub async fn grade(
        &self,
        problem_id: Uuid,
        submission: Submission,
        caller: &CallerId,
    ) -> Result<GradeOutcome> {
        judge::validate_submission(&submission)?;

        let problem = self
            .problems
            .problem(problem_id)
            .await?
            .ok_or_else(|| CoreError::not_found(ResourceKind::Problem, problem_id.to_string()))?;

        let (answer, verdict) = check_answer(
            &self.solvers,
            &problem.params,
            &problem.answer_key,
            &submission,
            &self.config.tolerance,
        )?;

        let attempt = Attempt {
            id: Uuid::new_v4(),
            user_id: caller.clone(),
            problem_id,
            answer: submission.clone(),
            is_correct: verdict.is_correct,
            score: verdict.score,
            error_tags: verdict.error_tags.clone(),
            feedback: verdict.feedback.clone(),
            created_at: Utc::now(),
        };
        let attempt_id = attempt.id;
        self.attempts.insert_attempt(attempt).await?;

        tracing::info!(
            %problem_id,
            %attempt_id,
            correct = verdict.is_correct,
            "graded attempt"
        );

        Ok(GradeOutcome {
            is_correct: verdict.is_correct,
            your_value: submission.value,
            your_units: submission.units,
            correct_value: answer.rounded(),
            feedback: verdict.feedback,
            error_tags: verdict.error_tags,
            attempt_id,
        })
    }
}
