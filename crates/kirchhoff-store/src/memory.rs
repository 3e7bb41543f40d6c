//! In-memory store for objectives, templates, problem instances and attempts.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use uuid::Uuid;

use kirchhoff_core::model::{Catalog, Objective, ProblemTemplate};
use kirchhoff_core::results::{Attempt, ProblemInstance};
use kirchhoff_core::traits::{AttemptStore, ProblemStore, TemplateStore};

use crate::error::StoreError;

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>, StoreError> {
    mutex.lock().map_err(|_| StoreError::Poisoned)
}

/// A store that keeps everything in process memory.
///
/// Implements all three storage traits, so one `Arc<MemoryStore>` can back
/// a whole engine.
#[derive(Debug, Default)]
pub struct MemoryStore {
    /// Objectives keyed by code.
    objectives: Mutex<BTreeMap<String, Objective>>,
    /// Templates in insertion order.
    templates: Mutex<Vec<ProblemTemplate>>,
    problems: Mutex<HashMap<Uuid, ProblemInstance>>,
    attempts: Mutex<Vec<Attempt>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_objective(&self, objective: Objective) -> Result<(), StoreError> {
        let mut objectives = lock(&self.objectives)?;
        if objectives.contains_key(&objective.code) {
            return Err(StoreError::DuplicateObjective(objective.code));
        }
        objectives.insert(objective.code.clone(), objective);
        Ok(())
    }

    /// Add a template. Its objective must already be present.
    pub fn add_template(&self, template: ProblemTemplate) -> Result<(), StoreError> {
        let known = lock(&self.objectives)?
            .values()
            .any(|o| o.id == template.objective_id);
        if !known {
            return Err(StoreError::UnknownObjective {
                template_id: template.id,
                objective_id: template.objective_id,
            });
        }

        let mut templates = lock(&self.templates)?;
        if templates.iter().any(|t| t.id == template.id) {
            return Err(StoreError::DuplicateTemplate(template.id));
        }
        templates.push(template);
        Ok(())
    }

    /// Add a parsed catalog: its objective, then its templates in order.
    pub fn add_catalog(&self, catalog: Catalog) -> Result<(), StoreError> {
        self.add_objective(catalog.objective)?;
        for template in catalog.templates {
            self.add_template(template)?;
        }
        Ok(())
    }

    pub fn problem_count(&self) -> Result<usize, StoreError> {
        Ok(lock(&self.problems)?.len())
    }

    pub fn attempt_count(&self) -> Result<usize, StoreError> {
        Ok(lock(&self.attempts)?.len())
    }
}

#[async_trait]
impl TemplateStore for MemoryStore {
    async fn list_objectives(&self) -> anyhow::Result<Vec<Objective>> {
        Ok(lock(&self.objectives)?.values().cloned().collect())
    }

    async fn objective_by_code(&self, code: &str) -> anyhow::Result<Option<Objective>> {
        Ok(lock(&self.objectives)?.get(code).cloned())
    }

    async fn templates_for(&self, objective_id: &str) -> anyhow::Result<Vec<ProblemTemplate>> {
        Ok(lock(&self.templates)?
            .iter()
            .filter(|t| t.objective_id == objective_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl ProblemStore for MemoryStore {
    async fn insert_problem(&self, problem: ProblemInstance) -> anyhow::Result<()> {
        let mut problems = lock(&self.problems)?;
        if problems.contains_key(&problem.id) {
            return Err(StoreError::DuplicateProblem(problem.id).into());
        }
        problems.insert(problem.id, problem);
        Ok(())
    }

    async fn problem(&self, id: Uuid) -> anyhow::Result<Option<ProblemInstance>> {
        Ok(lock(&self.problems)?.get(&id).cloned())
    }
}

#[async_trait]
impl AttemptStore for MemoryStore {
    async fn insert_attempt(&self, attempt: Attempt) -> anyhow::Result<()> {
        lock(&self.attempts)?.push(attempt);
        Ok(())
    }

    async fn attempts_for(&self, problem_id: Uuid) -> anyhow::Result<Vec<Attempt>> {
        Ok(lock(&self.attempts)?
            .iter()
            .filter(|a| a.problem_id == problem_id)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kirchhoff_core::model::ParameterSchema;

    fn objective(id: &str, code: &str) -> Objective {
        Objective {
            id: id.into(),
            code: code.into(),
            statement: String::new(),
        }
    }

    fn template(id: &str, objective_id: &str) -> ProblemTemplate {
        ProblemTemplate {
            id: id.into(),
            objective_id: objective_id.into(),
            title: String::new(),
            difficulty: 1,
            params_schema: ParameterSchema::default(),
            prompt_template: "Find Vx.".into(),
            answer_units: "V".into(),
            solution_spec: Default::default(),
        }
    }

    #[tokio::test]
    async fn objectives_are_listed_by_code() {
        let store = MemoryStore::new();
        store.add_objective(objective("b", "KCL-02")).unwrap();
        store.add_objective(objective("a", "KCL-01")).unwrap();

        let codes: Vec<String> = store
            .list_objectives()
            .await
            .unwrap()
            .into_iter()
            .map(|o| o.code)
            .collect();
        assert_eq!(codes, vec!["KCL-01", "KCL-02"]);
        assert!(store.objective_by_code("KCL-03").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn templates_keep_insertion_order() {
        let store = MemoryStore::new();
        store.add_objective(objective("obj", "KCL-01")).unwrap();
        store.add_template(template("second", "obj")).unwrap();
        store.add_template(template("first", "obj")).unwrap();

        let ids: Vec<String> = store
            .templates_for("obj")
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.id)
            .collect();
        assert_eq!(ids, vec!["second", "first"]);
    }

    #[test]
    fn rejects_duplicates_and_orphans() {
        let store = MemoryStore::new();
        store.add_objective(objective("obj", "KCL-01")).unwrap();
        assert!(matches!(
            store.add_objective(objective("other", "KCL-01")),
            Err(StoreError::DuplicateObjective(_))
        ));

        store.add_template(template("t1", "obj")).unwrap();
        assert!(matches!(
            store.add_template(template("t1", "obj")),
            Err(StoreError::DuplicateTemplate(_))
        ));
        assert!(matches!(
            store.add_template(template("t2", "missing")),
            Err(StoreError::UnknownObjective { .. })
        ));
    }
}
