//! Store error types.

use thiserror::Error;
use uuid::Uuid;

/// Errors raised by the in-memory store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// An objective with the same code is already loaded.
    #[error("duplicate objective code: {0}")]
    DuplicateObjective(String),

    /// A template with the same ID is already loaded.
    #[error("duplicate template ID: {0}")]
    DuplicateTemplate(String),

    /// A template refers to an objective that was never added.
    #[error("template {template_id} refers to unknown objective {objective_id}")]
    UnknownObjective {
        template_id: String,
        objective_id: String,
    },

    /// A problem instance with the same ID was already stored.
    #[error("duplicate problem ID: {0}")]
    DuplicateProblem(Uuid),

    /// A writer panicked while holding a lock.
    #[error("store lock poisoned")]
    Poisoned,
}
