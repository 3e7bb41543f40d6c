//! Trait definitions for the engine's external collaborators.
//!
//! Template storage, instance/attempt persistence and caller identification
//! live outside this crate. `kirchhoff-store` provides in-memory
//! implementations; a deployment can back them with a database and a real
//! token issuer instead.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::{CoreError, CoreResult};
use crate::model::{Objective, ProblemTemplate};
use crate::results::{Attempt, CallerId, ProblemInstance};

// ---------------------------------------------------------------------------
// Storage traits
// ---------------------------------------------------------------------------

/// Read-only source of objectives and templates.
#[async_trait]
pub trait TemplateStore: Send + Sync {
    /// All objectives, ordered by code.
    async fn list_objectives(&self) -> anyhow::Result<Vec<Objective>>;

    async fn objective_by_code(&self, code: &str) -> anyhow::Result<Option<Objective>>;

    /// Templates attached to an objective, in catalog order.
    async fn templates_for(&self, objective_id: &str) -> anyhow::Result<Vec<ProblemTemplate>>;
}

/// Persistence for generated problem instances.
#[async_trait]
pub trait ProblemStore: Send + Sync {
    async fn insert_problem(&self, problem: ProblemInstance) -> anyhow::Result<()>;

    async fn problem(&self, id: Uuid) -> anyhow::Result<Option<ProblemInstance>>;
}

/// Persistence for graded attempts.
#[async_trait]
pub trait AttemptStore: Send + Sync {
    async fn insert_attempt(&self, attempt: Attempt) -> anyhow::Result<()>;

    /// Attempts against one problem, oldest first.
    async fn attempts_for(&self, problem_id: Uuid) -> anyhow::Result<Vec<Attempt>>;
}

// ---------------------------------------------------------------------------
// Identity
// ---------------------------------------------------------------------------

/// Resolves a bearer token to the caller it was issued for.
#[async_trait]
pub trait IdentityVerifier: Send + Sync {
    async fn verify(&self, token: &str) -> CoreResult<CallerId>;
}

/// Extract the token from an `Authorization: Bearer <token>` header value.
pub fn bearer_token(header: Option<&str>) -> CoreResult<&str> {
    let header =
        header.ok_or_else(|| CoreError::Unauthorized("missing Authorization header".into()))?;
    let token = header.strip_prefix("Bearer ").ok_or_else(|| {
        CoreError::Unauthorized("Authorization header must be: Bearer <token>".into())
    })?;
    let token = token.trim();
    if token.is_empty() {
        return Err(CoreError::Unauthorized("empty bearer token".into()));
    }
    Ok(token)
}

/// Verify the caller behind an optional `Authorization` header.
pub async fn authenticate(
    verifier: &dyn IdentityVerifier,
    header: Option<&str>,
) -> CoreResult<CallerId> {
    let token = bearer_token(header)?;
    verifier.verify(token).await
}
