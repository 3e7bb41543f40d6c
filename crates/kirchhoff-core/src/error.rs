//! Core error types.
//!
//! Every failure the sampling, rendering, solving and grading pipeline can
//! produce. The engine performs no I/O of its own, so nothing here is
//! transient: callers classify with [`CoreError::status`] and surface the
//! error, never retry it.

use std::fmt;

use thiserror::Error;

/// Errors produced by the problem generation and grading pipeline.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoreError {
    /// A required parameter lacks bounds, or the schema is otherwise malformed.
    #[error("schema error: {0}")]
    Schema(String),

    /// Parameters violate the physical preconditions of a solver formula.
    #[error("domain error: {0}")]
    Domain(String),

    /// A referenced objective, template or problem instance does not exist.
    #[error("{kind} not found: {id}")]
    NotFound { kind: ResourceKind, id: String },

    /// A submission has a malformed shape.
    #[error("invalid submission: {0}")]
    Validation(String),

    /// The caller could not be identified.
    #[error("unauthorized: {0}")]
    Unauthorized(String),
}

/// The kind of record a [`CoreError::NotFound`] refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Objective,
    Template,
    Problem,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceKind::Objective => write!(f, "objective"),
            ResourceKind::Template => write!(f, "problem template"),
            ResourceKind::Problem => write!(f, "problem"),
        }
    }
}

/// How a transport layer should present an error to its caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorStatus {
    BadRequest,
    NotFound,
    Unauthorized,
    /// Bad template or corrupted stored instance; not the caller's fault.
    DataIntegrity,
    /// A collaborator (store, verifier) failed.
    Internal,
}

impl ErrorStatus {
    /// The HTTP status code conventionally used for this class.
    pub fn http_code(&self) -> u16 {
        match self {
            ErrorStatus::BadRequest => 400,
            ErrorStatus::Unauthorized => 401,
            ErrorStatus::NotFound => 404,
            ErrorStatus::DataIntegrity | ErrorStatus::Internal => 500,
        }
    }
}

impl CoreError {
    pub fn not_found(kind: ResourceKind, id: impl Into<String>) -> Self {
        CoreError::NotFound {
            kind,
            id: id.into(),
        }
    }

    /// Classify this error into a client-facing outcome.
    pub fn status(&self) -> ErrorStatus {
        match self {
            // Schema faults come from stored templates, not from the caller.
            CoreError::Schema(_) | CoreError::Domain(_) => ErrorStatus::DataIntegrity,
            CoreError::NotFound { .. } => ErrorStatus::NotFound,
            CoreError::Validation(_) => ErrorStatus::BadRequest,
            CoreError::Unauthorized(_) => ErrorStatus::Unauthorized,
        }
    }
}

pub type CoreResult<T> = std::result::Result<T, CoreError>;

/// Classify an engine error, looking through `anyhow` context for a [`CoreError`].
pub fn classify(err: &anyhow::Error) -> ErrorStatus {
    err.chain()
        .find_map(|cause| cause.downcast_ref::<CoreError>())
        .map(CoreError::status)
        .unwrap_or(ErrorStatus::Internal)
}
