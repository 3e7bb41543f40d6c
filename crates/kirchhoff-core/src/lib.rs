//! kirchhoff-core — Problem instantiation and grading engine.
//!
//! This crate defines the data model, the sampling/rendering/solving/grading
//! pipeline, and the traits for the storage and identity collaborators that
//! the rest of kirchhoff builds on.

pub mod engine;
pub mod error;
pub mod judge;
pub mod model;
pub mod parser;
pub mod render;
pub mod results;
pub mod sampler;
pub mod solver;
pub mod traits;
pub mod units;

pub use engine::{EngineConfig, PracticeEngine};
pub use error::{CoreError, CoreResult};
