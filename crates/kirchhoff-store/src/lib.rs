//! kirchhoff-store — Collaborators for the practice engine.
//!
//! In-memory implementations of the storage traits, a static bearer-token
//! identity verifier, configuration loading, and catalog seeding.

pub mod auth;
pub mod catalog;
pub mod config;
pub mod error;
pub mod memory;

pub use auth::StaticTokenVerifier;
pub use catalog::{load_store, open_engine, store_from_catalogs};
pub use config::{load_config, load_config_from, KirchhoffConfig};
pub use error::StoreError;
pub use memory::MemoryStore;
