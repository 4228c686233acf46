//! Core domain logic for PaveLife.
//! This crate is the single source of truth for the life document and its
//! mutation rules; view layers stay thin and stateless above it.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod view;

pub use logging::{default_log_level, init_logging};
pub use model::life::{AgeEvent, DocumentValidationError, FuturePath, LifeDocument, Todo};
pub use repo::document_repo::{
    DocumentRepository, MemoryDocumentRepository, RepoError, RepoResult,
    SqliteDocumentRepository, DEFAULT_DOCUMENT_KEY,
};
pub use service::life_store::LifeStore;
pub use view::ViewState;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
