/// Project management module
///
/// Handles project documents and the pipelines they own: the data model, the
/// persistence contract with its SQLite and in-memory backends, and the store
/// that enforces existence and uniqueness rules on top of them.

pub mod database;
pub mod repository;
pub mod store;
pub mod types;

pub use database::SqliteProjectRepository;
pub use repository::{MemoryProjectRepository, ProjectRepository};
pub use store::{ProjectStore, StoreError};
pub use types::{PipelineEntry, Pipelines, Project};
