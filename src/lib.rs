/// Pipeline registry: named pipeline URLs grouped under projects
///
/// This library provides the project store, its persistence backends, and the
/// REST API that exposes them.

// Core configuration and setup
pub mod config;

// Project management layer - data model, persistence, and store operations
pub mod project;

// HTTP API layer - REST endpoints over the project store
pub mod api;

// Server setup and initialization
pub mod server;

// Re-export commonly used types for external consumers
pub use project::{PipelineEntry, Pipelines, Project, ProjectRepository, ProjectStore, StoreError};
pub use server::{build_router, start_server};
