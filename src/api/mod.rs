/// HTTP API Layer
///
/// REST endpoints for project and pipeline management. Handlers are thin:
/// they parse parameters, call the project store, and map store errors onto
/// status codes.

// Project/pipeline endpoints (GET/POST/PUT/DELETE)
pub mod projects;

// StoreError -> HTTP response mapping
pub mod error;

// Re-export router builder
pub use projects::{create_project_routes, AppState};
