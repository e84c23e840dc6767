/// Server setup and initialization
///
/// Wires together the persistence service, the project store, and HTTP routes.
/// Provides the application factory used by `main` and by the HTTP tests.

use crate::{
    api::{create_project_routes, AppState},
    config::{Config, StorageBackend},
    project::{MemoryProjectRepository, ProjectRepository, ProjectStore, SqliteProjectRepository},
};
use anyhow::{Context, Result};
use axum::{routing::get, Router};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

/// Build the router around an already constructed store
pub fn build_router(store: ProjectStore) -> Router {
    Router::new()
        // Health check endpoint
        .route("/healthz", get(health_check))
        // Project and pipeline API routes
        .merge(create_project_routes().with_state(AppState { store }))
}

/// Create the main Axum application with all routes
///
/// Opens the configured persistence service and hands it to the project store.
pub async fn create_app(config: Config) -> Result<Router> {
    let repository: Arc<dyn ProjectRepository> = match config.database.backend {
        StorageBackend::Sqlite => {
            tracing::info!("🏗️ Initializing SQLite project repository");
            let repo = SqliteProjectRepository::connect(&config.database.path)
                .await
                .context("Failed to initialize project database")?;
            Arc::new(repo)
        }
        StorageBackend::Memory => {
            tracing::warn!("🧪 Using in-memory project repository; data is lost on restart");
            Arc::new(MemoryProjectRepository::new())
        }
    };

    let app = build_router(ProjectStore::new(repository));

    tracing::info!("✅ Application initialized successfully");

    Ok(app)
}

/// Start the HTTP server with the given configuration
///
/// Creates the application and starts the Axum server on the configured address and port.
pub async fn start_server(config: Config) -> Result<()> {
    // Initialize tracing subscriber for logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .with_thread_ids(true)
        .with_level(true)
        .init();

    tracing::info!("Starting pipeline registry...");

    let app = create_app(config.clone()).await?;

    let bind_addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", bind_addr))?;

    tracing::info!("🚀 Server listening on http://{}", bind_addr);

    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}

/// Health check endpoint handler
async fn health_check() -> &'static str {
    "ok"
}
