/// Pipeline registry server
///
/// Main entry point. Loads configuration from the environment and starts the
/// HTTP server.

use pipeline_registry::{config::Config, server::start_server};

/// Application entry point
///
/// The server provides:
/// - Project/pipeline API at /api/*
/// - Health check at /healthz
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration (defaults to 0.0.0.0:5000 and data/pipelines.db)
    let config = Config::default();

    start_server(config).await
}
