//! Folio REST API Server
//!
//! Main binary for running the API server in production or development.
//!
//! # Environment Variables
//!
//! - `API_PORT`: Port to listen on (default: 8080)
//! - `API_HOST`: Host to bind to (default: 0.0.0.0)
//! - `RUST_LOG`: Log level (default: info)
//! - `LOG_FORMAT`: Set to `json` for JSON log lines (default: text)

use std::env;

use folio_api::{ApiConfig, ApiServer, Controller, ProjectsController};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = tracing_subscriber::fmt().with_env_filter(filter);

    if env::var("LOG_FORMAT").is_ok_and(|format| format.eq_ignore_ascii_case("json")) {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    // Load configuration from environment
    let config = ApiConfig::from_env()?;

    let controllers: Vec<Box<dyn Controller>> = vec![Box::new(ProjectsController::new())];

    tracing::info!("Starting Folio API server");

    // Blocks until shutdown; bind and serve errors end the process with a
    // non-zero exit code.
    ApiServer::new(config, controllers).serve().await
}
