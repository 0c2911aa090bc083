//! HTTP server configuration and startup
//!
//! This module provides the server configuration and the blocking serve loop.

use std::{env, net::SocketAddr};

use anyhow::Context;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::signal;

use crate::{controller::Controller, routes, DEFAULT_HOST, DEFAULT_PORT};

/// Listen address source for the server.
///
/// The server has no opinion on where these values come from.
pub trait ServerConfig: Send + Sync {
    /// Host or IP address to bind to.
    fn listen_host(&self) -> String;

    /// Port to listen on.
    fn http_port(&self) -> String;
}

/// Configuration loading errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// The configured port is not a number in the 0-65535 range.
    #[error("Invalid API_PORT '{0}': expected a port number")]
    InvalidPort(String),
}

/// API server configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// Host to bind to
    pub host: String,

    /// Port to listen on
    pub port: u16,
}

impl ApiConfig {
    /// Load configuration from the environment.
    ///
    /// - `API_HOST`: Host to bind to (default: 0.0.0.0)
    /// - `API_PORT`: Port to listen on (default: 8080)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_values(env::var("API_HOST").ok(), env::var("API_PORT").ok())
    }

    fn from_values(host: Option<String>, port: Option<String>) -> Result<Self, ConfigError> {
        let port = match port {
            Some(port) => port
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidPort(port))?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            host: host.unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
        })
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

impl ServerConfig for ApiConfig {
    fn listen_host(&self) -> String {
        self.host.clone()
    }

    fn http_port(&self) -> String {
        self.port.to_string()
    }
}

/// API server
///
/// Owns the configuration and the registered controllers. Both are fixed at
/// construction.
pub struct ApiServer<C> {
    config: C,
    controllers: Vec<Box<dyn Controller>>,
}

impl<C: ServerConfig> ApiServer<C> {
    /// Create a new API server with the given configuration and controllers.
    pub fn new(config: C, controllers: Vec<Box<dyn Controller>>) -> Self {
        Self {
            config,
            controllers,
        }
    }

    /// The `host:port` address the server binds to.
    pub fn listen_address(&self) -> String {
        format!(
            "{}:{}",
            self.config.listen_host(),
            self.config.http_port()
        )
    }

    /// Build the Axum router with all controllers and middleware.
    pub fn router(&self) -> Result<axum::Router, routes::RouterError> {
        routes::create_router(&self.controllers)
    }

    /// Start the server and listen for requests.
    ///
    /// This method blocks until the server is shut down gracefully via
    /// CTRL+C (SIGINT) or SIGTERM signal.
    ///
    /// # Errors
    ///
    /// Returns an error if the router cannot be built, if the server fails to
    /// bind to the configured address, or if the listener fails while serving.
    pub async fn serve(self) -> anyhow::Result<()> {
        let app = self.router().context("Failed to build router")?;
        let listen_on = self.listen_address();

        let listener = TcpListener::bind(&listen_on)
            .await
            .with_context(|| format!("Failed to bind to {listen_on}"))?;

        tracing::info!("Starting API server on {}", listen_on);

        // Serve with graceful shutdown
        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| anyhow::anyhow!("Server error: {}", e))?;

        tracing::info!("Server shutdown complete");

        Ok(())
    }
}

/// Wait for shutdown signal (CTRL+C or SIGTERM)
///
/// If a signal handler cannot be installed the error is logged and that
/// signal is ignored; the server keeps running.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(err = %e, "Failed to install CTRL+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(err = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received CTRL+C, initiating graceful shutdown");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        },
    }
}

#[cfg(test)]
#[path = "server_tests.rs"]
mod tests;
