//! Folio REST API
//!
//! This crate provides the HTTP layer for Folio: projects containing pages,
//! each reachable under a versioned path such as `/api/v1/projects/{id}`.
//!
//! # Architecture
//!
//! This crate exists in the HTTP layer and handles:
//! - Mounting resource controllers under the `/api/v{N}` prefix
//! - Propagating path identifiers to handlers as typed request contexts
//! - Cross-cutting middleware (request ids, client IP, logging, panic
//!   recovery, timeouts)
//! - Classifying handler errors into HTTP responses
//!
//! Persistence and business rules live behind the controllers and are not
//! part of this crate.

pub mod context;
pub mod controller;
pub mod errors;
pub mod extract;
pub mod middleware;
pub mod models;
pub mod projects;
pub mod routes;
pub mod server;

// Re-export key types for convenience
pub use context::{ApiContext, PageContext, ProjectContext};
pub use controller::Controller;
pub use errors::{handle_error, ApiError, ClassifiedError};
pub use projects::ProjectsController;
pub use routes::{create_router, RouterError};
pub use server::{ApiConfig, ApiServer, ServerConfig};

/// Default API host
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Default API port
pub const DEFAULT_PORT: u16 = 8080;
