//! HTTP routing configuration
//!
//! This module assembles the single top-level handler for the API.
//!
//! # Route Structure
//!
//! Every controller is mounted under a version prefix:
//!
//! ```text
//! /api/v{N}/{route_group}/...
//! ```
//!
//! `N` must be one or more digits; any other version segment is answered
//! with a 404.
//!
//! # Middleware
//!
//! Applied to every request, outermost first:
//! 1. Request id tagging (`x-request-id`, generated when absent)
//! 2. Client IP capture
//! 3. Access logging (tracing span + start/completion log lines)
//! 4. Panic recovery (500 with the generic error body)
//! 5. Request timeout (60 seconds, 504)
//!
//! Requests under the version prefix then pass through the api version
//! extraction middleware before reaching a controller.

use std::{collections::HashSet, time::Duration};

use axum::{error_handling::HandleErrorLayer, extract::Request, middleware, Router};
use thiserror::Error;
use tower::{timeout::TimeoutLayer, ServiceBuilder};
use tower_http::{
    catch_panic::CatchPanicLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::{
    context::{self, API_VERSION_PARAM},
    controller::{is_valid_route_group, Controller},
    middleware as api_middleware,
};

/// How long a request may run before it is aborted.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Configuration errors detected while building the router.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RouterError {
    /// Two controllers asked for the same mount point.
    #[error("route group '{0}' is registered by more than one controller")]
    DuplicateRouteGroup(String),

    /// A controller's route group is not a single URL-safe path segment.
    #[error("route group '{0}' is not a valid path segment")]
    InvalidRouteGroup(String),
}

/// Create the complete API router with all controllers mounted.
///
/// Controllers are mounted in the order given. Each one occupies its own
/// prefix, so the order does not affect which controller serves a request.
///
/// # Errors
///
/// Returns [`RouterError`] if a route group is invalid or used twice.
pub fn create_router(controllers: &[Box<dyn Controller>]) -> Result<Router, RouterError> {
    let versioned = versioned_routes(controllers)?;

    // The span carries request context only; access_log_middleware writes
    // the request log lines.
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request| {
            let request_id = request
                .headers()
                .get("x-request-id")
                .and_then(|value| value.to_str().ok())
                .unwrap_or("-");

            tracing::info_span!(
                "request",
                method = %request.method(),
                uri = %request.uri(),
                request_id = %request_id,
            )
        })
        .on_request(())
        .on_response(())
        .on_failure(());

    let layers = ServiceBuilder::new()
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(middleware::from_fn(api_middleware::client_ip_middleware))
        .layer(trace_layer)
        .layer(middleware::from_fn(api_middleware::access_log_middleware))
        .layer(CatchPanicLayer::custom(api_middleware::panic_response))
        .layer(HandleErrorLayer::new(api_middleware::timeout_response))
        .layer(TimeoutLayer::new(REQUEST_TIMEOUT));

    Ok(Router::new()
        .nest(&format!("/api/:{API_VERSION_PARAM}"), versioned)
        .layer(layers))
}

/// Mount every controller under the version prefix.
fn versioned_routes(controllers: &[Box<dyn Controller>]) -> Result<Router, RouterError> {
    let mut seen = HashSet::new();
    let mut router = Router::new();

    for controller in controllers {
        let group = controller.route_group();

        if !is_valid_route_group(group) {
            return Err(RouterError::InvalidRouteGroup(group.to_string()));
        }

        if !seen.insert(group.to_string()) {
            return Err(RouterError::DuplicateRouteGroup(group.to_string()));
        }

        tracing::info!(route_group = %group, "Mounting controller");

        router = router.nest(&format!("/{group}"), controller.routes());
    }

    Ok(router.layer(middleware::from_fn(context::api_context)))
}

#[cfg(test)]
#[path = "routes_tests.rs"]
mod tests;
