//! Cross-cutting middleware
//!
//! These layers run for every request regardless of api version:
//! - Client IP capture
//! - Access logging
//! - Panic recovery response
//! - Request timeout response
//!
//! Request id tagging and tracing spans come straight from `tower-http`, the
//! timeout itself from `tower`. Both are wired up in [`crate::routes`].

use std::{
    any::Any,
    net::{IpAddr, SocketAddr},
    time::Instant,
};

use axum::{
    extract::{ConnectInfo, Request},
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    BoxError,
};
use tower::timeout::error::Elapsed;
use tower_http::request_id::RequestId;

use crate::errors::UNKNOWN_ERROR_MESSAGE;

const TRUE_CLIENT_IP: &str = "true-client-ip";
const X_REAL_IP: &str = "x-real-ip";
const X_FORWARDED_FOR: &str = "x-forwarded-for";

/// Address of the client that issued the request.
///
/// Stored in request extensions by [`client_ip_middleware`] and can be
/// extracted by handlers with `Extension<ClientIp>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientIp(pub IpAddr);

/// Client IP capture middleware.
///
/// Resolves the client address from, in order:
/// 1. `True-Client-IP`
/// 2. `X-Real-IP`
/// 3. The first entry of `X-Forwarded-For`
/// 4. The socket peer address, when the server was started with connect info
///
/// Header values that do not parse as an IP address are skipped.
pub async fn client_ip_middleware(mut request: Request, next: Next) -> Response {
    let peer = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip());

    if let Some(ip) = resolve_client_ip(request.headers()).or(peer) {
        request.extensions_mut().insert(ClientIp(ip));
    }

    next.run(request).await
}

/// Resolve the client address from proxy headers.
fn resolve_client_ip(headers: &HeaderMap) -> Option<IpAddr> {
    header_ip(headers, TRUE_CLIENT_IP)
        .or_else(|| header_ip(headers, X_REAL_IP))
        .or_else(|| {
            headers
                .get(X_FORWARDED_FOR)
                .and_then(|value| value.to_str().ok())
                .and_then(|value| value.split(',').next())
                .and_then(|first| first.trim().parse().ok())
        })
}

fn header_ip(headers: &HeaderMap, name: &str) -> Option<IpAddr> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse().ok())
}

/// Access logging middleware.
///
/// Logs one line when the request starts and one when the response is ready,
/// tagged with the request id and client address.
pub async fn access_log_middleware(request: Request, next: Next) -> Response {
    let started = Instant::now();

    let request_id = request
        .extensions()
        .get::<RequestId>()
        .and_then(|id| id.header_value().to_str().ok())
        .unwrap_or("-")
        .to_string();
    let client_ip = request
        .extensions()
        .get::<ClientIp>()
        .map(|ClientIp(ip)| ip.to_string())
        .unwrap_or_else(|| "-".to_string());

    tracing::info!(
        request_id = %request_id,
        client_ip = %client_ip,
        method = %request.method(),
        uri = %request.uri(),
        "Request started"
    );

    let response = next.run(request).await;

    tracing::info!(
        request_id = %request_id,
        status = %response.status(),
        latency = ?started.elapsed(),
        "Request completed"
    );

    response
}

/// Response used by the panic recovery layer.
///
/// The panic payload is logged but never sent to the client.
pub fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else if let Some(message) = panic.downcast_ref::<&str>() {
        (*message).to_string()
    } else {
        "unknown panic payload".to_string()
    };

    let status = StatusCode::INTERNAL_SERVER_ERROR;

    tracing::error!(
        "status-code" = status.as_u16(),
        err = %detail,
        "Recovered from panic while handling request"
    );

    (status, UNKNOWN_ERROR_MESSAGE).into_response()
}

/// Response for a request that failed inside the timeout layer.
///
/// An expired deadline is a server-side timeout (504 with an empty body).
/// Any other error from the wrapped service is answered like an unknown
/// error.
pub async fn timeout_response(err: BoxError) -> Response {
    let status = if err.is::<Elapsed>() {
        StatusCode::GATEWAY_TIMEOUT
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };

    tracing::error!(
        "status-code" = status.as_u16(),
        err = %err,
        "Request aborted"
    );

    if status == StatusCode::GATEWAY_TIMEOUT {
        status.into_response()
    } else {
        (status, UNKNOWN_ERROR_MESSAGE).into_response()
    }
}

#[cfg(test)]
#[path = "middleware_tests.rs"]
mod tests;
