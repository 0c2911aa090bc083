//! Error handling and HTTP error classification
//!
//! Handlers never write error responses themselves. They return an
//! [`ApiError`], and the classifier in this module turns it into the single
//! status/body pair the client sees plus the single log line the operator
//! sees.
//!
//! # Error Taxonomy
//!
//! | Kind                          | Status | Logged as | Body                          |
//! |-------------------------------|--------|-----------|-------------------------------|
//! | `BadRequestInputData`         | 400    | warn      | the error's own message       |
//! | `EmptyRequestBodyNotAllowed`  | 400    | warn      | the error's own message       |
//! | `MissingContext`              | 500    | error     | [`UNKNOWN_ERROR_MESSAGE`]     |
//! | `Internal`                    | 500    | error     | [`UNKNOWN_ERROR_MESSAGE`]     |
//!
//! Only client-fault kinds are given a descriptive body. Everything else is
//! opaque to the client and fully detailed in the server logs.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Body returned for every error that is not a recognized client fault.
pub const UNKNOWN_ERROR_MESSAGE: &str = "An unknown error occurred!";

/// Errors returned by request handlers and extractors.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request carried data that could not be parsed or failed validation.
    #[error("{0}")]
    BadRequestInputData(String),

    /// The endpoint requires a request body but none was sent.
    #[error("request body must not be empty")]
    EmptyRequestBodyNotAllowed,

    /// A handler asked for a request context that no middleware provided.
    ///
    /// This can only happen when a handler is mounted outside the route
    /// segment that extracts the identifier it needs.
    #[error("request context `{0}` is not available on this route")]
    MissingContext(&'static str),

    /// Any other failure, including errors raised by business logic.
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    /// Create a bad request error with a client-facing message.
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequestInputData(message.into())
    }

    /// Create an internal error from a server-side message.
    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::Internal(anyhow::anyhow!(message.into()))
    }

    /// Derive the status, client message and log level for this error.
    pub fn classify(&self) -> ClassifiedError {
        match self {
            ApiError::BadRequestInputData(_) | ApiError::EmptyRequestBodyNotAllowed => {
                ClassifiedError {
                    status: StatusCode::BAD_REQUEST,
                    message: self.to_string(),
                    log_as_warning: true,
                }
            }
            ApiError::MissingContext(_) | ApiError::Internal(_) => ClassifiedError {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                message: UNKNOWN_ERROR_MESSAGE.to_string(),
                log_as_warning: false,
            },
        }
    }
}

/// The outcome of classifying an [`ApiError`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedError {
    /// Status code sent to the client, always in the 4xx/5xx range.
    pub status: StatusCode,

    /// Body sent to the client.
    pub message: String,

    /// Expected client faults are logged at warn, everything else at error.
    pub log_as_warning: bool,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let classified = self.classify();

        log_error(&self, &classified);

        (classified.status, classified.message).into_response()
    }
}

/// Resolve an optional handler error into the response the client receives.
///
/// Returns `None` when there is no error, leaving the caller's success
/// response untouched. `Some` means the error path was taken and the returned
/// response is the only thing that may be written for this request.
pub fn handle_error(err: Option<ApiError>) -> Option<Response> {
    err.map(IntoResponse::into_response)
}

/// Emit the one log line for a classified error.
fn log_error(error: &ApiError, classified: &ClassifiedError) {
    let status_code = classified.status.as_u16();

    if classified.log_as_warning {
        tracing::warn!(
            "status-code" = status_code,
            err = %error,
            "bad request data received"
        );
    } else {
        tracing::error!(
            "status-code" = status_code,
            err = ?error,
            "unknown error occurred"
        );
    }
}

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;
