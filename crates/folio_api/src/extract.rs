//! Request body extraction
//!
//! Axum's own `Json` extractor answers malformed bodies with its own status
//! codes and plain-text messages. [`JsonBody`] instead maps every body
//! failure onto the API's client-fault error kinds so the response goes
//! through the same classifier as every other handler error.

use async_trait::async_trait;
use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
};
use serde::de::DeserializeOwned;

use crate::errors::ApiError;

/// JSON request body that must be present.
#[derive(Debug, Clone)]
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(request: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(request, state)
            .await
            .map_err(|rejection| ApiError::bad_request(rejection.body_text()))?;

        parse_body(&bytes).map(JsonBody)
    }
}

/// Parse a raw request body, rejecting empty and whitespace-only bodies.
pub fn parse_body<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, ApiError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Err(ApiError::EmptyRequestBodyNotAllowed);
    }

    serde_json::from_slice(bytes)
        .map_err(|err| ApiError::bad_request(format!("invalid request body: {err}")))
}

#[cfg(test)]
#[path = "extract_tests.rs"]
mod tests;
