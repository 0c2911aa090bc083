//! Request context propagation
//!
//! Path identifiers are extracted once, by the middleware installed at the
//! route segment that declares them, and handed to handlers as typed
//! contexts stored in the request extensions.
//!
//! The contexts form a chain. Each one can only be derived from its parent
//! plus the newly matched segment:
//!
//! ```text
//! /api/v{api_version}      -> ApiContext
//!   .../{project_id}       -> ProjectContext (wraps ApiContext)
//!     .../{page_id}        -> PageContext    (wraps ProjectContext)
//! ```
//!
//! A handler that takes a [`PageContext`] can therefore rely on the api
//! version and project id too, and a handler mounted above `{page_id}` has no
//! way to obtain one.

use std::collections::HashMap;

use async_trait::async_trait;
use axum::{
    extract::{rejection::PathRejection, FromRequestParts, Path, Request},
    http::{request::Parts, Extensions, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::errors::ApiError;

/// Path parameter holding the `v{digits}` version segment.
pub const API_VERSION_PARAM: &str = "api_version";

/// Path parameter holding the project identifier.
pub const PROJECT_ID_PARAM: &str = "project_id";

/// Path parameter holding the page identifier.
pub const PAGE_ID_PARAM: &str = "page_id";

/// Context available to every handler mounted under the version prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiContext {
    api_version: String,
}

impl ApiContext {
    /// Parse a `v{digits}` path segment. Returns `None` for anything else.
    pub fn from_segment(segment: &str) -> Option<Self> {
        let digits = segment.strip_prefix('v')?;

        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }

        Some(Self {
            api_version: digits.to_string(),
        })
    }

    /// The version digits, without the leading `v`.
    pub fn api_version(&self) -> &str {
        &self.api_version
    }
}

/// Context for handlers nested under `{project_id}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectContext {
    api: ApiContext,
    project_id: String,
}

impl ProjectContext {
    /// Derive a project context from its parent.
    pub fn derive(api: &ApiContext, project_id: impl Into<String>) -> Self {
        Self {
            api: api.clone(),
            project_id: project_id.into(),
        }
    }

    pub fn api_version(&self) -> &str {
        self.api.api_version()
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }
}

/// Context for handlers nested under `{project_id}/pages/{page_id}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageContext {
    project: ProjectContext,
    page_id: String,
}

impl PageContext {
    /// Derive a page context from its parent.
    pub fn derive(project: &ProjectContext, page_id: impl Into<String>) -> Self {
        Self {
            project: project.clone(),
            page_id: page_id.into(),
        }
    }

    pub fn api_version(&self) -> &str {
        self.project.api_version()
    }

    pub fn project_id(&self) -> &str {
        self.project.project_id()
    }

    pub fn page_id(&self) -> &str {
        &self.page_id
    }
}

/// Adds the [`ApiContext`] to the request.
///
/// Versions that are not `v` followed by digits get the same empty 404 the
/// router returns for any unmatched path.
pub async fn api_context(
    params: Result<Path<HashMap<String, String>>, PathRejection>,
    mut request: Request,
    next: Next,
) -> Response {
    let segment = match path_param(params, API_VERSION_PARAM) {
        Ok(segment) => segment,
        Err(err) => return err.into_response(),
    };

    let Some(context) = ApiContext::from_segment(&segment) else {
        tracing::debug!(segment = %segment, "Rejected malformed api version segment");
        return StatusCode::NOT_FOUND.into_response();
    };

    request.extensions_mut().insert(context);
    next.run(request).await
}

/// Adds the [`ProjectContext`] to the request.
pub async fn project_context(
    params: Result<Path<HashMap<String, String>>, PathRejection>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let project_id = path_param(params, PROJECT_ID_PARAM)?;
    let parent = stored_context::<ApiContext>(request.extensions(), "api")?;

    let context = ProjectContext::derive(&parent, project_id);
    request.extensions_mut().insert(context);

    Ok(next.run(request).await)
}

/// Adds the [`PageContext`] to the request.
pub async fn page_context(
    params: Result<Path<HashMap<String, String>>, PathRejection>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let page_id = path_param(params, PAGE_ID_PARAM)?;
    let parent = stored_context::<ProjectContext>(request.extensions(), "project")?;

    let context = PageContext::derive(&parent, page_id);
    request.extensions_mut().insert(context);

    Ok(next.run(request).await)
}

/// Read a single matched path parameter by name.
fn path_param(
    params: Result<Path<HashMap<String, String>>, PathRejection>,
    name: &'static str,
) -> Result<String, ApiError> {
    let Path(mut params) =
        params.map_err(|rejection| ApiError::bad_request(rejection.body_text()))?;

    params
        .remove(name)
        .ok_or_else(|| ApiError::internal(format!("path parameter `{name}` was not matched")))
}

fn stored_context<T>(extensions: &Extensions, name: &'static str) -> Result<T, ApiError>
where
    T: Clone + Send + Sync + 'static,
{
    extensions
        .get::<T>()
        .cloned()
        .ok_or(ApiError::MissingContext(name))
}

#[async_trait]
impl<S> FromRequestParts<S> for ApiContext
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        stored_context(&parts.extensions, "api")
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for ProjectContext
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        stored_context(&parts.extensions, "project")
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for PageContext
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        stored_context(&parts.extensions, "page")
    }
}

#[cfg(test)]
#[path = "context_tests.rs"]
mod tests;
