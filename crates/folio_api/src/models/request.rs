//! HTTP request type definitions
//!
//! # Validation
//!
//! Request types carry a `validate` method that checks field formats before
//! the request reaches business logic. Failures are client faults and are
//! reported with a message naming the offending field.

use serde::Deserialize;
use uuid::Uuid;

use crate::errors::ApiError;

/// Request body for creating a project.
///
/// # Example
///
/// ```json
/// {
///   "scm_integration_id": "0b6f1a3e-2a44-4f7e-9c1e-5d2f7c9b8a10",
///   "name": "My awesome project",
///   "path": "myorg/myrepo"
/// }
/// ```
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct CreateProjectRequest {
    /// SCM integration the project belongs to. Must be a UUID.
    pub scm_integration_id: String,

    /// Project name, unique across all projects.
    pub name: String,

    /// Repository path in the SCM tool, e.g. `myorg/myrepo`.
    pub path: String,
}

impl CreateProjectRequest {
    /// Check field formats.
    pub fn validate(&self) -> Result<(), ApiError> {
        validate_integration_id(&self.scm_integration_id)?;
        validate_not_empty("name", &self.name)?;
        validate_not_empty("path", &self.path)
    }
}

/// Request body for updating a project.
///
/// Omitted fields are left as they are. A body that changes nothing is a
/// valid update.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct UpdateProjectRequest {
    #[serde(default)]
    pub scm_integration_id: Option<String>,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub path: Option<String>,
}

impl UpdateProjectRequest {
    /// Check the format of every supplied field.
    pub fn validate(&self) -> Result<(), ApiError> {
        if let Some(id) = &self.scm_integration_id {
            validate_integration_id(id)?;
        }
        if let Some(name) = &self.name {
            validate_not_empty("name", name)?;
        }
        if let Some(path) = &self.path {
            validate_not_empty("path", path)?;
        }
        Ok(())
    }

    /// Names of the fields present in the request, in declaration order.
    pub fn supplied_fields(&self) -> Vec<&'static str> {
        [
            ("scm_integration_id", self.scm_integration_id.is_some()),
            ("name", self.name.is_some()),
            ("path", self.path.is_some()),
        ]
        .into_iter()
        .filter_map(|(field, present)| present.then_some(field))
        .collect()
    }
}

fn validate_integration_id(id: &str) -> Result<(), ApiError> {
    Uuid::parse_str(id)
        .map(|_| ())
        .map_err(|_| ApiError::bad_request("scm_integration_id must be a valid uuid"))
}

fn validate_not_empty(field: &str, value: &str) -> Result<(), ApiError> {
    if value.trim().is_empty() {
        return Err(ApiError::bad_request(format!("{field} must not be empty")));
    }
    Ok(())
}

#[cfg(test)]
#[path = "request_tests.rs"]
mod tests;
