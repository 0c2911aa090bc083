//! HTTP request models
//!
//! These types exist only in the HTTP layer. They are validated here and
//! handed on to the business logic behind each controller.

pub mod request;

pub use request::{CreateProjectRequest, UpdateProjectRequest};
