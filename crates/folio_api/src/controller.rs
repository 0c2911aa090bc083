//! Controller contract
//!
//! A controller owns one resource family. It hands the router a
//! self-contained route subtree and the path segment to mount it under;
//! the router adds the `/api/v{N}` prefix, so controllers only ever see
//! paths relative to their own mount point.

use axum::Router;

/// A pluggable resource controller.
///
/// Controllers are registered once when the router is built and are never
/// removed or replaced. They hold no per-request state.
pub trait Controller: Send + Sync {
    /// The route subtree served by this controller.
    fn routes(&self) -> Router;

    /// The single path segment this controller is mounted under, e.g. `projects`.
    ///
    /// Must be non-empty, URL-safe and stable for the lifetime of the
    /// controller. Two controllers may not share a route group.
    fn route_group(&self) -> &str;
}

/// Check that a route group is a single unreserved URL path segment.
pub fn is_valid_route_group(group: &str) -> bool {
    !group.is_empty()
        && group
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '~'))
        && group != "."
        && group != ".."
}
