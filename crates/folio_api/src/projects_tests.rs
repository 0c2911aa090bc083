//! Tests for the projects controller
//!
//! Requests go through the full router so route nesting, context
//! middleware and error classification are exercised together.

use super::*;
use axum::{
    body::Body,
    http::{header, Method, Request},
};
use serde_json::json;
use tower::ServiceExt; // for `oneshot`

use crate::routes::create_router;

const INTEGRATION_ID: &str = "0b6f1a3e-2a44-4f7e-9c1e-5d2f7c9b8a10";

fn app() -> Router {
    let controllers: Vec<Box<dyn Controller>> = vec![Box::new(ProjectsController::new())];
    create_router(&controllers).unwrap()
}

async fn send(request: Request<Body>) -> (StatusCode, String) {
    let response = app().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();

    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

async fn get_text(uri: &str) -> (StatusCode, String) {
    send(Request::builder().uri(uri).body(Body::empty()).unwrap()).await
}

fn json_request(method: Method, uri: &str, body: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(body.into())
        .unwrap()
}

#[test]
fn test_route_group() {
    assert_eq!(ProjectsController::new().route_group(), "projects");
}

// ============================================================================
// Collection routes
// ============================================================================

#[tokio::test]
async fn test_list_projects() {
    assert_eq!(
        get_text("/api/v1/projects").await,
        (StatusCode::OK, "list projects".to_string())
    );
}

#[tokio::test]
async fn test_search_projects_is_not_treated_as_project_id() {
    assert_eq!(
        get_text("/api/v1/projects/search").await,
        (StatusCode::OK, "search projects".to_string())
    );
}

#[tokio::test]
async fn test_head_is_answered_for_get_routes() {
    let request = Request::builder()
        .method(Method::HEAD)
        .uri("/api/v1/projects")
        .body(Body::empty())
        .unwrap();

    let (status, body) = send(request).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.is_empty());
}

#[tokio::test]
async fn test_create_project() {
    let body = json!({
        "scm_integration_id": INTEGRATION_ID,
        "name": "handbook",
        "path": "myorg/handbook"
    });

    let (status, text) = send(json_request(
        Method::POST,
        "/api/v1/projects",
        body.to_string(),
    ))
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(text, "create project: handbook");
}

#[tokio::test]
async fn test_create_project_with_invalid_uuid_is_bad_request() {
    let body = json!({
        "scm_integration_id": "1234",
        "name": "handbook",
        "path": "myorg/handbook"
    });

    let (status, text) = send(json_request(
        Method::POST,
        "/api/v1/projects",
        body.to_string(),
    ))
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(text, "scm_integration_id must be a valid uuid");
}

#[tokio::test]
async fn test_create_project_without_body_is_bad_request() {
    let (status, text) = send(json_request(Method::POST, "/api/v1/projects", Body::empty())).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(text, "request body must not be empty");
}

#[tokio::test]
async fn test_create_project_with_malformed_body_is_bad_request() {
    let (status, text) = send(json_request(
        Method::POST,
        "/api/v1/projects",
        "{\"name\": \"handbook\"",
    ))
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(text.starts_with("invalid request body:"), "{text}");
}

// ============================================================================
// Item routes
// ============================================================================

#[tokio::test]
async fn test_get_project_echoes_id() {
    assert_eq!(
        get_text("/api/v1/projects/abc123").await,
        (StatusCode::OK, "get project: abc123".to_string())
    );
}

#[tokio::test]
async fn test_project_id_keeps_url_legal_punctuation() {
    assert_eq!(
        get_text("/api/v1/projects/my-proj_1.0~rc").await,
        (StatusCode::OK, "get project: my-proj_1.0~rc".to_string())
    );
}

#[tokio::test]
async fn test_project_id_is_percent_decoded() {
    assert_eq!(
        get_text("/api/v1/projects/hello%20world").await,
        (StatusCode::OK, "get project: hello world".to_string())
    );
}

#[tokio::test]
async fn test_update_project_with_no_changes_succeeds() {
    let (status, text) = send(json_request(Method::PUT, "/api/v1/projects/p1", "{}")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(text, "update project: p1");
}

#[tokio::test]
async fn test_update_project_validates_supplied_fields() {
    let body = json!({ "scm_integration_id": "nope" });

    let (status, text) = send(json_request(
        Method::PUT,
        "/api/v1/projects/p1",
        body.to_string(),
    ))
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(text, "scm_integration_id must be a valid uuid");
}

#[tokio::test]
async fn test_update_project_without_body_is_bad_request() {
    let (status, text) = send(json_request(Method::PUT, "/api/v1/projects/p1", Body::empty())).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(text, "request body must not be empty");
}

#[tokio::test]
async fn test_delete_project() {
    let request = Request::builder()
        .method(Method::DELETE)
        .uri("/api/v1/projects/p1")
        .body(Body::empty())
        .unwrap();

    assert_eq!(
        send(request).await,
        (StatusCode::OK, "delete project: p1".to_string())
    );
}

#[tokio::test]
async fn test_unsupported_method_on_item() {
    let request = Request::builder()
        .method(Method::PATCH)
        .uri("/api/v1/projects/p1")
        .body(Body::empty())
        .unwrap();

    let (status, _) = send(request).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
}

// ============================================================================
// Page routes
// ============================================================================

#[tokio::test]
async fn test_list_pages() {
    assert_eq!(
        get_text("/api/v1/projects/p1/pages").await,
        (StatusCode::OK, "list project (p1) pages".to_string())
    );
}

#[tokio::test]
async fn test_search_pages_is_not_treated_as_page_id() {
    assert_eq!(
        get_text("/api/v1/projects/p1/pages/search").await,
        (StatusCode::OK, "search project (p1) pages".to_string())
    );
}

#[tokio::test]
async fn test_get_page_echoes_both_ids() {
    assert_eq!(
        get_text("/api/v7/projects/p1/pages/intro").await,
        (StatusCode::OK, "get project (p1) page: intro".to_string())
    );
}

#[tokio::test]
async fn test_projects_require_digit_version() {
    let (status, _) = get_text("/api/vlatest/projects/p1/pages/intro").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
