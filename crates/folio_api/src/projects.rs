//! Projects controller
//!
//! # Route Structure
//!
//! Relative to the controller's mount point (`/api/v{N}/projects`):
//!
//! - GET    /                              - List projects
//! - GET    /search                        - Search projects
//! - POST   /                              - Create project
//! - GET    /:project_id                   - Get project
//! - PUT    /:project_id                   - Update project
//! - DELETE /:project_id                   - Delete project
//! - GET    /:project_id/pages             - List pages of a project
//! - GET    /:project_id/pages/search      - Search pages of a project
//! - GET    /:project_id/pages/:page_id    - Get page
//!
//! Each parameterized segment installs the context middleware for its own
//! parameter, so handlers below it receive the matching typed context.
//!
//! The handlers echo the identifiers they were given. Persistence and search
//! belong to the business logic layer, which is not part of this crate.

use axum::{
    http::StatusCode,
    middleware,
    routing::get,
    Router,
};

use crate::{
    context::{self, ApiContext, PageContext, ProjectContext, PAGE_ID_PARAM, PROJECT_ID_PARAM},
    controller::Controller,
    errors::ApiError,
    extract::JsonBody,
    models::{CreateProjectRequest, UpdateProjectRequest},
};

/// Controller for projects and their pages.
#[derive(Debug, Clone, Default)]
pub struct ProjectsController;

impl ProjectsController {
    pub fn new() -> Self {
        Self
    }
}

impl Controller for ProjectsController {
    fn routes(&self) -> Router {
        Router::new()
            .route("/", get(list_projects).post(create_project))
            .route("/search", get(search_projects))
            .nest(&format!("/:{PROJECT_ID_PARAM}"), project_routes())
    }

    fn route_group(&self) -> &str {
        "projects"
    }
}

/// Routes nested under `/:project_id`.
fn project_routes() -> Router {
    Router::new()
        .route(
            "/",
            get(get_project).put(update_project).delete(delete_project),
        )
        .nest("/pages", page_routes())
        .layer(middleware::from_fn(context::project_context))
}

/// Routes nested under `/:project_id/pages`.
fn page_routes() -> Router {
    let page = Router::new()
        .route("/", get(get_page))
        .layer(middleware::from_fn(context::page_context));

    Router::new()
        .route("/", get(list_pages))
        .route("/search", get(search_pages))
        .nest(&format!("/:{PAGE_ID_PARAM}"), page)
}

/// GET /api/v{N}/projects
async fn list_projects(_ctx: ApiContext) -> Result<String, ApiError> {
    Ok("list projects".to_string())
}

/// GET /api/v{N}/projects/search
async fn search_projects(_ctx: ApiContext) -> Result<String, ApiError> {
    Ok("search projects".to_string())
}

/// POST /api/v{N}/projects
async fn create_project(
    _ctx: ApiContext,
    JsonBody(request): JsonBody<CreateProjectRequest>,
) -> Result<(StatusCode, String), ApiError> {
    request.validate()?;

    Ok((
        StatusCode::CREATED,
        format!("create project: {}", request.name),
    ))
}

/// GET /api/v{N}/projects/:project_id
async fn get_project(ctx: ProjectContext) -> Result<String, ApiError> {
    Ok(format!("get project: {}", ctx.project_id()))
}

/// PUT /api/v{N}/projects/:project_id
///
/// A body that supplies no fields is a successful no-op update.
async fn update_project(
    ctx: ProjectContext,
    JsonBody(request): JsonBody<UpdateProjectRequest>,
) -> Result<String, ApiError> {
    request.validate()?;

    tracing::debug!(
        project_id = %ctx.project_id(),
        fields = ?request.supplied_fields(),
        "Project update requested"
    );

    Ok(format!("update project: {}", ctx.project_id()))
}

/// DELETE /api/v{N}/projects/:project_id
async fn delete_project(ctx: ProjectContext) -> Result<String, ApiError> {
    Ok(format!("delete project: {}", ctx.project_id()))
}

/// GET /api/v{N}/projects/:project_id/pages
async fn list_pages(ctx: ProjectContext) -> Result<String, ApiError> {
    Ok(format!("list project ({}) pages", ctx.project_id()))
}

/// GET /api/v{N}/projects/:project_id/pages/search
async fn search_pages(ctx: ProjectContext) -> Result<String, ApiError> {
    Ok(format!("search project ({}) pages", ctx.project_id()))
}

/// GET /api/v{N}/projects/:project_id/pages/:page_id
async fn get_page(ctx: PageContext) -> Result<String, ApiError> {
    Ok(format!(
        "get project ({}) page: {}",
        ctx.project_id(),
        ctx.page_id()
    ))
}

#[cfg(test)]
#[path = "projects_tests.rs"]
mod tests;
