use super::{success, with_service, ApiResult};
use crate::state::AppState;
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::Json;
use std::sync::Arc;
use tracker_core::{Invoice, NewProject, Project, ProjectId, ProjectWithClientName, Task};

pub async fn create_project(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<NewProject>, JsonRejection>,
) -> ApiResult<Project> {
    let Json(payload) = payload?;
    let project = with_service(&state, move |service| service.create_project(&payload)).await?;
    success("Project created", project)
}

pub async fn list_projects(State(state): State<Arc<AppState>>) -> ApiResult<Vec<Project>> {
    let projects = with_service(&state, |service| service.list_projects()).await?;
    success("All active projects fetched successfully!", projects)
}

/// Active projects joined to their client's name, newest first.
pub async fn projects_overview(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Vec<ProjectWithClientName>> {
    let rows = with_service(&state, |service| service.list_projects_with_client_name()).await?;
    success("Project overview fetched successfully!", rows)
}

pub async fn project_tasks(
    State(state): State<Arc<AppState>>,
    id: Result<Path<ProjectId>, PathRejection>,
) -> ApiResult<Vec<Task>> {
    let Path(id) = id?;
    let tasks = with_service(&state, move |service| service.project_tasks(id)).await?;
    success("Project tasks fetched successfully!", tasks)
}

pub async fn project_invoices(
    State(state): State<Arc<AppState>>,
    id: Result<Path<ProjectId>, PathRejection>,
) -> ApiResult<Vec<Invoice>> {
    let Path(id) = id?;
    let invoices = with_service(&state, move |service| service.project_invoices(id)).await?;
    success("Project invoices fetched successfully!", invoices)
}
