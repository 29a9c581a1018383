use super::{success, with_service, ApiResult};
use crate::state::AppState;
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::Json;
use std::sync::Arc;
use tracker_core::{Client, ClientId, NewClient, Project};

pub async fn create_client(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<NewClient>, JsonRejection>,
) -> ApiResult<Client> {
    let Json(payload) = payload?;
    let client = with_service(&state, move |service| service.create_client(&payload)).await?;
    success("New client created successfully!", client)
}

pub async fn list_clients(State(state): State<Arc<AppState>>) -> ApiResult<Vec<Client>> {
    let clients = with_service(&state, |service| service.list_clients()).await?;
    success("All active clients fetched successfully!", clients)
}

pub async fn view_client(
    State(state): State<Arc<AppState>>,
    id: Result<Path<ClientId>, PathRejection>,
) -> ApiResult<Client> {
    let Path(id) = id?;
    let client = with_service(&state, move |service| service.get_client(id)).await?;
    success("Client fetched successfully!", client)
}

pub async fn client_projects(
    State(state): State<Arc<AppState>>,
    id: Result<Path<ClientId>, PathRejection>,
) -> ApiResult<Vec<Project>> {
    let Path(id) = id?;
    let projects = with_service(&state, move |service| service.client_projects(id)).await?;
    success("Client projects fetched successfully!", projects)
}
