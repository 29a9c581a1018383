use super::{success, with_service, ApiResult};
use crate::state::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use std::sync::Arc;
use tracker_core::{NewTask, Task};

pub async fn create_task(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<NewTask>, JsonRejection>,
) -> ApiResult<Task> {
    let Json(payload) = payload?;
    let task = with_service(&state, move |service| service.create_task(&payload)).await?;
    success("New task created successfully!", task)
}

pub async fn list_tasks(State(state): State<Arc<AppState>>) -> ApiResult<Vec<Task>> {
    let tasks = with_service(&state, |service| service.list_tasks()).await?;
    success("All active tasks fetched successfully!", tasks)
}
