use super::{success, ApiResult};
use crate::error::ApiError;
use crate::state::AppState;
use axum::extract::State;
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub database: &'static str,
    pub version: &'static str,
}

/// Round-trips the store before reporting healthy.
pub async fn health(State(state): State<Arc<AppState>>) -> ApiResult<HealthResponse> {
    let store = Arc::clone(&state.store);
    tokio::task::spawn_blocking(move || store.ping())
        .await?
        .map_err(ApiError::from)?;
    success(
        "healthy",
        HealthResponse {
            database: "ok",
            version: tracker_core::core_version(),
        },
    )
}
