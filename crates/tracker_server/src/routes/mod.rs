//! Route handlers grouped by resource.

pub mod background;
pub mod clients;
pub mod email;
pub mod health;
pub mod invoices;
pub mod projects;
pub mod tasks;

use crate::envelope::Envelope;
use crate::error::ApiError;
use crate::state::AppState;
use axum::Json;
use std::sync::Arc;
use tracker_core::{RepoResult, SqliteTrackerService};

pub(crate) type ApiResult<T> = Result<Json<Envelope<T>>, ApiError>;

/// Runs one service call on the blocking pool while holding the store lock.
pub(crate) async fn with_service<T, F>(state: &AppState, work: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce(&SqliteTrackerService<'_>) -> RepoResult<T> + Send + 'static,
{
    let store = Arc::clone(&state.store);
    let value = tokio::task::spawn_blocking(move || store.with_service(work)).await??;
    Ok(value)
}

pub(crate) fn success<T>(message: &str, data: T) -> ApiResult<T> {
    Ok(Json(Envelope::success(message, data)))
}
