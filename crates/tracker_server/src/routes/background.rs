use crate::error::ApiError;
use crate::state::AppState;
use axum::extract::rejection::PathRejection;
use axum::extract::{Path, State};
use axum::Json;
use log::info;
use serde::Serialize;
use std::sync::Arc;
use tracker_core::notify::DEFAULT_NOTIFICATION_MESSAGE;
use tracker_core::NotificationUnit;

#[derive(Debug, Serialize)]
pub struct NotificationScheduled {
    pub message: String,
}

/// Queues a notification for `email` and answers immediately.
pub async fn send_notification(
    State(state): State<Arc<AppState>>,
    email: Result<Path<String>, PathRejection>,
) -> Result<Json<NotificationScheduled>, ApiError> {
    let Path(email) = email?;
    let job_id = state.dispatcher.schedule_unit(Box::new(NotificationUnit::new(
        email.clone(),
        DEFAULT_NOTIFICATION_MESSAGE,
    )))?;
    info!("event=notification_schedule module=server status=ok job_id={job_id}");

    Ok(Json(NotificationScheduled {
        message: format!("Notification scheduled for {email}"),
    }))
}
