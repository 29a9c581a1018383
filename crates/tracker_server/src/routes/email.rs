use crate::error::ApiError;
use crate::state::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use log::info;
use serde::Serialize;
use std::sync::Arc;
use tracker_core::{EmailMessage, EmailRequest, SendEmailUnit};

#[derive(Debug, Serialize)]
pub struct EmailScheduled {
    pub status: &'static str,
    pub to: String,
    pub via: String,
}

#[derive(Debug, Serialize)]
pub struct EmailHealth {
    pub smtp_server: String,
    pub port: u16,
    pub sender: String,
}

/// Validates the request, queues delivery, and answers before any SMTP work.
pub async fn send_email(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<EmailRequest>, JsonRejection>,
) -> Result<Json<EmailScheduled>, ApiError> {
    let Json(request) = payload?;
    request.validate()?;

    let message = EmailMessage::new(&state.smtp, &request);
    let to = message.to.clone();
    let job_id = state
        .dispatcher
        .schedule_unit(Box::new(SendEmailUnit::new(
            Arc::clone(&state.mailer),
            message,
        )))?;
    info!("event=email_schedule module=server status=ok job_id={job_id}");

    Ok(Json(EmailScheduled {
        status: "scheduled",
        to,
        via: state.smtp.endpoint(),
    }))
}

pub async fn email_health(State(state): State<Arc<AppState>>) -> Json<EmailHealth> {
    Json(EmailHealth {
        smtp_server: state.smtp.server.clone(),
        port: state.smtp.port,
        sender: state.smtp.sender.clone(),
    })
}
