//! HTTP error mapping.
//!
//! Every failure leaves the server as an error envelope with a status code
//! derived from the core error taxonomy.

use crate::envelope::Envelope;
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use log::{error, warn};
use thiserror::Error;
use tracker_core::{DbError, DispatchError, EntityKind, RepoError, ValidationError};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Repo(#[from] RepoError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Dispatch(#[from] DispatchError),
    #[error(transparent)]
    Db(#[from] DbError),
    #[error("invalid request body: {0}")]
    Body(String),
    #[error("invalid path parameter: {0}")]
    Path(String),
    #[error("blocking task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Repo(RepoError::NotFound { .. }) => StatusCode::NOT_FOUND,
            Self::Repo(RepoError::ConstraintViolation { .. }) => StatusCode::CONFLICT,
            Self::Repo(RepoError::Validation(_))
            | Self::Validation(_)
            | Self::Body(_)
            | Self::Path(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Dispatch(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Repo(_) | Self::Db(_) | Self::Join(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn public_message(&self) -> String {
        match self {
            Self::Repo(RepoError::NotFound { entity, .. }) => not_found_message(*entity),
            Self::Repo(RepoError::ConstraintViolation { kind, .. }) => {
                format!("Request violates a {kind} constraint")
            }
            Self::Repo(RepoError::Validation(err)) | Self::Validation(err) => err.to_string(),
            Self::Body(_) | Self::Path(_) | Self::Dispatch(_) => self.to_string(),
            Self::Repo(_) | Self::Db(_) | Self::Join(_) => "Internal server error".to_string(),
        }
    }
}

fn not_found_message(entity: EntityKind) -> String {
    let name = entity.as_str();
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => format!("{}{} not found", first.to_uppercase(), chars.as_str()),
        None => "Not found".to_string(),
    }
}

impl From<JsonRejection> for ApiError {
    fn from(value: JsonRejection) -> Self {
        Self::Body(value.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(value: PathRejection) -> Self {
        Self::Path(value.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(
                "event=http_error module=server status=error http_status={} error={self}",
                status.as_u16()
            );
        } else {
            warn!(
                "event=http_error module=server status=error http_status={}",
                status.as_u16()
            );
        }
        (status, Json(Envelope::error(self.public_message()))).into_response()
    }
}
