//! Mapping from service errors to HTTP responses.

use super::envelope::Envelope;
use crate::activity::ports::ActivityLogError;
use crate::task::domain::{ParseTaskPriorityError, ParseTaskStatusError};
use crate::task::services::TaskStoreError;
use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Errors surfaced by HTTP handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request was malformed or failed validation.
    #[error("{0}")]
    Validation(String),
    /// The addressed resource does not exist.
    #[error("{0}")]
    NotFound(String),
    /// Storage or another internal component failed.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// The error used for unknown or unparseable task identifiers.
    #[must_use]
    pub fn task_not_found() -> Self {
        Self::NotFound("Task not found".to_owned())
    }

    const fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            Self::Validation(message) | Self::NotFound(message) => message,
            Self::Internal(detail) => {
                tracing::error!(error = %detail, "request failed");
                "Internal Server Error".to_owned()
            }
        };
        (status, Json(Envelope::failure(message))).into_response()
    }
}

impl From<TaskStoreError> for ApiError {
    fn from(err: TaskStoreError) -> Self {
        match err {
            TaskStoreError::Domain(domain) => Self::Validation(domain.to_string()),
            TaskStoreError::NotFound(_) => Self::task_not_found(),
            TaskStoreError::Repository(repository) => Self::Internal(repository.to_string()),
        }
    }
}

impl From<ActivityLogError> for ApiError {
    fn from(err: ActivityLogError) -> Self {
        Self::Internal(err.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Validation(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::Validation(rejection.body_text())
    }
}

impl From<ParseTaskStatusError> for ApiError {
    fn from(err: ParseTaskStatusError) -> Self {
        Self::Validation(err.to_string())
    }
}

impl From<ParseTaskPriorityError> for ApiError {
    fn from(err: ParseTaskPriorityError) -> Self {
        Self::Validation(err.to_string())
    }
}
