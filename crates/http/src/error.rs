//! Error handling for the HTTP layer

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use uuid::Uuid;

use crate::response::{Empty, Envelope};

/// Application error types that map to HTTP responses.
///
/// `message` is the headline shown to clients, `details` the individual
/// error lines placed in the envelope's `errors` array.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("validation error: {message}")]
    Validation {
        message: String,
        details: Vec<String>,
    },

    #[error("bad request: {message}")]
    BadRequest {
        message: String,
        details: Vec<String>,
    },

    #[error("unauthorized: {message}")]
    Unauthorized {
        message: String,
        details: Vec<String>,
    },

    #[error("forbidden: {message}")]
    Forbidden {
        message: String,
        details: Vec<String>,
    },

    #[error("conflict: {message}")]
    Conflict {
        message: String,
        details: Vec<String>,
    },

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

/// Multi-line error text becomes one entry per line.
fn split_lines(detail: impl std::fmt::Display) -> Vec<String> {
    detail
        .to_string()
        .split('\n')
        .map(str::to_string)
        .collect()
}

impl AppError {
    /// Create a validation error
    pub fn validation(message: impl Into<String>, detail: impl std::fmt::Display) -> Self {
        Self::Validation {
            message: message.into(),
            details: split_lines(detail),
        }
    }

    /// Create a bad request error
    pub fn bad_request(message: impl Into<String>, detail: impl std::fmt::Display) -> Self {
        Self::BadRequest {
            message: message.into(),
            details: split_lines(detail),
        }
    }

    /// Create an unauthorized error
    pub fn unauthorized(message: impl Into<String>, detail: impl std::fmt::Display) -> Self {
        Self::Unauthorized {
            message: message.into(),
            details: split_lines(detail),
        }
    }

    /// Create a forbidden error
    pub fn forbidden(message: impl Into<String>, detail: impl std::fmt::Display) -> Self {
        Self::Forbidden {
            message: message.into(),
            details: split_lines(detail),
        }
    }

    /// Create a conflict error
    pub fn conflict(message: impl Into<String>, detail: impl std::fmt::Display) -> Self {
        Self::Conflict {
            message: message.into(),
            details: split_lines(detail),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation { .. } | AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            AppError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            AppError::Forbidden { .. } => StatusCode::FORBIDDEN,
            AppError::Conflict { .. } => StatusCode::CONFLICT,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::validation("Failed to process request", rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::validation("Failed to process request", rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let error_id = Uuid::new_v4();
        let status = self.status_code();

        let (message, details) = match self {
            AppError::Validation { message, details }
            | AppError::BadRequest { message, details }
            | AppError::Unauthorized { message, details }
            | AppError::Forbidden { message, details }
            | AppError::Conflict { message, details } => (message, details),
            AppError::Internal(e) => {
                tracing::error!(error_id = %error_id, error = ?e, "internal error");
                // Internal details stay in the logs for release builds
                let details = if cfg!(debug_assertions) {
                    split_lines(format!("{e:#}"))
                } else {
                    vec!["An internal server error occurred".to_string()]
                };
                ("Failed to process request".to_string(), details)
            }
        };

        tracing::warn!(
            error_id = %error_id,
            status_code = %status.as_u16(),
            message = %message,
            "Request error"
        );

        let body = Envelope {
            status: false,
            message,
            errors: Some(details),
            data: Empty::default(),
            total: None,
        };

        (status, Json(body)).into_response()
    }
}
