//! Failures raised by the entity services.

use std::time::Duration;

use bookstore_http::AppError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0}")]
    Validation(String),

    #[error("record not found")]
    NotFound,

    #[error("{0}")]
    Duplicate(String),

    #[error("Invalid Credential")]
    InvalidCredential,

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    Persistence(#[source] sqlx::Error),

    #[error("operation timed out after {0:?}")]
    Timeout(Duration),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl From<sqlx::Error> for ServiceError {
    fn from(error: sqlx::Error) -> Self {
        match error {
            sqlx::Error::RowNotFound => ServiceError::NotFound,
            other => ServiceError::Persistence(other),
        }
    }
}

impl ServiceError {
    pub fn validation(detail: impl Into<String>) -> Self {
        ServiceError::Validation(detail.into())
    }

    /// Render as an HTTP error headed by `message`.
    pub fn respond(self, message: &str) -> AppError {
        match self {
            ServiceError::Validation(detail) => AppError::validation(message, detail),
            ServiceError::Duplicate(detail) => AppError::conflict(message, detail),
            ServiceError::InvalidCredential => {
                AppError::unauthorized("Please check again your credential", "Invalid Credential")
            }
            ServiceError::Forbidden(detail) => AppError::forbidden("You dont have permission", detail),
            ServiceError::Internal(error) => AppError::Internal(error.context(message.to_string())),
            other @ (ServiceError::NotFound
            | ServiceError::Persistence(_)
            | ServiceError::Timeout(_)) => AppError::bad_request(message, other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn missing_row_is_not_found() {
        assert!(matches!(
            ServiceError::from(sqlx::Error::RowNotFound),
            ServiceError::NotFound
        ));
        assert!(matches!(
            ServiceError::from(sqlx::Error::PoolTimedOut),
            ServiceError::Persistence(_)
        ));
    }

    #[test]
    fn status_codes_follow_the_error_kind() {
        let cases = [
            (ServiceError::validation("title is required"), StatusCode::BAD_REQUEST),
            (ServiceError::NotFound, StatusCode::BAD_REQUEST),
            (ServiceError::Timeout(Duration::from_secs(1)), StatusCode::BAD_REQUEST),
            (ServiceError::Duplicate("Duplicate email".into()), StatusCode::CONFLICT),
            (ServiceError::InvalidCredential, StatusCode::UNAUTHORIZED),
            (ServiceError::Forbidden("You are not the owner".into()), StatusCode::FORBIDDEN),
            (
                ServiceError::Internal(anyhow::anyhow!("hash failed")),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, status) in cases {
            assert_eq!(error.respond("Failed").status_code(), status);
        }
    }

    #[test]
    fn not_found_detail_is_carried() {
        match ServiceError::NotFound.respond("Failed fetch book") {
            AppError::BadRequest { message, details } => {
                assert_eq!(message, "Failed fetch book");
                assert_eq!(details, vec!["record not found"]);
            }
            other => panic!("expected BadRequest, got {other:?}"),
        }
    }
}
