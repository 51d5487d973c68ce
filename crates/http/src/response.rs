//! The JSON envelope every endpoint answers with.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use bookstore_kernel::Pagination;
use serde::{Deserialize, Serialize};

/// `{status, message, errors, data}` plus `total` on list responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub status: bool,
    pub message: String,
    pub errors: Option<Vec<String>>,
    pub data: T,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<Pagination>,
}

/// Serializes as `{}`.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Empty {}

/// Successful response with its status code.
#[derive(Debug)]
pub struct ApiResponse<T> {
    status: StatusCode,
    envelope: Envelope<T>,
}

impl<T: Serialize> ApiResponse<T> {
    fn new(status: StatusCode, message: impl Into<String>, data: T, total: Option<Pagination>) -> Self {
        Self {
            status,
            envelope: Envelope {
                status: true,
                message: message.into(),
                errors: None,
                data,
                total,
            },
        }
    }

    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self::new(StatusCode::OK, message, data, None)
    }

    pub fn created(message: impl Into<String>, data: T) -> Self {
        Self::new(StatusCode::CREATED, message, data, None)
    }

    pub fn paged(message: impl Into<String>, data: T, total: Pagination) -> Self {
        Self::new(StatusCode::OK, message, data, Some(total))
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (self.status, Json(self.envelope)).into_response()
    }
}
