//! HTTP handlers for `/api/user`.

use std::sync::Arc;

use axum::{extract::State, routing::post, Router};
use bookstore_http::{ApiResponse, AppError, JsonBody};

use super::models::{AuthRequest, User};
use super::service::UserService;
use crate::error::ServiceError;

pub fn router(service: Arc<UserService>) -> Router {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .with_state(service)
}

async fn register(
    State(service): State<Arc<UserService>>,
    JsonBody(input): JsonBody<AuthRequest>,
) -> Result<ApiResponse<User>, AppError> {
    let user = service.register(input).await.map_err(|e| match e {
        ServiceError::Duplicate(_) | ServiceError::Validation(_) => {
            e.respond("Failed to process request")
        }
        e => e.respond("Failed to created"),
    })?;
    Ok(ApiResponse::created("Created!", user))
}

async fn login(
    State(service): State<Arc<UserService>>,
    JsonBody(input): JsonBody<AuthRequest>,
) -> Result<ApiResponse<User>, AppError> {
    let user = service
        .login(input)
        .await
        .map_err(|e| e.respond("Failed to process request"))?;
    Ok(ApiResponse::ok("Ok!", user))
}
