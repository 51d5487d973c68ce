//! HTTP handlers for `/api/author`.

use std::sync::Arc;

use axum::{
    extract::{FromRef, Path, State},
    routing::get,
    Router,
};
use bookstore_authz::TokenService;
use bookstore_http::{ApiResponse, AppError, BearerUser, Empty, JsonBody, QueryParams};

use super::models::{Author, AuthorFilter, CreateAuthor, UpdateAuthor};
use super::service::AuthorService;
use crate::error::ServiceError;

#[derive(Clone, FromRef)]
pub struct AuthorsState {
    pub service: Arc<AuthorService>,
    pub tokens: Arc<TokenService>,
}

pub fn router(state: AuthorsState) -> Router {
    Router::new()
        .route("/", get(list_authors).post(create_author).put(update_author))
        .route("/{id}", get(find_author).delete(delete_author))
        .with_state(state)
}

async fn create_author(
    user: BearerUser,
    State(service): State<Arc<AuthorService>>,
    JsonBody(input): JsonBody<CreateAuthor>,
) -> Result<ApiResponse<Author>, AppError> {
    let author = service
        .create(input)
        .await
        .map_err(|e| e.respond("Failed create author"))?;

    tracing::debug!(user_id = %user.user_id, author_id = %author.id, "create author handled");
    Ok(ApiResponse::created("success", author))
}

async fn update_author(
    _user: BearerUser,
    State(service): State<Arc<AuthorService>>,
    JsonBody(input): JsonBody<UpdateAuthor>,
) -> Result<ApiResponse<Author>, AppError> {
    let author = service
        .update(input)
        .await
        .map_err(|e| e.respond("Failed updated author"))?;
    Ok(ApiResponse::ok("Ok", author))
}

async fn delete_author(
    user: BearerUser,
    State(service): State<Arc<AuthorService>>,
    Path(id): Path<String>,
) -> Result<ApiResponse<Empty>, AppError> {
    if !service.is_allowed_to_edit(&id).await {
        return Err(ServiceError::Forbidden("You are not the owner".to_string())
            .respond("You dont have permission"));
    }

    service
        .delete(&id)
        .await
        .map_err(|e| e.respond("Failed deleted author"))?;

    tracing::debug!(user_id = %user.user_id, author_id = %id, "delete author handled");
    Ok(ApiResponse::ok("Ok", Empty::default()))
}

async fn find_author(
    State(service): State<Arc<AuthorService>>,
    Path(id): Path<String>,
) -> Result<ApiResponse<Author>, AppError> {
    let author = service
        .find_by_id(&id)
        .await
        .map_err(|e| e.respond("Failed fetch author"))?;
    Ok(ApiResponse::ok("Ok", author))
}

async fn list_authors(
    State(service): State<Arc<AuthorService>>,
    QueryParams(filter): QueryParams<AuthorFilter>,
) -> Result<ApiResponse<Vec<Author>>, AppError> {
    let (authors, total) = service
        .find(&filter)
        .await
        .map_err(|e| e.respond("Failed fetch author"))?;
    Ok(ApiResponse::paged("Ok", authors, total))
}
