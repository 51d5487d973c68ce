//! HTTP handlers for `/api/book`.

use std::sync::Arc;

use axum::{
    extract::{FromRef, Path, State},
    routing::get,
    Router,
};
use bookstore_authz::TokenService;
use bookstore_http::{ApiResponse, AppError, BearerUser, Empty, JsonBody, QueryParams};

use super::models::{Book, BookFilter, CreateBook, UpdateBook};
use super::service::BookService;
use crate::error::ServiceError;

#[derive(Clone, FromRef)]
pub struct BooksState {
    pub service: Arc<BookService>,
    pub tokens: Arc<TokenService>,
}

pub fn router(state: BooksState) -> Router {
    Router::new()
        .route("/", get(list_books).post(create_book).put(update_book))
        .route("/{id}", get(find_book).delete(delete_book))
        .with_state(state)
}

async fn create_book(
    user: BearerUser,
    State(service): State<Arc<BookService>>,
    JsonBody(input): JsonBody<CreateBook>,
) -> Result<ApiResponse<Book>, AppError> {
    let book = service
        .create(input)
        .await
        .map_err(|e| e.respond("Failed get object post"))?;

    tracing::debug!(user_id = %user.user_id, book_id = %book.id, "create book handled");
    Ok(ApiResponse::created("Created", book))
}

async fn update_book(
    user: BearerUser,
    State(service): State<Arc<BookService>>,
    JsonBody(input): JsonBody<UpdateBook>,
) -> Result<ApiResponse<Book>, AppError> {
    let book = service
        .update(input)
        .await
        .map_err(|e| e.respond("Failed get object post"))?;

    tracing::debug!(user_id = %user.user_id, book_id = %book.id, "update book handled");
    Ok(ApiResponse::ok("Ok", book))
}

async fn delete_book(
    user: BearerUser,
    State(service): State<Arc<BookService>>,
    Path(id): Path<String>,
) -> Result<ApiResponse<Empty>, AppError> {
    if !service.is_allowed_to_edit(&id).await {
        return Err(ServiceError::Forbidden("You are not the owner".to_string())
            .respond("You dont have permission"));
    }

    service
        .delete(&id)
        .await
        .map_err(|e| e.respond("Failed deleted book"))?;

    tracing::debug!(user_id = %user.user_id, book_id = %id, "delete book handled");
    Ok(ApiResponse::ok("Ok", Empty::default()))
}

async fn find_book(
    State(service): State<Arc<BookService>>,
    Path(id): Path<String>,
) -> Result<ApiResponse<Book>, AppError> {
    let book = service
        .find_by_id(&id)
        .await
        .map_err(|e| e.respond("Failed fetch book"))?;
    Ok(ApiResponse::ok("Ok", book))
}

async fn list_books(
    State(service): State<Arc<BookService>>,
    QueryParams(filter): QueryParams<BookFilter>,
) -> Result<ApiResponse<Vec<Book>>, AppError> {
    let (books, total) = service
        .find(&filter)
        .await
        .map_err(|e| e.respond("Failed fetch book"))?;
    Ok(ApiResponse::paged("Ok", books, total))
}
