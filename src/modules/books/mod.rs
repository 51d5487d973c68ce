pub mod isbn;
pub mod models;
pub mod repository;
pub mod routes;
pub mod service;

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use bookstore_authz::TokenService;
use bookstore_kernel::{InitCtx, Migration, Module};

use routes::BooksState;
use service::BookService;

pub const MIGRATIONS: [Migration; 2] = [
    Migration {
        id: "001_create_books",
        up: r#"
            CREATE TABLE IF NOT EXISTS books (
                id             TEXT PRIMARY KEY NOT NULL,
                title          TEXT NOT NULL,
                published_year TEXT NOT NULL,
                isbn           TEXT NOT NULL
            );
            "#,
    },
    Migration {
        id: "002_create_author_books",
        up: r#"
            CREATE TABLE IF NOT EXISTS author_books (
                author_id TEXT NOT NULL REFERENCES authors(id),
                book_id   TEXT NOT NULL REFERENCES books(id)
            );
            CREATE INDEX IF NOT EXISTS author_books_book_id ON author_books(book_id);
            CREATE INDEX IF NOT EXISTS author_books_author_id ON author_books(author_id);
            "#,
    },
];

/// Books and their links to authors.
pub struct BooksModule {
    state: BooksState,
}

impl BooksModule {
    pub fn new(service: Arc<BookService>, tokens: Arc<TokenService>) -> Self {
        Self {
            state: BooksState { service, tokens },
        }
    }
}

#[async_trait]
impl Module for BooksModule {
    fn name(&self) -> &'static str {
        "book"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        let books = self.state.service.count().await?;
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            books,
            "book module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        routes::router(self.state.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        Some(serde_json::json!({
            "paths": {
                "/": {
                    "get": {
                        "summary": "List books by author",
                        "tags": ["Books"],
                        "parameters": [
                            { "name": "author_id", "in": "query", "schema": { "type": "string" } },
                            { "name": "name", "in": "query", "description": "Case-sensitive author name fragment", "schema": { "type": "string" } },
                            { "name": "page", "in": "query", "schema": { "type": "integer", "default": 1 } },
                            { "name": "page_size", "in": "query", "schema": { "type": "integer", "default": 10 } }
                        ],
                        "responses": {
                            "200": { "description": "One page of books", "content": { "application/json": { "schema": { "$ref": "#/components/schemas/Envelope" } } } },
                            "400": { "description": "Query failed", "content": { "application/json": { "schema": { "$ref": "#/components/schemas/Envelope" } } } }
                        }
                    },
                    "post": {
                        "summary": "Create a book",
                        "tags": ["Books"],
                        "security": [{ "bearer": [] }],
                        "requestBody": { "required": true, "content": { "application/json": { "schema": { "$ref": "#/components/schemas/CreateBook" } } } },
                        "responses": {
                            "201": { "description": "Created", "content": { "application/json": { "schema": { "$ref": "#/components/schemas/Envelope" } } } },
                            "400": { "description": "Invalid input or unknown author" },
                            "401": { "description": "Missing or invalid token" }
                        }
                    },
                    "put": {
                        "summary": "Rename a book",
                        "tags": ["Books"],
                        "security": [{ "bearer": [] }],
                        "requestBody": { "required": true, "content": { "application/json": { "schema": { "$ref": "#/components/schemas/UpdateBook" } } } },
                        "responses": {
                            "200": { "description": "Updated" },
                            "400": { "description": "Invalid input or unknown book" },
                            "401": { "description": "Missing or invalid token" }
                        }
                    }
                },
                "/{id}": {
                    "get": {
                        "summary": "Fetch a book with its authors",
                        "tags": ["Books"],
                        "parameters": [{ "name": "id", "in": "path", "required": true, "schema": { "type": "string", "format": "uuid" } }],
                        "responses": {
                            "200": { "description": "The book", "content": { "application/json": { "schema": { "$ref": "#/components/schemas/Envelope" } } } },
                            "400": { "description": "Unknown book" }
                        }
                    },
                    "delete": {
                        "summary": "Delete a book and its author links",
                        "tags": ["Books"],
                        "security": [{ "bearer": [] }],
                        "parameters": [{ "name": "id", "in": "path", "required": true, "schema": { "type": "string", "format": "uuid" } }],
                        "responses": {
                            "200": { "description": "Deleted" },
                            "401": { "description": "Missing or invalid token" },
                            "403": { "description": "Book does not exist" }
                        }
                    }
                }
            },
            "components": {
                "schemas": {
                    "Book": {
                        "type": "object",
                        "properties": {
                            "id": { "type": "string", "format": "uuid" },
                            "title": { "type": "string" },
                            "published_year": { "type": "string", "format": "date-time" },
                            "isbn": { "type": "string", "example": "978-123456789-10" },
                            "author": { "type": "array", "items": { "$ref": "#/components/schemas/AuthorSummary" } }
                        },
                        "required": ["id", "title", "published_year", "isbn", "author"]
                    },
                    "BookSummary": {
                        "type": "object",
                        "properties": {
                            "id": { "type": "string", "format": "uuid" },
                            "title": { "type": "string" },
                            "published_year": { "type": "string", "format": "date-time" },
                            "isbn": { "type": "string" }
                        },
                        "required": ["id", "title", "published_year", "isbn"]
                    },
                    "CreateBook": {
                        "type": "object",
                        "properties": {
                            "title": { "type": "string" },
                            "author_id": { "type": "array", "items": { "type": "string", "format": "uuid" }, "minItems": 1 }
                        },
                        "required": ["title", "author_id"]
                    },
                    "UpdateBook": {
                        "type": "object",
                        "properties": {
                            "id": { "type": "string", "format": "uuid" },
                            "title": { "type": "string" }
                        },
                        "required": ["id", "title"]
                    }
                }
            }
        }))
    }

    fn migrations(&self) -> Vec<Migration> {
        MIGRATIONS.to_vec()
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "book module stopped");
        Ok(())
    }
}
