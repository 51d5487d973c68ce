pub mod models;
pub mod repository;
pub mod routes;
pub mod service;

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use bookstore_authz::TokenService;
use bookstore_kernel::{InitCtx, Migration, Module};

use routes::AuthorsState;
use service::AuthorService;

pub const MIGRATIONS: [Migration; 1] = [Migration {
    id: "001_create_authors",
    up: r#"
        CREATE TABLE IF NOT EXISTS authors (
            id      TEXT PRIMARY KEY NOT NULL,
            name    TEXT NOT NULL,
            country TEXT NOT NULL
        );
        "#,
}];

/// Authors and the books they are linked to.
pub struct AuthorsModule {
    state: AuthorsState,
}

impl AuthorsModule {
    pub fn new(service: Arc<AuthorService>, tokens: Arc<TokenService>) -> Self {
        Self {
            state: AuthorsState { service, tokens },
        }
    }
}

#[async_trait]
impl Module for AuthorsModule {
    fn name(&self) -> &'static str {
        "author"
    }

    async fn init(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        let authors = self.state.service.count().await?;
        tracing::info!(module = self.name(), authors, "author module initialized");
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
                        "summary": "List authors by book",
                        "tags": ["Authors"],
                        "parameters": [
                            { "name": "book_id", "in": "query", "schema": { "type": "string" } },
                            { "name": "title", "in": "query", "description": "Case-sensitive book title fragment", "schema": { "type": "string" } },
                            { "name": "page", "in": "query", "schema": { "type": "integer", "default": 1 } },
                            { "name": "page_size", "in": "query", "schema": { "type": "integer", "default": 10 } }
                        ],
                        "responses": {
                            "200": { "description": "One page of authors", "content": { "application/json": { "schema": { "$ref": "#/components/schemas/Envelope" } } } }
                        }
                    },
                    "post": {
                        "summary": "Create an author",
                        "tags": ["Authors"],
                        "security": [{ "bearer": [] }],
                        "requestBody": { "required": true, "content": { "application/json": { "schema": { "$ref": "#/components/schemas/CreateAuthor" } } } },
                        "responses": {
                            "201": { "description": "Created" },
                            "400": { "description": "Invalid input" },
                            "401": { "description": "Missing or invalid token" }
                        }
                    },
                    "put": {
                        "summary": "Change an author's name or country",
                        "tags": ["Authors"],
                        "security": [{ "bearer": [] }],
                        "requestBody": { "required": true, "content": { "application/json": { "schema": { "$ref": "#/components/schemas/UpdateAuthor" } } } },
                        "responses": {
                            "200": { "description": "Updated" },
                            "400": { "description": "Invalid input or unknown author" },
                            "401": { "description": "Missing or invalid token" }
                        }
                    }
                },
                "/{id}": {
                    "get": {
                        "summary": "Fetch an author with their books",
                        "tags": ["Authors"],
                        "parameters": [{ "name": "id", "in": "path", "required": true, "schema": { "type": "string", "format": "uuid" } }],
                        "responses": {
                            "200": { "description": "The author" },
                            "400": { "description": "Unknown author" }
                        }
                    },
                    "delete": {
                        "summary": "Delete an author and their book links",
                        "tags": ["Authors"],
                        "security": [{ "bearer": [] }],
                        "parameters": [{ "name": "id", "in": "path", "required": true, "schema": { "type": "string", "format": "uuid" } }],
                        "responses": {
                            "200": { "description": "Deleted" },
                            "401": { "description": "Missing or invalid token" },
                            "403": { "description": "Author does not exist" }
                        }
                    }
                }
            },
            "components": {
                "schemas": {
                    "Author": {
                        "type": "object",
                        "properties": {
                            "id": { "type": "string", "format": "uuid" },
                            "name": { "type": "string" },
                            "country": { "type": "string" },
                            "book": { "type": "array", "items": { "$ref": "#/components/schemas/BookSummary" } }
                        },
                        "required": ["id", "name", "country", "book"]
                    },
                    "AuthorSummary": {
                        "type": "object",
                        "properties": {
                            "id": { "type": "string", "format": "uuid" },
                            "name": { "type": "string" },
                            "country": { "type": "string" }
                        },
                        "required": ["id", "name", "country"]
                    },
                    "CreateAuthor": {
                        "type": "object",
                        "properties": {
                            "name": { "type": "string" },
                            "country": { "type": "string" }
                        },
                        "required": ["name", "country"]
                    },
                    "UpdateAuthor": {
                        "type": "object",
                        "properties": {
                            "id": { "type": "string", "format": "uuid" },
                            "name": { "type": "string" },
                            "country": { "type": "string" }
                        },
                        "required": ["id"]
                    }
                }
            }
        }))
    }

    fn migrations(&self) -> Vec<Migration> {
        MIGRATIONS.to_vec()
    }
}
