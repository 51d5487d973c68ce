pub mod models;
pub mod repository;
pub mod routes;
pub mod service;

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use bookstore_kernel::{InitCtx, Migration, Module};

use service::UserService;

pub const MIGRATIONS: [Migration; 1] = [Migration {
    id: "001_create_users",
    up: r#"
        CREATE TABLE IF NOT EXISTS users (
            id         TEXT PRIMARY KEY NOT NULL,
            email      TEXT NOT NULL UNIQUE,
            password   TEXT NOT NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );
        "#,
}];

/// Registration and login.
pub struct UsersModule {
    service: Arc<UserService>,
}

impl UsersModule {
    pub fn new(service: Arc<UserService>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl Module for UsersModule {
    fn name(&self) -> &'static str {
        "user"
    }

    async fn init(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        let users = self.service.count().await?;
        tracing::info!(module = self.name(), users, "user module initialized");
        Ok(())
    }

    fn routes(&self) -> Router {
        routes::router(Arc::clone(&self.service))
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        Some(serde_json::json!({
            "paths": {
                "/register": {
                    "post": {
                        "summary": "Register an account",
                        "tags": ["Users"],
                        "requestBody": { "required": true, "content": { "application/json": { "schema": { "$ref": "#/components/schemas/AuthRequest" } } } },
                        "responses": {
                            "201": { "description": "Registered, token included", "content": { "application/json": { "schema": { "$ref": "#/components/schemas/Envelope" } } } },
                            "400": { "description": "Invalid input" },
                            "409": { "description": "Email already registered" }
                        }
                    }
                },
                "/login": {
                    "post": {
                        "summary": "Exchange credentials for a token",
                        "tags": ["Users"],
                        "requestBody": { "required": true, "content": { "application/json": { "schema": { "$ref": "#/components/schemas/AuthRequest" } } } },
                        "responses": {
                            "200": { "description": "Logged in, token included", "content": { "application/json": { "schema": { "$ref": "#/components/schemas/Envelope" } } } },
                            "401": { "description": "Invalid credential" }
                        }
                    }
                }
            },
            "components": {
                "schemas": {
                    "AuthRequest": {
                        "type": "object",
                        "properties": {
                            "email": { "type": "string", "format": "email" },
                            "password": { "type": "string", "minLength": 6 }
                        },
                        "required": ["email", "password"]
                    },
                    "User": {
                        "type": "object",
                        "properties": {
                            "id": { "type": "string", "format": "uuid" },
                            "email": { "type": "string", "format": "email" },
                            "created_at": { "type": "string", "format": "date-time" },
                            "updated_at": { "type": "string", "format": "date-time" },
                            "token": { "type": "string" }
                        },
                        "required": ["id", "email", "created_at", "updated_at"]
                    }
                }
            }
        }))
    }

    fn migrations(&self) -> Vec<Migration> {
        MIGRATIONS.to_vec()
    }
}
