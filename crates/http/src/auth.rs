//! Bearer token gate for mutating endpoints.

use std::sync::Arc;

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};
use bookstore_authz::TokenService;
use uuid::Uuid;

use crate::error::AppError;

/// The authenticated caller.
///
/// Place it first in a handler's argument list so a missing or invalid
/// token is rejected before the body is bound.
#[derive(Debug, Clone, Copy)]
pub struct BearerUser {
    pub user_id: Uuid,
}

/// Accepts `Bearer <token>` or a bare token.
fn token_from(parts: &Parts) -> Option<&str> {
    let value = parts.headers.get(AUTHORIZATION)?.to_str().ok()?.trim();
    let token = value.strip_prefix("Bearer ").unwrap_or(value).trim();
    (!token.is_empty()).then_some(token)
}

impl<S> FromRequestParts<S> for BearerUser
where
    S: Send + Sync,
    Arc<TokenService>: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token = token_from(parts)
            .ok_or_else(|| AppError::unauthorized("Failed to process request", "No token found"))?;

        let tokens = Arc::<TokenService>::from_ref(state);
        let claims = tokens.verify(token).map_err(|e| {
            tracing::debug!(error = %e, "rejected bearer token");
            AppError::unauthorized("Token not valid", e)
        })?;
        let user_id = claims
            .user_id()
            .map_err(|e| AppError::unauthorized("Token not valid", e))?;

        Ok(Self { user_id })
    }
}
