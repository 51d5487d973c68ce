//! Small helpers shared by the entity services.

use std::future::Future;
use std::time::Duration;

use uuid::Uuid;

use crate::error::ServiceError;

/// Run `operation`, failing with [`ServiceError::Timeout`] once `limit` elapses.
pub async fn bounded<T, E, F>(limit: Duration, operation: F) -> Result<T, ServiceError>
where
    F: Future<Output = Result<T, E>>,
    E: Into<ServiceError>,
{
    match tokio::time::timeout(limit, operation).await {
        Ok(result) => result.map_err(Into::into),
        Err(_) => Err(ServiceError::Timeout(limit)),
    }
}

/// Parse a client-supplied identifier.
pub fn parse_id(raw: &str, what: &str) -> Result<Uuid, ServiceError> {
    Uuid::parse_str(raw.trim())
        .map_err(|_| ServiceError::validation(format!("invalid {what} id: {raw}")))
}

/// `None` for absent or blank input.
pub fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}
