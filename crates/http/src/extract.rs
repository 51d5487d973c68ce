//! Request extractors shared by module handlers.

use axum::extract::{FromRequest, FromRequestParts};

use crate::error::AppError;

/// `axum::Json` whose rejection renders as an envelope.
#[derive(Debug, Clone, Copy, Default, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct JsonBody<T>(pub T);

/// `axum::extract::Query` whose rejection renders as an envelope.
#[derive(Debug, Clone, Copy, Default, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct QueryParams<T>(pub T);

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request, http::StatusCode, response::IntoResponse};
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Payload {
        title: String,
    }

    fn request(body: &'static str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/")
            .header("content-type", "application/json")
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn valid_body_is_bound() {
        let JsonBody(payload) = JsonBody::<Payload>::from_request(request(r#"{"title":"Dune"}"#), &())
            .await
            .unwrap();
        assert_eq!(payload.title, "Dune");
    }

    #[tokio::test]
    async fn malformed_body_is_a_validation_error() {
        let rejection = JsonBody::<Payload>::from_request(request("{\"title\":"), &())
            .await
            .unwrap_err();

        assert!(matches!(rejection, AppError::Validation { .. }));
        assert_eq!(rejection.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[derive(Debug, Deserialize)]
    struct Paging {
        page: Option<String>,
    }

    async fn query(uri: &str) -> Result<QueryParams<Paging>, AppError> {
        let (mut parts, _) = Request::builder().uri(uri).body(()).unwrap().into_parts();
        QueryParams::<Paging>::from_request_parts(&mut parts, &()).await
    }

    #[tokio::test]
    async fn query_string_is_bound() {
        let QueryParams(paging) = query("/?page=2").await.unwrap();
        assert_eq!(paging.page.as_deref(), Some("2"));
    }

    #[tokio::test]
    async fn repeated_query_key_is_a_validation_error() {
        let rejection = query("/?page=1&page=2").await.unwrap_err();
        assert!(matches!(rejection, AppError::Validation { .. }));
    }
}
