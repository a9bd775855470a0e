use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts, Path, Query, Request},
    http::request::Parts,
    Json,
};
use serde::de::DeserializeOwned;

use crate::error::{ApiError, ErrorCode, FieldError};

// Wrappers over axum's body/query/path extractors so malformed input gets
// the standard `{status:false, errors:[...]}` envelope instead of axum's
// plain-text rejections.

fn rejection(message: String) -> ApiError {
    ApiError::invalid_input(vec![FieldError::new(ErrorCode::InvalidInput, &message)])
}

#[derive(Debug)]
pub struct ApiJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ApiJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(ApiJson(value)),
            Err(rej) => Err(rejection(rej.body_text())),
        }
    }
}

#[derive(Debug)]
pub struct ApiQuery<T>(pub T);

#[async_trait]
impl<S, T> FromRequestParts<S> for ApiQuery<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Query::<T>::from_request_parts(parts, state).await {
            Ok(Query(value)) => Ok(ApiQuery(value)),
            Err(rej) => Err(rejection(rej.body_text())),
        }
    }
}

#[derive(Debug)]
pub struct ApiPath<T>(pub T);

#[async_trait]
impl<S, T> FromRequestParts<S> for ApiPath<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Send,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Path::<T>::from_request_parts(parts, state).await {
            Ok(Path(value)) => Ok(ApiPath(value)),
            Err(rej) => Err(rejection(rej.body_text())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pagination::PageParams;
    use axum::{body::Body, http::StatusCode};

    #[tokio::test]
    async fn malformed_json_body_uses_the_error_envelope() {
        let req = axum::http::Request::builder()
            .method("POST")
            .uri("/")
            .header(axum::http::header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let err = ApiJson::<serde_json::Value>::from_request(req, &())
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.errors[0].code, ErrorCode::InvalidInput);
    }

    #[tokio::test]
    async fn missing_json_content_type_uses_the_error_envelope() {
        let req = axum::http::Request::builder()
            .method("POST")
            .uri("/")
            .body(Body::from("{}"))
            .unwrap();
        let err = ApiJson::<serde_json::Value>::from_request(req, &())
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn malformed_query_param_uses_the_error_envelope() {
        let (mut parts, _) = axum::http::Request::builder()
            .uri("/?page=abc")
            .body(())
            .unwrap()
            .into_parts();
        let err = ApiQuery::<PageParams>::from_request_parts(&mut parts, &())
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.errors[0].code, ErrorCode::InvalidInput);
    }

    #[tokio::test]
    async fn well_formed_query_still_extracts() {
        let (mut parts, _) = axum::http::Request::builder()
            .uri("/?page=2&page_size=5")
            .body(())
            .unwrap()
            .into_parts();
        let ApiQuery(params) = ApiQuery::<PageParams>::from_request_parts(&mut parts, &())
            .await
            .expect("extract");
        assert_eq!(params.page, 2);
        assert_eq!(params.page_size, 5);
    }
}
