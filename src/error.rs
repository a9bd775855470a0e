use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::error;

/// Machine-readable error codes surfaced in response bodies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    InvalidInput,
    ResourceExists,
    ResourceNotFound,
    NotSignedin,
    NotAllowedAccess,
    InvalidCredentials,
    InternalServerError,
}

/// A single field-level error entry.
#[derive(Debug, Clone, Serialize)]
pub struct FieldError {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub param: Option<String>,
    pub message: String,
    pub code: ErrorCode,
}

impl FieldError {
    pub fn new(code: ErrorCode, message: &str) -> Self {
        Self {
            param: None,
            message: message.to_string(),
            code,
        }
    }

    pub fn with_param(param: &str, code: ErrorCode, message: &str) -> Self {
        Self {
            param: Some(param.to_string()),
            message: message.to_string(),
            code,
        }
    }
}

/// Error returned by handlers and extractors. Serializes as
/// `{"status": false, "errors": [...]}` with the matching HTTP status.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub errors: Vec<FieldError>,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    status: bool,
    errors: Vec<FieldError>,
}

impl ApiError {
    pub fn invalid_input(errors: Vec<FieldError>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            errors,
        }
    }

    pub fn resource_exists(param: Option<&str>, message: &str) -> Self {
        let err = match param {
            Some(p) => FieldError::with_param(p, ErrorCode::ResourceExists, message),
            None => FieldError::new(ErrorCode::ResourceExists, message),
        };
        Self {
            status: StatusCode::BAD_REQUEST,
            errors: vec![err],
        }
    }

    pub fn not_found(param: Option<&str>, message: &str) -> Self {
        let err = match param {
            Some(p) => FieldError::with_param(p, ErrorCode::ResourceNotFound, message),
            None => FieldError::new(ErrorCode::ResourceNotFound, message),
        };
        Self {
            status: StatusCode::NOT_FOUND,
            errors: vec![err],
        }
    }

    pub fn not_signedin() -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            errors: vec![FieldError::new(
                ErrorCode::NotSignedin,
                "You need to sign in to proceed.",
            )],
        }
    }

    pub fn not_allowed() -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            errors: vec![FieldError::new(
                ErrorCode::NotAllowedAccess,
                "You are not authorized to perform this action.",
            )],
        }
    }

    pub fn invalid_credentials() -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            errors: vec![FieldError::with_param(
                "password",
                ErrorCode::InvalidCredentials,
                "The credentials you provided are invalid.",
            )],
        }
    }

    /// Logs the underlying cause and returns a generic 500 body.
    pub fn internal(cause: impl std::fmt::Display) -> Self {
        error!(error = %cause, "internal server error");
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            errors: vec![FieldError::new(
                ErrorCode::InternalServerError,
                "Something went wrong.",
            )],
        }
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        Self::internal(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            status: false,
            errors: self.errors,
        };
        (self.status, Json(body)).into_response()
    }
}
