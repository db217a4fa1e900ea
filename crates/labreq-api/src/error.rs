use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use labreq_auth::error::AuthError;
use labreq_core::error::CoreError;
use labreq_export::error::ExportError;
use labreq_form::error::FormError;
use labreq_form::validate::ValidationError;
use labreq_storage::error::StorageError;
use serde::Serialize;

/// Unified API error type for all route handlers.
#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    BadRequest(String),
    Validation(Vec<ValidationError>),
    Unauthorized(String),
    Conflict(String),
    Internal(String),
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    errors: Vec<ValidationError>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message, errors) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg, Vec::new()),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg, Vec::new()),
            ApiError::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                "validation failed".to_string(),
                errors,
            ),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg, Vec::new()),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg, Vec::new()),
            ApiError::Internal(msg) => {
                tracing::error!("internal error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                    Vec::new(),
                )
            }
        };

        (
            status,
            Json(ErrorBody {
                error: message,
                errors,
            }),
        )
            .into_response()
    }
}

impl ApiError {
    pub fn requisition_not_found() -> Self {
        ApiError::NotFound("requisition not found".to_string())
    }
}

impl From<StorageError> for ApiError {
    fn from(e: StorageError) -> Self {
        match e {
            StorageError::NotFound { .. } => ApiError::requisition_not_found(),
            StorageError::MissingUserId => ApiError::Unauthorized(e.to_string()),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<FormError> for ApiError {
    fn from(e: FormError) -> Self {
        match e {
            FormError::Validation(errors) => ApiError::Validation(errors),
            FormError::Unauthenticated => ApiError::Unauthorized(e.to_string()),
            FormError::NotOwner => ApiError::requisition_not_found(),
            FormError::AlreadySubmitted => ApiError::Conflict(e.to_string()),
            FormError::Core(core) => core.into(),
            FormError::Persistence(storage) => storage.into(),
        }
    }
}

impl From<CoreError> for ApiError {
    fn from(e: CoreError) -> Self {
        ApiError::BadRequest(e.to_string())
    }
}

impl From<AuthError> for ApiError {
    fn from(e: AuthError) -> Self {
        ApiError::Unauthorized(e.to_string())
    }
}

impl From<ExportError> for ApiError {
    fn from(e: ExportError) -> Self {
        ApiError::Internal(e.to_string())
    }
}

impl From<tokio::task::JoinError> for ApiError {
    fn from(e: tokio::task::JoinError) -> Self {
        ApiError::Internal(e.to_string())
    }
}
