use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::fmt;
use storage::error::{EngineError, StorageError};
use validator::ValidationErrors;

/// Web layer errors
#[derive(Debug)]
pub enum WebError {
    Engine(EngineError),
    Validation(ValidationErrors),
    BadRequest(String),
    Unauthorized,
}

impl fmt::Display for WebError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Engine(e) => write!(f, "Engine error: {}", e),
            Self::Validation(e) => write!(f, "Validation error: {}", e),
            Self::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            Self::Unauthorized => write!(f, "Unauthorized"),
        }
    }
}

fn storage_response(error: &StorageError) -> (StatusCode, serde_json::Value) {
    match error {
        StorageError::NotFound => (
            StatusCode::NOT_FOUND,
            json!({
                "error": "Resource not found"
            }),
        ),
        StorageError::ConstraintViolation(msg) => (
            StatusCode::CONFLICT,
            json!({
                "error": msg
            }),
        ),
        e => {
            tracing::error!("Storage error: {:?}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({
                    "error": "An internal error occurred"
                }),
            )
        }
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let (status_code, body) = match &self {
            Self::Engine(EngineError::Store(e)) => storage_response(e),
            Self::Engine(EngineError::Validation(msg)) => (
                StatusCode::BAD_REQUEST,
                json!({
                    "error": msg
                }),
            ),
            Self::Engine(EngineError::InvalidRuleParameters(msg)) => (
                StatusCode::BAD_REQUEST,
                json!({
                    "error": "Class is not configured for its rule",
                    "details": [msg]
                }),
            ),
            Self::Engine(EngineError::NotFound(msg)) => (
                StatusCode::NOT_FOUND,
                json!({
                    "error": msg
                }),
            ),
            Self::Validation(errors) => {
                let field_errors: Vec<String> = errors
                    .field_errors()
                    .iter()
                    .flat_map(|(field, errors)| {
                        errors.iter().map(move |e| {
                            format!(
                                "{}: {}",
                                field,
                                e.message
                                    .as_ref()
                                    .map(|m| m.to_string())
                                    .unwrap_or_else(|| e.code.to_string())
                            )
                        })
                    })
                    .collect();

                (
                    StatusCode::BAD_REQUEST,
                    json!({
                        "error": "Validation failed",
                        "details": field_errors
                    }),
                )
            }
            Self::BadRequest(msg) => (
                StatusCode::BAD_REQUEST,
                json!({
                    "error": msg
                }),
            ),
            Self::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                json!({
                    "error": "Unauthorized"
                }),
            ),
        };

        (status_code, Json(body)).into_response()
    }
}

impl From<EngineError> for WebError {
    fn from(error: EngineError) -> Self {
        Self::Engine(error)
    }
}

impl From<ValidationErrors> for WebError {
    fn from(error: ValidationErrors) -> Self {
        Self::Validation(error)
    }
}

