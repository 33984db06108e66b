use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::fmt;
use storage::error::StorageError;
use validator::ValidationErrors;

/// Web layer errors
#[derive(Debug)]
pub enum WebError {
    Storage(StorageError),
    Validation(ValidationErrors),
    BadRequest(String),
    NotFound,
}

impl WebError {
    /// Machine-readable error class carried in every error body.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Storage(StorageError::NotFound) | Self::NotFound => "not_found",
            Self::Storage(StorageError::ConstraintViolation(_)) => "conflict",
            Self::Storage(StorageError::Invalid { .. }) => "validation",
            Self::Storage(_) => "persistence",
            Self::Validation(_) | Self::BadRequest(_) => "validation",
        }
    }
}

impl fmt::Display for WebError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Storage(e) => write!(f, "Storage error: {}", e),
            Self::Validation(e) => write!(f, "Validation error: {}", e),
            Self::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            Self::NotFound => write!(f, "Resource not found"),
        }
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let status_code = match &self {
            Self::Storage(StorageError::NotFound) => StatusCode::NOT_FOUND,
            Self::Storage(StorageError::ConstraintViolation(_)) => StatusCode::CONFLICT,
            Self::Storage(StorageError::Timeout(_)) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Storage(StorageError::Invalid { .. }) => StatusCode::BAD_REQUEST,
            Self::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound => StatusCode::NOT_FOUND,
        };

        let kind = self.kind();
        let body = match &self {
            Self::Storage(StorageError::NotFound) | Self::NotFound => {
                json!({
                    "kind": kind,
                    "error": "Resource not found"
                })
            }
            Self::Storage(StorageError::ConstraintViolation(msg)) => {
                tracing::warn!("Constraint violation: {}", msg);
                json!({
                    "kind": kind,
                    "error": msg
                })
            }
            Self::Storage(StorageError::Timeout(limit)) => {
                tracing::error!("Store operation timed out after {:?}", limit);
                json!({
                    "kind": kind,
                    "error": "The rating store did not answer in time"
                })
            }
            Self::Storage(StorageError::Invalid { field, message }) => {
                json!({
                    "kind": kind,
                    "error": "Validation failed",
                    "details": [format!("{}: {}", field, message)]
                })
            }
            Self::Storage(e) => {
                tracing::error!("Storage error: {:?}", e);
                json!({
                    "kind": kind,
                    "error": "An internal error occurred"
                })
            }
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

                json!({
                    "kind": kind,
                    "error": "Validation failed",
                    "details": field_errors
                })
            }
            Self::BadRequest(msg) => {
                json!({
                    "kind": kind,
                    "error": msg
                })
            }
        };

        (status_code, Json(body)).into_response()
    }
}

impl From<StorageError> for WebError {
    fn from(error: StorageError) -> Self {
        Self::Storage(error)
    }
}

impl From<ValidationErrors> for WebError {
    fn from(error: ValidationErrors) -> Self {
        Self::Validation(error)
    }
}

impl From<JsonRejection> for WebError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for WebError {
    fn from(rejection: PathRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for WebError {
    fn from(rejection: QueryRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_status_codes() {
        let cases = [
            (WebError::Storage(StorageError::NotFound), StatusCode::NOT_FOUND),
            (
                WebError::Storage(StorageError::ConstraintViolation("dup".into())),
                StatusCode::CONFLICT,
            ),
            (
                WebError::Storage(StorageError::Timeout(Duration::from_secs(5))),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (
                WebError::Storage(StorageError::Corrupt("bad".into())),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (WebError::BadRequest("nope".into()), StatusCode::BAD_REQUEST),
            (
                WebError::Storage(StorageError::invalid("page", "must be positive")),
                StatusCode::BAD_REQUEST,
            ),
        ];

        for (error, expected) in cases {
            assert_eq!(error.into_response().status(), expected);
        }
    }

    #[test]
    fn test_kinds() {
        assert_eq!(WebError::BadRequest(String::new()).kind(), "validation");
        assert_eq!(
            WebError::Storage(StorageError::Timeout(Duration::ZERO)).kind(),
            "persistence"
        );
        assert_eq!(WebError::NotFound.kind(), "not_found");
        assert_eq!(
            WebError::Storage(StorageError::invalid("criterion1", "out of range")).kind(),
            "validation"
        );
    }
}
