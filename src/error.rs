use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

/// Structured validation errors with field-level error mapping
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ValidationErrors {
    Single { field: String, message: String },
    Multiple { fields: HashMap<String, String> },
}

impl ValidationErrors {
    pub fn single(field: &str, message: &str) -> Self {
        ValidationErrors::Single {
            field: field.to_string(),
            message: message.to_string(),
        }
    }

    fn into_fields(self) -> HashMap<String, String> {
        match self {
            ValidationErrors::Single { field, message } => HashMap::from([(field, message)]),
            ValidationErrors::Multiple { fields } => fields,
        }
    }
}

/// The custom error type for the application.
#[derive(Debug, Error)]
pub enum Error {
    /// An error originating from the sqlx library.
    #[error("SQLx error: {0}")]
    Sqlx(#[from] sqlx::Error),

    /// A validation error with field-level details.
    #[error("Datos de entrada inválidos")]
    Validation(ValidationErrors),

    /// A not found error (resource does not exist).
    #[error("No encontrado: {0}")]
    NotFound(String),

    /// An authentication error (missing/invalid credentials or token).
    #[error("No autenticado: {0}")]
    Authentication(String),

    /// A forbidden error (authenticated but lacking permission).
    #[error("Acceso prohibido: {0}")]
    Forbidden(String),

    /// A conflict error (duplicate email, overlapping reservation).
    #[error("Conflicto: {0}")]
    Conflict(String),

    /// A configuration error.
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// An internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// A type alias for `Result<T, Error>` to simplify function signatures.
pub type Result<T> = std::result::Result<T, Error>;

/// Convert custom Error to HTTP response
///
/// Client errors are surfaced as `{"status":"fail", "message":...}` and server
/// errors as `{"status":"error", ...}` with a generic message, matching the
/// envelope the API has always spoken. Validation failures additionally carry
/// a field -> message map under `errors`.
impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = match self {
            Error::Validation(_) => StatusCode::BAD_REQUEST,
            Error::Authentication(_) => StatusCode::UNAUTHORIZED,
            Error::Forbidden(_) => StatusCode::FORBIDDEN,
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::Conflict(_) => StatusCode::CONFLICT,
            Error::Sqlx(_) | Error::Config(_) | Error::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = match self {
            Error::Validation(errors) => {
                serde_json::json!({
                    "status": "fail",
                    "message": "Datos de entrada inválidos",
                    "errors": errors.into_fields(),
                })
            }
            Error::Authentication(msg)
            | Error::Forbidden(msg)
            | Error::NotFound(msg)
            | Error::Conflict(msg) => {
                serde_json::json!({
                    "status": "fail",
                    "message": msg,
                })
            }
            Error::Sqlx(e) => {
                tracing::error!(error = %e, "database error");
                serde_json::json!({
                    "status": "error",
                    "message": "Error interno del servidor",
                })
            }
            Error::Config(e) => {
                tracing::error!(error = %e, "configuration error");
                serde_json::json!({
                    "status": "error",
                    "message": "Error interno del servidor",
                })
            }
            Error::Internal(msg) => {
                tracing::error!(error = %msg, "internal error");
                serde_json::json!({
                    "status": "error",
                    "message": "Error interno del servidor",
                })
            }
        };

        (status, Json(body)).into_response()
    }
}
