use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::deal_context::{ContextError, FormatError};
use crate::llm_client::LlmError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    /// The deal does not exist or belongs to someone else. Never distinguished.
    #[error("Deal not found or access denied")]
    AccessDenied,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("LLM error: {0}")]
    Llm(String),

    #[error("LLM authentication failed: {0}")]
    LlmAuthentication(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<ContextError> for AppError {
    fn from(err: ContextError) -> Self {
        match err {
            ContextError::AccessDenied => AppError::AccessDenied,
            ContextError::Inconsistent { deal_id } => AppError::Internal(anyhow::anyhow!(
                "deal {deal_id} passed authorization but could not be re-read"
            )),
            ContextError::Store(e) => AppError::Database(e),
        }
    }
}

impl From<FormatError> for AppError {
    fn from(err: FormatError) -> Self {
        AppError::Internal(anyhow::Error::new(err).context("Failed to format deal context"))
    }
}

impl From<LlmError> for AppError {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::Authentication(msg) => AppError::LlmAuthentication(msg),
            other => AppError::Llm(other.to_string()),
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::Validation(err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::AccessDenied => (
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
                "Deal not found or access denied.".to_string(),
            ),
            AppError::Database(e) => {
                tracing::error!("Database error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "DATABASE_ERROR",
                    "A database error occurred".to_string(),
                )
            }
            AppError::Llm(msg) => {
                tracing::error!("LLM error: {msg}");
                (
                    StatusCode::BAD_GATEWAY,
                    "LLM_ERROR",
                    "An AI processing error occurred".to_string(),
                )
            }
            AppError::LlmAuthentication(msg) => {
                tracing::error!("LLM authentication error: {msg}");
                (
                    StatusCode::BAD_GATEWAY,
                    "LLM_AUTHENTICATION_ERROR",
                    "LLM authentication failed. Please check your API key configuration."
                        .to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "success": false,
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
