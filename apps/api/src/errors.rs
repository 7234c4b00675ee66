use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::latex::{CompilerError, TemplateId};
use crate::render::RenderError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unprocessable entity: {0}")]
    UnprocessableEntity(String),

    #[error("Unknown template: {0}")]
    UnknownTemplate(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Render error: {0}")]
    Render(#[from] RenderError),
}

impl From<CompilerError> for AppError {
    fn from(e: CompilerError) -> Self {
        match e {
            CompilerError::Validation(msg) => AppError::Validation(msg),
            CompilerError::UnknownTemplate(id) => AppError::UnknownTemplate(id),
        }
    }
}

/// Maps axum's body rejections into the JSON envelope. The serde message is only logged.
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!("Rejected request body: {}", rejection.body_text());
        match rejection {
            JsonRejection::JsonDataError(_) => AppError::UnprocessableEntity(
                "Request body does not match the resume request shape".to_string(),
            ),
            JsonRejection::JsonSyntaxError(_) => {
                AppError::BadRequest("Request body is not valid JSON".to_string())
            }
            JsonRejection::MissingJsonContentType(_) => AppError::BadRequest(
                "Expected request with `Content-Type: application/json`".to_string(),
            ),
            _ => AppError::BadRequest("Request body could not be read".to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::UnprocessableEntity(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "UNPROCESSABLE_ENTITY",
                msg.clone(),
            ),
            AppError::UnknownTemplate(id) => (
                StatusCode::BAD_REQUEST,
                "UNKNOWN_TEMPLATE",
                format!(
                    "Unknown template '{id}'. Valid templates: {}",
                    TemplateId::valid_ids()
                ),
            ),
            AppError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "UNAUTHORIZED",
                "Authentication required".to_string(),
            ),
            AppError::Render(e) => {
                // Renderer output can echo user content; it stays in the server log.
                tracing::error!("Render error: {e}");
                (
                    StatusCode::BAD_GATEWAY,
                    "RENDER_ERROR",
                    "The resume could not be rendered".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
