//! Axum route handlers for the Resume API.

use async_trait::async_trait;
use axum::{
    extract::{rejection::JsonRejection, FromRequestParts, State},
    http::{header, request::Parts},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use tracing::info;

use crate::errors::AppError;
use crate::latex::{compile_resume, TemplateId};
use crate::models::resume::ResumeRequest;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Authentication
// ────────────────────────────────────────────────────────────────────────────

/// Extractor that admits requests carrying `Authorization: Bearer <API_TOKEN>`.
///
/// Runs before the body is read, so unauthenticated requests never reach the compiler.
pub struct BearerAuth;

#[async_trait]
impl FromRequestParts<AppState> for BearerAuth {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(str::trim)
            .ok_or(AppError::Unauthorized)?;

        if tokens_match(token, &state.config.api_token) {
            Ok(BearerAuth)
        } else {
            Err(AppError::Unauthorized)
        }
    }
}

/// Compares without short-circuiting on the first differing byte.
fn tokens_match(given: &str, expected: &str) -> bool {
    let (a, b) = (given.as_bytes(), expected.as_bytes());
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/resume/pdf
///
/// Full pipeline: validate → compile to LaTeX → render to PDF.
/// Template and validation errors are reported before the renderer is started.
pub async fn handle_render_pdf(
    _auth: BearerAuth,
    State(state): State<AppState>,
    payload: Result<Json<ResumeRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(request) = payload?;
    let source = compile_resume(&request.template_id, &request.data)?;
    let pdf = state.renderer.render(&source).await?;

    info!(
        "Rendered resume PDF with template {} ({} bytes)",
        request.template_id,
        pdf.len()
    );

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"resume.pdf\"",
            ),
        ],
        pdf,
    )
        .into_response())
}

/// POST /api/v1/resume/source
///
/// Returns the compiled LaTeX source without rendering it.
pub async fn handle_render_source(
    _auth: BearerAuth,
    payload: Result<Json<ResumeRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(request) = payload?;
    let source = compile_resume(&request.template_id, &request.data)?;

    Ok((
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        source,
    )
        .into_response())
}

/// GET /api/v1/resume/templates
pub async fn handle_list_templates() -> Json<Value> {
    Json(json!({ "templates": TemplateId::ALL }))
}
