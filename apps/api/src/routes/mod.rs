pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::render::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Resume API
        .route(
            "/api/v1/resume/templates",
            get(handlers::handle_list_templates),
        )
        .route(
            "/api/v1/resume/source",
            post(handlers::handle_render_source),
        )
        .route("/api/v1/resume/pdf", post(handlers::handle_render_pdf))
        .with_state(state)
}
