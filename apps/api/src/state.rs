use std::sync::Arc;

use crate::config::Config;
use crate::render::Renderer;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Pluggable PDF renderer. Default: LatexRenderer (subprocess per job).
    pub renderer: Arc<dyn Renderer>,
}
