use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::TextGenerator;

/// Shared application state injected into all route handlers via Axum extractors.
/// Read-only after startup; requests share nothing mutable.
#[derive(Clone)]
pub struct AppState {
    /// Remote analysis backend. Default: `GeminiClient`.
    pub generator: Arc<dyn TextGenerator>,
    pub config: Config,
}
