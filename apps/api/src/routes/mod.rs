pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::analysis::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let max_upload_bytes = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        .route(
            "/analyze-resume",
            post(handlers::handle_analyze_resume).layer(DefaultBodyLimit::max(max_upload_bytes)),
        )
        .with_state(state)
}
