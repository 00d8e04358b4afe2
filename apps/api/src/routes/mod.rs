pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::ats::handlers as ats;
use crate::resume::handlers as resume;
use crate::state::AppState;

/// Slack on top of the upload limit for multipart framing and form fields.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes + MULTIPART_OVERHEAD_BYTES;

    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/templates", get(resume::handle_templates))
        // Resume API
        .route("/api/v1/resumes/map", post(resume::handle_map))
        .route("/api/v1/resumes/columns", post(resume::handle_columns))
        .route("/api/v1/resumes/preview", post(resume::handle_preview))
        // ATS API
        .route("/api/v1/ats/parse", post(ats::handle_parse_text))
        .route("/api/v1/ats/analyze", post(ats::handle_analyze))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}
