use std::sync::Arc;

use crate::ats::AtsAnalyzer;
use crate::config::Config;
use crate::render::templates::TemplateRegistry;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub templates: Arc<TemplateRegistry>,
    /// Pluggable ATS analyzer. Heuristic by default; LLM-backed when ANTHROPIC_API_KEY is set.
    pub ats_analyzer: Arc<dyn AtsAnalyzer>,
}
