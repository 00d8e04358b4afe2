mod ats;
mod config;
mod errors;
mod llm_client;
mod models;
mod render;
mod resume;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::ats::{AtsAnalyzer, HeuristicAtsAnalyzer, LlmAtsAnalyzer};
use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::render::templates::TemplateRegistry;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting resume API v{}", env!("CARGO_PKG_VERSION"));

    let templates = TemplateRegistry::builtin();
    if templates.get(&config.default_template).is_none() {
        anyhow::bail!(
            "DEFAULT_TEMPLATE '{}' is not a registered template",
            config.default_template
        );
    }
    info!(
        "{} templates registered (default: {})",
        templates.list().len(),
        config.default_template
    );

    // ATS analyzer: LLM review on top of the heuristic when a key is configured
    let ats_analyzer: Arc<dyn AtsAnalyzer> = match &config.anthropic_api_key {
        Some(key) => {
            let llm = LlmClient::new(key.clone())?;
            info!("LLM client initialized (model: {})", llm_client::MODEL);
            Arc::new(LlmAtsAnalyzer(llm))
        }
        None => Arc::new(HeuristicAtsAnalyzer),
    };
    info!("ATS analyzer backend: {}", ats_analyzer.backend());

    let state = AppState {
        config: config.clone(),
        templates: Arc::new(templates),
        ats_analyzer,
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
