mod analysis;
mod config;
mod errors;
mod llm_client;
mod models;
mod routes;
mod screening;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::screening::assistant::LlmResumeAssistant;
use crate::screening::extraction::DocumentTextExtractor;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing or invalid env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting screener API v{}", env!("CARGO_PKG_VERSION"));

    // One model handle for the whole process, passed down explicitly
    let retry = config.retry_policy();
    let llm = LlmClient::new(config.anthropic_api_key.clone(), retry)?;
    info!(
        "LLM client initialized (model: {}, max attempts: {}, backoff {}ms..{}ms)",
        llm_client::MODEL,
        retry.max_attempts,
        retry.backoff.base.as_millis(),
        retry.backoff.max.as_millis()
    );

    let state = AppState {
        config: config.clone(),
        assistant: Arc::new(LlmResumeAssistant::new(llm)),
        extractor: Arc::new(DocumentTextExtractor),
    };
    info!(
        "Batch options: shortlist {}, concurrency {}, reorganize sections {}",
        config.shortlist_size, config.batch_concurrency, config.reorganize_sections
    );

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
