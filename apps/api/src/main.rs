mod config;
mod document;
mod errors;
mod llm_client;
mod routes;
mod screening;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{Config, DocumentConfig, RepresentationMode};
use crate::document::{DocumentConverter, PopplerConverter, TextConverter};
use crate::llm_client::{LlmClient, TextGenerator};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting resume screener v{}", env!("CARGO_PKG_VERSION"));

    // Initialize LLM client
    let llm = LlmClient::new(config.llm.clone())?;
    info!("LLM client initialized (model: {})", llm.model());

    match llm.list_models().await {
        Ok(models) => info!("Available models: {}", models.join(", ")),
        Err(e) => warn!("Could not list available models: {e}"),
    }

    let converter = build_converter(&config.document);

    let state = AppState {
        generator: Arc::new(llm),
        converter,
        max_upload_bytes: config.max_upload_bytes,
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

fn build_converter(config: &DocumentConfig) -> Arc<dyn DocumentConverter> {
    match config.mode {
        RepresentationMode::Image => {
            info!(
                "Resumes will be rasterized with {} at {} dpi",
                config.pdftoppm_path, config.raster_dpi
            );
            Arc::new(PopplerConverter::new(
                config.pdftoppm_path.clone(),
                config.raster_dpi,
            ))
        }
        RepresentationMode::Text => {
            info!("Resumes will be sent as extracted text");
            Arc::new(TextConverter)
        }
    }
}
