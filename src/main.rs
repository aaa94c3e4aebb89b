//! DeepSearch-PRD: PRD generation over a deep-search backend
//!
//! This is the main entry point for the application.

use anyhow::Result;
use deepsearch_prd::{
    config,
    delegate::{DeepSearchTool, SearchDelegate},
    lifecycle,
    network::HttpClient,
    web::{create_router, AppState},
};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is fine
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    info!("Starting DeepSearch-PRD v{}", deepsearch_prd::VERSION);

    // Load configuration
    let settings = config::load()?;
    info!(
        "Delegate: model={} reranker={} search_provider={}",
        settings.delegate.model_id, settings.delegate.reranker, settings.delegate.search_provider
    );

    // Initialize the delegate once for the whole process
    let client = HttpClient::new()?;
    let delegate: Arc<dyn SearchDelegate> =
        Arc::new(DeepSearchTool::new(&settings.delegate, client));
    lifecycle::initialize(delegate.as_ref()).await;

    if settings.delegate.warmup {
        lifecycle::warm_up(delegate.as_ref()).await;
    } else {
        info!("Warm-up disabled");
    }

    // Bind address
    let addr = SocketAddr::new(
        settings.server.bind_address.parse()?,
        settings.server.port,
    );

    // Create router
    let app = create_router(AppState::new(settings, delegate));

    info!("Starting server on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
