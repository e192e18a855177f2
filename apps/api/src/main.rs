mod analysis;
mod config;
mod db;
mod errors;
mod llm_client;
mod models;
mod routes;
mod state;
mod usage;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::analysis::fetcher::CompletionFetcher;
use crate::config::Config;
use crate::db::create_pool;
use crate::routes::build_router;
use crate::state::AppState;
use crate::usage::{PgUsageSink, UsageLogger};

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

    info!("Starting Career Impact API v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration: {:?}", config.llm);

    // Initialize PostgreSQL (usage events)
    let db = create_pool(&config.database_url).await?;
    let usage = UsageLogger::new(Arc::new(PgUsageSink::new(db)));

    // Initialize completion fetcher
    let fetcher = CompletionFetcher::from_config(&config.llm)?.map(Arc::new);
    match &fetcher {
        Some(fetcher) => info!(
            "Completion fetcher initialized (model: {}, timeout: {:?})",
            llm_client::MODEL,
            fetcher.timeout()
        ),
        None => warn!("OPENAI_API_KEY is not set; analysis requests will be rejected"),
    }

    // Build app state
    let state = AppState {
        fetcher,
        usage,
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the frontend domain is fixed

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
