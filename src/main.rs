use clap::Parser;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use eventhub_api::config::AppConfig;
use eventhub_api::database::{DatabaseManager, MemoryStore};
use eventhub_api::{router, AppState};

#[derive(Parser)]
#[command(name = "eventhub-api")]
#[command(about = "EventHub marketplace API server")]
#[command(version)]
struct ServerArgs {
    /// Serve from an in-process store instead of PostgreSQL (local demos only)
    #[arg(long)]
    memory: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "eventhub_api=info,tower_http=info".into()),
        )
        .init();

    let args = ServerArgs::parse();
    let config = AppConfig::from_env();
    config.validate()?;
    tracing::info!("Starting EventHub API in {:?} mode", config.environment);

    let port = config.api.port;
    let state = if args.memory {
        tracing::warn!("Using in-memory store; data is lost on exit");
        AppState::in_memory(config, Arc::new(MemoryStore::new()))?
    } else {
        let pool = DatabaseManager::connect(&config.database).await?;
        AppState::postgres(config, pool)?
    };

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!("EventHub API listening on http://{}", bind_addr);

    axum::serve(listener, router(state)).await?;
    Ok(())
}
