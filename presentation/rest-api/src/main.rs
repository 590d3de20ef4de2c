use dotenvy::dotenv;

mod api;
mod config;
mod setup;

use config::app_config::AppConfig;
use setup::{dependency_injection::DependencyContainer, server::Server};

/// REST API Entry Point
///
/// Startup order:
/// 1. tracing with RUST_LOG env filter
/// 2. `.env` loading
/// 3. configuration (fails fast on a bad POSTGRES_URL)
/// 4. connection pool + schema initialization
/// 5. HTTP server; on shutdown the pool is disposed
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    dotenv().ok();

    let config = AppConfig::from_env()?;

    let container = DependencyContainer::new(&config.database).await?;

    Server::run(config, container).await?;

    Ok(())
}
