//! HTTP server for the Bill Split Engine.
//!
//! Reads configuration from the directory named by `BILL_SPLIT_CONFIG`
//! (default `./config/default`) and serves the allocation API.

use bill_split_engine::api::{create_router, AppState};
use bill_split_engine::config::ConfigLoader;
use tracing::info;
use tracing_subscriber::EnvFilter;

const DEFAULT_CONFIG_DIR: &str = "./config/default";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config_dir =
        std::env::var("BILL_SPLIT_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_DIR.to_string());
    info!(config_dir = %config_dir, "Loading configuration");
    let config = ConfigLoader::load(&config_dir)?;

    let addr = config.bind_address();
    info!(
        engine = %config.engine().name,
        version = %config.engine().version,
        "Starting server on {}", addr
    );

    let app = create_router(AppState::new(config));
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
