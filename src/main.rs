use std::path::PathBuf;

use anyhow::{Context, anyhow};
use axum::Router;
use clap::Parser;
use tokio::net::TcpListener;
use tower_http::services::ServeDir;
use tracing::info;

use coach_gateway::{AppState, ConfigStore, ServerConfig, routes};

/// Coach Gateway - telephony-to-realtime-AI relay server
#[derive(Parser, Debug)]
#[command(name = "coach-gateway")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to the voice settings file (JSON)
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if it exists (must be done before config loading)
    let _ = dotenvy::dotenv();

    // Initialize tracing
    tracing_subscriber::fmt::init();

    // Parse CLI arguments
    let cli = Cli::parse();

    // Load configuration from the environment; a missing credential aborts startup
    let config = ServerConfig::from_env().context("failed to load server configuration")?;

    let settings_path = cli.config.unwrap_or_else(|| config.settings_path.clone());
    let settings = ConfigStore::load(settings_path.clone()).with_context(|| {
        format!(
            "failed to load voice settings from {}",
            settings_path.display()
        )
    })?;

    let address = config.address();
    let public_dir = config.public_dir.clone();

    // Create application state
    let app_state = AppState::new(config, settings);

    // Combine all routes: HTTP API + WebSocket endpoints + static front-end
    let app = Router::new()
        .merge(routes::api::create_api_router())
        .merge(routes::media::create_ws_router())
        .fallback_service(ServeDir::new(public_dir))
        .with_state(app_state);

    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind {address}"))?;
    info!("coach gateway listening on http://{address}");

    axum::serve(listener, app)
        .await
        .map_err(|e| anyhow!("server error: {e}"))?;

    Ok(())
}
