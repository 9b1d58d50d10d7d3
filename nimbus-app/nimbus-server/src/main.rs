use std::net::SocketAddr;
use std::time::Duration;

use tracing::{error, info};

use nimbus_api::{build_router, AppState};
use nimbus_shared::config::AppConfig;
use nimbus_shared::constants::SESSION_PURGE_INTERVAL_SECS;
use nimbus_shared::telemetry::{init_telemetry, DEFAULT_LOG_FILTER};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env
    dotenvy::dotenv().ok();

    // Initialize telemetry
    init_telemetry(DEFAULT_LOG_FILTER);

    info!("Nimbus identity server starting...");

    // Load configuration
    let config = match AppConfig::load() {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    // Bind address
    let host: std::net::IpAddr = config.app.host.parse()?;
    let addr = SocketAddr::from((host, config.app.port));

    // Session registry is created here and discarded on shutdown
    let state = AppState::from_config(config);
    let sessions = state.auth.sessions().clone();
    let sweeper = sessions.spawn_sweeper(Duration::from_secs(SESSION_PURGE_INTERVAL_SECS));
    if state.diagnostics.is_enabled() {
        info!("Diagnostics endpoint enabled");
    }

    let app = build_router(state);

    info!("Listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(sweeper) = sweeper {
        sweeper.abort();
    }
    let dropped = sessions.clear();
    info!("Server stopped; discarded {} in-memory sessions", dropped);

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
