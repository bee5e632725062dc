mod cleanup;
mod config;

use std::net::SocketAddr;
use std::sync::Arc;

use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use banter_api::auth::{AppState, AppStateInner, SessionSettings};
use banter_api::router::build_router;
use banter_genai::Gateway;

use crate::config::Config;

const SESSION_SWEEP_INTERVAL_SECS: u64 = 3600;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "banter=debug,banter_api=debug,banter_db=debug,banter_genai=debug,tower_http=debug".into()),
        )
        .init();

    let config = Config::from_env()?;

    if config.gateway.gemini_api_key.is_none() {
        warn!("GEMINI_API_KEY is not set; chat and image description will fail");
    }
    if config.gateway.huggingface_api_key.is_none() || config.gateway.imagekit_private_key.is_none() {
        warn!("HUGGINGFACE_API_KEY or IMAGEKIT_PRIVATE_KEY is not set; image generation will fail");
    }

    // Init database
    let db = banter_db::Database::open(&config.db_path)?;
    let generator = Arc::new(Gateway::new(config.gateway.clone())?);

    let app_state: AppState = Arc::new(AppStateInner {
        db,
        generator,
        sessions: SessionSettings {
            ttl: chrono::Duration::hours(config.session_ttl_hours),
            secure_cookie: config.cookie_secure,
        },
    });

    tokio::spawn(cleanup::run_session_sweep(app_state.clone(), SESSION_SWEEP_INTERVAL_SECS));

    let app = build_router(app_state).layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    info!("Banter server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();
    #[cfg(unix)]
    {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = ctrl_c => info!("Received Ctrl+C, shutting down..."),
                    _ = sigterm.recv() => info!("Received SIGTERM, shutting down..."),
                }
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                ctrl_c.await.ok();
                info!("Received Ctrl+C, shutting down...");
            }
        }
    }
    #[cfg(not(unix))]
    {
        ctrl_c.await.ok();
        info!("Received Ctrl+C, shutting down...");
    }
}
