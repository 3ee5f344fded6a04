mod api;
mod disk;
mod logs;
mod state;

use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use backupvault_core::{paths, VaultPaths};

use crate::state::AppState;

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .init();

    paths::load_dotenv();
    let paths = VaultPaths::from_env();
    info!("Reading config from {}", paths.conf_path().display());
    info!("Reading runs log from {}", paths.runs_log_path().display());
    info!("Detailed logs dir: {}", paths.details_dir().display());

    let state = Arc::new(AppState::new(&paths));

    // The external backup tool owns the runs log; seed an empty one with
    // its header row so the dashboard always has a well-formed file to read.
    if let Err(err) = state.history_store.ensure_exists() {
        warn!("could not seed runs log: {err}");
    }

    let app = Router::new()
        .route("/health", get(api::health))
        .route("/api/backup_summary", get(api::backup_summary))
        .route("/api/backup_history", get(api::backup_history))
        .route("/api/backup_log/{log_filename}", get(api::backup_log))
        .route("/api/storage_usage", get(api::storage_usage))
        .layer(CorsLayer::permissive())
        .with_state(state);

    let addr = format!("{}:{}", env_or("HOST", "0.0.0.0"), env_or("PORT", "5001"));
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Dashboard listening on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
