//! Storage usage for the configured destination's volume.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

use backupvault_core::VaultError;

use crate::disk::{self, StorageUsage};
use crate::state::AppState;

use super::{error_response, ErrorResponse};

pub async fn storage_usage(
    State(state): State<Arc<AppState>>,
) -> Result<Json<StorageUsage>, (StatusCode, Json<ErrorResponse>)> {
    let destination = state
        .config_store
        .load()
        .map_err(error_response)?
        .map(|cfg| cfg.destination_directory)
        .filter(|dest| !dest.trim().is_empty())
        .ok_or_else(|| error_response(VaultError::PathNotConfigured))?;

    let usage = disk::disk_usage(&destination).map_err(error_response)?;
    Ok(Json(usage))
}
