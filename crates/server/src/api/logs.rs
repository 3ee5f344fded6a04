//! Detailed per-run log retrieval.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

use crate::state::AppState;

use super::{error_response, ErrorResponse};

#[derive(Serialize)]
pub struct LogResponse {
    pub log_filename: String,
    pub content: String,
}

pub async fn backup_log(
    State(state): State<Arc<AppState>>,
    Path(log_filename): Path<String>,
) -> Result<Json<LogResponse>, (StatusCode, Json<ErrorResponse>)> {
    let content = state.detail_logs.read(&log_filename).map_err(error_response)?;
    Ok(Json(LogResponse {
        log_filename,
        content,
    }))
}
