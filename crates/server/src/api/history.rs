//! Full run-history listing, newest first.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

use backupvault_core::RunRecord;

use crate::state::AppState;

use super::{error_response, ErrorResponse};

pub async fn backup_history(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<RunRecord>>, (StatusCode, Json<ErrorResponse>)> {
    let history = state.history_store.load().map_err(error_response)?;
    Ok(Json(history))
}
