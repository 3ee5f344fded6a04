//! Backup summary: job identity, last status, cumulative successful
//! storage, and the projected next run.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use chrono::Local;
use serde::Serialize;
use tracing::warn;

use backupvault_core::schedule;

use crate::disk::{round2, GB};
use crate::state::AppState;

#[derive(Serialize)]
pub struct SummaryResponse {
    pub job_name: String,
    pub total_active_jobs: u32,
    pub last_backup_status: String,
    pub total_backup_storage_gb: f64,
    pub next_scheduled_run: String,
}

pub async fn backup_summary(State(state): State<Arc<AppState>>) -> Json<SummaryResponse> {
    // Adapter failures degrade to empty semantics; the summary always
    // renders something.
    let config = state.config_store.load().unwrap_or_else(|err| {
        warn!("failed to read config: {err}");
        None
    });
    let history = state.history_store.load().unwrap_or_else(|err| {
        warn!("failed to read run history: {err}");
        Vec::new()
    });

    let last_backup_status = history
        .first()
        .filter(|run| !run.status.is_empty())
        .map(|run| run.status.clone())
        .unwrap_or_else(|| "N/A".to_string());

    let successful_bytes: u64 = history
        .iter()
        .filter(|run| run.is_success())
        .map(|run| run.backup_size_bytes)
        .sum();

    let next_scheduled_run = match &config {
        Some(cfg) => {
            let last_run = history
                .first()
                .and_then(|run| run.start_time)
                .map(|at| at.with_timezone(&Local));
            schedule::next_run(
                last_run,
                Some(cfg.frequency.as_str()),
                Some(cfg.custom_cron_schedule.as_str()),
                Local::now(),
            )
            .display_string()
        }
        None => "N/A".to_string(),
    };

    Json(SummaryResponse {
        job_name: config
            .as_ref()
            .map(|cfg| cfg.job_name.clone())
            .unwrap_or_else(|| "N/A".to_string()),
        total_active_jobs: if config.is_some() { 1 } else { 0 },
        last_backup_status,
        total_backup_storage_gb: round2(successful_bytes as f64 / GB),
        next_scheduled_run,
    })
}
