//! Dashboard API endpoint modules.
//!
//! Each sub-module owns one read-only query surface. Shared error mapping
//! lives here in mod.rs.

mod health;
mod history;
mod logs;
mod storage;
mod summary;

use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

use backupvault_core::VaultError;

// ── Shared types ─────────────────────────────────────────────────

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Map adapter errors onto client-facing status codes: bad request names
/// are the client's fault, absent files are 404, everything else is a
/// server-side failure.
pub(crate) fn error_response(err: VaultError) -> (StatusCode, Json<ErrorResponse>) {
    let status = match &err {
        VaultError::InvalidLogName(_) => StatusCode::BAD_REQUEST,
        VaultError::LogNotFound(_) | VaultError::PathNotConfigured => StatusCode::NOT_FOUND,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(ErrorResponse { error: err.to_string() }))
}

// ── Re-exports ───────────────────────────────────────────────────
// Preserves flat `api::foo` import paths used by main.rs route registration.

pub use health::health;
pub use history::backup_history;
pub use logs::backup_log;
pub use storage::storage_usage;
pub use summary::backup_summary;
