//! Run-history log adapter.
//!
//! The external backup tool appends one CSV row per execution. The log is
//! read-only here, and readers may observe it mid-append: a malformed or
//! truncated row is dropped individually and never invalidates the rest of
//! the file.

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Deserializer, Serialize};
use tracing::warn;

use crate::error::VaultError;
use crate::paths::VaultPaths;

/// Column order written by the external backup tool.
pub const RUNS_LOG_HEADER: [&str; 10] = [
    "run_id",
    "job_name",
    "start_time",
    "end_time",
    "status",
    "backup_size_bytes",
    "source_folders_processed",
    "destination_path_used",
    "detailed_log_file_path",
    "summary_message",
];

/// One logged execution attempt of the external backup tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunRecord {
    pub run_id: String,
    pub job_name: String,
    /// Absent means the start is unknown; such records sort as oldest.
    #[serde(deserialize_with = "de_opt_timestamp")]
    pub start_time: Option<DateTime<FixedOffset>>,
    #[serde(deserialize_with = "de_opt_timestamp")]
    pub end_time: Option<DateTime<FixedOffset>>,
    /// Free text; case-insensitive "success" is the only status with
    /// defined semantics.
    pub status: String,
    #[serde(default)]
    pub backup_size_bytes: u64,
    pub source_folders_processed: String,
    pub destination_path_used: String,
    pub detailed_log_file_path: String,
    pub summary_message: String,
}

impl RunRecord {
    pub fn is_success(&self) -> bool {
        self.status.eq_ignore_ascii_case("success")
    }
}

/// Empty timestamps read as `None`; anything non-empty must be ISO-8601
/// (with offset, or naive — naive is taken as UTC).
fn de_opt_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<FixedOffset>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    if let Ok(at) = DateTime::parse_from_rfc3339(raw) {
        return Ok(Some(at));
    }
    chrono::NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| Some(naive.and_utc().fixed_offset()))
        .map_err(serde::de::Error::custom)
}

/// Reads `logs/backup_runs.csv`.
pub struct HistoryStore {
    log_path: PathBuf,
}

impl HistoryStore {
    pub fn new(paths: &VaultPaths) -> Self {
        Self {
            log_path: paths.runs_log_path(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.log_path
    }

    /// Newest-first run history. An absent log reads as empty; rows that
    /// fail to parse (bad integer, bad timestamp, wrong arity) are skipped
    /// with a warning.
    pub fn load(&self) -> Result<Vec<RunRecord>, VaultError> {
        if !self.log_path.exists() {
            return Ok(Vec::new());
        }
        let file = File::open(&self.log_path)?;
        let mut reader = csv::Reader::from_reader(file);

        let mut records = Vec::new();
        for (idx, row) in reader.deserialize::<RunRecord>().enumerate() {
            match row {
                Ok(record) => records.push(record),
                Err(err) => warn!("skipping malformed run-history row {}: {}", idx + 2, err),
            }
        }
        records.sort_by(|a, b| b.start_time.cmp(&a.start_time));
        Ok(records)
    }

    /// Seed an empty log containing just the header row (and the logs
    /// directory) when nothing exists yet, so the dashboard always has a
    /// well-formed file to read.
    pub fn ensure_exists(&self) -> Result<(), VaultError> {
        if self.log_path.exists() {
            return Ok(());
        }
        if let Some(parent) = self.log_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut writer = csv::Writer::from_path(&self.log_path)?;
        writer.write_record(RUNS_LOG_HEADER)?;
        writer.flush()?;
        Ok(())
    }
}
