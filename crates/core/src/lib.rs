//! Shared core for the BackupVault configuration editor and web dashboard:
//! typed config store, run-history log adapter, and the next-run schedule
//! projector. Everything here is synchronous and pure apart from bounded
//! local file reads.

pub mod config;
pub mod error;
pub mod form;
pub mod history;
pub mod paths;
pub mod schedule;

pub use config::{BackupConfig, ConfigStore, ValidationIssue};
pub use error::VaultError;
pub use form::{enabled_fields, EnabledFields, FormFlags};
pub use history::{HistoryStore, RunRecord, RUNS_LOG_HEADER};
pub use paths::VaultPaths;
pub use schedule::{next_run, Frequency, NextRun, ScheduleSpec};
