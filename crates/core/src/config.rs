//! Typed backup configuration and the flat-file store.
//!
//! The config file is shared with the external backup shell tool:
//! line-oriented `KEY="value"` pairs, `#` comments, values optionally
//! wrapped in matching single or double quotes. Every recognized key has a
//! documented default; unrecognized keys are ignored explicitly instead of
//! being passed through.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::error::VaultError;
use crate::paths::VaultPaths;
use crate::schedule::Frequency;

const DEFAULT_JOB_NAME: &str = "DefaultBackupJob";
const DEFAULT_COMPRESSION: &str = "tar.gz";
const DEFAULT_BACKUP_MODE: &str = "full";
const DEFAULT_RETENTION_DAYS: u32 = 30;
const DEFAULT_EMAIL_SUBJECT_PREFIX: &str = "[BackupVault]";
const DEFAULT_RCLONE_REMOTE_PATH: &str = "BackupVaultArchives/";

fn default_destination() -> String {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("BackupVaultBackups")
        .display()
        .to_string()
}

// ── Typed record ─────────────────────────────────────────────────────

/// The full set of recognized configuration keys with their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackupConfig {
    pub job_name: String,
    /// Colon-separated list of source folders.
    pub source_folders: String,
    pub destination_directory: String,
    /// daily | weekly | monthly | custom. Kept as written; the schedule
    /// projector reports unknown spellings as unsupported.
    pub frequency: String,
    /// 5-field cron-like string consulted by the schedule projector.
    pub custom_cron_schedule: String,
    /// tar.gz | zip | none
    pub compression: String,
    /// full | incremental
    pub backup_mode: String,
    pub retention_days: u32,
    /// GPG encryption of finished archives.
    pub encryption: bool,
    pub gpg_recipient: String,
    pub email_notify: bool,
    pub email_address: String,
    pub email_subject_prefix: String,
    pub cloud_backup_enabled: bool,
    pub rclone_remote_name: String,
    pub rclone_remote_path: String,
    pub delete_local_after_upload: bool,
}

impl Default for BackupConfig {
    fn default() -> Self {
        Self {
            job_name: DEFAULT_JOB_NAME.to_string(),
            source_folders: String::new(),
            destination_directory: default_destination(),
            frequency: Frequency::Daily.as_str().to_string(),
            custom_cron_schedule: "0 2 * * *".to_string(),
            compression: DEFAULT_COMPRESSION.to_string(),
            backup_mode: DEFAULT_BACKUP_MODE.to_string(),
            retention_days: DEFAULT_RETENTION_DAYS,
            encryption: false,
            gpg_recipient: String::new(),
            email_notify: false,
            email_address: String::new(),
            email_subject_prefix: DEFAULT_EMAIL_SUBJECT_PREFIX.to_string(),
            cloud_backup_enabled: false,
            rclone_remote_name: String::new(),
            rclone_remote_path: DEFAULT_RCLONE_REMOTE_PATH.to_string(),
            delete_local_after_upload: false,
        }
    }
}

/// A single save-blocking validation failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationIssue {
    #[error("at least one source folder is required")]
    MissingSourceFolders,
    #[error("destination directory is required")]
    MissingDestination,
    #[error("GPG recipient is required when encryption is enabled")]
    MissingGpgRecipient,
    #[error("email address is required when notifications are enabled")]
    MissingEmailAddress,
    #[error("rclone remote name is required when cloud backup is enabled")]
    MissingRemoteName,
    #[error("rclone remote path is required when cloud backup is enabled")]
    MissingRemotePath,
    #[error("custom frequency requires a cron schedule")]
    MissingCronSchedule,
}

impl BackupConfig {
    /// Parse the flat `KEY=value` text. Blank lines and `#` comments are
    /// skipped, keys are upper-cased, matching quotes stripped from values,
    /// and missing keys keep their defaults.
    pub fn from_conf_text(text: &str) -> Self {
        let mut config = Self::default();
        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let key = key.trim().to_ascii_uppercase();
            config.apply(&key, strip_quotes(value.trim()));
        }
        config
    }

    fn apply(&mut self, key: &str, value: &str) {
        match key {
            "JOB_NAME" => self.job_name = value.to_string(),
            "SOURCE_FOLDERS" => self.source_folders = value.to_string(),
            "DESTINATION_DIRECTORY" => self.destination_directory = value.to_string(),
            "FREQUENCY" => self.frequency = value.to_string(),
            "CUSTOM_CRON_SCHEDULE" => self.custom_cron_schedule = value.to_string(),
            "COMPRESSION" => self.compression = value.to_string(),
            "BACKUP_MODE" => self.backup_mode = value.to_string(),
            "RETENTION_DAYS" => {
                if let Ok(days) = value.parse() {
                    self.retention_days = days;
                }
            }
            "ENCRYPTION" => self.encryption = value.eq_ignore_ascii_case("gpg"),
            "GPG_RECIPIENT" => self.gpg_recipient = value.to_string(),
            "EMAIL_NOTIFY" => self.email_notify = yes_no(value),
            "EMAIL_ADDRESS" => self.email_address = value.to_string(),
            "EMAIL_SUBJECT_PREFIX" => self.email_subject_prefix = value.to_string(),
            "CLOUD_BACKUP_ENABLED" => self.cloud_backup_enabled = yes_no(value),
            "RCLONE_REMOTE_NAME" => self.rclone_remote_name = value.to_string(),
            "RCLONE_REMOTE_PATH" => self.rclone_remote_path = value.to_string(),
            "DELETE_LOCAL_AFTER_UPLOAD" => self.delete_local_after_upload = yes_no(value),
            _ => debug!("ignoring unrecognized config key {key}"),
        }
    }

    /// Render in the file syntax the shell tool sources: one `KEY="value"`
    /// per line, values always double-quoted.
    pub fn to_conf_text(&self) -> String {
        let pairs: [(&str, String); 17] = [
            ("JOB_NAME", self.job_name.clone()),
            ("SOURCE_FOLDERS", self.source_folders.clone()),
            ("DESTINATION_DIRECTORY", self.destination_directory.clone()),
            ("FREQUENCY", self.frequency.clone()),
            ("CUSTOM_CRON_SCHEDULE", self.custom_cron_schedule.clone()),
            ("COMPRESSION", self.compression.clone()),
            ("BACKUP_MODE", self.backup_mode.clone()),
            ("RETENTION_DAYS", self.retention_days.to_string()),
            ("ENCRYPTION", to_gpg_none(self.encryption)),
            ("GPG_RECIPIENT", self.gpg_recipient.clone()),
            ("EMAIL_NOTIFY", to_yes_no(self.email_notify)),
            ("EMAIL_ADDRESS", self.email_address.clone()),
            ("EMAIL_SUBJECT_PREFIX", self.email_subject_prefix.clone()),
            ("CLOUD_BACKUP_ENABLED", to_yes_no(self.cloud_backup_enabled)),
            ("RCLONE_REMOTE_NAME", self.rclone_remote_name.clone()),
            ("RCLONE_REMOTE_PATH", self.rclone_remote_path.clone()),
            (
                "DELETE_LOCAL_AFTER_UPLOAD",
                to_yes_no(self.delete_local_after_upload),
            ),
        ];
        let mut out = String::new();
        for (key, value) in pairs {
            out.push_str(&format!("{key}=\"{value}\"\n"));
        }
        out
    }

    /// Collect every save-blocking violation, not just the first.
    pub fn validate(&self) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();
        if self.source_folders.trim().is_empty() {
            issues.push(ValidationIssue::MissingSourceFolders);
        }
        if self.destination_directory.trim().is_empty() {
            issues.push(ValidationIssue::MissingDestination);
        }
        if self.encryption && self.gpg_recipient.trim().is_empty() {
            issues.push(ValidationIssue::MissingGpgRecipient);
        }
        if self.email_notify && self.email_address.trim().is_empty() {
            issues.push(ValidationIssue::MissingEmailAddress);
        }
        if self.cloud_backup_enabled {
            if self.rclone_remote_name.trim().is_empty() {
                issues.push(ValidationIssue::MissingRemoteName);
            }
            if self.rclone_remote_path.trim().is_empty() {
                issues.push(ValidationIssue::MissingRemotePath);
            }
        }
        if Frequency::parse(&self.frequency) == Some(Frequency::Custom)
            && self.custom_cron_schedule.trim().is_empty()
        {
            issues.push(ValidationIssue::MissingCronSchedule);
        }
        issues
    }

    /// Dependent-field normalization applied before every save: non-custom
    /// frequencies get their canonical cron string, and disabled features
    /// have their dependent fields cleared.
    pub fn normalize(&mut self) {
        if let Some(freq) = Frequency::parse(&self.frequency) {
            if let Some(cron) = freq.canonical_cron() {
                self.custom_cron_schedule = cron.to_string();
            }
        }
        if !self.encryption {
            self.gpg_recipient.clear();
        }
        if !self.email_notify {
            self.email_address.clear();
            self.email_subject_prefix = DEFAULT_EMAIL_SUBJECT_PREFIX.to_string();
        }
        if !self.cloud_backup_enabled {
            self.rclone_remote_name.clear();
            self.rclone_remote_path.clear();
            self.delete_local_after_upload = false;
        }
    }
}

fn yes_no(value: &str) -> bool {
    value.eq_ignore_ascii_case("yes")
}

fn to_yes_no(flag: bool) -> String {
    if flag { "yes" } else { "no" }.to_string()
}

fn to_gpg_none(flag: bool) -> String {
    if flag { "gpg" } else { "none" }.to_string()
}

fn strip_quotes(value: &str) -> &str {
    let bytes = value.as_bytes();
    if bytes.len() >= 2 {
        let (first, last) = (bytes[0], bytes[bytes.len() - 1]);
        if (first == b'"' && last == b'"') || (first == b'\'' && last == b'\'') {
            return &value[1..value.len() - 1];
        }
    }
    value
}

// ── Store ────────────────────────────────────────────────────────────

/// Reads and writes `backupvault.conf`.
pub struct ConfigStore {
    conf_path: PathBuf,
}

impl ConfigStore {
    pub fn new(paths: &VaultPaths) -> Self {
        Self {
            conf_path: paths.conf_path(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.conf_path
    }

    /// `Ok(None)` when the file does not exist yet — an absent config is
    /// empty semantics, not an error.
    pub fn load(&self) -> Result<Option<BackupConfig>, VaultError> {
        if !self.conf_path.exists() {
            return Ok(None);
        }
        let text = fs::read_to_string(&self.conf_path)?;
        Ok(Some(BackupConfig::from_conf_text(&text)))
    }

    /// Write the config, creating the containing directory if absent.
    pub fn save(&self, config: &BackupConfig) -> Result<(), VaultError> {
        if let Some(parent) = self.conf_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.conf_path, config.to_conf_text())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_quotes_comments_and_case() {
        let text = r#"
# BackupVault configuration
JOB_NAME="Nightly Docs"
source_folders='/home/a:/home/b'
FREQUENCY=weekly
RETENTION_DAYS="14"
EMAIL_NOTIFY="yes"
ENCRYPTION="gpg"
SOME_FUTURE_KEY="ignored"
"#;
        let config = BackupConfig::from_conf_text(text);
        assert_eq!(config.job_name, "Nightly Docs");
        assert_eq!(config.source_folders, "/home/a:/home/b");
        assert_eq!(config.frequency, "weekly");
        assert_eq!(config.retention_days, 14);
        assert!(config.email_notify);
        assert!(config.encryption);
        // Missing keys keep their defaults.
        assert_eq!(config.compression, "tar.gz");
        assert_eq!(config.email_subject_prefix, "[BackupVault]");
    }

    #[test]
    fn garbled_retention_keeps_default() {
        let config = BackupConfig::from_conf_text("RETENTION_DAYS=\"soon\"\n");
        assert_eq!(config.retention_days, DEFAULT_RETENTION_DAYS);
    }

    #[test]
    fn save_load_round_trips() {
        let tmp = tempfile::tempdir().unwrap();
        let paths = VaultPaths::new(tmp.path().join("nested").join("dir"));
        let store = ConfigStore::new(&paths);

        assert!(store.load().unwrap().is_none());

        let mut config = BackupConfig::default();
        config.job_name = "Roundtrip".to_string();
        config.source_folders = "/data".to_string();
        config.email_notify = true;
        config.email_address = "ops@example.com".to_string();
        store.save(&config).unwrap();

        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn conf_text_is_always_double_quoted() {
        let text = BackupConfig::default().to_conf_text();
        for line in text.lines() {
            let (_, value) = line.split_once('=').unwrap();
            assert!(value.starts_with('"') && value.ends_with('"'), "{line}");
        }
        assert!(text.contains("ENCRYPTION=\"none\""));
        assert!(text.contains("EMAIL_NOTIFY=\"no\""));
    }

    #[test]
    fn validation_collects_all_violations() {
        let mut config = BackupConfig::default();
        config.destination_directory.clear();
        config.encryption = true;
        config.cloud_backup_enabled = true;
        let issues = config.validate();
        assert!(issues.contains(&ValidationIssue::MissingSourceFolders));
        assert!(issues.contains(&ValidationIssue::MissingDestination));
        assert!(issues.contains(&ValidationIssue::MissingGpgRecipient));
        assert!(issues.contains(&ValidationIssue::MissingRemoteName));
        assert_eq!(issues.len(), 4);
    }

    #[test]
    fn custom_frequency_requires_cron() {
        let mut config = BackupConfig::default();
        config.source_folders = "/data".to_string();
        config.frequency = "custom".to_string();
        config.custom_cron_schedule = "  ".to_string();
        assert_eq!(config.validate(), vec![ValidationIssue::MissingCronSchedule]);
    }

    #[test]
    fn normalize_canonicalizes_and_clears() {
        let mut config = BackupConfig::default();
        config.frequency = "monthly".to_string();
        config.custom_cron_schedule = "59 23 15 * *".to_string();
        config.gpg_recipient = "stale".to_string();
        config.email_address = "stale@example.com".to_string();
        config.rclone_remote_name = "stale-remote".to_string();
        config.delete_local_after_upload = true;

        config.normalize();

        assert_eq!(config.custom_cron_schedule, "0 2 1 * *");
        assert!(config.gpg_recipient.is_empty());
        assert!(config.email_address.is_empty());
        assert!(config.rclone_remote_name.is_empty());
        assert!(!config.delete_local_after_upload);
    }

    #[test]
    fn normalize_keeps_custom_cron() {
        let mut config = BackupConfig::default();
        config.frequency = "custom".to_string();
        config.custom_cron_schedule = "*/10 * * * *".to_string();
        config.normalize();
        assert_eq!(config.custom_cron_schedule, "*/10 * * * *");
    }
}
