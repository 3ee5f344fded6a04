//! Declarative form-state model for the configuration editor.
//!
//! A pure function from the feature toggles to the set of editable fields,
//! decoupled from any specific UI toolkit.

use crate::config::BackupConfig;
use crate::schedule::Frequency;

/// The toggles that drive which dependent editor fields are editable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormFlags {
    pub frequency: Option<Frequency>,
    pub encryption: bool,
    pub email_notify: bool,
    pub cloud_backup: bool,
}

impl FormFlags {
    pub fn from_config(config: &BackupConfig) -> Self {
        Self {
            frequency: Frequency::parse(&config.frequency),
            encryption: config.encryption,
            email_notify: config.email_notify,
            cloud_backup: config.cloud_backup_enabled,
        }
    }
}

/// Which dependent editor fields are currently editable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnabledFields {
    pub custom_cron: bool,
    pub gpg_recipient: bool,
    pub email_address: bool,
    pub email_subject_prefix: bool,
    pub rclone_remote_name: bool,
    pub rclone_remote_path: bool,
    pub delete_local_after_upload: bool,
}

/// Pure mapping from toggles to editable fields: the cron entry only for
/// the custom frequency, and each feature's fields only while the feature
/// is switched on.
pub fn enabled_fields(flags: &FormFlags) -> EnabledFields {
    EnabledFields {
        custom_cron: flags.frequency == Some(Frequency::Custom),
        gpg_recipient: flags.encryption,
        email_address: flags.email_notify,
        email_subject_prefix: flags.email_notify,
        rclone_remote_name: flags.cloud_backup,
        rclone_remote_path: flags.cloud_backup,
        delete_local_after_upload: flags.cloud_backup,
    }
}
