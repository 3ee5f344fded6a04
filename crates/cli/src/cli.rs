use clap::{Args, Parser, Subcommand};

/// Configuration editor for the BackupVault shell tool.
///
/// Edits the same `backupvault.conf` the desktop editor and the backup
/// script share, applying the identical validation and dependent-field
/// normalization rules before anything is written.
#[derive(Parser, Debug)]
#[command(name = "backupvault-cli", about = "BackupVault configuration editor")]
pub struct CliArgs {
    /// BackupVault directory (default: ~/.backupvault)
    #[arg(long, env = "BACKUPVAULT_DIR")]
    pub dir: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the effective configuration (defaults applied)
    Show,
    /// Update configuration fields, validate, and save
    Set(SetArgs),
    /// Check the stored configuration against the validation rules
    Validate,
    /// Print the projected next scheduled run
    NextRun,
}

#[derive(Args, Debug, Default)]
pub struct SetArgs {
    /// Job name
    #[arg(long)]
    pub job_name: Option<String>,

    /// Colon-separated list of source folders
    #[arg(long)]
    pub source_folders: Option<String>,

    /// Destination directory for finished archives
    #[arg(long)]
    pub destination: Option<String>,

    /// Schedule frequency: daily, weekly, monthly, or custom
    #[arg(long)]
    pub frequency: Option<String>,

    /// 5-field cron string (only kept as-is for the custom frequency)
    #[arg(long)]
    pub cron: Option<String>,

    /// Compression mode: tar.gz, zip, or none
    #[arg(long)]
    pub compression: Option<String>,

    /// Backup mode: full or incremental
    #[arg(long)]
    pub backup_mode: Option<String>,

    /// Days to keep old archives (non-negative)
    #[arg(long)]
    pub retention_days: Option<u32>,

    /// Enable or disable GPG encryption of archives
    #[arg(long)]
    pub encryption: Option<bool>,

    /// GPG recipient key id
    #[arg(long)]
    pub gpg_recipient: Option<String>,

    /// Enable or disable email notifications
    #[arg(long)]
    pub email_notify: Option<bool>,

    /// Notification address
    #[arg(long)]
    pub email_address: Option<String>,

    /// Notification subject prefix
    #[arg(long)]
    pub email_subject_prefix: Option<String>,

    /// Enable or disable the rclone cloud upload
    #[arg(long)]
    pub cloud_backup: Option<bool>,

    /// Rclone remote name
    #[arg(long)]
    pub rclone_remote_name: Option<String>,

    /// Path on the cloud remote
    #[arg(long)]
    pub rclone_remote_path: Option<String>,

    /// Delete the local archive after a successful upload
    #[arg(long)]
    pub delete_local_after_upload: Option<bool>,
}
