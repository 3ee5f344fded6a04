use std::env;
use std::path::PathBuf;

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

/// Filesystem layout shared by the external backup shell tool, the editor,
/// and the dashboard. Passed explicitly into every adapter constructor.
#[derive(Debug, Clone)]
pub struct VaultPaths {
    pub app_dir: PathBuf,
}

impl VaultPaths {
    pub fn new(app_dir: impl Into<PathBuf>) -> Self {
        Self {
            app_dir: app_dir.into(),
        }
    }

    /// Resolve the app directory from `BACKUPVAULT_DIR`, falling back to
    /// `~/.backupvault` (call `load_dotenv()` first).
    pub fn from_env() -> Self {
        let app_dir = match env::var("BACKUPVAULT_DIR") {
            Ok(dir) if !dir.is_empty() => PathBuf::from(dir),
            _ => dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".backupvault"),
        };
        Self { app_dir }
    }

    /// The flat key/value config file sourced by the shell tool.
    pub fn conf_path(&self) -> PathBuf {
        self.app_dir.join("backupvault.conf")
    }

    /// The CSV run-history log the shell tool appends to.
    pub fn runs_log_path(&self) -> PathBuf {
        self.app_dir.join("logs").join("backup_runs.csv")
    }

    /// Directory of per-run detailed log files (`run_*.log`).
    pub fn details_dir(&self) -> PathBuf {
        self.app_dir.join("logs").join("details")
    }
}
