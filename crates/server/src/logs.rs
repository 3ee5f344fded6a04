//! Detailed per-run log retrieval with strict filename validation.

use std::fs;
use std::path::PathBuf;

use backupvault_core::{VaultError, VaultPaths};

/// Reads `run_*.log` files from the details directory.
pub struct DetailLogStore {
    details_dir: PathBuf,
}

impl DetailLogStore {
    pub fn new(paths: &VaultPaths) -> Self {
        Self {
            details_dir: paths.details_dir(),
        }
    }

    /// Read one detailed run log. The name must match `run_*.log` with no
    /// path separators and no `..` segments; anything else is rejected
    /// before any file access happens.
    pub fn read(&self, name: &str) -> Result<String, VaultError> {
        if !is_valid_log_name(name) {
            return Err(VaultError::InvalidLogName(name.to_string()));
        }
        let path = self.details_dir.join(name);
        if !path.exists() {
            return Err(VaultError::LogNotFound(name.to_string()));
        }
        Ok(fs::read_to_string(path)?)
    }
}

pub fn is_valid_log_name(name: &str) -> bool {
    name.starts_with("run_")
        && name.ends_with(".log")
        && !name.contains('/')
        && !name.contains('\\')
        && !name.contains("..")
}
