//! Disk-usage query for the configured backup destination.

use std::path::{Path, PathBuf};

use serde::Serialize;
use sysinfo::Disks;

use backupvault_core::VaultError;

pub const GB: f64 = (1024u64 * 1024 * 1024) as f64;

/// Usage figures for the volume holding the backup destination.
#[derive(Debug, Clone, Serialize)]
pub struct StorageUsage {
    pub configured_path: String,
    /// Nearest existing ancestor that was actually measured.
    pub path_checked: String,
    pub total_gb: f64,
    pub used_gb: f64,
    pub free_gb: f64,
    pub percent_used: f64,
}

/// Resolve usage for `configured`, walking up to the nearest existing
/// ancestor when the destination has not been created yet, then matching
/// the volume with the longest mount-point prefix.
pub fn disk_usage(configured: &str) -> Result<StorageUsage, VaultError> {
    if configured.trim().is_empty() {
        return Err(VaultError::PathNotConfigured);
    }
    let target = nearest_existing(Path::new(configured))
        .ok_or_else(|| VaultError::PathNotFound(configured.to_string()))?;

    let disks = Disks::new_with_refreshed_list();
    let disk = disks
        .iter()
        .filter(|d| target.starts_with(d.mount_point()))
        .max_by_key(|d| d.mount_point().as_os_str().len())
        .ok_or_else(|| VaultError::PathNotFound(configured.to_string()))?;

    let total = disk.total_space();
    let free = disk.available_space();
    let used = total.saturating_sub(free);
    let percent_used = if total > 0 {
        round1(used as f64 / total as f64 * 100.0)
    } else {
        0.0
    };

    Ok(StorageUsage {
        configured_path: configured.to_string(),
        path_checked: target.display().to_string(),
        total_gb: round2(total as f64 / GB),
        used_gb: round2(used as f64 / GB),
        free_gb: round2(free as f64 / GB),
        percent_used,
    })
}

fn nearest_existing(path: &Path) -> Option<PathBuf> {
    path.ancestors()
        .find(|p| !p.as_os_str().is_empty() && p.exists())
        .map(Path::to_path_buf)
}

pub fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}
