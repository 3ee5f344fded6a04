//! Shared per-process state handed to every request handler.
//!
//! Nothing here is mutable: each request re-reads the files on disk, so the
//! only shared state is the resolved path layout and the store handles.

use backupvault_core::{ConfigStore, HistoryStore, VaultPaths};

use crate::logs::DetailLogStore;

pub struct AppState {
    pub config_store: ConfigStore,
    pub history_store: HistoryStore,
    pub detail_logs: DetailLogStore,
}

impl AppState {
    pub fn new(paths: &VaultPaths) -> Self {
        Self {
            config_store: ConfigStore::new(paths),
            history_store: HistoryStore::new(paths),
            detail_logs: DetailLogStore::new(paths),
        }
    }
}
