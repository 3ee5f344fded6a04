use thiserror::Error;

#[derive(Error, Debug)]
pub enum VaultError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid log file name: {0}")]
    InvalidLogName(String),

    #[error("log file not found: {0}")]
    LogNotFound(String),

    #[error("backup destination directory not configured")]
    PathNotConfigured,

    #[error("path not found for disk usage: {0}")]
    PathNotFound(String),

    #[error("run-history log error: {0}")]
    Csv(String),
}

impl From<csv::Error> for VaultError {
    fn from(err: csv::Error) -> Self {
        VaultError::Csv(err.to_string())
    }
}
