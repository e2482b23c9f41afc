//! Error types for tbpurge operations

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, TbpurgeError>;

#[derive(Error, Debug)]
pub enum TbpurgeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Walkdir error: {0}")]
    WalkDir(#[from] walkdir::Error),

    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    #[error("Couldn't parse app name and date from backup: {path}")]
    InvalidBackupName { path: PathBuf },

    #[error("Invalid backup timestamp in {path}: {source}")]
    InvalidTimestamp {
        path: PathBuf,
        #[source]
        source: chrono::ParseError,
    },

    #[error("Expected exactly one data archive for {metadata}, but found {found}")]
    DataArchive { metadata: PathBuf, found: usize },

    #[error("Expected apk file {pattern} for {metadata} doesn't exist")]
    MissingInstaller { metadata: PathBuf, pattern: String },

    #[error("Failed to remove {path}: {source}")]
    RemoveFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl TbpurgeError {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: msg.into(),
        }
    }

    pub fn invalid_backup_name(path: impl Into<PathBuf>) -> Self {
        Self::InvalidBackupName { path: path.into() }
    }
}
