//! # tbpurge
//!
//! Keeps only the newest backups per app in a flat Titanium Backup directory
//! and removes the rest, without ever deleting an installer archive that a
//! kept backup still points at.

pub mod backup;
pub mod cli;
pub mod commands;
pub mod deleter;
pub mod engine;
pub mod error;
pub mod output;
pub mod progress;
pub mod scanner;
pub mod selector;

pub use backup::BackupGroup;
pub use deleter::{FileAction, SafeDeleter};
pub use engine::RetentionEngine;
pub use error::{Result, TbpurgeError};
pub use output::PurgeReport;
pub use scanner::BackupScanner;
pub use selector::AppRetention;

/// Extension of Titanium Backup metadata files
pub const METADATA_EXTENSION: &str = "properties";

/// Metadata key holding the md5 of the installer archive
pub const APK_MD5_KEY: &str = "app_apk_md5";

/// Timestamp layout embedded in backup file names
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d-%H%M%S";

/// Timestamp layout used in console output
pub const DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Default number of backups kept per app
pub const DEFAULT_KEEP: usize = 1;

/// Options controlling a purge run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PurgeOptions {
    /// Number of newest backups to keep per app
    pub keep: usize,
    /// Report what would be removed without touching the filesystem
    pub dry_run: bool,
    /// Treat an unresolvable installer reference as fatal
    pub strict: bool,
}

impl Default for PurgeOptions {
    fn default() -> Self {
        Self {
            keep: DEFAULT_KEEP,
            dry_run: false,
            strict: false,
        }
    }
}

impl PurgeOptions {
    pub fn validate(&self) -> Result<()> {
        if self.keep == 0 {
            return Err(TbpurgeError::invalid_input(
                "Keep at least one backup, or you might as well just delete the whole directory",
            ));
        }
        Ok(())
    }
}
