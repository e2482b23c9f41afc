//! Backup group model and backup file name parsing

use crate::error::{Result, TbpurgeError};
use crate::{DISPLAY_FORMAT, TIMESTAMP_FORMAT};
use chrono::NaiveDateTime;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// `<name>-<YYYYMMDD-HHMMSS>`, where the name is word characters and dots
static BACKUP_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([\w.]+)-(\d{8}-\d{6})$").expect("valid backup name regex"));

/// One backup of one app at one point in time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupGroup {
    /// App identity, e.g. `com.example.app`
    pub app_name: String,
    /// When the backup was taken
    pub timestamp: NaiveDateTime,
    /// The `.properties` metadata file
    pub metadata_file: PathBuf,
    /// The `.tar.<ext>` data archive
    pub data_file: PathBuf,
    /// Installer md5 read from the metadata, if the backup has one
    pub apk_md5: Option<String>,
    /// Installer archive, possibly shared with other backups of the same app
    pub installer_file: Option<PathBuf>,
    /// Every file on disk belonging to this backup, installer included
    pub files: BTreeSet<PathBuf>,
}

impl BackupGroup {
    /// Backups without an installer only hold data (e.g. system settings)
    pub fn is_misc_data(&self) -> bool {
        self.installer_file.is_none()
    }

    pub fn display_timestamp(&self) -> String {
        format_timestamp(&self.timestamp)
    }
}

/// Split a backup base name into app name and timestamp.
///
/// `path` is only used for error reporting.
pub fn parse_backup_name(base: &str, path: &Path) -> Result<(String, NaiveDateTime)> {
    let captures = BACKUP_NAME
        .captures(base)
        .ok_or_else(|| TbpurgeError::invalid_backup_name(path))?;

    let name = captures[1].to_string();
    let timestamp = NaiveDateTime::parse_from_str(&captures[2], TIMESTAMP_FORMAT).map_err(
        |source| TbpurgeError::InvalidTimestamp {
            path: path.to_path_buf(),
            source,
        },
    )?;

    Ok((name, timestamp))
}

pub fn format_timestamp(timestamp: &NaiveDateTime) -> String {
    timestamp.format(DISPLAY_FORMAT).to_string()
}
