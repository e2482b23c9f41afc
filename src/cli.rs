//! Command-line interface for tbpurge

use crate::PurgeOptions;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "tbpurge")]
#[command(about = "Purge Titanium Backup directory to only keep newest backup(s) for each app")]
#[command(version)]
pub struct Cli {
    /// Path to TB directory. Defaults to current directory.
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Number of newest backups to keep per app
    #[arg(short, long, default_value = "1", value_parser = validate_keep)]
    pub keep: usize,

    /// Only show what would be deleted
    #[arg(short, long)]
    pub dryrun: bool,

    /// Abort when a backup references an installer that doesn't exist
    #[arg(long)]
    pub strict: bool,

    /// Output the purge report as JSON
    #[arg(long)]
    pub json: bool,

    /// Don't show scan progress
    #[arg(short, long)]
    pub quiet: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub fn options(&self) -> PurgeOptions {
        PurgeOptions {
            keep: self.keep,
            dry_run: self.dryrun,
            strict: self.strict,
        }
    }
}

/// Validate that keep is at least 1
fn validate_keep(s: &str) -> Result<usize, String> {
    let keep: usize = s
        .parse()
        .map_err(|_| format!("Invalid keep count: '{}'. Must be a positive integer.", s))?;

    if keep == 0 {
        return Err(
            "Keep at least one backup, or you might as well just delete the whole directory"
                .to_string(),
        );
    }

    Ok(keep)
}
