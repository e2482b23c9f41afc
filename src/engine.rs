//! Retention engine: scan, select, then safely delete

use crate::backup::BackupGroup;
use crate::deleter::SafeDeleter;
use crate::error::Result;
use crate::output::{AppReport, PurgeReport};
use crate::progress::ProgressReporter;
use crate::scanner::BackupScanner;
use crate::selector;
use crate::PurgeOptions;
use std::path::Path;

/// Runs one purge pass over a backup directory
#[derive(Debug, Clone)]
pub struct RetentionEngine {
    options: PurgeOptions,
}

impl RetentionEngine {
    pub fn new(options: PurgeOptions) -> Result<Self> {
        options.validate()?;
        Ok(Self { options })
    }

    /// Purge `dir`, calling `on_app` as soon as each app is done.
    ///
    /// Stops at the first fatal error. Files removed before that stay removed.
    pub fn run<F>(
        &self,
        dir: &Path,
        progress: &mut ProgressReporter,
        on_app: F,
    ) -> Result<PurgeReport>
    where
        F: FnMut(&AppReport),
    {
        let scanner = BackupScanner::new(self.options.strict);
        let groups = scanner.scan(dir, progress)?;
        log::info!("Found {} backups in {}", groups.len(), dir.display());

        self.purge(dir, groups, on_app)
    }

    /// Select and purge already scanned groups.
    ///
    /// When a removal fails, `on_app` still receives the partial report of the
    /// failing app before the error is returned.
    pub fn purge<F>(
        &self,
        dir: &Path,
        groups: Vec<BackupGroup>,
        mut on_app: F,
    ) -> Result<PurgeReport>
    where
        F: FnMut(&AppReport),
    {
        let retentions = selector::select(groups, self.options.keep);
        let mut deleter = SafeDeleter::new(self.options.dry_run);
        let mut report =
            PurgeReport::new(dir.to_path_buf(), self.options.keep, self.options.dry_run);

        for retention in &retentions {
            log::debug!(
                "{}: {} backups, keeping {}",
                retention.app_name,
                retention.total(),
                retention.kept.len()
            );

            let mut purged = Vec::new();
            let result = deleter.purge_app(retention, &mut purged);
            let app = AppReport {
                app_name: retention.app_name.clone(),
                kept: retention.kept.iter().map(|group| group.timestamp).collect(),
                purged,
            };
            on_app(&app);
            report.apps.push(app);
            result?;
        }

        Ok(report)
    }
}
