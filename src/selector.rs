//! Per-app ranking of backup groups into kept and purged sets

use crate::backup::BackupGroup;
use std::collections::BTreeMap;

/// Retention decision for the backups of one app
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppRetention {
    pub app_name: String,
    /// Newest first
    pub kept: Vec<BackupGroup>,
    /// Newest first
    pub purged: Vec<BackupGroup>,
}

impl AppRetention {
    pub fn total(&self) -> usize {
        self.kept.len() + self.purged.len()
    }
}

/// Group backups by app name. Scan order is preserved within each app.
pub fn partition_by_app(groups: Vec<BackupGroup>) -> BTreeMap<String, Vec<BackupGroup>> {
    let mut apps: BTreeMap<String, Vec<BackupGroup>> = BTreeMap::new();
    for group in groups {
        apps.entry(group.app_name.clone()).or_default().push(group);
    }
    apps
}

/// Keep the `keep` newest backups of each app and mark the rest for purging.
///
/// Apps come back in name order. Backups with equal timestamps keep their
/// scan order.
pub fn select(groups: Vec<BackupGroup>, keep: usize) -> Vec<AppRetention> {
    partition_by_app(groups)
        .into_iter()
        .map(|(app_name, mut app_groups)| {
            app_groups.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
            let purged = app_groups.split_off(keep.min(app_groups.len()));
            AppRetention {
                app_name,
                kept: app_groups,
                purged,
            }
        })
        .collect()
}
