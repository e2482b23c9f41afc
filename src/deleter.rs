//! Safe removal of purged backup groups
//!
//! Installer archives can be shared between several backups of the same app,
//! because Titanium Backup skips re-archiving an unchanged package. Before
//! anything is removed, every installer referenced by a kept backup is
//! collected into a protected set, and each purged backup only removes its
//! files minus that set.

use crate::backup::{format_timestamp, BackupGroup};
use crate::error::{Result, TbpurgeError};
use crate::selector::AppRetention;
use chrono::NaiveDateTime;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// What happened to one file of a purged backup
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum FileAction {
    /// Removed, or would be removed in a dry run
    Removed { path: PathBuf },
    /// Gone before we got to it, usually removed earlier in this run
    AlreadyGone { path: PathBuf },
    /// Installer still used by the kept backup taken at `kept_for`
    Preserved {
        path: PathBuf,
        kept_for: NaiveDateTime,
    },
}

/// Outcome of purging one backup group
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PurgedGroup {
    pub timestamp: NaiveDateTime,
    pub actions: Vec<FileAction>,
}

/// Files a purged group may remove, decided before anything is touched
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PurgePlan<'a> {
    pub group: &'a BackupGroup,
    pub delete: BTreeSet<PathBuf>,
    /// Installer withheld from deletion, with the kept backup that needs it
    pub preserved: Option<(PathBuf, NaiveDateTime)>,
}

/// Installers referenced by kept backups, mapped to the newest kept backup using each
pub fn protected_installers(kept: &[BackupGroup]) -> BTreeMap<PathBuf, NaiveDateTime> {
    let mut protected = BTreeMap::new();
    for group in kept {
        if let Some(installer) = &group.installer_file {
            let kept_for = protected.entry(installer.clone()).or_insert(group.timestamp);
            if group.timestamp > *kept_for {
                *kept_for = group.timestamp;
            }
        }
    }
    protected
}

/// Resolve installer sharing for one app and plan each purged group's removals
pub fn plan_purge(retention: &AppRetention) -> Vec<PurgePlan<'_>> {
    let protected = protected_installers(&retention.kept);

    retention
        .purged
        .iter()
        .map(|group| {
            let delete = group
                .files
                .iter()
                .filter(|path| !protected.contains_key(*path))
                .cloned()
                .collect();
            let preserved = group.installer_file.as_ref().and_then(|installer| {
                protected
                    .get(installer)
                    .map(|kept_for| (installer.clone(), *kept_for))
            });
            PurgePlan {
                group,
                delete,
                preserved,
            }
        })
        .collect()
}

/// Removes the files of purged groups, or only reports them in a dry run.
///
/// Paths removed earlier in the same run are remembered, so a dry run reports
/// exactly what a real run would do.
#[derive(Debug, Default)]
pub struct SafeDeleter {
    dry_run: bool,
    removed: HashSet<PathBuf>,
}

impl SafeDeleter {
    pub fn new(dry_run: bool) -> Self {
        Self {
            dry_run,
            removed: HashSet::new(),
        }
    }

    /// Purge every non-kept backup of one app, newest first.
    ///
    /// Results are appended to `purged` as files are handled, so on a fatal
    /// error it still holds everything done before the failure, including the
    /// partial group that failed.
    pub fn purge_app(
        &mut self,
        retention: &AppRetention,
        purged: &mut Vec<PurgedGroup>,
    ) -> Result<()> {
        for plan in plan_purge(retention) {
            let mut group = PurgedGroup {
                timestamp: plan.group.timestamp,
                actions: Vec::with_capacity(plan.delete.len() + 1),
            };
            let result = self.execute(&plan, &mut group.actions);
            purged.push(group);
            result?;
        }
        Ok(())
    }

    /// Handle one purge plan, appending an action per file to `actions`
    pub fn execute(
        &mut self,
        plan: &PurgePlan<'_>,
        actions: &mut Vec<FileAction>,
    ) -> Result<()> {
        log::debug!(
            "Purging {} {}",
            plan.group.app_name,
            plan.group.display_timestamp()
        );

        for path in &plan.delete {
            actions.push(self.remove(path)?);
        }

        if let Some((path, kept_for)) = &plan.preserved {
            log::debug!(
                "Preserving {} for backup {}",
                path.display(),
                format_timestamp(kept_for)
            );
            actions.push(FileAction::Preserved {
                path: path.clone(),
                kept_for: *kept_for,
            });
        }

        Ok(())
    }

    fn remove(&mut self, path: &Path) -> Result<FileAction> {
        if self.removed.contains(path) || !path.exists() {
            log::debug!("Already gone: {}", path.display());
            return Ok(FileAction::AlreadyGone {
                path: path.to_path_buf(),
            });
        }

        if !self.dry_run {
            if let Err(source) = fs::remove_file(path) {
                if source.kind() == ErrorKind::NotFound {
                    return Ok(FileAction::AlreadyGone {
                        path: path.to_path_buf(),
                    });
                }
                return Err(TbpurgeError::RemoveFile {
                    path: path.to_path_buf(),
                    source,
                });
            }
        }

        log::debug!(
            "{} {}",
            if self.dry_run { "Would remove" } else { "Removed" },
            path.display()
        );
        self.removed.insert(path.to_path_buf());
        Ok(FileAction::Removed {
            path: path.to_path_buf(),
        })
    }
}
