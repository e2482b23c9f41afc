//! Purge report and output formatting

use crate::backup::format_timestamp;
use crate::deleter::{FileAction, PurgedGroup};
use crate::error::Result;
use chrono::NaiveDateTime;
use serde::Serialize;
use std::path::PathBuf;

/// Everything a purge run decided and did
#[derive(Debug, Clone, Default, Serialize)]
pub struct PurgeReport {
    pub path: PathBuf,
    pub keep: usize,
    pub dry_run: bool,
    pub apps: Vec<AppReport>,
}

/// Decisions for one app
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppReport {
    pub app_name: String,
    /// Newest first
    pub kept: Vec<NaiveDateTime>,
    /// Newest first
    pub purged: Vec<PurgedGroup>,
}

/// Totals over a whole report
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PurgeSummary {
    pub apps: usize,
    pub kept_groups: usize,
    pub purged_groups: usize,
    pub files_removed: usize,
    pub files_already_gone: usize,
    pub installers_preserved: usize,
}

impl PurgeReport {
    pub fn new(path: PathBuf, keep: usize, dry_run: bool) -> Self {
        Self {
            path,
            keep,
            dry_run,
            apps: Vec::new(),
        }
    }

    pub fn actions(&self) -> impl Iterator<Item = &FileAction> {
        self.apps
            .iter()
            .flat_map(|app| app.purged.iter())
            .flat_map(|group| group.actions.iter())
    }

    /// Paths removed, or that would be removed in a dry run
    pub fn removed_paths(&self) -> Vec<PathBuf> {
        let mut paths: Vec<PathBuf> = self
            .actions()
            .filter_map(|action| match action {
                FileAction::Removed { path } => Some(path.clone()),
                _ => None,
            })
            .collect();
        paths.sort();
        paths
    }

    pub fn summary(&self) -> PurgeSummary {
        let mut summary = PurgeSummary {
            apps: self.apps.len(),
            ..PurgeSummary::default()
        };
        for app in &self.apps {
            summary.kept_groups += app.kept.len();
            summary.purged_groups += app.purged.len();
        }
        for action in self.actions() {
            match action {
                FileAction::Removed { .. } => summary.files_removed += 1,
                FileAction::AlreadyGone { .. } => summary.files_already_gone += 1,
                FileAction::Preserved { .. } => summary.installers_preserved += 1,
            }
        }
        summary
    }
}

/// Pretty printer for tbpurge output
pub struct PrettyPrinter;

impl PrettyPrinter {
    pub fn print_dry_run_banner() {
        println!("🔍 Dry run - nothing will be removed");
        println!();
    }

    /// Print the decisions for one app
    pub fn print_app(app: &AppReport) {
        println!("{}", app.app_name);

        let lines = app.kept.len() + app.purged.len();
        let mut line = 0;
        let mut branch = || {
            line += 1;
            if line == lines {
                ("└─", "   ")
            } else {
                ("├─", "│  ")
            }
        };

        for kept in &app.kept {
            let (prefix, _) = branch();
            println!("{} keeping {}", prefix, format_timestamp(kept));
        }

        for group in &app.purged {
            let (prefix, indent) = branch();
            println!("{} deleting {}", prefix, format_timestamp(&group.timestamp));
            for (i, action) in group.actions.iter().enumerate() {
                let file_prefix = if i == group.actions.len() - 1 { "└─" } else { "├─" };
                println!("{}{} {}", indent, file_prefix, format_action(action));
            }
        }

        println!();
    }

    pub fn print_summary(summary: &PurgeSummary, dry_run: bool) {
        let verb = if dry_run { "Would remove" } else { "Removed" };
        println!(
            "📊 {} apps, {} backups kept, {} backups purged",
            summary.apps, summary.kept_groups, summary.purged_groups
        );
        println!("├─ {}: {} files", verb, summary.files_removed);
        println!("├─ Already gone: {} files", summary.files_already_gone);
        println!("└─ Installers preserved: {}", summary.installers_preserved);
    }
}

/// One line per file: `rm`, `--` already gone, `++` preserved
pub fn format_action(action: &FileAction) -> String {
    match action {
        FileAction::Removed { path } => format!("rm {}", path.display()),
        FileAction::AlreadyGone { path } => format!("-- {} (already removed)", path.display()),
        FileAction::Preserved { path, kept_for } => format!(
            "++ {} (kept for backup {})",
            path.display(),
            format_timestamp(kept_for)
        ),
    }
}

/// JSON formatter for machine-readable output
pub struct JsonFormatter;

impl JsonFormatter {
    pub fn format_report(report: &PurgeReport) -> Result<String> {
        #[derive(Serialize)]
        struct Output<'a> {
            #[serde(flatten)]
            report: &'a PurgeReport,
            summary: PurgeSummary,
        }

        Ok(serde_json::to_string_pretty(&Output {
            report,
            summary: report.summary(),
        })?)
    }
}
