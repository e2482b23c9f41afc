//! Command implementation for the tbpurge CLI

use crate::cli::Cli;
use crate::engine::RetentionEngine;
use crate::error::{Result, TbpurgeError};
use crate::output::{JsonFormatter, PrettyPrinter, PurgeReport};
use crate::progress::ProgressReporter;
use std::path::Path;

/// Run a purge as described by the parsed command line
pub fn execute_command(cli: &Cli) -> Result<PurgeReport> {
    let options = cli.options();
    ensure_directory(&cli.path)?;
    let engine = RetentionEngine::new(options.clone())?;

    let mut progress = if cli.quiet || cli.json {
        ProgressReporter::new_minimal()
    } else {
        ProgressReporter::new_for_scan()
    };

    if options.dry_run && !cli.json {
        PrettyPrinter::print_dry_run_banner();
    }

    let report = engine.run(&cli.path, &mut progress, |app| {
        if !cli.json {
            PrettyPrinter::print_app(app);
        }
    })?;

    if cli.json {
        println!("{}", JsonFormatter::format_report(&report)?);
    } else {
        PrettyPrinter::print_summary(&report.summary(), options.dry_run);
    }

    Ok(report)
}

fn ensure_directory(path: &Path) -> Result<()> {
    if !path.is_dir() {
        return Err(TbpurgeError::invalid_input(format!(
            "{} is not a directory",
            path.display()
        )));
    }
    Ok(())
}
