//! Main entry point for tbpurge CLI

use clap::Parser;
use tbpurge::cli::Cli;
use tbpurge::commands::execute_command;

fn main() {
    // Parse command line arguments
    let cli = Cli::parse();

    // Initialize logging, RUST_LOG still takes precedence
    let level = if cli.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    if let Err(e) = execute_command(&cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
