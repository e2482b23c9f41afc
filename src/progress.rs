//! Progress reporting utilities

use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::time::Duration;

/// Progress reporter for directory scans
#[derive(Debug)]
pub struct ProgressReporter {
    pub scan_pb: Option<ProgressBar>,
    scanned: u64,
}

impl ProgressReporter {
    /// Create progress reporter with a scan spinner
    pub fn new_for_scan() -> Self {
        Self {
            scan_pb: Some(create_spinner("Scanning backups...")),
            scanned: 0,
        }
    }

    /// Create minimal progress reporter (no progress bars)
    pub fn new_minimal() -> Self {
        Self {
            scan_pb: None,
            scanned: 0,
        }
    }

    /// Record one scanned file
    pub fn file_scanned(&mut self, path: &Path) {
        self.scanned += 1;
        if let Some(pb) = &self.scan_pb {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            pb.set_message(format!("Scanning {}", name));
            pb.tick();
        }
    }

    pub fn scanned(&self) -> u64 {
        self.scanned
    }

    /// Finish the scan spinner
    pub fn finish_scan(&mut self, message: &str) {
        if let Some(pb) = self.scan_pb.take() {
            pb.finish_with_message(message.to_string());
        }
    }
}

impl Drop for ProgressReporter {
    fn drop(&mut self) {
        if let Some(pb) = self.scan_pb.take() {
            pb.finish_and_clear();
        }
    }
}

/// Create a spinner progress bar
fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
            .template("{spinner:.green} {msg}")
            .expect("Invalid progress template"),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}
