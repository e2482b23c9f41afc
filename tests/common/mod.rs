//! Common test utilities and helpers

use std::fs;
use std::path::{Path, PathBuf};
use tbpurge::{PurgeReport, Result};
use tempfile::TempDir;

/// Temporary Titanium Backup directory
pub struct TestFixture {
    pub temp_dir: TempDir,
}

impl TestFixture {
    pub fn new() -> Result<Self> {
        Ok(Self {
            temp_dir: TempDir::new()?,
        })
    }

    /// Get the root path of the test fixture
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.root().join(name)
    }

    /// Create a metadata file and data archive for `<app>-<stamp>`.
    ///
    /// `md5` is written as the `app_apk_md5` line when given.
    pub fn create_backup(&self, app: &str, stamp: &str, md5: Option<&str>) -> Result<Vec<PathBuf>> {
        let base = format!("{}-{}", app, stamp);
        let metadata = self.path(&format!("{}.properties", base));
        let data = self.path(&format!("{}.tar.gz", base));

        let mut content = format!("#Titanium Backup\napp_gui_label={}\n", app);
        if let Some(md5) = md5 {
            content.push_str(&format!("app_apk_md5={}\n", md5));
        }
        content.push_str("sys_time=0\n");

        fs::write(&metadata, content)?;
        fs::write(&data, b"data")?;
        Ok(vec![metadata, data])
    }

    /// Create the installer archive `<app>-<md5>.apk.gz`
    pub fn create_installer(&self, app: &str, md5: &str) -> Result<PathBuf> {
        let path = self.path(&format!("{}-{}.apk.gz", app, md5));
        fs::write(&path, b"apk")?;
        Ok(path)
    }

    /// Create a full app backup with its installer
    pub fn create_app_backup(&self, app: &str, stamp: &str, md5: &str) -> Result<Vec<PathBuf>> {
        let mut files = self.create_backup(app, stamp, Some(md5))?;
        files.push(self.create_installer(app, md5)?);
        Ok(files)
    }

    /// File names currently in the directory, sorted
    pub fn file_names(&self) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(self.root())
            .expect("read fixture dir")
            .map(|entry| entry.expect("dir entry").file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }
}

/// Runs tbpurge commands against a fixture directory
pub struct CliTestRunner {
    fixture: TestFixture,
}

impl CliTestRunner {
    pub fn new() -> Result<Self> {
        Ok(Self {
            fixture: TestFixture::new()?,
        })
    }

    pub fn fixture(&self) -> &TestFixture {
        &self.fixture
    }

    /// Run tbpurge on the fixture directory with extra arguments
    pub fn run_command(&self, args: &[&str]) -> Result<PurgeReport> {
        let root = self.fixture.root().to_string_lossy().into_owned();
        let mut cmd_args = vec!["tbpurge", root.as_str(), "--quiet"];
        cmd_args.extend(args);
        run_args(&cmd_args)
    }

    /// Run a command and expect it to succeed
    pub fn expect_success(&self, args: &[&str]) -> PurgeReport {
        self.run_command(args).expect("Command should succeed")
    }

    /// Run a command and expect it to fail
    pub fn expect_failure(&self, args: &[&str]) -> tbpurge::TbpurgeError {
        self.run_command(args).expect_err("Command should fail")
    }
}

/// Parse a full command line and execute it
pub fn run_args(args: &[&str]) -> Result<PurgeReport> {
    use clap::Parser;
    use tbpurge::cli::Cli;
    use tbpurge::commands::execute_command;

    let cli = Cli::try_parse_from(args)
        .map_err(|e| tbpurge::TbpurgeError::invalid_input(e.to_string()))?;
    execute_command(&cli)
}

/// Assertion helpers
pub mod assertions {
    use std::path::Path;

    pub fn assert_exists(paths: &[impl AsRef<Path>]) {
        for path in paths {
            let path = path.as_ref();
            assert!(path.exists(), "Expected {} to exist", path.display());
        }
    }

    pub fn assert_missing(paths: &[impl AsRef<Path>]) {
        for path in paths {
            let path = path.as_ref();
            assert!(!path.exists(), "Expected {} to be removed", path.display());
        }
    }
}
