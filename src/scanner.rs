//! Directory scanning and backup group construction

use crate::backup::{parse_backup_name, BackupGroup};
use crate::error::{Result, TbpurgeError};
use crate::progress::ProgressReporter;
use crate::{APK_MD5_KEY, METADATA_EXTENSION};
use std::collections::BTreeSet;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::ops::Bound;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// File names directly inside a backup directory, in name order
#[derive(Debug, Clone)]
pub struct DirectoryListing {
    dir: PathBuf,
    names: BTreeSet<String>,
}

impl DirectoryListing {
    /// List the regular files of `dir` without descending into subdirectories
    pub fn read(dir: &Path) -> Result<Self> {
        let mut names = BTreeSet::new();

        for entry in WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }
            match entry.file_name().to_str() {
                Some(name) => {
                    names.insert(name.to_string());
                }
                None => log::warn!("Skipping non UTF-8 file name: {}", entry.path().display()),
            }
        }

        log::debug!("Found {} files in {}", names.len(), dir.display());

        Ok(Self {
            dir: dir.to_path_buf(),
            names,
        })
    }

    /// Build a listing from known names, without touching the filesystem
    pub fn from_names<I, S>(dir: &Path, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            dir: dir.to_path_buf(),
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    /// All names starting with `prefix`, in name order
    pub fn with_prefix<'a>(&'a self, prefix: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.names
            .range::<str, _>((Bound::Included(prefix), Bound::Unbounded))
            .take_while(move |name| name.starts_with(prefix))
            .map(String::as_str)
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }
}

/// Builds backup groups from a directory of Titanium Backup files
#[derive(Debug, Clone, Default)]
pub struct BackupScanner {
    strict: bool,
}

impl BackupScanner {
    /// `strict` makes an unresolvable installer reference fatal
    pub fn new(strict: bool) -> Self {
        Self { strict }
    }

    /// Scan `dir` and return one group per metadata file, in file name order
    pub fn scan(&self, dir: &Path, progress: &mut ProgressReporter) -> Result<Vec<BackupGroup>> {
        let listing = DirectoryListing::read(dir)?;
        let groups = self.scan_listing(&listing, progress)?;
        let message = format!(
            "Scanned {} files, found {} backups",
            progress.scanned(),
            groups.len()
        );
        progress.finish_scan(&message);
        Ok(groups)
    }

    /// Build groups from an existing listing. Metadata files are still read from disk.
    pub fn scan_listing(
        &self,
        listing: &DirectoryListing,
        progress: &mut ProgressReporter,
    ) -> Result<Vec<BackupGroup>> {
        let suffix = format!(".{}", METADATA_EXTENSION);
        let mut groups = Vec::new();

        for name in listing.names() {
            progress.file_scanned(&listing.path(name));
            if let Some(base) = name.strip_suffix(suffix.as_str()) {
                groups.push(self.build_group(listing, name, base)?);
            }
        }

        Ok(groups)
    }

    fn build_group(
        &self,
        listing: &DirectoryListing,
        metadata_name: &str,
        base: &str,
    ) -> Result<BackupGroup> {
        let metadata_file = listing.path(metadata_name);
        let (app_name, timestamp) = parse_backup_name(base, &metadata_file)?;

        let member_prefix = format!("{}.", base);
        let members: Vec<&str> = listing.with_prefix(&member_prefix).collect();

        let data_archives: Vec<&str> = members
            .iter()
            .copied()
            .filter(|name| name[member_prefix.len()..].starts_with("tar."))
            .collect();
        let data_file = match data_archives.as_slice() {
            [single] => listing.path(single),
            other => {
                return Err(TbpurgeError::DataArchive {
                    metadata: metadata_file,
                    found: other.len(),
                })
            }
        };

        let apk_md5 = read_apk_md5(&metadata_file)?;
        let installer_file = match &apk_md5 {
            Some(md5) => self.resolve_installer(listing, &app_name, md5, &metadata_file)?,
            None => None,
        };

        let mut files: BTreeSet<PathBuf> =
            members.iter().map(|name| listing.path(name)).collect();
        if let Some(installer) = &installer_file {
            files.insert(installer.clone());
        }

        let group = BackupGroup {
            app_name,
            timestamp,
            metadata_file,
            data_file,
            apk_md5,
            installer_file,
            files,
        };
        if group.is_misc_data() {
            log::debug!("{} has no installer, treating as data only", metadata_name);
        }
        Ok(group)
    }

    fn resolve_installer(
        &self,
        listing: &DirectoryListing,
        app_name: &str,
        md5: &str,
        metadata_file: &Path,
    ) -> Result<Option<PathBuf>> {
        let prefix = format!("{}-{}.apk.", app_name, md5);
        let mut matches = listing.with_prefix(&prefix);

        let Some(first) = matches.next() else {
            if self.strict {
                return Err(TbpurgeError::MissingInstaller {
                    metadata: metadata_file.to_path_buf(),
                    pattern: format!("{}*", prefix),
                });
            }
            log::warn!(
                "No installer matching {}* for {}, keeping it as a data only backup",
                prefix,
                metadata_file.display()
            );
            return Ok(None);
        };

        let extra = matches.count();
        if extra > 0 {
            log::warn!(
                "Found {} installers matching {}*, using {}",
                extra + 1,
                prefix,
                first
            );
        }

        Ok(Some(listing.path(first)))
    }
}

/// Read the installer md5 from a metadata file, if it has one
pub fn read_apk_md5(path: &Path) -> Result<Option<String>> {
    let reader = BufReader::new(File::open(path)?);
    apk_md5_from_reader(reader)
}

/// Look for an `app_apk_md5=<hash>` line. An empty value counts as absent.
pub fn apk_md5_from_reader<R: BufRead>(reader: R) -> Result<Option<String>> {
    for line in reader.split(b'\n') {
        let line = line?;
        let line = String::from_utf8_lossy(&line);
        if let Some((key, value)) = line.split_once('=') {
            if key.trim() == APK_MD5_KEY {
                let value = value.trim();
                return Ok((!value.is_empty()).then(|| value.to_string()));
            }
        }
    }
    Ok(None)
}
