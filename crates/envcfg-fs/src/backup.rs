//! Timestamped backups of destination files
//!
//! A backup is a byte-for-byte copy of a destination taken before the
//! pipeline mutates it. Backups are named `<file>.<timestamp>.bak` and live
//! next to the destination unless a backup directory is configured.
//! They are never deleted by this crate.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use crate::{Error, Result, io};

/// Timestamp layout used in backup file names (UTC, millisecond precision)
const TIMESTAMP_FORMAT: &str = "%Y%m%dT%H%M%S%.3fZ";

/// A backup taken of a destination file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Backup {
    /// The file that was backed up
    pub original: PathBuf,
    /// Where the copy was written
    pub path: PathBuf,
    /// When the copy was taken
    pub created: DateTime<Utc>,
}

/// Creates and restores destination backups
#[derive(Debug, Clone, Default)]
pub struct BackupStore {
    /// Directory for backups; `None` places them beside the original
    dir: Option<PathBuf>,
}

impl BackupStore {
    /// Store that writes backups beside the file being backed up.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store that writes all backups into `dir`.
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: Some(dir.into()),
        }
    }

    /// Compute the backup path for `original` at time `at`.
    pub fn backup_path(&self, original: &Path, at: DateTime<Utc>) -> Result<PathBuf> {
        let file_name = original.file_name().ok_or_else(|| Error::NoFileName {
            path: original.to_path_buf(),
        })?;
        let name = format!(
            "{}.{}.bak",
            file_name.to_string_lossy(),
            at.format(TIMESTAMP_FORMAT)
        );

        Ok(match &self.dir {
            Some(dir) => dir.join(name),
            None => original.with_file_name(name),
        })
    }

    /// Back up `original` if it has content.
    ///
    /// Returns `None` when the file is missing or empty.
    pub fn create(&self, original: &Path) -> Result<Option<Backup>> {
        let Some(content) = io::read_existing(original)? else {
            tracing::debug!(path = %original.display(), "nothing to back up");
            return Ok(None);
        };

        let created = Utc::now();
        let path = self.backup_path(original, created)?;
        io::write_atomic(&path, &content)?;

        tracing::info!(
            original = %original.display(),
            backup = %path.display(),
            "created backup"
        );

        Ok(Some(Backup {
            original: original.to_path_buf(),
            path,
            created,
        }))
    }

    /// Put the backed-up bytes back in place.
    ///
    /// The original is only rewritten when its current content differs from
    /// the backup. Returns whether a write happened.
    pub fn restore(&self, backup: &Backup) -> Result<bool> {
        let saved = std::fs::read(&backup.path).map_err(|e| Error::io(&backup.path, e))?;
        let current = io::read_existing(&backup.original)?;

        if current.as_deref() == Some(saved.as_slice()) {
            tracing::debug!(path = %backup.original.display(), "destination already matches backup");
            return Ok(false);
        }

        io::write_atomic(&backup.original, &saved)?;
        tracing::info!(
            original = %backup.original.display(),
            backup = %backup.path.display(),
            "restored backup"
        );
        Ok(true)
    }
}
