//! Crash-safe in-place CRLF to LF rewriting.
//!
//! The rewrite never truncates the original file in place. New content
//! is staged at `<path>-temp`, the original is moved aside to
//! `<path>-delete`, the staging file is renamed over the original path,
//! and only then is the moved-aside copy removed. At every point during
//! the attempt the original path resolves to a complete, readable file,
//! and every failure short of the double-rename worst case leaves the
//! original content at its original path.

use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use super::detect::is_crlf_terminated;
use super::lines::LineRecords;

const STAGING_SUFFIX: &str = "-temp";
const BACKUP_SUFFIX: &str = "-delete";

/// Result of a successful rewrite attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RewriteOutcome {
    /// No line needed rewriting; the original file was left untouched.
    Unmodified,
    /// The file content at the original path is now LF-only.
    Modified,
}

/// Failure taxonomy for one rewrite attempt.
///
/// Every variant is local to a single file. The display strings are the
/// user-facing error reports, so each variant states exactly where the
/// file's content ended up.
#[derive(Debug, Error)]
pub enum RewriteError {
    #[error("can't open file {path}: {source}")]
    OpenSource {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("can't create staging file {path}: {source}")]
    CreateStaging {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("can't read file {path}: {source}")]
    ReadSource {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("can't write staging file {path}: {source}")]
    WriteStaging {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The first rename failed, so the original was never moved.
    #[error("can't rename original file {path}: {source}")]
    BackupRename {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The second rename failed but the original was renamed back.
    #[error("can't rename staging file into place: {swap}. Original file {path} was recovered")]
    SwapFailedRestored {
        path: PathBuf,
        #[source]
        swap: io::Error,
    },

    /// The second rename failed and so did the recovery rename. The
    /// original content still exists at `backup` but no longer at
    /// `path`; this is the one case that needs manual intervention.
    #[error(
        "can't rename staging file into place: {swap}. Can't recover original file {path}: {restore}. \
         Original content preserved at {backup}; manual recovery required"
    )]
    SwapFailedUnrecovered {
        path: PathBuf,
        backup: PathBuf,
        swap: io::Error,
        #[source]
        restore: io::Error,
    },

    /// The swap succeeded; only removal of the stale backup failed.
    #[error("file {path} was successfully modified, but stale backup {backup} could not be removed: {source}")]
    BackupCleanup {
        path: PathBuf,
        backup: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl RewriteError {
    /// Whether the original path still resolves to the file's content
    /// (old or new). False only for the unrecovered double-rename case.
    pub fn data_intact(&self) -> bool {
        !matches!(self, RewriteError::SwapFailedUnrecovered { .. })
    }

    /// Whether the rewritten content actually made it to the original
    /// path despite the error.
    pub fn content_rewritten(&self) -> bool {
        matches!(self, RewriteError::BackupCleanup { .. })
    }
}

fn sibling(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(suffix);
    PathBuf::from(name)
}

fn discard_staging(staging_path: &Path) {
    // Best effort: a stale -temp file is inert, never ambiguous.
    if let Err(e) = fs::remove_file(staging_path) {
        debug!(path = %staging_path.display(), error = %e, "could not remove staging file");
    }
}

/// Rewrite every CRLF-terminated line of `path` to LF-only, swapping
/// the new content into place atomically.
///
/// Callers normally gate this on a positive [`has_crlf`] verdict; when
/// invoked on a file with no CRLF lines the staging file is discarded
/// and the original is not touched at all.
///
/// [`has_crlf`]: super::detect::has_crlf
pub fn rewrite_in_place(path: &Path) -> Result<RewriteOutcome, RewriteError> {
    let staging_path = sibling(path, STAGING_SUFFIX);
    let backup_path = sibling(path, BACKUP_SUFFIX);

    let source = File::open(path).map_err(|source| RewriteError::OpenSource {
        path: path.to_path_buf(),
        source,
    })?;
    let permissions = source.metadata().map(|m| m.permissions()).ok();

    let staging = File::create(&staging_path).map_err(|source| RewriteError::CreateStaging {
        path: staging_path.clone(),
        source,
    })?;

    // stage_records consumes both handles, so they are closed before
    // the staging file is discarded on failure (removal of an open
    // file fails on Windows).
    let changed = match stage_records(source, staging, path, &staging_path) {
        Ok(changed) => changed,
        Err(e) => {
            discard_staging(&staging_path);
            return Err(e);
        }
    };

    if !changed {
        debug!(path = %path.display(), "no CRLF lines, discarding staging file");
        discard_staging(&staging_path);
        return Ok(RewriteOutcome::Unmodified);
    }

    // Keep the original's mode instead of the create-call default.
    if let Some(permissions) = permissions {
        if let Err(e) = fs::set_permissions(&staging_path, permissions) {
            debug!(path = %staging_path.display(), error = %e, "could not carry over permissions");
        }
    }

    complete_swap(path, &staging_path, &backup_path)?;
    debug!(path = %path.display(), "rewrote CRLF endings in place");
    Ok(RewriteOutcome::Modified)
}

/// Stream records from `source` into `staging`, rewriting CRLF
/// terminators, and report whether any record changed. Both handles are
/// closed by the time this returns, success or failure.
fn stage_records(
    source: File,
    staging: File,
    path: &Path,
    staging_path: &Path,
) -> Result<bool, RewriteError> {
    let mut writer = BufWriter::new(staging);
    let mut changed = false;

    for record in LineRecords::new(BufReader::new(source)) {
        let mut record = record.map_err(|source| RewriteError::ReadSource {
            path: path.to_path_buf(),
            source,
        })?;

        if is_crlf_terminated(&record) {
            // `...X\r\n` -> `...X\n`: drop the \n, then overwrite the
            // now-final \r.
            record.pop();
            if let Some(last) = record.last_mut() {
                *last = b'\n';
            }
            changed = true;
        }

        writer
            .write_all(&record)
            .map_err(|source| RewriteError::WriteStaging {
                path: staging_path.to_path_buf(),
                source,
            })?;
    }

    writer
        .flush()
        .map_err(|source| RewriteError::WriteStaging {
            path: staging_path.to_path_buf(),
            source,
        })?;

    Ok(changed)
}

/// The two-rename swap with recovery: original aside to `backup_path`,
/// staging into place, backup removed. Split out so the recovery path
/// can be exercised directly with an injected rename failure.
pub(crate) fn complete_swap(
    path: &Path,
    staging_path: &Path,
    backup_path: &Path,
) -> Result<(), RewriteError> {
    // Rename 1: move the original aside. On failure nothing has moved.
    if let Err(source) = fs::rename(path, backup_path) {
        discard_staging(staging_path);
        return Err(RewriteError::BackupRename {
            path: path.to_path_buf(),
            source,
        });
    }

    // Rename 2: staged content becomes live at the original path.
    if let Err(swap) = fs::rename(staging_path, path) {
        return Err(recover_after_swap_failure(
            path,
            staging_path,
            backup_path,
            swap,
        ));
    }

    fs::remove_file(backup_path).map_err(|source| RewriteError::BackupCleanup {
        path: path.to_path_buf(),
        backup: backup_path.to_path_buf(),
        source,
    })
}

/// Try to put the original back after a failed swap rename and report
/// where the content ended up: restored to its path, or stranded at the
/// backup path needing manual recovery.
fn recover_after_swap_failure(
    path: &Path,
    staging_path: &Path,
    backup_path: &Path,
    swap: io::Error,
) -> RewriteError {
    match fs::rename(backup_path, path) {
        Ok(()) => {
            discard_staging(staging_path);
            RewriteError::SwapFailedRestored {
                path: path.to_path_buf(),
                swap,
            }
        }
        Err(restore) => RewriteError::SwapFailedUnrecovered {
            path: path.to_path_buf(),
            backup: backup_path.to_path_buf(),
            swap,
            restore,
        },
    }
}
