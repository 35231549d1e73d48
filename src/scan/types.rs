use serde::Serialize;
use std::fmt;

use crate::walk::ExclusionRules;

/// Default worker count when none is configured; small on purpose, the
/// pipeline is I/O bound.
pub const DEFAULT_WORKERS: usize = 5;

/// Configuration for the scanner, passed in explicitly so behavior is
/// deterministic and testable without process-global state.
#[derive(Debug, Clone)]
pub struct ScannerConfig {
    /// Rewrite detected files in place instead of only reporting them.
    pub replace: bool,
    /// Number of worker threads (0 = auto-detect from CPU count).
    pub workers: usize,
    /// Follow symbolic links during traversal.
    pub follow_symlinks: bool,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            replace: false,
            workers: 0,
            follow_symlinks: false,
        }
    }
}

impl ScannerConfig {
    /// Resolve the configured worker count: an explicit value wins,
    /// otherwise the CPU count capped at [`DEFAULT_WORKERS`], never
    /// below one.
    pub fn effective_workers(&self) -> usize {
        if self.workers > 0 {
            self.workers
        } else {
            num_cpus::get().clamp(1, DEFAULT_WORKERS)
        }
    }
}

/// Per-file outcome published on the result queue. Clean files produce
/// no report at all; silence means clean.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FileReport {
    /// Detect-only mode: the file has at least one CRLF-terminated line.
    CrlfDetected { path: String },
    /// Replace mode: the file was rewritten to LF-only endings.
    Rewritten { path: String },
    /// The file could not be opened for detection.
    OpenFailed { path: String, error: String },
    /// The rewrite attempt failed; `error` states where the content
    /// ended up.
    RewriteFailed { path: String, error: String },
}

impl FileReport {
    pub fn path(&self) -> &str {
        match self {
            FileReport::CrlfDetected { path }
            | FileReport::Rewritten { path }
            | FileReport::OpenFailed { path, .. }
            | FileReport::RewriteFailed { path, .. } => path,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(
            self,
            FileReport::OpenFailed { .. } | FileReport::RewriteFailed { .. }
        )
    }
}

impl fmt::Display for FileReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileReport::CrlfDetected { path } => {
                write!(f, "File {path} has CRLF ending")
            }
            FileReport::Rewritten { path } => {
                write!(f, "File {path} was successfully modified")
            }
            FileReport::OpenFailed { path, error } => {
                write!(f, "[ERR] can't open file {path}: {error}")
            }
            FileReport::RewriteFailed { error, .. } => {
                write!(f, "[ERR] {error}")
            }
        }
    }
}

/// Non-fatal problem encountered during traversal.
#[derive(Debug, Clone)]
pub struct Warning {
    pub message: String,
}

/// Statistics from one scan run.
#[derive(Debug, Default, Serialize)]
pub struct ScanStats {
    pub files_scanned: usize,
    pub crlf_files: usize,
    pub files_modified: usize,
    pub errors: usize,
    pub scan_duration_ms: u64,
}

/// Aggregated outcome of one scan run.
#[derive(Debug)]
pub struct ScanResult {
    pub reports: Vec<FileReport>,
    pub stats: ScanStats,
    pub warnings: Vec<Warning>,
}

/// Main scanner - drives the detect (and optionally rewrite) pipeline
/// over a directory tree.
#[derive(Debug, Clone)]
pub struct Scanner {
    pub(crate) config: ScannerConfig,
    pub(crate) rules: ExclusionRules,
}

impl Scanner {
    pub fn new(config: ScannerConfig, rules: ExclusionRules) -> Self {
        Self { config, rules }
    }
}
