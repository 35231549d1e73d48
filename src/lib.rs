//! # crlfix - CRLF line-ending detection and repair
//!
//! Scans a directory tree for files with CRLF line endings and, in
//! replace mode, rewrites them to LF-only in place. The rewrite stages
//! new content beside the original and swaps it in with two renames, so
//! the original file is recoverable if any step fails.
//!
//! ## Quick start
//!
//! ```bash
//! # Report CRLF files under the current directory
//! crlfix
//!
//! # Fix them in place, skipping generated folders
//! crlfix --replace --ex-folders target,node_modules
//! ```

pub mod cli;
pub mod scan;
pub mod walk;

pub use cli::{Cli, Output};
pub use scan::{FileReport, RewriteError, RewriteOutcome, Scanner, ScannerConfig};
pub use walk::ExclusionRules;

/// Result type alias for crlfix operations
pub type Result<T> = anyhow::Result<T>;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const PKG_NAME: &str = env!("CARGO_PKG_NAME");
