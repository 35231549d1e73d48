//! Scan pipeline: line tokenization, CRLF detection, atomic rewriting,
//! and the parallel worker pool that drives them.

pub mod detect;
pub mod lines;
pub mod pool;
pub mod rewrite;
pub mod types;

pub use detect::has_crlf;
pub use rewrite::{RewriteError, RewriteOutcome, rewrite_in_place};
pub use types::{FileReport, ScanResult, ScanStats, Scanner, ScannerConfig, Warning};
