//! Command-line interface for crlfix.
//!
//! Argument parsing via clap; all scanner behavior is built here as
//! explicit configuration (no ambient flags) and handed to the scan
//! pipeline.

use anyhow::Result;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

mod output;

pub use output::Output;

use crate::scan::{ScanResult, Scanner, ScannerConfig};
use crate::walk::ExclusionRules;

/// Detect CRLF line endings across a directory tree and optionally
/// rewrite them to LF in place.
#[derive(Parser)]
#[command(author, version, long_about = None)]
pub struct Cli {
    /// Directory tree to scan
    #[arg(value_name = "PATH", default_value = ".")]
    pub path: PathBuf,

    /// Rewrite detected files to LF-only endings in place
    #[arg(short, long)]
    pub replace: bool,

    /// File names to exclude (comma-separated)
    #[arg(long = "ex-files", value_delimiter = ',', value_name = "NAME")]
    pub ex_files: Vec<String>,

    /// File extensions to exclude, with or without the leading dot
    /// (comma-separated)
    #[arg(long = "ex-extensions", value_delimiter = ',', value_name = "EXT")]
    pub ex_extensions: Vec<String>,

    /// Folder path fragments to exclude (comma-separated)
    #[arg(long = "ex-folders", value_delimiter = ',', value_name = "FOLDER")]
    pub ex_folders: Vec<String>,

    /// Number of worker threads (0 = auto-detect)
    #[arg(long, default_value_t = 0, value_name = "N")]
    pub workers: usize,

    /// Follow symbolic links during traversal
    #[arg(long)]
    pub follow_symlinks: bool,

    /// Show statistics after scanning
    #[arg(long)]
    pub stats: bool,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Enable quiet output (minimal)
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable report lines
    Text,
    /// One JSON document with reports, statistics, and warnings
    Json,
}

impl Cli {
    /// Execute the scan and set the process exit code: non-zero when
    /// any per-file error occurred, zero otherwise (CRLF findings alone
    /// are not a failure).
    pub fn run(self) -> Result<()> {
        let output = Output::new(self.verbose, self.quiet);

        let rules = ExclusionRules::new(
            self.ex_files.clone(),
            self.ex_extensions.clone(),
            self.ex_folders.clone(),
        );
        let config = ScannerConfig {
            replace: self.replace,
            workers: self.workers,
            follow_symlinks: self.follow_symlinks,
        };
        output.verbose(&format!(
            "Scanning {} with {} workers (replace: {})",
            self.path.display(),
            config.effective_workers(),
            self.replace
        ));
        let scanner = Scanner::new(config, rules);

        let result = match self.format {
            // Stream report lines as workers finish files.
            OutputFormat::Text => scanner.run(&self.path, |report| output.report(report))?,
            // JSON is a single document; collect silently.
            OutputFormat::Json => scanner.run(&self.path, |_| {})?,
        };

        match self.format {
            OutputFormat::Text => self.print_text_summary(&output, &result),
            OutputFormat::Json => print_json(&result)?,
        }

        if result.stats.errors > 0 {
            std::process::exit(1);
        }
        Ok(())
    }

    fn print_text_summary(&self, output: &Output, result: &ScanResult) {
        for warning in &result.warnings {
            output.warning(&warning.message);
        }

        if result.reports.is_empty() {
            output.success("No CRLF endings found");
        }

        if self.stats {
            output.blank_line();
            output.info("Scan statistics");
            output.summary_stats("Files scanned:", result.stats.files_scanned);
            output.summary_stats("CRLF files:", result.stats.crlf_files);
            if self.replace {
                output.summary_stats("Files modified:", result.stats.files_modified);
            }
            output.summary_stats("Errors:", result.stats.errors);
            output.summary_stats("Scan time (ms):", result.stats.scan_duration_ms as usize);
        }
    }
}

fn print_json(result: &ScanResult) -> Result<()> {
    let document = serde_json::json!({
        "reports": &result.reports,
        "statistics": &result.stats,
        "warnings": result.warnings.iter().map(|w| w.message.as_str()).collect::<Vec<_>>(),
    });
    println!("{}", serde_json::to_string_pretty(&document)?);
    Ok(())
}
