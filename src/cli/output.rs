//! Console output for the CLI.
//!
//! Per-file report lines keep their exact wire text (`File <path> has
//! CRLF ending`, `File <path> was successfully modified`, `[ERR] ...`)
//! so they stay grep- and script-friendly; styling is layered on top.

use console::style;

use crate::scan::FileReport;

/// Output handler for consistent CLI formatting.
pub struct Output {
    verbose: bool,
    quiet: bool,
}

impl Output {
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self { verbose, quiet }
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        if !self.quiet {
            println!("{} {}", style("✔").green(), message);
        }
    }

    /// Print an error message (always shown, even in quiet mode)
    pub fn error(&self, message: &str) {
        eprintln!("{} {}", style("✖").red(), message);
    }

    /// Print a warning message
    pub fn warning(&self, message: &str) {
        if !self.quiet {
            println!("{} {}", style("⚠").yellow(), message);
        }
    }

    /// Print an info message
    pub fn info(&self, message: &str) {
        if !self.quiet {
            println!("{} {}", style("ℹ").blue(), message);
        }
    }

    /// Print a verbose message (only if verbose mode is enabled)
    pub fn verbose(&self, message: &str) {
        if self.verbose {
            println!("{}", style(message).dim());
        }
    }

    /// Print one per-file report line. Error reports go to stderr and
    /// are never suppressed; the rest honor quiet mode.
    pub fn report(&self, report: &FileReport) {
        if report.is_error() {
            eprintln!("{}", style(report).red());
        } else if !self.quiet {
            println!("{report}");
        }
    }

    /// Print one stats row.
    pub fn summary_stats(&self, label: &str, value: usize) {
        if !self.quiet {
            println!("  {} {}", style(label).dim(), style(value).bold());
        }
    }

    pub fn blank_line(&self) {
        if !self.quiet {
            println!();
        }
    }
}
