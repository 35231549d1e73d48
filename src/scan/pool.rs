//! The concurrent scan pipeline: traversal producer, worker pool,
//! result collector.
//!
//! Wiring is producer -> bounded path channel -> N workers -> bounded
//! result channel -> collector, all inside one crossbeam scope.
//! Termination is signaled purely through channel closure: the producer
//! dropping its sender closes the path channel once traversal is
//! complete, and the result channel closes only when the last worker
//! drops its sender, which is the join barrier the collector drains
//! against.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use anyhow::Result;
use crossbeam::channel::{Receiver, Sender, bounded};
use tracing::debug;

use super::detect::has_crlf;
use super::rewrite::rewrite_in_place;
use super::types::{FileReport, ScanResult, ScanStats, Scanner, Warning};
use crate::walk::walk_candidates;

/// Message published on the result channel.
enum ScanMessage {
    Report(FileReport),
    Warning(Warning),
}

impl Scanner {
    /// Run the pipeline over `root`.
    ///
    /// `on_report` is invoked on the collector thread for every
    /// per-file report as it arrives, in completion order (which is
    /// nondeterministic across files). Returns once every worker has
    /// exited and every report has been delivered.
    pub fn run(
        &self,
        root: &Path,
        mut on_report: impl FnMut(&FileReport),
    ) -> Result<ScanResult> {
        let start_time = Instant::now();
        let workers = self.config.effective_workers();
        debug!(workers, replace = self.config.replace, "starting scan pipeline");

        let (path_tx, path_rx): (Sender<PathBuf>, Receiver<PathBuf>) = bounded(workers * 2);
        let (result_tx, result_rx): (Sender<ScanMessage>, Receiver<ScanMessage>) =
            bounded(workers * 4);

        let scanned_counter = Arc::new(AtomicUsize::new(0));

        let (reports, warnings) = crossbeam::thread::scope(|s| {
            // Worker pool: race on the shared path channel.
            for worker_id in 0..workers {
                let path_rx = path_rx.clone();
                let result_tx = result_tx.clone();
                let scanned_counter = scanned_counter.clone();
                s.spawn(move |_| self.worker(worker_id, path_rx, result_tx, scanned_counter));
            }

            // Producer: stream candidates as traversal discovers them,
            // forwarding walk errors as warnings. Its sender drop is
            // the sole "no more input" signal to the pool.
            let producer_tx = path_tx.clone();
            let warning_tx = result_tx.clone();
            let rules = self.rules.clone();
            let follow_symlinks = self.config.follow_symlinks;
            let root = root.to_path_buf();
            s.spawn(move |_| {
                for candidate in walk_candidates(&root, rules, follow_symlinks) {
                    match candidate {
                        Ok(path) => {
                            if producer_tx.send(path).is_err() {
                                break; // Workers dropped
                            }
                        }
                        Err(e) => {
                            let warning = Warning {
                                message: format!("Walk error: {e}"),
                            };
                            if warning_tx.send(ScanMessage::Warning(warning)).is_err() {
                                break;
                            }
                        }
                    }
                }
            });

            // Drop the original senders so channel closure tracks the
            // producer and worker exits.
            drop(path_tx);
            drop(result_tx);

            // Collector: drain until the last worker has exited.
            let mut reports = Vec::new();
            let mut warnings = Vec::new();
            while let Ok(message) = result_rx.recv() {
                match message {
                    ScanMessage::Report(report) => {
                        on_report(&report);
                        reports.push(report);
                    }
                    ScanMessage::Warning(warning) => warnings.push(warning),
                }
            }
            (reports, warnings)
        })
        .map_err(|_| anyhow::anyhow!("thread panic occurred during scan"))?;

        let stats = ScanStats {
            files_scanned: scanned_counter.load(Ordering::Relaxed),
            crlf_files: reports
                .iter()
                .filter(|r| !matches!(r, FileReport::OpenFailed { .. }))
                .count(),
            files_modified: reports
                .iter()
                .filter(|r| matches!(r, FileReport::Rewritten { .. }))
                .count(),
            errors: reports.iter().filter(|r| r.is_error()).count(),
            scan_duration_ms: start_time.elapsed().as_millis() as u64,
        };

        Ok(ScanResult {
            reports,
            stats,
            warnings,
        })
    }

    /// Worker loop: take the next path until the queue closes, detect,
    /// optionally rewrite, publish one report per CRLF-positive or
    /// failing file. Clean files produce no result.
    fn worker(
        &self,
        worker_id: usize,
        path_rx: Receiver<PathBuf>,
        result_tx: Sender<ScanMessage>,
        scanned_counter: Arc<AtomicUsize>,
    ) {
        while let Ok(path) = path_rx.recv() {
            scanned_counter.fetch_add(1, Ordering::Relaxed);
            let display = path.to_string_lossy().replace('\\', "/");

            let report = match has_crlf(&path) {
                // Open/read failure is surfaced on its own; the file
                // counts as clean for detection purposes.
                Err(e) => Some(FileReport::OpenFailed {
                    path: display,
                    error: e.to_string(),
                }),
                Ok(false) => None,
                Ok(true) => {
                    if self.config.replace {
                        match rewrite_in_place(&path) {
                            Ok(_) => Some(FileReport::Rewritten { path: display }),
                            Err(e) => Some(FileReport::RewriteFailed {
                                path: display,
                                error: e.to_string(),
                            }),
                        }
                    } else {
                        Some(FileReport::CrlfDetected { path: display })
                    }
                }
            };

            if let Some(report) = report {
                if result_tx.send(ScanMessage::Report(report)).is_err() {
                    break; // Collector dropped
                }
            }
        }

        debug!(worker_id, "worker exiting");
        // The result sender drops here; the last worker's drop closes
        // the result channel.
    }
}
