//! Scanner collaborator interface and scan-pass drivers.
//!
//! Package discovery and parsing live behind the [`Scanner`] trait; this
//! module drives a scanner over a set of candidates, either one by one on the
//! calling thread or concurrently through a [`ParsePool`].

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use title_shelf_core::{GameInfo, ScanError};
use tokio::time::Duration;

use crate::entry::GameEntry;
use crate::worker_pool::{ParsePool, ParseResult};

/// Finds and parses title packages.
///
/// Implemented outside this crate by the package-format parser and the
/// filesystem walker.
pub trait Scanner: Send + Sync {
    /// Enumerate plausible package files under `root`.
    fn find_games_in_path(&self, root: &Path) -> io::Result<Vec<PathBuf>>;

    /// Parse one candidate into a raw introspection record.
    fn scan_game(&self, path: &Path) -> Result<GameInfo, ScanError>;
}

/// A candidate that produced no entry.
#[derive(Debug)]
pub struct ScanFailure {
    pub path: PathBuf,
    pub error: ScanError,
}

/// Result of one scan pass.
#[derive(Debug, Default)]
pub struct ScanSummary {
    /// Candidates found when the pass started
    pub total: usize,
    /// Entries merged into the library
    pub merged: usize,
    /// Candidates that failed to parse or derive, in processing order
    pub failures: Vec<ScanFailure>,
    /// The pass was cancelled before every candidate was processed
    pub cancelled: bool,
}

impl ScanSummary {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            ..Self::default()
        }
    }

    /// Candidates processed so far, successful or not.
    pub fn processed(&self) -> usize {
        self.merged + self.failures.len()
    }

    fn record_failure(&mut self, path: PathBuf, error: ScanError) {
        log::debug!("Skipping {}: {}", path.display(), error);
        self.failures.push(ScanFailure { path, error });
    }
}

/// Percentage of `total` that `scanned` represents, in `0.0..=100.0`.
pub fn percent_complete(scanned: usize, total: usize) -> f64 {
    if total == 0 {
        return 100.0;
    }
    (scanned as f64 / total as f64) * 100.0
}

/// Enumerate candidates under `root`, treating an unreadable root as empty.
pub fn find_candidates(scanner: &dyn Scanner, root: &Path) -> Vec<PathBuf> {
    match scanner.find_games_in_path(root) {
        Ok(paths) => paths,
        Err(e) => {
            log::warn!("Failed to enumerate {}: {}", root.display(), e);
            Vec::new()
        }
    }
}

/// Turn a parse outcome into an entry, folding derivation rejects into
/// `ScanError::Rejected`.
pub fn derive_entry(result: ParseResult) -> Result<GameEntry, (PathBuf, ScanError)> {
    let ParseResult { path, outcome } = result;
    match outcome {
        Ok(info) => GameEntry::from_info(&info)
            .ok_or_else(|| (path, ScanError::rejected("record could not be derived"))),
        Err(e) => Err((path, e)),
    }
}

/// Parse `paths` in order on the calling thread, invoking `on_entry` for each
/// derived entry. Returns the pass summary with `merged` counting entries
/// handed to `on_entry`.
pub fn scan_all(
    scanner: &dyn Scanner,
    paths: Vec<PathBuf>,
    mut on_entry: impl FnMut(GameEntry),
) -> ScanSummary {
    let mut summary = ScanSummary::new(paths.len());
    for path in paths {
        let outcome = scanner.scan_game(&path);
        match derive_entry(ParseResult { path, outcome }) {
            Ok(entry) => {
                on_entry(entry);
                summary.merged += 1;
            }
            Err((path, error)) => summary.record_failure(path, error),
        }
    }
    summary
}

/// Settings for a concurrent parse pass.
#[derive(Debug, Clone)]
pub struct ParseOptions {
    pub workers: usize,
    pub timeout: Duration,
    pub cancel: Arc<AtomicBool>,
}

/// Parse `paths` concurrently, invoking `on_entry(entry, scanned)` for each
/// derived entry, where `scanned` is the running count of processed
/// candidates (failures included).
///
/// Results are consumed on a single task, so `scanned` never decreases
/// between calls. Must be awaited inside a tokio runtime.
pub async fn parse_all(
    scanner: Arc<dyn Scanner>,
    paths: Vec<PathBuf>,
    options: ParseOptions,
    mut on_entry: impl FnMut(GameEntry, usize),
) -> ScanSummary {
    let mut summary = ScanSummary::new(paths.len());
    let mut pool = ParsePool::start(
        scanner,
        paths,
        options.workers,
        options.timeout,
        options.cancel.clone(),
    );

    let mut scanned = 0usize;
    while let Some(result) = pool.recv().await {
        scanned += 1;
        match derive_entry(result) {
            Ok(entry) => {
                summary.merged += 1;
                on_entry(entry, scanned);
            }
            Err((path, error)) => summary.record_failure(path, error),
        }
    }

    summary.cancelled = summary.processed() < summary.total;
    summary
}

#[cfg(test)]
#[path = "tests/scanner_tests.rs"]
mod tests;
