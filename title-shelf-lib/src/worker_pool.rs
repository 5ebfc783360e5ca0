//! Worker pool for parsing candidate packages concurrently.
//!
//! Spawns N persistent tokio tasks that pull candidate paths from a bounded
//! async-channel. Each parse runs on the blocking thread pool, since package
//! parsers do synchronous file I/O. Results go to an unbounded channel for
//! the single consumer that merges them into the library.
//!
//! `async-channel` is used for work distribution: its `Receiver` is `Clone`,
//! so each worker gets its own handle and no worker can starve the others
//! by holding a lock while blocked on `recv()`.

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use title_shelf_core::{GameInfo, ScanError};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::Duration;

use crate::scanner::Scanner;

/// Outcome of parsing one candidate.
#[derive(Debug)]
pub struct ParseResult {
    pub path: PathBuf,
    pub outcome: Result<GameInfo, ScanError>,
}

/// A pool of worker tasks parsing candidates concurrently.
///
/// - Bounded work channel (capacity N) gives backpressure
/// - Dropping the work sender shuts the workers down once drained
/// - A per-candidate timeout turns a hung parser into a `Timeout` result,
///   so the consumer still sees exactly one result per candidate
/// - Setting the cancel flag stops workers before their next candidate
///
/// ```ignore
/// let mut pool = ParsePool::start(scanner, paths, 4, timeout, cancel);
/// while let Some(result) = pool.recv().await {
///     handle(result);
/// }
/// ```
pub struct ParsePool {
    result_rx: mpsc::UnboundedReceiver<ParseResult>,
    _handles: Vec<JoinHandle<()>>,
}

impl ParsePool {
    /// Spawn `workers` tasks (at least one), submit all paths, and return a
    /// pool for receiving results.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(
        scanner: Arc<dyn Scanner>,
        paths: Vec<PathBuf>,
        workers: usize,
        timeout: Duration,
        cancel: Arc<AtomicBool>,
    ) -> Self {
        let workers = workers.max(1);
        let (work_tx, work_rx) = async_channel::bounded::<PathBuf>(workers);
        let (result_tx, result_rx) = mpsc::unbounded_channel::<ParseResult>();

        let handles: Vec<JoinHandle<()>> = (0..workers)
            .map(|_| {
                let work_rx = work_rx.clone();
                let result_tx = result_tx.clone();
                let scanner = scanner.clone();
                let cancel = cancel.clone();
                tokio::spawn(async move {
                    while let Ok(path) = work_rx.recv().await {
                        if cancel.load(Ordering::Relaxed) {
                            break;
                        }
                        let outcome =
                            parse_with_timeout(scanner.clone(), path.clone(), timeout).await;
                        if result_tx.send(ParseResult { path, outcome }).is_err() {
                            break; // Receiver dropped
                        }
                    }
                })
            })
            .collect();

        // Drop our copy so the result channel closes when all workers finish
        drop(result_tx);

        tokio::spawn(async move {
            for path in paths {
                if cancel.load(Ordering::Relaxed) {
                    break;
                }
                if work_tx.send(path).await.is_err() {
                    break;
                }
            }
            // work_tx dropped here -> workers drain remaining items then stop
        });

        Self {
            result_rx,
            _handles: handles,
        }
    }

    /// Receive the next result. Returns `None` once every worker has stopped.
    pub async fn recv(&mut self) -> Option<ParseResult> {
        self.result_rx.recv().await
    }
}

async fn parse_with_timeout(
    scanner: Arc<dyn Scanner>,
    path: PathBuf,
    timeout: Duration,
) -> Result<GameInfo, ScanError> {
    let task_path = path.clone();
    let task = tokio::task::spawn_blocking(move || scanner.scan_game(&task_path));

    match tokio::time::timeout(timeout, task).await {
        Ok(Ok(outcome)) => outcome,
        Ok(Err(join_err)) => Err(ScanError::other(format!(
            "parser task failed for {}: {}",
            path.display(),
            join_err
        ))),
        Err(_) => {
            // The blocking parse keeps running; its result is discarded.
            log::warn!(
                "Parsing {} timed out after {}s, skipping",
                path.display(),
                timeout.as_secs()
            );
            Err(ScanError::Timeout {
                path,
                secs: timeout.as_secs(),
            })
        }
    }
}
