//! The game library: a deduplicated, concurrently updated catalog of
//! [`GameEntry`] values plus the set of roots registered for scanning.
//!
//! `GameLibrary` is a cheap handle; clones share one catalog. The application
//! creates one at startup and passes clones to whatever needs it.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tokio::runtime::Handle;
use tokio::sync::oneshot;
use tokio::time::Duration;

use crate::entry::GameEntry;
use crate::scanner::{self, ParseOptions, ScanSummary, Scanner};
use crate::settings::LibrarySettings;

/// Default limit for parsing a single package during an async scan.
pub const DEFAULT_PARSE_TIMEOUT: Duration = Duration::from_secs(60);

/// Tuning for asynchronous scans.
#[derive(Debug, Clone)]
pub struct LibraryOptions {
    /// Concurrent parse workers
    pub scan_workers: usize,
    /// Per-package parse limit; a package exceeding it counts as a failure
    pub parse_timeout: Duration,
}

impl Default for LibraryOptions {
    fn default() -> Self {
        Self {
            scan_workers: std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(4),
            parse_timeout: DEFAULT_PARSE_TIMEOUT,
        }
    }
}

/// Progress callback for asynchronous scans: `(percent_complete, entry)`.
///
/// Invoked from a runtime worker thread, never the thread that started the
/// scan; UI callers must marshal to their own thread.
pub type ProgressCallback = Box<dyn FnMut(f64, &GameEntry) + Send + 'static>;

struct LibraryInner {
    scanner: Arc<dyn Scanner>,
    options: LibraryOptions,
    runtime: Option<Handle>,
    games: RwLock<Vec<GameEntry>>,
    roots: RwLock<Vec<PathBuf>>,
}

/// Catalog of discovered titles.
#[derive(Clone)]
pub struct GameLibrary {
    inner: Arc<LibraryInner>,
}

impl std::fmt::Debug for GameLibrary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameLibrary")
            .field("games", &self.size())
            .field("roots", &self.roots())
            .field("options", &self.inner.options)
            .finish()
    }
}

impl GameLibrary {
    /// Create an empty library backed by `scanner`.
    ///
    /// Async scans run on the tokio runtime current when the scan starts, or
    /// on a dedicated thread if there is none. Use
    /// [`with_runtime`](Self::with_runtime) to pick one explicitly.
    pub fn new(scanner: impl Scanner + 'static) -> Self {
        Self::with_options(scanner, LibraryOptions::default())
    }

    pub fn with_options(scanner: impl Scanner + 'static, options: LibraryOptions) -> Self {
        Self::build(Arc::new(scanner), options, None)
    }

    /// Create a library whose async scans run on `runtime`.
    ///
    /// The runtime must outlive every scan started through this library.
    pub fn with_runtime(
        scanner: impl Scanner + 'static,
        options: LibraryOptions,
        runtime: Handle,
    ) -> Self {
        Self::build(Arc::new(scanner), options, Some(runtime))
    }

    /// Create a library configured from saved settings, with the saved roots
    /// registered (but not scanned).
    pub fn from_settings(scanner: impl Scanner + 'static, settings: &LibrarySettings) -> Self {
        let library = Self::with_options(scanner, settings.options());
        library.register_roots(settings.roots.iter().cloned());
        library
    }

    fn build(scanner: Arc<dyn Scanner>, options: LibraryOptions, runtime: Option<Handle>) -> Self {
        Self {
            inner: Arc::new(LibraryInner {
                scanner,
                options,
                runtime,
                games: RwLock::new(Vec::new()),
                roots: RwLock::new(Vec::new()),
            }),
        }
    }

    pub fn options(&self) -> &LibraryOptions {
        &self.inner.options
    }

    // -- Roots --

    /// True if `root` has been registered by a scan.
    pub fn contains_path(&self, root: &Path) -> bool {
        self.read_roots().iter().any(|p| p == root)
    }

    /// True if `root` has NOT been registered yet.
    pub fn is_path_unregistered(&self, root: &Path) -> bool {
        !self.contains_path(root)
    }

    /// Registered roots, in registration order.
    pub fn roots(&self) -> Vec<PathBuf> {
        self.read_roots().clone()
    }

    /// Register roots without scanning them. Already-registered roots are skipped.
    pub fn register_roots(&self, roots: impl IntoIterator<Item = PathBuf>) {
        for root in roots {
            self.add_path(&root);
        }
    }

    /// Unregister a root. Entries already merged from it stay in the library;
    /// call [`rescan`](Self::rescan) to drop them.
    pub fn remove_path(&self, root: &Path) -> bool {
        let mut roots = self.write_roots();
        match roots.iter().position(|p| p == root) {
            Some(index) => {
                roots.remove(index);
                log::debug!("Removed library root {}", root.display());
                true
            }
            None => false,
        }
    }

    fn add_path(&self, root: &Path) {
        let mut roots = self.write_roots();
        if !roots.iter().any(|p| p == root) {
            log::debug!("Registered library root {}", root.display());
            roots.push(root.to_path_buf());
        }
    }

    // -- Games --

    /// True if an entry with `title_id` exists.
    pub fn contains_game(&self, title_id: u32) -> bool {
        self.read_games().iter().any(|g| g.title_id() == title_id)
    }

    /// First entry with `title_id`, if any.
    pub fn find_game(&self, title_id: u32) -> Option<GameEntry> {
        self.read_games()
            .iter()
            .find(|g| g.title_id() == title_id)
            .cloned()
    }

    /// Merge one entry into the library.
    ///
    /// Entries with title id 0 cannot be identified and are always appended.
    /// Otherwise an existing entry with the same title id absorbs the new one
    /// in place, or the new one is appended.
    pub fn add_game(&self, game: GameEntry) {
        let mut games = self.write_games();
        merge_into(&mut games, game);
    }

    /// Snapshot of all entries, in display order.
    pub fn games(&self) -> Vec<GameEntry> {
        self.read_games().clone()
    }

    /// Borrow all entries under the read lock.
    ///
    /// Merges from running scans wait until `f` returns; keep it short.
    pub fn with_games<R>(&self, f: impl FnOnce(&[GameEntry]) -> R) -> R {
        f(&self.read_games())
    }

    pub fn size(&self) -> usize {
        self.read_games().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read_games().is_empty()
    }

    /// Remove every entry. Registered roots are kept.
    pub fn clear(&self) {
        self.write_games().clear();
    }

    // -- Scanning --

    /// Scan `root` on the calling thread, merging entries in the order the
    /// scanner yields them. Returns the number of entries merged.
    pub fn scan_path(&self, root: &Path) -> usize {
        self.scan_path_detailed(root).merged
    }

    /// Like [`scan_path`](Self::scan_path), returning the full summary with
    /// per-candidate failures.
    pub fn scan_path_detailed(&self, root: &Path) -> ScanSummary {
        self.add_path(root);

        let scanner = self.inner.scanner.as_ref();
        let paths = scanner::find_candidates(scanner, root);
        let summary = scanner::scan_all(scanner, paths, |entry| self.add_game(entry));

        log::info!(
            "Scanned {}: {} of {} candidates merged, {} failed",
            root.display(),
            summary.merged,
            summary.total,
            summary.failures.len()
        );
        summary
    }

    /// Clear the library and rescan every registered root synchronously.
    /// Returns the number of entries merged across all roots.
    pub fn rescan(&self) -> usize {
        self.clear();
        self.roots()
            .iter()
            .map(|root| self.scan_path(root))
            .sum()
    }

    /// Scan `root` in the background.
    ///
    /// Registration and candidate enumeration happen before this returns;
    /// parsing and merging run on the library's runtime. `progress` is called
    /// after each merge with the percentage of candidates processed.
    ///
    /// The returned handle reports the candidate count known at launch, which
    /// can exceed the eventual merged count when packages fail to parse.
    pub fn scan_path_async(
        &self,
        root: &Path,
        progress: impl FnMut(f64, &GameEntry) + Send + 'static,
    ) -> AsyncScan {
        self.add_path(root);

        let paths = scanner::find_candidates(self.inner.scanner.as_ref(), root);
        let total = paths.len();
        let cancel = Arc::new(AtomicBool::new(false));
        let (done_tx, done_rx) = oneshot::channel();

        let task = scan_task(
            self.clone(),
            root.to_path_buf(),
            paths,
            cancel.clone(),
            Box::new(progress),
            done_tx,
        );

        match self.inner.runtime.clone().or_else(|| Handle::try_current().ok()) {
            Some(handle) => {
                handle.spawn(task);
            }
            None => spawn_on_own_runtime(task),
        }

        AsyncScan {
            total,
            cancel,
            done: done_rx,
        }
    }

    // -- Locking --

    fn read_games(&self) -> RwLockReadGuard<'_, Vec<GameEntry>> {
        self.inner
            .games
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn write_games(&self) -> RwLockWriteGuard<'_, Vec<GameEntry>> {
        self.inner
            .games
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn read_roots(&self) -> RwLockReadGuard<'_, Vec<PathBuf>> {
        self.inner
            .roots
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn write_roots(&self) -> RwLockWriteGuard<'_, Vec<PathBuf>> {
        self.inner
            .roots
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

/// Merge rule shared by every mutation path.
fn merge_into(games: &mut Vec<GameEntry>, game: GameEntry) {
    let title_id = game.title_id();
    let existing = if title_id != 0 {
        games.iter().position(|g| g.title_id() == title_id)
    } else {
        None
    };

    match existing {
        Some(index) => {
            log::debug!("Updating {} ({:08X})", game.title(), title_id);
            games[index].absorb(game);
        }
        None => {
            log::debug!("Adding {} ({:08X})", game.title(), title_id);
            games.push(game);
        }
    }
}

async fn scan_task(
    library: GameLibrary,
    root: PathBuf,
    paths: Vec<PathBuf>,
    cancel: Arc<AtomicBool>,
    mut progress: ProgressCallback,
    done: oneshot::Sender<ScanSummary>,
) {
    let total = paths.len();
    let options = ParseOptions {
        workers: library.inner.options.scan_workers,
        timeout: library.inner.options.parse_timeout,
        cancel,
    };

    let summary = scanner::parse_all(
        library.inner.scanner.clone(),
        paths,
        options,
        |entry, scanned| {
            library.add_game(entry.clone());
            progress(scanner::percent_complete(scanned, total), &entry);
        },
    )
    .await;

    log::info!(
        "Scanned {} in background: {} of {} candidates merged, {} failed{}",
        root.display(),
        summary.merged,
        summary.total,
        summary.failures.len(),
        if summary.cancelled { " (cancelled)" } else { "" }
    );

    // Nobody may be waiting; that's fine.
    let _ = done.send(summary);
}

/// Run `task` on a dedicated thread with its own runtime, for callers that
/// have no tokio runtime.
fn spawn_on_own_runtime(task: impl std::future::Future<Output = ()> + Send + 'static) {
    std::thread::spawn(move || {
        match tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .build()
        {
            Ok(rt) => rt.block_on(task),
            Err(e) => log::error!("Failed to start scan runtime: {}", e),
        }
    });
}

/// Handle to a background scan.
#[derive(Debug)]
pub struct AsyncScan {
    total: usize,
    cancel: Arc<AtomicBool>,
    done: oneshot::Receiver<ScanSummary>,
}

impl AsyncScan {
    /// Candidates found when the scan was launched.
    pub fn total(&self) -> usize {
        self.total
    }

    /// Ask the scan to stop before its next candidate. Entries already merged
    /// stay in the library.
    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.load(Ordering::Relaxed)
    }

    /// Wait for the scan to finish.
    ///
    /// If the scan task was torn down early (runtime shut down), returns an
    /// empty cancelled summary.
    pub async fn wait(self) -> ScanSummary {
        let total = self.total;
        self.done.await.unwrap_or_else(|_| abandoned(total))
    }

    /// Blocking variant of [`wait`](Self::wait). Must not be called from
    /// inside an async context.
    pub fn wait_blocking(self) -> ScanSummary {
        let total = self.total;
        self.done.blocking_recv().unwrap_or_else(|_| abandoned(total))
    }
}

fn abandoned(total: usize) -> ScanSummary {
    ScanSummary {
        cancelled: true,
        ..ScanSummary::new(total)
    }
}

#[cfg(test)]
#[path = "tests/library_tests.rs"]
mod tests;
