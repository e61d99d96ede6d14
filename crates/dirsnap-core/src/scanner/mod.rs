/// Scanner module: builds the node tree for one directory snapshot.
///
/// Scanning itself is synchronous and single-threaded ([`Scanner::run`],
/// [`scan`]). [`start_scan`] wraps one scan in a background thread and
/// forwards progress over a bounded channel so a foreground caller can
/// report it without stalling.
pub mod filter;
pub mod progress;
pub mod walker;

pub use filter::is_excluded;
pub use walker::{ProgressFn, Scanner};

use crate::error::{Result, SnapshotError};
use crate::model::{Aggregates, FileTree};
use chrono::{DateTime, Local};
use crossbeam_channel::Receiver;
use progress::ScanProgress;
use std::ops::ControlFlow;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tracing::info;

/// What to scan and how.
#[derive(Debug, Clone)]
pub struct ScanOptions {
    pub root: PathBuf,
    /// Include dot-names. `~`/`$` names are excluded regardless.
    pub include_hidden: bool,
}

impl ScanOptions {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            include_hidden: false,
        }
    }

    pub fn include_hidden(mut self, include_hidden: bool) -> Self {
        self.include_hidden = include_hidden;
        self
    }
}

/// A completed scan. Immutable once returned.
#[derive(Debug, Clone)]
pub struct ScanResult {
    /// Every node, in pre-order. Directory sizes are already aggregated.
    pub tree: FileTree,
    pub totals: Aggregates,
    /// When the scan started.
    pub scan_time: DateTime<Local>,
    /// Entries omitted because they could not be read.
    pub error_count: u64,
    pub duration: Duration,
}

/// Scan `root` synchronously without progress reporting.
pub fn scan(root: impl Into<PathBuf>, include_hidden: bool) -> Result<ScanResult> {
    Scanner::new(ScanOptions::new(root).include_hidden(include_hidden)).run()
}

/// Maximum number of progress messages that may queue up in the channel.
///
/// Updates are sent with `try_send`, so a slow consumer only loses
/// intermediate updates; the scan itself never blocks on them.
pub const PROGRESS_CHANNEL_CAPACITY: usize = 4_096;

/// Handle to a running or completed background scan.
pub struct ScanHandle {
    /// Receiver for progress updates from the scan thread.
    pub progress_rx: Receiver<ScanProgress>,
    /// Flag to request cancellation.
    cancel_flag: Arc<AtomicBool>,
    thread: thread::JoinHandle<Result<ScanResult>>,
}

impl ScanHandle {
    /// Request the scan to stop as soon as possible.
    pub fn cancel(&self) {
        self.cancel_flag.store(true, Ordering::Relaxed);
    }

    /// Check whether cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.cancel_flag.load(Ordering::Relaxed)
    }

    /// Wait for the scan thread and return its result.
    ///
    /// The progress receiver is dropped first so the scan thread can never
    /// block on a full channel while we wait for it.
    pub fn join(self) -> Result<ScanResult> {
        let ScanHandle {
            progress_rx,
            thread,
            ..
        } = self;
        drop(progress_rx);
        match thread.join() {
            Ok(result) => result,
            Err(panic) => std::panic::resume_unwind(panic),
        }
    }
}

/// Start a new scan on a background thread.
///
/// Returns a [`ScanHandle`] for receiving progress, requesting cancellation,
/// and collecting the final [`ScanResult`].
pub fn start_scan(options: ScanOptions) -> Result<ScanHandle> {
    let (progress_tx, progress_rx) =
        crossbeam_channel::bounded::<ScanProgress>(PROGRESS_CHANNEL_CAPACITY);
    let cancel_flag = Arc::new(AtomicBool::new(false));
    let cancel_clone = cancel_flag.clone();

    let thread = thread::Builder::new()
        .name("dirsnap-scanner".into())
        .spawn(move || {
            info!("Background scan of {}", options.root.display());

            let update_tx = progress_tx.clone();
            let result = Scanner::new(options)
                .with_progress(move |processed, total| {
                    if cancel_clone.load(Ordering::Relaxed) {
                        return ControlFlow::Break(());
                    }
                    let _ = update_tx.try_send(ScanProgress::Update { processed, total });
                    ControlFlow::Continue(())
                })
                .run();

            let terminal = match &result {
                Ok(scan) => ScanProgress::Complete {
                    duration: scan.duration,
                    node_count: scan.tree.len(),
                    error_count: scan.error_count,
                },
                Err(SnapshotError::Cancelled) => ScanProgress::Cancelled,
                Err(err) => ScanProgress::Failed {
                    message: err.to_string(),
                },
            };
            let _ = progress_tx.send(terminal);
            result
        })
        .map_err(SnapshotError::Spawn)?;

    Ok(ScanHandle {
        progress_rx,
        cancel_flag,
        thread,
    })
}
