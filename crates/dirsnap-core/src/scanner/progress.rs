/// Scan progress reporting: lightweight messages sent from the scan
/// thread to whoever started it, via a crossbeam channel.
use std::time::Duration;

/// Progress updates sent from a background scan (see [`super::start_scan`]).
///
/// These messages carry only counters and status; the finished tree is
/// returned by [`super::ScanHandle::join`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanProgress {
    /// Periodic update. `processed` never exceeds `total`.
    Update { processed: u64, total: u64 },
    /// Scanning completed successfully.
    Complete {
        duration: Duration,
        node_count: usize,
        error_count: u64,
    },
    /// Scan was cancelled; no result will be produced.
    Cancelled,
    /// The scan failed before producing any output (bad root path).
    Failed { message: String },
}
