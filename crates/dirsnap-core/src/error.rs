/// Error kinds surfaced by scanning and document generation.
use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SnapshotError {
    /// The scan root does not exist. Fatal, nothing is produced.
    #[error("path does not exist: {0}")]
    PathNotFound(PathBuf),

    /// The scan root exists but cannot be listed as a directory.
    #[error("path is not a readable directory: {path}: {source}")]
    NotReadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A single entry could not be stat-ed or listed.
    ///
    /// Never returned by a scan: the entry is omitted and the failure is
    /// logged and counted in `ScanResult::error_count`.
    #[error("entry could not be read: {path}: {source}")]
    EntryUnreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The output document could not be written.
    #[error("failed to write document {path}: {source}")]
    WriteFailure {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The embedded payload could not be encoded.
    #[error("failed to encode snapshot payload: {0}")]
    Encode(#[from] serde_json::Error),

    /// The background scan thread could not be started.
    #[error("failed to spawn scanner thread: {0}")]
    Spawn(#[source] io::Error),

    /// The progress callback asked the scan to stop.
    #[error("scan was cancelled")]
    Cancelled,
}

pub type Result<T> = std::result::Result<T, SnapshotError>;
