/// dirsnap Core: scanning, data model, and document generation.
///
/// This crate contains all business logic with zero UI dependencies.
/// A frontend supplies a root path and an "include hidden" flag, scans,
/// and writes the generated document wherever it likes.
///
/// # Modules
///
/// - [`model`]: Arena-allocated file tree and size formatting.
/// - [`analysis`]: Extension-based file categories.
/// - [`scanner`]: Depth-first directory scanning with progress reporting.
/// - [`export`]: Flat record payload and the self-contained HTML document.
/// - [`browse`]: The document's browsing model: navigation, expansion, filters.
pub mod analysis;
pub mod browse;
pub mod error;
pub mod export;
pub mod model;
pub mod scanner;

pub use error::{Result, SnapshotError};
