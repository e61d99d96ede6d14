/// Analysis modules: classification of scanned entries.

pub mod file_types;

pub use file_types::{categorise_extension, FileCategory};
