/// Browsing model of the generated document: filters and viewer state.
pub mod explorer;
pub mod filter;

pub use explorer::{Explorer, FolderContent, FolderStats, NavRow};
pub use filter::Filter;
