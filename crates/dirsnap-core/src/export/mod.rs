/// Export: the flat record payload and the HTML document built around it.
pub mod document;
pub mod records;

pub use document::{generate, render, write_document, DocumentOptions};
pub use records::{serialize, FlatRecord, Payload, Totals};
