/// Flat record format embedded in the generated document.
///
/// Every node becomes one [`FlatRecord`], in scan order. Hierarchy travels
/// only through `parent_id` / `child_ids`, which reference `id` values that
/// appear verbatim in the same list. Field names are a compatibility surface
/// for anything that reads the payload back.
use crate::analysis::FileCategory;
use crate::error::Result;
use crate::model::size::format_size;
use crate::model::{Aggregates, FileTree, NodeIndex};
use crate::scanner::ScanResult;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::time::SystemTime;

/// Second-precision timestamp format used for `modified` and `scan_time`.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Schema version written into every payload.
pub const PAYLOAD_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlatRecord {
    pub id: String,
    pub name: String,
    /// Absolute path, shown in the breadcrumb and copied to the clipboard.
    pub path: String,
    /// Human-readable size, e.g. `1.5 KB`.
    pub size: String,
    pub size_bytes: u64,
    /// Modification time, or empty when the OS did not report one.
    pub modified: String,
    pub is_directory: bool,
    pub depth: u32,
    pub parent_id: Option<String>,
    pub child_ids: Vec<String>,
    pub extension: String,
    pub category: FileCategory,
}

/// Whole-scan counters as embedded in the payload.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Totals {
    pub total_files: u64,
    pub total_folders: u64,
    pub total_size: u64,
}

impl From<Aggregates> for Totals {
    fn from(a: Aggregates) -> Self {
        Self {
            total_files: a.total_files,
            total_folders: a.total_folders,
            total_size: a.total_size,
        }
    }
}

/// Everything the viewer needs, parsed synchronously at load time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payload {
    pub version: u32,
    pub title: String,
    pub root_path: String,
    /// The only field that differs between two scans of an unchanged tree.
    pub scan_time: String,
    pub totals: Totals,
    pub records: Vec<FlatRecord>,
}

impl Payload {
    pub fn new(result: &ScanResult, title: impl Into<String>) -> Self {
        Self {
            version: PAYLOAD_VERSION,
            title: title.into(),
            root_path: result.tree.root_path.to_string_lossy().into_owned(),
            scan_time: format_timestamp(&result.scan_time),
            totals: result.totals.into(),
            records: serialize(&result.tree),
        }
    }

    /// Encode as JSON that is safe to place inside a `<script>` element.
    pub fn to_embedded_json(&self) -> Result<String> {
        Ok(escape_for_script(&serde_json::to_string(self)?))
    }
}

/// Project every node of `tree` into a flat record, preserving order.
pub fn serialize(tree: &FileTree) -> Vec<FlatRecord> {
    (0..tree.len())
        .map(|i| {
            let index = NodeIndex::new(i);
            let node = tree.node(index);
            FlatRecord {
                id: tree.node_id(index),
                name: node.name.to_string(),
                path: tree.full_path(index).to_string_lossy().into_owned(),
                size: format_size(node.size),
                size_bytes: node.size,
                modified: node.modified.map(format_system_time).unwrap_or_default(),
                is_directory: node.is_dir,
                depth: node.depth,
                parent_id: node.parent.map(|p| tree.node_id(p)),
                child_ids: node.children.iter().map(|&c| tree.node_id(c)).collect(),
                extension: node.extension.to_string(),
                category: node.category,
            }
        })
        .collect()
}

pub fn format_timestamp(time: &DateTime<Local>) -> String {
    time.format(TIMESTAMP_FORMAT).to_string()
}

fn format_system_time(time: SystemTime) -> String {
    format_timestamp(&DateTime::<Local>::from(time))
}

/// Make serialized JSON inert inside an HTML `<script>` block.
///
/// `<`, `>` and `&` only ever occur inside JSON strings, where the `\uXXXX`
/// form is equivalent, so the payload still parses to the same value.
/// U+2028/U+2029 are escaped for older JavaScript parsers.
fn escape_for_script(json: &str) -> String {
    let mut out = String::with_capacity(json.len());
    for ch in json.chars() {
        match ch {
            '<' => out.push_str("\\u003c"),
            '>' => out.push_str("\\u003e"),
            '&' => out.push_str("\\u0026"),
            '\u{2028}' => out.push_str("\\u2028"),
            '\u{2029}' => out.push_str("\\u2029"),
            _ => out.push(ch),
        }
    }
    out
}
