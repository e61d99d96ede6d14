/// Document generator: renders one self-contained HTML file around a
/// snapshot payload.
///
/// Styles, script, and data are all inlined; the file references nothing
/// external. The initial view (root folder, collapsed navigation pane) is
/// pre-rendered with [`Explorer`] using the same markup the embedded
/// script produces, so the page reads correctly before the script runs.
use super::records::{FlatRecord, Payload};
use crate::browse::{Explorer, Filter, FolderContent, FolderStats, NavRow};
use crate::error::{Result, SnapshotError};
use crate::model::size::{format_count, format_size_with};
use crate::scanner::ScanResult;
use std::fmt::Write as _;
use std::io::Write as _;
use std::path::Path;
use tracing::info;

const TEMPLATE: &str = include_str!("../../assets/template.html");
const STYLES: &str = include_str!("../../assets/explorer.css");
const SCRIPT: &str = include_str!("../../assets/explorer.js");

/// Deepest indentation class used in the navigation pane.
const MAX_INDENT: usize = 6;

#[derive(Debug, Clone, Default)]
pub struct DocumentOptions {
    /// Display title. Defaults to the scan root's base name.
    pub title: Option<String>,
}

impl DocumentOptions {
    pub fn with_title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
        }
    }
}

/// Build the payload for `result` and render the document.
///
/// Deterministic for a given scan and title apart from `scan_time`.
pub fn generate(result: &ScanResult, options: &DocumentOptions) -> Result<String> {
    let title = match options.title.as_deref().map(str::trim) {
        Some(title) if !title.is_empty() => title.to_string(),
        _ => result.tree.root_name(),
    };
    render(&Payload::new(result, title))
}

/// Render a document from an already-built payload.
pub fn render(payload: &Payload) -> Result<String> {
    let data = payload.to_embedded_json()?;
    let explorer = Explorer::reconstruct(&payload.records);

    let folder_title = explorer.current_folder().map_or("", |r| r.name.as_str());
    let values = TemplateValues {
        title: escape_html(&payload.title),
        root_path: escape_html(&payload.root_path),
        total_files: format_count(payload.totals.total_files),
        total_folders: format_count(payload.totals.total_folders),
        total_size: format_size_with(payload.totals.total_size, 2),
        scan_time: escape_html(&payload.scan_time),
        nav_tree: nav_tree_html(&explorer.nav_rows()),
        breadcrumb: escape_html(explorer.breadcrumb()),
        filter_buttons: filter_buttons_html(explorer.filter()),
        folder_title: escape_html(folder_title),
        folder_stats: folder_stats_html(&explorer.folder_stats()),
        entries: entries_html(&explorer.content()),
        item_count: format_count(payload.records.len() as u64),
        payload: data,
    };

    Ok(fill_template(TEMPLATE, |key| values.get(key)))
}

/// Write `contents` to `path`, replacing any existing file atomically.
///
/// The document is written to a temporary file in the same directory and
/// renamed into place, so a failure never leaves a half-written file at
/// `path`.
pub fn write_document(path: &Path, contents: &str) -> Result<()> {
    let failure = |source| SnapshotError::WriteFailure {
        path: path.to_path_buf(),
        source,
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(failure)?;
    tmp.write_all(contents.as_bytes()).map_err(failure)?;
    tmp.as_file().sync_all().map_err(failure)?;
    tmp.persist(path).map_err(|e| failure(e.error))?;

    info!("Wrote {} ({} bytes)", path.display(), contents.len());
    Ok(())
}

struct TemplateValues {
    title: String,
    root_path: String,
    total_files: String,
    total_folders: String,
    total_size: String,
    scan_time: String,
    nav_tree: String,
    breadcrumb: String,
    filter_buttons: String,
    folder_title: String,
    folder_stats: String,
    entries: String,
    item_count: String,
    payload: String,
}

impl TemplateValues {
    fn get(&self, key: &str) -> Option<&str> {
        let value = match key {
            "VERSION" => env!("CARGO_PKG_VERSION"),
            "STYLES" => STYLES,
            "SCRIPT" => SCRIPT,
            "TITLE" => &self.title,
            "ROOT_PATH" => &self.root_path,
            "TOTAL_FILES" => &self.total_files,
            "TOTAL_FOLDERS" => &self.total_folders,
            "TOTAL_SIZE" => &self.total_size,
            "SCAN_TIME" => &self.scan_time,
            "NAV_TREE" => &self.nav_tree,
            "BREADCRUMB" => &self.breadcrumb,
            "FILTER_BUTTONS" => &self.filter_buttons,
            "FOLDER_TITLE" => &self.folder_title,
            "FOLDER_STATS" => &self.folder_stats,
            "ENTRIES" => &self.entries,
            "ITEM_COUNT" => &self.item_count,
            "PAYLOAD" => &self.payload,
            _ => return None,
        };
        Some(value)
    }
}

/// Replace every `{{KEY}}` in `template` in a single pass.
///
/// Substituted values are never re-scanned, so file names that happen to
/// contain `{{...}}` come through untouched. Unknown keys are kept verbatim.
fn fill_template<'v>(template: &str, lookup: impl Fn(&str) -> Option<&'v str>) -> String {
    let mut out = String::with_capacity(template.len() * 2);
    let mut rest = template;
    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match after.find("}}") {
            Some(end) => {
                let key = &after[..end];
                match lookup(key) {
                    Some(value) => out.push_str(value),
                    None => {
                        out.push_str("{{");
                        out.push_str(key);
                        out.push_str("}}");
                    }
                }
                rest = &after[end + 2..];
            }
            None => {
                out.push_str(&rest[start..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

fn nav_tree_html(rows: &[NavRow<'_>]) -> String {
    let mut html = String::new();
    for row in rows {
        let mut classes = String::from("nav-row");
        if row.level > 0 {
            let _ = write!(classes, " indent-{}", row.level.min(MAX_INDENT));
        }
        if row.selected {
            classes.push_str(" selected");
        }
        let id = escape_html(&row.record.id);
        let toggle = if row.has_children {
            let state = if row.expanded { "expanded" } else { "collapsed" };
            format!(r#"<div class="nav-toggle {state}" data-toggle="{id}"></div>"#)
        } else {
            r#"<div class="nav-spacer"></div>"#.to_string()
        };
        let _ = write!(
            html,
            r#"<div class="{classes}" data-id="{id}">{toggle}<div class="icon icon-{}"></div><div class="nav-label">{}</div></div>"#,
            row.record.category.as_str(),
            escape_html(&row.record.name),
        );
    }
    html
}

fn filter_buttons_html(active: Filter) -> String {
    let mut html = String::new();
    for filter in Filter::ALL {
        let class = if filter == active {
            "filter active"
        } else {
            "filter"
        };
        let _ = write!(
            html,
            r#"<button class="{class}" type="button" data-filter="{}">{}</button>"#,
            filter.as_str(),
            filter.label(),
        );
    }
    html
}

fn folder_stats_html(stats: &FolderStats) -> String {
    [
        (stats.folders.to_string(), "Folders"),
        (stats.files.to_string(), "Files"),
        (stats.size_label(), "Size"),
        (stats.total.to_string(), "Items"),
    ]
    .iter()
    .map(|(value, label)| {
        format!(
            r#"<div class="folder-stat"><span class="folder-stat-value">{}</span><div class="folder-stat-label">{label}</div></div>"#,
            escape_html(value)
        )
    })
    .collect()
}

fn entries_html(content: &FolderContent<'_>) -> String {
    match content {
        FolderContent::Empty => r#"<div class="placeholder">This folder is empty</div>"#.to_string(),
        FolderContent::NoMatches => {
            r#"<div class="placeholder">No items match the current filter</div>"#.to_string()
        }
        FolderContent::Items(items) => items.iter().map(|r| entry_html(r)).collect(),
    }
}

fn entry_html(record: &FlatRecord) -> String {
    let folder_class = if record.is_directory { " folder" } else { "" };
    format!(
        concat!(
            r#"<div class="entry{}" data-id="{}">"#,
            r#"<div class="icon icon-{}"></div>"#,
            r#"<div class="entry-name">{}</div>"#,
            r#"<div class="entry-meta">"#,
            r#"<span class="entry-size">{}</span>"#,
            r#"<span class="entry-date">{}</span>"#,
            r#"<span class="entry-ext">{}</span>"#,
            r#"</div></div>"#,
        ),
        folder_class,
        escape_html(&record.id),
        record.category.as_str(),
        escape_html(&record.name),
        escape_html(&record.size),
        escape_html(&record.modified),
        escape_html(&extension_label(record)),
    )
}

/// `DIR` for folders, otherwise the extension without its dot, upper-cased.
fn extension_label(record: &FlatRecord) -> String {
    if record.is_directory {
        "DIR".to_string()
    } else {
        record
            .extension
            .strip_prefix('.')
            .unwrap_or(&record.extension)
            .to_uppercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fill_template_is_single_pass() {
        let out = fill_template("<{{A}}|{{B}}|{{C}}>", |key| match key {
            "A" => Some("{{B}}"),
            "B" => Some("b"),
            _ => None,
        });
        assert_eq!(out, "<{{B}}|b|{{C}}>");
    }

    #[test]
    fn fill_template_keeps_unterminated_braces() {
        assert_eq!(fill_template("x {{open", |_| Some("y")), "x {{open");
    }

    #[test]
    fn escape_html_covers_markup_characters() {
        assert_eq!(
            escape_html(r#"<a href="x">Tom & Jerry's</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; Jerry&#39;s&lt;/a&gt;"
        );
    }

    #[test]
    fn template_has_every_placeholder_filled() {
        let probe = TemplateValues {
            title: String::new(),
            root_path: String::new(),
            total_files: String::new(),
            total_folders: String::new(),
            total_size: String::new(),
            scan_time: String::new(),
            nav_tree: String::new(),
            breadcrumb: String::new(),
            filter_buttons: String::new(),
            folder_title: String::new(),
            folder_stats: String::new(),
            entries: String::new(),
            item_count: String::new(),
            payload: String::new(),
        };
        let mut rest = TEMPLATE;
        while let Some(start) = rest.find("{{") {
            let end = rest[start..].find("}}").expect("unterminated placeholder") + start;
            let key = &rest[start + 2..end];
            assert!(probe.get(key).is_some(), "unknown placeholder {key}");
            rest = &rest[end + 2..];
        }
    }

    fn tie_payload() -> Payload {
        use crate::analysis::FileCategory;
        use crate::export::records::{Totals, PAYLOAD_VERSION};
        use crate::model::size::format_size;

        let record = |id: &str, name: &str, parent: Option<&str>, is_directory: bool| FlatRecord {
            id: id.to_string(),
            name: name.to_string(),
            path: format!("/data/{name}"),
            size: format_size(1280),
            size_bytes: 1280,
            modified: String::new(),
            is_directory,
            depth: u32::from(parent.is_some()),
            parent_id: parent.map(str::to_string),
            child_ids: if is_directory { vec!["file_1".to_string()] } else { Vec::new() },
            extension: if is_directory { String::new() } else { ".bin".to_string() },
            category: if is_directory { FileCategory::Folder } else { FileCategory::Generic },
        };
        Payload {
            version: PAYLOAD_VERSION,
            title: "data".to_string(),
            root_path: "/data".to_string(),
            scan_time: "2024-01-01 00:00:00".to_string(),
            totals: Totals {
                total_files: 1,
                total_folders: 1,
                total_size: 1280,
            },
            records: vec![
                record("dir_0", "data", None, true),
                record("file_1", "blob.bin", Some("dir_0"), false),
            ],
        }
    }

    #[test]
    fn row_and_folder_stats_sizes_agree_on_ties() {
        let html = render(&tie_payload()).unwrap();
        let entries = &html[html.find(r#"id="entries""#).unwrap()..];
        assert!(entries.contains(r#"<span class="entry-size">1.3 KB</span>"#));
        let stats = &html[html.find(r#"id="folderStats""#).unwrap()..];
        assert!(stats.contains(r#"<span class="folder-stat-value">1.3 KB</span>"#));
    }

    #[test]
    fn script_rounds_sizes_like_format_size() {
        assert!(SCRIPT.contains("Math.round(value * 10) / 10"));
        assert!(!SCRIPT.contains("value.toFixed(1)"));
    }

    #[test]
    fn embedded_assets_cannot_break_out_of_their_elements() {
        assert!(!SCRIPT.contains("</script"));
        assert!(!STYLES.contains("</style"));
    }

    #[test]
    fn filter_buttons_mark_the_active_filter() {
        let html = filter_buttons_html(Filter::All);
        assert!(html.starts_with(r#"<button class="filter active" type="button" data-filter="all">All</button>"#));
        assert_eq!(html.matches("<button").count(), Filter::ALL.len());
    }
}
