/// Viewer state machine over a flat record list.
///
/// This is the browsing model the generated document runs in the browser:
/// hierarchy reconstruction, folder navigation, navigation-pane expansion,
/// and filtered folder listings. The document generator uses it to
/// pre-render the initial view.
///
/// Every operation is a synchronous, side-effect-free update of in-memory
/// state. Unknown ids are ignored rather than treated as errors.
use super::filter::Filter;
use crate::export::FlatRecord;
use crate::model::size::format_size;
use std::collections::{HashMap, HashSet};

/// Counts over the direct children of the current folder that pass the
/// active filter and search term.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FolderStats {
    pub folders: usize,
    pub files: usize,
    pub size_bytes: u64,
    pub total: usize,
}

impl FolderStats {
    pub fn size_label(&self) -> String {
        format_size(self.size_bytes)
    }
}

/// What the content pane shows for the current folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FolderContent<'a> {
    /// The folder has no children at all.
    Empty,
    /// The folder has children but none pass the filter/search.
    NoMatches,
    Items(Vec<&'a FlatRecord>),
}

/// One visible row of the navigation pane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavRow<'a> {
    pub record: &'a FlatRecord,
    pub level: usize,
    pub has_children: bool,
    pub expanded: bool,
    pub selected: bool,
}

pub struct Explorer<'a> {
    records: &'a [FlatRecord],
    by_id: HashMap<&'a str, usize>,
    /// Adjacency rebuilt from `parent_id`, in record order.
    children: Vec<Vec<usize>>,
    root: Option<usize>,
    expanded: HashSet<usize>,
    all_expanded: bool,
    current: Option<usize>,
    filter: Filter,
    search: String,
}

impl<'a> Explorer<'a> {
    /// Rebuild the hierarchy from `records` and open the root folder.
    ///
    /// Records whose `parent_id` names no known record are unreachable and
    /// simply never shown.
    pub fn reconstruct(records: &'a [FlatRecord]) -> Self {
        let by_id: HashMap<&str, usize> = records
            .iter()
            .enumerate()
            .map(|(i, r)| (r.id.as_str(), i))
            .collect();

        let mut children = vec![Vec::new(); records.len()];
        let mut root = None;
        for (i, record) in records.iter().enumerate() {
            match record.parent_id.as_deref() {
                Some(parent) => {
                    if let Some(&p) = by_id.get(parent) {
                        children[p].push(i);
                    }
                }
                None if root.is_none() => root = Some(i),
                None => {}
            }
        }

        Self {
            records,
            by_id,
            children,
            root,
            expanded: HashSet::new(),
            all_expanded: false,
            current: root,
            filter: Filter::All,
            search: String::new(),
        }
    }

    pub fn current_folder(&self) -> Option<&'a FlatRecord> {
        self.current.map(|i| &self.records[i])
    }

    /// Breadcrumb text: the current folder's absolute path.
    pub fn breadcrumb(&self) -> &'a str {
        self.current_folder().map_or("", |r| r.path.as_str())
    }

    pub fn filter(&self) -> Filter {
        self.filter
    }

    pub fn set_filter(&mut self, filter: Filter) {
        self.filter = filter;
    }

    pub fn set_search(&mut self, term: impl Into<String>) {
        self.search = term.into();
    }

    /// Open a folder. Returns `false` (and changes nothing) when `id` is
    /// unknown or not a directory.
    pub fn navigate(&mut self, id: &str) -> bool {
        match self.index_of(id) {
            Some(i) if self.records[i].is_directory => {
                self.current = Some(i);
                true
            }
            _ => false,
        }
    }

    /// Flip a directory's expansion in the navigation pane. Only
    /// directories with at least one child can be expanded.
    pub fn toggle(&mut self, id: &str) -> bool {
        let Some(i) = self.index_of(id).filter(|&i| self.is_expandable(i)) else {
            return false;
        };
        if !self.expanded.remove(&i) {
            self.expanded.insert(i);
        }
        true
    }

    /// Expand every expandable directory, or collapse everything if the
    /// last call expanded. Returns the new state (`true` = expanded).
    pub fn toggle_expand_all(&mut self) -> bool {
        if self.all_expanded {
            self.expanded.clear();
            self.all_expanded = false;
        } else {
            self.expanded = (0..self.records.len())
                .filter(|&i| self.is_expandable(i))
                .collect();
            self.all_expanded = true;
        }
        self.all_expanded
    }

    pub fn is_expanded(&self, id: &str) -> bool {
        self.index_of(id)
            .is_some_and(|i| self.expanded.contains(&i))
    }

    /// Children of the current folder that pass the filter and search term.
    pub fn visible_children(&self) -> Vec<&'a FlatRecord> {
        let Some(current) = self.current else {
            return Vec::new();
        };
        self.children[current]
            .iter()
            .map(|&c| &self.records[c])
            .filter(|r| self.filter.accepts(r, &self.search))
            .collect()
    }

    pub fn content(&self) -> FolderContent<'a> {
        let has_children = self.current.is_some_and(|i| !self.children[i].is_empty());
        if !has_children {
            return FolderContent::Empty;
        }
        let items = self.visible_children();
        if items.is_empty() {
            FolderContent::NoMatches
        } else {
            FolderContent::Items(items)
        }
    }

    /// Recomputed on every call; never cached.
    pub fn folder_stats(&self) -> FolderStats {
        let mut stats = FolderStats::default();
        for record in self.visible_children() {
            if record.is_directory {
                stats.folders += 1;
            } else {
                stats.files += 1;
            }
            stats.size_bytes += record.size_bytes;
            stats.total += 1;
        }
        stats
    }

    /// Rows of the navigation pane: the root, then the children of every
    /// expanded directory, depth-first. Independent of the current folder
    /// except for the `selected` flag.
    pub fn nav_rows(&self) -> Vec<NavRow<'a>> {
        let mut rows = Vec::new();
        if let Some(root) = self.root {
            self.push_nav_rows(root, 0, &mut rows);
        }
        rows
    }

    fn push_nav_rows(&self, index: usize, level: usize, rows: &mut Vec<NavRow<'a>>) {
        let expanded = self.expanded.contains(&index);
        rows.push(NavRow {
            record: &self.records[index],
            level,
            has_children: self.is_expandable(index),
            expanded,
            selected: self.current == Some(index),
        });
        if expanded {
            for &child in &self.children[index] {
                self.push_nav_rows(child, level + 1, rows);
            }
        }
    }

    fn is_expandable(&self, index: usize) -> bool {
        self.records[index].is_directory && !self.children[index].is_empty()
    }

    fn index_of(&self, id: &str) -> Option<usize> {
        self.by_id.get(id).copied()
    }
}
