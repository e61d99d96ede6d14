/// Depth-first directory walker: builds the arena tree for one scan.
///
/// Two passes share [`list_dir`]: a counting pass sizes the progress
/// denominator, then the population pass emits nodes in pre-order. Within a
/// directory every subdirectory subtree is emitted before that directory's
/// own files. Directory sizes are rolled up afterwards by
/// [`FileTree::aggregate_sizes`].
use super::filter::{list_dir, ListedEntry, Listing};
use super::{ScanOptions, ScanResult};
use crate::error::{Result, SnapshotError};
use crate::model::file_tree::display_name;
use crate::model::{FileNode, FileTree, NodeIndex};
use chrono::Local;
use compact_str::CompactString;
use std::fs;
use std::io;
use std::ops::ControlFlow;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Progress callback: `(processed, total)`. Returning `Break` cancels the scan.
pub type ProgressFn<'a> = Box<dyn FnMut(u64, u64) -> ControlFlow<()> + 'a>;

/// A single scan invocation. Owns all mutable scan state; nothing is shared
/// between concurrent scans.
pub struct Scanner<'a> {
    options: ScanOptions,
    progress: Option<ProgressFn<'a>>,
}

impl<'a> Scanner<'a> {
    pub fn new(options: ScanOptions) -> Self {
        Self {
            options,
            progress: None,
        }
    }

    /// Install a progress callback. It runs synchronously on the scan thread
    /// after every emitted entry, so it must be cheap.
    pub fn with_progress<F>(mut self, progress: F) -> Self
    where
        F: FnMut(u64, u64) -> ControlFlow<()> + 'a,
    {
        self.progress = Some(Box::new(progress));
        self
    }

    /// Run the scan to completion.
    ///
    /// Fails with `PathNotFound`/`NotReadable` before doing any work if the
    /// root is unusable, and with `Cancelled` if the callback asked to stop.
    pub fn run(self) -> Result<ScanResult> {
        let start = Instant::now();
        let include_hidden = self.options.include_hidden;
        let root = resolve_root(&self.options.root)?;
        let scan_time = Local::now();

        info!(
            "Starting scan of {} (include_hidden={include_hidden})",
            root.display()
        );

        let total = count_entries(&root, include_hidden);
        debug!("Counting pass found {total} entries");

        let mut walk = Walk {
            tree: FileTree::with_capacity(root.clone(), total as usize + 1),
            include_hidden,
            processed: 0,
            total,
            error_count: 0,
            progress: self.progress,
        };

        let root_modified = fs::metadata(&root).and_then(|m| m.modified()).ok();
        let root_idx = walk.tree.add_root(CompactString::new(display_name(&root)));
        walk.tree.nodes[root_idx.idx()].modified = root_modified;

        match list_dir(&root, include_hidden) {
            Ok(listing) => walk.populate(root_idx, listing)?,
            Err(err) => {
                // The root was readable a moment ago; treat a race here like
                // any other unreadable entry.
                warn!("Root listing failed during scan: {err}");
                walk.error_count += 1;
            }
        }

        let Walk {
            mut tree,
            error_count,
            ..
        } = walk;
        let totals = tree.aggregate_sizes();
        let duration = start.elapsed();

        info!(
            "Scan complete: {} files, {} folders, {} bytes in {duration:?} ({error_count} unreadable entries)",
            totals.total_files, totals.total_folders, totals.total_size
        );

        Ok(ScanResult {
            tree,
            totals,
            scan_time,
            error_count,
            duration,
        })
    }
}

/// Mutable state of one population pass.
struct Walk<'a> {
    tree: FileTree,
    include_hidden: bool,
    processed: u64,
    total: u64,
    error_count: u64,
    progress: Option<ProgressFn<'a>>,
}

impl Walk<'_> {
    /// Emit the entries of one directory listing under `parent`.
    fn populate(&mut self, parent: NodeIndex, listing: Listing) -> Result<()> {
        for (path, err) in listing.failures {
            self.skip(&path, err);
        }

        for entry in listing.dirs {
            let added = self.add_entry(parent, &entry, true);
            self.report()?;
            let Some(idx) = added.filter(|_| entry.descend) else {
                continue;
            };
            match list_dir(&entry.path, self.include_hidden) {
                Ok(children) => self.populate(idx, children)?,
                Err(err) => self.skip(&entry.path, err),
            }
        }

        for entry in listing.files {
            self.add_entry(parent, &entry, false);
            self.report()?;
        }

        Ok(())
    }

    /// Stat one entry and add it to the tree. Unreadable entries are omitted.
    fn add_entry(
        &mut self,
        parent: NodeIndex,
        entry: &ListedEntry,
        is_dir: bool,
    ) -> Option<NodeIndex> {
        self.processed += 1;
        let meta = match fs::metadata(&entry.path) {
            Ok(meta) => meta,
            Err(err) => {
                self.skip(&entry.path, err);
                return None;
            }
        };

        let name = CompactString::new(&entry.name);
        let node = if is_dir {
            FileNode::new_dir(name, Some(parent))
        } else {
            FileNode::new_file(name, meta.len(), Some(parent))
        };
        let idx = self.tree.add_node(node.with_modified(meta.modified().ok()));
        self.tree.add_child(parent, idx);
        Some(idx)
    }

    fn skip(&mut self, path: &Path, source: io::Error) {
        self.error_count += 1;
        let err = SnapshotError::EntryUnreadable {
            path: path.to_path_buf(),
            source,
        };
        debug!("Skipping entry: {err}");
    }

    fn report(&mut self) -> Result<()> {
        if let Some(progress) = self.progress.as_mut() {
            let processed = self.processed.min(self.total);
            if progress(processed, self.total).is_break() {
                debug!("Scan cancelled after {processed} of {} entries", self.total);
                return Err(SnapshotError::Cancelled);
            }
        }
        Ok(())
    }
}

/// Validate and absolutise the scan root.
fn resolve_root(root: &Path) -> Result<PathBuf> {
    let resolved = fs::canonicalize(root).map_err(|source| {
        if source.kind() == io::ErrorKind::NotFound {
            SnapshotError::PathNotFound(root.to_path_buf())
        } else {
            SnapshotError::NotReadable {
                path: root.to_path_buf(),
                source,
            }
        }
    })?;

    let not_readable = |source| SnapshotError::NotReadable {
        path: resolved.clone(),
        source,
    };
    let meta = fs::metadata(&resolved).map_err(not_readable)?;
    if !meta.is_dir() {
        return Err(not_readable(io::Error::other("not a directory")));
    }
    fs::read_dir(&resolved).map_err(not_readable)?;
    Ok(resolved)
}

/// Counting pass: number of entries the population pass will visit.
fn count_entries(dir: &Path, include_hidden: bool) -> u64 {
    let Ok(listing) = list_dir(dir, include_hidden) else {
        return 0;
    };
    let mut count = listing.len() as u64;
    for entry in listing.dirs.iter().filter(|e| e.descend) {
        count += count_entries(&entry.path, include_hidden);
    }
    count
}
