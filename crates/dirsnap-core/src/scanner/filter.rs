/// Entry exclusion and directory listing shared by both scan passes.
///
/// The counting pass (progress denominator) and the population pass must
/// agree on exactly which entries exist, so both go through [`list_dir`].
use std::cmp::Ordering;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// `true` if an entry named `name` must be left out of the scan.
///
/// Names starting with `~` or `$` are lock/temporary artifacts and are always
/// skipped. Dot-names are skipped unless `include_hidden` is set. Prefix
/// checks are case-sensitive.
pub fn is_excluded(name: &str, include_hidden: bool) -> bool {
    if name.starts_with('~') || name.starts_with('$') {
        return true;
    }
    !include_hidden && name.starts_with('.')
}

/// One directory entry that survived exclusion.
#[derive(Debug, Clone)]
pub struct ListedEntry {
    pub name: String,
    pub path: PathBuf,
    /// `false` for symlinks that resolve to a directory: they are listed
    /// but never expanded.
    pub descend: bool,
}

/// Entries of one directory, split by kind and sorted case-insensitively.
#[derive(Debug, Default)]
pub struct Listing {
    pub dirs: Vec<ListedEntry>,
    pub files: Vec<ListedEntry>,
    /// Entries that failed while being read or classified.
    pub failures: Vec<(PathBuf, io::Error)>,
}

impl Listing {
    pub fn len(&self) -> usize {
        self.dirs.len() + self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dirs.is_empty() && self.files.is_empty()
    }
}

/// List `dir`, applying [`is_excluded`] and classifying each entry.
///
/// Only a failure to open the directory itself is returned as an error;
/// per-entry failures are collected in [`Listing::failures`]. Entries that
/// are neither files nor directories (sockets, FIFOs, dangling links) are
/// dropped.
pub fn list_dir(dir: &Path, include_hidden: bool) -> io::Result<Listing> {
    let mut listing = Listing::default();

    for entry in fs::read_dir(dir)? {
        let entry = match entry {
            Ok(e) => e,
            Err(err) => {
                listing.failures.push((dir.to_path_buf(), err));
                continue;
            }
        };

        let name = entry.file_name().to_string_lossy().into_owned();
        if is_excluded(&name, include_hidden) {
            continue;
        }
        let path = entry.path();

        let file_type = match entry.file_type() {
            Ok(t) => t,
            Err(err) => {
                listing.failures.push((path, err));
                continue;
            }
        };

        let (is_dir, is_file, descend) = if file_type.is_symlink() {
            match fs::metadata(&path) {
                Ok(meta) => (meta.is_dir(), meta.is_file(), false),
                Err(err) => {
                    listing.failures.push((path, err));
                    continue;
                }
            }
        } else {
            (file_type.is_dir(), file_type.is_file(), true)
        };

        let listed = ListedEntry {
            name,
            path,
            descend,
        };
        if is_dir {
            listing.dirs.push(listed);
        } else if is_file {
            listing.files.push(listed);
        }
    }

    listing.dirs.sort_by(compare_names);
    listing.files.sort_by(compare_names);
    Ok(listing)
}

/// Case-insensitive ordering, with the raw name as a tie-breaker so the
/// order is total and repeatable.
fn compare_names(a: &ListedEntry, b: &ListedEntry) -> Ordering {
    a.name
        .to_lowercase()
        .cmp(&b.name.to_lowercase())
        .then_with(|| a.name.cmp(&b.name))
}
