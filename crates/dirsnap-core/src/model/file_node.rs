/// A single node in the arena-allocated file tree.
///
/// Nodes are stored in a flat `Vec<FileNode>` in scan (pre-order) order.
/// Parent-child relationships use indices rather than pointers, which also
/// makes projecting the tree into flat records trivial.
use crate::analysis::FileCategory;
use compact_str::CompactString;
use std::time::SystemTime;

/// Lightweight index into the arena `Vec<FileNode>`.
///
/// Uses `u32` to keep nodes small: supports up to ~4 billion nodes,
/// which is more than enough for any real filesystem.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeIndex(pub u32);

impl NodeIndex {
    /// Create a new `NodeIndex` from a `usize`, panicking if it exceeds `u32::MAX`.
    #[inline]
    pub fn new(index: usize) -> Self {
        debug_assert!(index <= u32::MAX as usize, "NodeIndex overflow");
        Self(index as u32)
    }

    /// Return the index as a `usize` for Vec indexing.
    #[inline]
    pub fn idx(self) -> usize {
        self.0 as usize
    }
}

/// A single file or directory in the tree.
#[derive(Debug, Clone)]
pub struct FileNode {
    /// File or directory name only (NOT the full path).
    /// Full paths are reconstructed on-demand by walking up via `parent`.
    pub name: CompactString,

    /// Logical size in bytes.
    /// For directories this is the sum of all descendant file sizes,
    /// computed in a single bottom-up pass after scanning.
    pub size: u64,

    /// `true` if this node represents a directory.
    pub is_dir: bool,

    /// Lower-cased extension including the leading dot. Empty for directories
    /// and for names without an extension (e.g. `.bashrc`, `Makefile`).
    pub extension: CompactString,

    pub category: FileCategory,

    /// Distance from the scan root (root = 0).
    pub depth: u32,

    /// Index of the parent node. `None` only for the scan root.
    pub parent: Option<NodeIndex>,

    /// Immediate children in insertion order (subdirectories first, then files).
    pub children: Vec<NodeIndex>,

    /// Last-modified timestamp as reported by the OS.
    pub modified: Option<SystemTime>,
}

impl FileNode {
    /// Create a new file node with the given name and size.
    ///
    /// Extension and category are derived from the name.
    pub fn new_file(name: CompactString, size: u64, parent: Option<NodeIndex>) -> Self {
        let extension = extension_of(&name);
        let category = crate::analysis::categorise_extension(&extension);
        Self {
            name,
            size,
            is_dir: false,
            extension,
            category,
            depth: 0,
            parent,
            children: Vec::new(),
            modified: None,
        }
    }

    /// Create a new directory node. Its size is filled in by aggregation.
    pub fn new_dir(name: CompactString, parent: Option<NodeIndex>) -> Self {
        Self {
            name,
            size: 0,
            is_dir: true,
            extension: CompactString::default(),
            category: FileCategory::Folder,
            depth: 0,
            parent,
            children: Vec::new(),
            modified: None,
        }
    }

    /// Builder-style setter for the modification time.
    pub fn with_modified(mut self, modified: Option<SystemTime>) -> Self {
        self.modified = modified;
        self
    }
}

/// Lower-cased extension of `name`, including the leading dot.
///
/// Follows the usual "last dot that is not the first character" rule:
/// `a.tar.gz` → `.gz`, `.bashrc` → empty, `notes.` → `.`.
pub fn extension_of(name: &str) -> CompactString {
    match std::path::Path::new(name).extension() {
        Some(ext) => {
            let mut out = CompactString::new(".");
            out.push_str(&ext.to_string_lossy().to_lowercase());
            out
        }
        None => CompactString::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_is_lowercased_with_dot() {
        assert_eq!(extension_of("Photo.JPG"), ".jpg");
        assert_eq!(extension_of("archive.tar.gz"), ".gz");
    }

    #[test]
    fn extension_empty_for_dotfiles_and_bare_names() {
        assert_eq!(extension_of(".bashrc"), "");
        assert_eq!(extension_of("Makefile"), "");
    }

    #[test]
    fn new_file_derives_category() {
        let node = FileNode::new_file(CompactString::new("clip.MOV"), 10, None);
        assert_eq!(node.extension, ".mov");
        assert_eq!(node.category, FileCategory::Video);
        assert!(!node.is_dir);
    }

    #[test]
    fn new_dir_has_folder_category_and_no_extension() {
        let node = FileNode::new_dir(CompactString::new("photos.d"), None);
        assert_eq!(node.category, FileCategory::Folder);
        assert!(node.extension.is_empty());
    }
}
