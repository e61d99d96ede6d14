/// Arena-backed file tree with O(n) bottom-up size aggregation.
///
/// All nodes live in a single `Vec<FileNode>`. Relationships between nodes
/// use `NodeIndex` (a thin `u32` wrapper) rather than heap pointers, so
/// there is no cyclic ownership between parents and children.
use super::file_node::{FileNode, NodeIndex};
use compact_str::CompactString;
use std::path::{Path, PathBuf};

/// Whole-scan totals. Directories count as folders (the root included),
/// `total_size` sums file bytes only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Aggregates {
    pub total_files: u64,
    pub total_folders: u64,
    pub total_size: u64,
}

/// The complete file tree produced by a scan.
#[derive(Debug, Clone)]
pub struct FileTree {
    /// Arena: every node in scan order. Parents always precede children.
    pub nodes: Vec<FileNode>,

    /// The scan root, if one has been added.
    pub root: Option<NodeIndex>,

    /// Absolute path of the scan root; node paths are resolved against it.
    pub root_path: PathBuf,
}

impl FileTree {
    /// Create an empty tree with pre-allocated capacity.
    pub fn with_capacity(root_path: impl Into<PathBuf>, estimated_nodes: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(estimated_nodes),
            root: None,
            root_path: root_path.into(),
        }
    }

    /// Allocate a new node in the arena and return its index.
    pub fn add_node(&mut self, node: FileNode) -> NodeIndex {
        let idx = NodeIndex::new(self.nodes.len());
        self.nodes.push(node);
        idx
    }

    /// Add the root directory to the tree.
    pub fn add_root(&mut self, name: CompactString) -> NodeIndex {
        let idx = self.add_node(FileNode::new_dir(name, None));
        self.root = Some(idx);
        idx
    }

    /// Attach `child` as the last child of `parent`, fixing up its depth.
    pub fn add_child(&mut self, parent: NodeIndex, child: NodeIndex) {
        let depth = self.nodes[parent.idx()].depth + 1;
        let node = &mut self.nodes[child.idx()];
        node.parent = Some(parent);
        node.depth = depth;
        self.nodes[parent.idx()].children.push(child);
    }

    /// Compute directory sizes in a single bottom-up pass and return the totals.
    ///
    /// Because children are always inserted after their parent in the arena
    /// (scan order is parent-first), iterating in *reverse* guarantees that
    /// every child is processed before its parent. This gives O(n) aggregation
    /// with no recursion and no stack.
    ///
    /// Safe to call repeatedly: directory sizes are reset before each pass.
    pub fn aggregate_sizes(&mut self) -> Aggregates {
        let mut totals = Aggregates::default();

        for node in self.nodes.iter_mut() {
            if node.is_dir {
                node.size = 0;
            }
        }

        for i in (0..self.nodes.len()).rev() {
            let node = &self.nodes[i];
            if node.is_dir {
                totals.total_folders += 1;
            } else {
                totals.total_files += 1;
                totals.total_size += node.size;
            }
            let size = node.size;
            if let Some(parent_idx) = node.parent {
                self.nodes[parent_idx.idx()].size += size;
            }
        }

        totals
    }

    /// Reconstruct the absolute path for a node by walking up to the root.
    pub fn full_path(&self, index: NodeIndex) -> PathBuf {
        let mut segments = Vec::new();
        let mut current = index;
        while let Some(parent) = self.nodes[current.idx()].parent {
            segments.push(self.nodes[current.idx()].name.as_str());
            current = parent;
        }

        let mut path = self.root_path.clone();
        for segment in segments.iter().rev() {
            path.push(segment);
        }
        path
    }

    /// Stable identifier for a node, unique within one scan.
    ///
    /// Directories and files get disjoint prefixes so they can never collide.
    pub fn node_id(&self, index: NodeIndex) -> String {
        let prefix = if self.nodes[index.idx()].is_dir {
            "dir"
        } else {
            "file"
        };
        format!("{prefix}_{}", index.0)
    }

    /// Direct children of a node, in insertion order.
    #[inline]
    pub fn children(&self, parent: NodeIndex) -> &[NodeIndex] {
        &self.nodes[parent.idx()].children
    }

    /// Get the node at the given index.
    #[inline]
    pub fn node(&self, index: NodeIndex) -> &FileNode {
        &self.nodes[index.idx()]
    }

    /// Display name of the scan root: its base name, or the full path when
    /// the root has none (e.g. `/`).
    pub fn root_name(&self) -> String {
        display_name(&self.root_path)
    }

    /// Total number of nodes in the tree.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if the tree contains no nodes.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Base name of `path`, falling back to the whole path for roots like `/` or `C:\`.
pub fn display_name(path: &Path) -> String {
    match path.file_name() {
        Some(name) => name.to_string_lossy().into_owned(),
        None => path.to_string_lossy().into_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// root -> Users -> (a.txt: 100, b.txt: 200), root -> c.bin: 50
    fn sample_tree() -> (FileTree, NodeIndex, NodeIndex, NodeIndex) {
        let mut tree = FileTree::with_capacity("/data", 8);
        let root = tree.add_root(CompactString::new("data"));
        let dir = tree.add_node(FileNode::new_dir(CompactString::new("Users"), None));
        tree.add_child(root, dir);

        let file_a = tree.add_node(FileNode::new_file(CompactString::new("a.txt"), 100, None));
        tree.add_child(dir, file_a);
        let file_b = tree.add_node(FileNode::new_file(CompactString::new("b.txt"), 200, None));
        tree.add_child(dir, file_b);

        let file_c = tree.add_node(FileNode::new_file(CompactString::new("c.bin"), 50, None));
        tree.add_child(root, file_c);
        (tree, root, dir, file_a)
    }

    #[test]
    fn test_tree_aggregation() {
        let (mut tree, root, dir, _) = sample_tree();
        let totals = tree.aggregate_sizes();

        assert_eq!(tree.node(dir).size, 300);
        assert_eq!(tree.node(root).size, 350);
        assert_eq!(
            totals,
            Aggregates {
                total_files: 3,
                total_folders: 2,
                total_size: 350,
            }
        );
    }

    #[test]
    fn test_aggregation_is_repeatable() {
        let (mut tree, root, _, _) = sample_tree();
        tree.aggregate_sizes();
        let again = tree.aggregate_sizes();
        assert_eq!(tree.node(root).size, 350);
        assert_eq!(again.total_size, 350);
    }

    #[test]
    fn test_depth_follows_parent() {
        let (tree, root, dir, file_a) = sample_tree();
        assert_eq!(tree.node(root).depth, 0);
        assert_eq!(tree.node(dir).depth, 1);
        assert_eq!(tree.node(file_a).depth, 2);
    }

    #[test]
    fn test_full_path() {
        let (tree, root, _, file_a) = sample_tree();
        assert_eq!(tree.full_path(root), PathBuf::from("/data"));
        assert_eq!(tree.full_path(file_a), Path::new("/data").join("Users").join("a.txt"));
    }

    #[test]
    fn test_node_ids_use_disjoint_prefixes() {
        let (tree, root, dir, file_a) = sample_tree();
        assert_eq!(tree.node_id(root), "dir_0");
        assert_eq!(tree.node_id(dir), "dir_1");
        assert_eq!(tree.node_id(file_a), "file_2");
    }

    #[test]
    fn test_children_keep_insertion_order() {
        let (tree, root, dir, _) = sample_tree();
        let names: Vec<&str> = tree
            .children(root)
            .iter()
            .map(|&c| tree.node(c).name.as_str())
            .collect();
        assert_eq!(names, ["Users", "c.bin"]);
        assert_eq!(tree.children(dir).len(), 2);
    }

    #[test]
    fn test_display_name_falls_back_to_path() {
        assert_eq!(display_name(Path::new("/home/me/photos")), "photos");
        assert_eq!(display_name(Path::new("/")), "/");
    }
}
