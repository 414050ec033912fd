//! Arena-backed directory tree with per-node load state.
//!
//! Each node is `Unloaded`, `Loading`, or `Loaded`, an explicit enum so the
//! illegal `loading && loaded` combination cannot exist. Children are
//! attached once per node and kept until the node is explicitly refreshed;
//! a refresh merges by path so already-loaded descendants keep their cached
//! listings and expansion state.
//!
//! Arena slots are never reclaimed; a tree lives for one session context
//! and is rebuilt wholesale when the context changes.

use rustc_hash::FxHashMap;
use session::FileEntry;

/// Index into the tree's node arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// Lazy-load state of one directory node. Plain files stay `Unloaded`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadState {
    #[default]
    Unloaded,
    Loading,
    Loaded,
}

#[derive(Debug)]
pub struct FileNode {
    pub path: String,
    pub name: String,
    pub is_dir: bool,
    pub size_bytes: u64,
    pub mtime_epoch: Option<u64>,
    pub expanded: bool,
    pub state: LoadState,
    children: Vec<NodeId>,
}

impl FileNode {
    fn from_entry(entry: FileEntry) -> Self {
        Self {
            path: entry.path,
            name: entry.name,
            is_dir: entry.is_dir,
            size_bytes: entry.size_bytes,
            mtime_epoch: entry.mtime_epoch,
            expanded: false,
            state: LoadState::Unloaded,
            children: Vec::new(),
        }
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

#[derive(Debug, Default)]
pub struct FileTree {
    nodes: Vec<FileNode>,
    root: Option<NodeId>,
    by_path: FxHashMap<String, NodeId>,
}

impl FileTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop everything; used when the session context goes away.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.root = None;
        self.by_path.clear();
    }

    /// Reset to a fresh root directory node, expanded but unloaded.
    pub fn set_root(&mut self, root_path: &str) -> NodeId {
        self.clear();
        let id = NodeId(0);
        self.nodes.push(FileNode {
            path: root_path.to_string(),
            name: root_path.to_string(),
            is_dir: true,
            size_bytes: 0,
            mtime_epoch: None,
            expanded: true,
            state: LoadState::Unloaded,
            children: Vec::new(),
        });
        self.by_path.insert(root_path.to_string(), id);
        self.root = Some(id);
        id
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub fn node(&self, id: NodeId) -> &FileNode {
        &self.nodes[id.0]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut FileNode {
        &mut self.nodes[id.0]
    }

    pub fn find(&self, path: &str) -> Option<NodeId> {
        self.by_path.get(path).copied()
    }

    /// Attach a directory listing to `parent` and mark it `Loaded`.
    ///
    /// Entries are sorted directories-first, then case-aware by name.
    /// Existing children are merged by path: their metadata updates but
    /// expansion, load state, and cached listings survive, so refreshing a
    /// parent never blows away what the user already expanded below it.
    pub fn set_children(&mut self, parent: NodeId, mut entries: Vec<FileEntry>) {
        sort_entries(&mut entries);

        let old_children = std::mem::take(&mut self.nodes[parent.0].children);

        let mut children = Vec::with_capacity(entries.len());
        for entry in entries {
            let id = match self.find(&entry.path) {
                Some(id) if old_children.contains(&id) => {
                    let node = &mut self.nodes[id.0];
                    node.name = entry.name;
                    node.is_dir = entry.is_dir;
                    node.size_bytes = entry.size_bytes;
                    node.mtime_epoch = entry.mtime_epoch;
                    id
                }
                _ => {
                    let id = NodeId(self.nodes.len());
                    self.by_path.insert(entry.path.clone(), id);
                    self.nodes.push(FileNode::from_entry(entry));
                    id
                }
            };
            children.push(id);
        }

        // Entries that vanished from the listing leave the path index so a
        // later file of the same name gets a fresh node.
        for old in old_children {
            if !children.contains(&old) {
                self.unindex_subtree(old);
            }
        }

        let parent_node = &mut self.nodes[parent.0];
        parent_node.children = children;
        parent_node.state = LoadState::Loaded;
    }

    fn unindex_subtree(&mut self, id: NodeId) {
        let (path, children) = {
            let node = &self.nodes[id.0];
            (node.path.clone(), node.children.clone())
        };
        self.by_path.remove(&path);
        for child in children {
            self.unindex_subtree(child);
        }
    }
}

/// Directories before files, then case-aware lexicographic name order.
fn sort_entries(entries: &mut [FileEntry]) {
    entries.sort_by(|a, b| {
        b.is_dir
            .cmp(&a.is_dir)
            .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
            .then_with(|| a.name.cmp(&b.name))
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn entry(path: &str, is_dir: bool) -> FileEntry {
        FileEntry {
            path: path.to_string(),
            name: path.rsplit('/').next().unwrap_or(path).to_string(),
            is_dir,
            size_bytes: if is_dir { 0 } else { 10 },
            mtime_epoch: Some(1_700_000_000),
        }
    }

    #[test]
    fn set_root_creates_expanded_unloaded_dir() {
        let mut tree = FileTree::new();
        let root = tree.set_root("/srv/app");

        let node = tree.node(root);
        assert!(node.is_dir);
        assert!(node.expanded);
        assert_eq!(node.state, LoadState::Unloaded);
        assert_eq!(tree.find("/srv/app"), Some(root));
    }

    #[test]
    fn listing_sorts_dirs_first_then_by_name() {
        let mut tree = FileTree::new();
        let root = tree.set_root("/");
        tree.set_children(
            root,
            vec![
                entry("/zeta.txt", false),
                entry("/src", true),
                entry("/Alpha.txt", false),
                entry("/Build", true),
            ],
        );

        let names: Vec<&str> = tree
            .node(root)
            .children()
            .iter()
            .map(|id| tree.node(*id).name.as_str())
            .collect();
        assert_eq!(names, vec!["Build", "src", "Alpha.txt", "zeta.txt"]);
        assert_eq!(tree.node(root).state, LoadState::Loaded);
    }

    #[test]
    fn refresh_merge_preserves_expanded_descendants() {
        let mut tree = FileTree::new();
        let root = tree.set_root("/");
        tree.set_children(root, vec![entry("/src", true), entry("/a.txt", false)]);

        let src = tree.find("/src").unwrap();
        tree.node_mut(src).expanded = true;
        tree.set_children(src, vec![entry("/src/lib.rs", false)]);

        // Root reloads with the same listing plus a new file.
        tree.set_children(
            root,
            vec![
                entry("/src", true),
                entry("/a.txt", false),
                entry("/b.txt", false),
            ],
        );

        let src_after = tree.find("/src").unwrap();
        assert_eq!(src_after, src, "existing node is reused");
        assert!(tree.node(src_after).expanded);
        assert_eq!(tree.node(src_after).state, LoadState::Loaded);
        assert_eq!(tree.node(src_after).children().len(), 1);
    }

    #[test]
    fn vanished_entries_leave_the_path_index() {
        let mut tree = FileTree::new();
        let root = tree.set_root("/");
        tree.set_children(root, vec![entry("/gone.txt", false)]);
        assert!(tree.find("/gone.txt").is_some());

        tree.set_children(root, vec![entry("/kept.txt", false)]);
        assert!(tree.find("/gone.txt").is_none());
        assert!(tree.find("/kept.txt").is_some());
    }

    #[test]
    fn clear_drops_everything() {
        let mut tree = FileTree::new();
        let root = tree.set_root("/");
        tree.set_children(root, vec![entry("/a.txt", false)]);

        tree.clear();
        assert!(tree.root().is_none());
        assert!(tree.find("/a.txt").is_none());
    }

    #[test]
    fn metadata_updates_on_merge() {
        let mut tree = FileTree::new();
        let root = tree.set_root("/");
        tree.set_children(root, vec![entry("/a.txt", false)]);

        let mut updated = entry("/a.txt", false);
        updated.size_bytes = 999;
        tree.set_children(root, vec![updated]);

        let id = tree.find("/a.txt").unwrap();
        assert_eq!(tree.node(id).size_bytes, 999);
    }
}
