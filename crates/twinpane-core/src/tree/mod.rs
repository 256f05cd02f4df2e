//! The folder tree pane.
//!
//! Nodes live in an arena owned by [`Tree`] and are addressed by
//! [`NodeId`]. Each id carries the generation of its slot, so an id kept by
//! the UI after reconciliation deleted its node is reported as stale instead
//! of silently pointing at whatever node reused the slot.

mod reconcile;

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crate::error::{CoreError, CoreResult};
use crate::fs::icons::{IconResolver, IconSet};

pub use reconcile::{FreshChild, ReconcileOutcome, RefreshStats};

/// Handle to a node in a [`Tree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId {
    index: u32,
    generation: u32,
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}.{}", self.index, self.generation)
    }
}

/// One folder in the tree.
#[derive(Debug, Clone)]
pub struct TreeNode {
    name: String,
    path: PathBuf,
    expanded: bool,
    hidden: bool,
    icons: IconSet,
    has_unrealized_children: bool,
    realized: bool,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl TreeNode {
    fn new(name: String, path: PathBuf, parent: Option<NodeId>) -> Self {
        Self {
            name,
            path,
            expanded: false,
            hidden: false,
            icons: IconSet::placeholder(true),
            has_unrealized_children: true,
            realized: false,
            parent,
            children: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    pub fn icons(&self) -> IconSet {
        self.icons
    }

    /// Lazy-expand marker: the node may have children nobody has listed yet.
    pub fn has_unrealized_children(&self) -> bool {
        self.has_unrealized_children
    }

    /// `true` once the children have been listed at least once.
    pub fn is_realized(&self) -> bool {
        self.realized
    }

    /// Whether the UI should draw an expander.
    pub fn is_expandable(&self) -> bool {
        self.has_unrealized_children || !self.children.is_empty()
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Realized children, sorted case-insensitively by name.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

#[derive(Debug)]
struct Slot {
    generation: u32,
    node: Option<TreeNode>,
}

/// Arena-backed folder tree.
pub struct Tree {
    slots: Vec<Slot>,
    free: Vec<u32>,
    root: NodeId,
    selected: Option<NodeId>,
    resolver: Option<(Arc<dyn IconResolver>, Duration)>,
}

impl fmt::Debug for Tree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tree")
            .field("root", &self.root)
            .field("live", &self.len())
            .field("selected", &self.selected)
            .finish()
    }
}

impl Tree {
    /// Creates a tree with a single, unrealized root at `root_path`.
    pub fn new(root_path: impl Into<PathBuf>) -> Self {
        let path = root_path.into();
        let name = display_name(&path);
        let mut tree = Self {
            slots: Vec::new(),
            free: Vec::new(),
            root: NodeId {
                index: 0,
                generation: 0,
            },
            selected: None,
            resolver: None,
        };
        tree.root = tree.alloc(TreeNode::new(name, path, None));
        tree
    }

    /// Resolves node icons through `resolver`, bounded by `timeout` per node.
    #[must_use]
    pub fn with_resolver(mut self, resolver: Arc<dyn IconResolver>, timeout: Duration) -> Self {
        self.resolver = Some((resolver, timeout));
        self
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Returns the node for `id`, or `None` if it was deleted.
    pub fn node(&self, id: NodeId) -> Option<&TreeNode> {
        self.slots
            .get(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_ref())
    }

    /// Like [`node`](Self::node) but reports a stale id as an error.
    pub fn get(&self, id: NodeId) -> CoreResult<&TreeNode> {
        self.node(id).ok_or(CoreError::StaleNode(id))
    }

    fn get_mut(&mut self, id: NodeId) -> CoreResult<&mut TreeNode> {
        self.slots
            .get_mut(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_mut())
            .ok_or(CoreError::StaleNode(id))
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.node(id).is_some()
    }

    /// Number of live nodes, root included.
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.node.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn children(&self, id: NodeId) -> CoreResult<&[NodeId]> {
        Ok(self.get(id)?.children())
    }

    /// Names of the realized children of `id`, in order.
    pub fn child_names(&self, id: NodeId) -> CoreResult<Vec<&str>> {
        let node = self.get(id)?;
        Ok(node
            .children
            .iter()
            .filter_map(|c| self.node(*c))
            .map(TreeNode::name)
            .collect())
    }

    /// Finds the realized node whose path is `path`.
    pub fn find_by_path(&self, path: &Path) -> Option<NodeId> {
        let mut current = self.root;
        let root = self.node(current)?;
        let rest = path.strip_prefix(root.path()).ok()?;
        for component in rest.components() {
            let name = component.as_os_str().to_string_lossy();
            current = *self
                .node(current)?
                .children
                .iter()
                .find(|c| self.node(**c).is_some_and(|n| n.name == name))?;
        }
        Some(current)
    }

    pub fn selected(&self) -> Option<NodeId> {
        self.selected.filter(|id| self.contains(*id))
    }

    /// Marks `id` as the selected node.
    pub fn select(&mut self, id: NodeId) -> CoreResult<()> {
        self.get(id)?;
        self.selected = Some(id);
        Ok(())
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    /// Collapses `id`; its realized subtree is kept for the next expand.
    pub fn collapse(&mut self, id: NodeId) -> CoreResult<()> {
        self.get_mut(id)?.expanded = false;
        Ok(())
    }

    /// Depth-first list of the nodes a tree widget would show, with depth.
    pub fn visible_rows(&self) -> Vec<(NodeId, usize)> {
        let mut rows = Vec::new();
        let mut stack = vec![(self.root, 0usize)];
        while let Some((id, depth)) = stack.pop() {
            let Some(node) = self.node(id) else {
                continue;
            };
            rows.push((id, depth));
            if node.expanded {
                stack.extend(node.children.iter().rev().map(|c| (*c, depth + 1)));
            }
        }
        rows
    }

    fn alloc(&mut self, node: TreeNode) -> NodeId {
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.node = Some(node);
            NodeId {
                index,
                generation: slot.generation,
            }
        } else {
            let index = u32::try_from(self.slots.len()).unwrap_or(u32::MAX);
            self.slots.push(Slot {
                generation: 0,
                node: Some(node),
            });
            NodeId {
                index,
                generation: 0,
            }
        }
    }

    /// Frees `id` and everything below it.
    fn free_subtree(&mut self, id: NodeId) -> usize {
        let mut freed = 0;
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let Some(slot) = self
                .slots
                .get_mut(current.index as usize)
                .filter(|s| s.generation == current.generation)
            else {
                continue;
            };
            if let Some(node) = slot.node.take() {
                stack.extend(node.children);
                slot.generation = slot.generation.wrapping_add(1);
                self.free.push(current.index);
                freed += 1;
                if self.selected == Some(current) {
                    self.selected = None;
                }
            }
        }
        freed
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
