//! Incremental refresh of the folder tree.
//!
//! A refresh lists a node's directory and merges the sorted listing into
//! the node's existing children in one left-to-right pass. Children whose
//! name survives keep their [`NodeId`], their `expanded` flag and their
//! realized subtree; only genuinely new names allocate nodes and only
//! vanished names free them.

use std::path::Path;

use crate::error::{CoreError, CoreResult};
use crate::fs::icons::{resolve_with_timeout, IconSet};
use crate::fs::ops::{enumerate_or_empty, DirectoryEnumerator};
use crate::nav::sort::cmp_ignore_case;

use super::{NodeId, Tree, TreeNode};

/// One child name from a fresh listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FreshChild {
    pub name: String,
    pub is_folder: bool,
    pub hidden: bool,
    /// Known icons, if any. `None` keeps a surviving node's icons and lets a
    /// new node be resolved through the tree's resolver.
    pub icons: Option<IconSet>,
}

impl FreshChild {
    pub fn new(name: impl Into<String>, is_folder: bool, hidden: bool) -> Self {
        Self {
            name: name.into(),
            is_folder,
            hidden,
            icons: None,
        }
    }

    pub fn with_icons(mut self, icons: IconSet) -> Self {
        self.icons = Some(icons);
        self
    }
}

/// What one [`Tree::reconcile`] call did to a node's children.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileOutcome {
    /// Surviving children that were expanded before the pass.
    pub expanded: Vec<NodeId>,
    pub inserted: usize,
    /// Nodes freed, subtrees included.
    pub removed: usize,
    pub kept: usize,
}

/// Totals over a recursive [`Tree::refresh`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RefreshStats {
    pub nodes_refreshed: usize,
    pub inserted: usize,
    pub removed: usize,
}

impl Tree {
    /// Merges `fresh` (sorted ascending, case-insensitive) into the children
    /// of `id`.
    ///
    /// # Errors
    ///
    /// - [`CoreError::StaleNode`] if `id` was deleted.
    /// - [`CoreError::NotRealized`] if `id` was never expanded.
    pub fn reconcile(&mut self, id: NodeId, fresh: &[FreshChild]) -> CoreResult<ReconcileOutcome> {
        let node = self.get_mut(id)?;
        if !node.realized {
            return Err(CoreError::NotRealized(id));
        }
        let parent_path = node.path.clone();
        let existing = std::mem::take(&mut node.children);

        let mut outcome = ReconcileOutcome::default();
        let mut merged = Vec::with_capacity(fresh.len());
        let mut existing = existing.into_iter().peekable();
        let mut i = 0;

        while i < fresh.len() {
            let Some(&cur) = existing.peek() else {
                break;
            };
            let cur_name = match self.node(cur) {
                Some(n) => n.name.clone(),
                None => {
                    existing.next();
                    continue;
                }
            };

            if cur_name == fresh[i].name {
                let node = self.get_mut(cur)?;
                update_in_place(node, &fresh[i]);
                if node.expanded {
                    outcome.expanded.push(cur);
                }
                merged.push(cur);
                outcome.kept += 1;
                existing.next();
                i += 1;
                continue;
            }

            // Linear look-ahead; fine at interactive directory sizes.
            match fresh[i + 1..].iter().position(|f| f.name == cur_name) {
                Some(offset) => {
                    for child in &fresh[i..=i + offset] {
                        merged.push(self.alloc_child(id, &parent_path, child));
                        outcome.inserted += 1;
                    }
                    i += offset + 1;
                }
                None => {
                    outcome.removed += self.free_subtree(cur);
                    existing.next();
                }
            }
        }

        for cur in existing {
            outcome.removed += self.free_subtree(cur);
        }
        for child in &fresh[i..] {
            merged.push(self.alloc_child(id, &parent_path, child));
            outcome.inserted += 1;
        }

        self.get_mut(id)?.children = merged;
        Ok(outcome)
    }

    /// Re-lists `id` and every expanded node below it.
    ///
    /// A directory that cannot be listed is treated as empty, so its
    /// realized children are removed.
    ///
    /// # Errors
    ///
    /// Same as [`reconcile`](Self::reconcile) for `id` itself.
    pub fn refresh(
        &mut self,
        id: NodeId,
        enumerator: &dyn DirectoryEnumerator,
        show_hidden: bool,
    ) -> CoreResult<RefreshStats> {
        let mut stats = RefreshStats::default();
        let mut pending = vec![id];
        while let Some(current) = pending.pop() {
            let path = self.get(current)?.path.clone();
            let fresh = self.fresh_children(enumerator, &path, show_hidden);
            let outcome = self.reconcile(current, &fresh)?;
            stats.nodes_refreshed += 1;
            stats.inserted += outcome.inserted;
            stats.removed += outcome.removed;
            pending.extend(outcome.expanded);
        }
        tracing::trace!(
            "tree refresh: {} nodes, +{} -{}",
            stats.nodes_refreshed,
            stats.inserted,
            stats.removed
        );
        Ok(stats)
    }

    /// Expands `id`, listing its children on first use and refreshing them
    /// afterwards.
    pub fn expand(
        &mut self,
        id: NodeId,
        enumerator: &dyn DirectoryEnumerator,
        show_hidden: bool,
    ) -> CoreResult<RefreshStats> {
        let node = self.get_mut(id)?;
        node.realized = true;
        node.has_unrealized_children = false;
        let stats = self.refresh(id, enumerator, show_hidden)?;
        self.get_mut(id)?.expanded = true;
        Ok(stats)
    }

    /// Lists `path` as sorted folder children.
    fn fresh_children(
        &self,
        enumerator: &dyn DirectoryEnumerator,
        path: &Path,
        show_hidden: bool,
    ) -> Vec<FreshChild> {
        let mut fresh: Vec<FreshChild> = enumerate_or_empty(enumerator, path)
            .into_iter()
            .filter(|e| e.is_dir() && (show_hidden || !e.is_hidden()))
            .map(|e| FreshChild::new(e.name(), true, e.is_hidden()))
            .collect();
        fresh.sort_by(|a, b| cmp_ignore_case(&a.name, &b.name).then_with(|| a.name.cmp(&b.name)));
        fresh
    }

    fn alloc_child(&mut self, parent: NodeId, parent_path: &Path, child: &FreshChild) -> NodeId {
        let mut node = TreeNode::new(
            child.name.clone(),
            parent_path.join(&child.name),
            Some(parent),
        );
        node.icons = match child.icons {
            Some(icons) => icons,
            None => self.resolve_icons(&node.path, child.is_folder),
        };
        update_in_place(&mut node, child);
        self.alloc(node)
    }

    /// Icons for a newly inserted node; surviving nodes keep theirs.
    fn resolve_icons(&self, path: &Path, is_folder: bool) -> IconSet {
        let Some((resolver, timeout)) = &self.resolver else {
            return IconSet::placeholder(is_folder);
        };
        match resolve_with_timeout(resolver, path, is_folder, *timeout) {
            Ok(icons) => icons,
            Err(err) => {
                tracing::debug!("keeping placeholder icon: {err}");
                IconSet::placeholder(is_folder)
            }
        }
    }
}

fn update_in_place(node: &mut TreeNode, fresh: &FreshChild) {
    node.hidden = fresh.hidden;
    if let Some(icons) = fresh.icons {
        node.icons = icons;
    }
    if !node.realized {
        node.has_unrealized_children = fresh.is_folder;
    }
}
