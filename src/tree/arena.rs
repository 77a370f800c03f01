//! Tree: slot arena holding one generation of nodes.

use super::node::{Node, NodeId};
use std::sync::atomic::{AtomicU32, Ordering};

/// Tree numbers start at 1 so that 0 can mark [`NodeId::INVALID`].
static NEXT_TREE: AtomicU32 = AtomicU32::new(1);

/// One generation of the widget tree.
///
/// A tree lives from one rebuild to the next and is then dropped as a
/// whole. Slots are never reused within a tree, so a destroyed node's id
/// stays dead for the rest of the generation.
#[derive(Debug)]
pub struct Tree {
    id: u32,
    slots: Vec<Option<Node>>,
    roots: Vec<NodeId>,
    live: usize,
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}

impl Tree {
    /// Create an empty tree with a fresh tree number.
    pub fn new() -> Self {
        Self {
            id: NEXT_TREE.fetch_add(1, Ordering::Relaxed),
            slots: Vec::new(),
            roots: Vec::new(),
            live: 0,
        }
    }

    /// Number of live nodes.
    pub const fn len(&self) -> usize {
        self.live
    }

    /// Check if the tree has no live nodes.
    pub const fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Allocate a detached node.
    #[allow(clippy::cast_possible_truncation)]
    pub fn create_node(&mut self, node: Node) -> NodeId {
        let id = NodeId::new(self.id, self.slots.len() as u32);
        self.slots.push(Some(Node {
            parent: None,
            children: Vec::new(),
            ..node
        }));
        self.live += 1;
        id
    }

    /// Check if `id` refers to a live node of this tree.
    #[inline]
    pub fn contains(&self, id: NodeId) -> bool {
        self.get_node(id).is_some()
    }

    /// Get a node by id.
    #[inline]
    pub fn get_node(&self, id: NodeId) -> Option<&Node> {
        if id.tree() != self.id {
            return None;
        }
        self.slots.get(id.slot()).and_then(Option::as_ref)
    }

    /// Get a mutable node by id.
    #[inline]
    pub fn get_node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        if id.tree() != self.id {
            return None;
        }
        self.slots.get_mut(id.slot()).and_then(Option::as_mut)
    }

    /// Register a detached node as a root. Returns `false` if the node is
    /// dead or already attached.
    pub fn add_root(&mut self, id: NodeId) -> bool {
        match self.get_node(id) {
            Some(node) if node.parent.is_none() && !self.roots.contains(&id) => {
                self.roots.push(id);
                true
            }
            _ => false,
        }
    }

    /// Root nodes in paint order.
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// Attach a detached node as the last child of `parent`.
    ///
    /// Returns `false` if either node is dead, or the child already has a
    /// parent or is a root.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> bool {
        if parent == child || !self.contains(parent) || self.roots.contains(&child) {
            return false;
        }
        match self.get_node_mut(child) {
            Some(node) if node.parent.is_none() => node.parent = Some(parent),
            _ => return false,
        }
        if let Some(node) = self.get_node_mut(parent) {
            node.children.push(child);
        }
        true
    }

    /// Destroy a node and its whole subtree.
    ///
    /// Returns the ids of every destroyed node (empty if `id` was dead).
    pub fn destroy_node(&mut self, id: NodeId) -> Vec<NodeId> {
        let Some(parent) = self.get_node(id).map(Node::parent) else {
            return Vec::new();
        };
        match parent {
            Some(parent) => {
                if let Some(node) = self.get_node_mut(parent) {
                    node.children.retain(|c| *c != id);
                }
            }
            None => self.roots.retain(|r| *r != id),
        }

        let mut destroyed = Vec::new();
        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            if let Some(node) = self.slots.get_mut(next.slot()).and_then(Option::take) {
                self.live -= 1;
                stack.extend(node.children);
                destroyed.push(next);
            }
        }
        destroyed
    }

    /// All live nodes reachable from the roots, in pre-order (paint order).
    pub fn preorder(&self) -> Vec<NodeId> {
        let mut order = Vec::with_capacity(self.live);
        let mut stack: Vec<NodeId> = self.roots.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            if let Some(node) = self.get_node(id) {
                order.push(id);
                stack.extend(node.children.iter().rev());
            }
        }
        order
    }

    /// The node itself followed by its ancestors, nearest first.
    pub fn ancestors_inclusive(&self, id: NodeId) -> Vec<NodeId> {
        let mut chain = Vec::new();
        let mut current = Some(id);
        while let Some(next) = current {
            let Some(node) = self.get_node(next) else {
                break;
            };
            chain.push(next);
            current = node.parent;
        }
        chain
    }

    /// Check if a node and all of its ancestors are visible.
    pub fn is_effectively_visible(&self, id: NodeId) -> bool {
        let chain = self.ancestors_inclusive(id);
        !chain.is_empty()
            && chain
                .iter()
                .all(|n| self.get_node(*n).is_some_and(|node| node.visible))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (Tree, NodeId, NodeId, NodeId) {
        let mut tree = Tree::new();
        let root = tree.create_node(Node::new("root"));
        let a = tree.create_node(Node::new("a"));
        let b = tree.create_node(Node::new("b"));
        assert!(tree.add_root(root));
        assert!(tree.append_child(root, a));
        assert!(tree.append_child(a, b));
        (tree, root, a, b)
    }

    #[test]
    fn test_preorder_and_ancestors() {
        let (tree, root, a, b) = sample();
        assert_eq!(tree.preorder(), vec![root, a, b]);
        assert_eq!(tree.ancestors_inclusive(b), vec![b, a, root]);
        assert_eq!(tree.len(), 3);
    }

    #[test]
    fn test_destroy_subtree() {
        let (mut tree, root, a, b) = sample();
        let destroyed = tree.destroy_node(a);
        assert_eq!(destroyed.len(), 2);
        assert!(!tree.contains(a));
        assert!(!tree.contains(b));
        assert!(tree.get_node(root).unwrap().children().is_empty());
        assert!(tree.destroy_node(a).is_empty());
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn test_ids_do_not_cross_trees() {
        let (tree, root, _, _) = sample();
        let mut other = Tree::new();
        let fresh = other.create_node(Node::new("fresh"));
        assert!(!other.contains(root));
        assert!(!tree.contains(fresh));
    }

    #[test]
    fn test_append_rejects_attached_child() {
        let (mut tree, root, _, b) = sample();
        assert!(!tree.append_child(root, b));
        assert!(!tree.append_child(root, root));
    }

    #[test]
    fn test_effective_visibility() {
        let (mut tree, _, a, b) = sample();
        assert!(tree.is_effectively_visible(b));
        tree.get_node_mut(a).unwrap().visible = false;
        assert!(!tree.is_effectively_visible(b));
    }
}
