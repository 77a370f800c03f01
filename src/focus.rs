//! Keyboard focus and tab-order traversal.

use crate::frame::Frame;
use crate::tree::NodeId;
use tracing::trace;

/// Tracks the focused node of the current frame.
#[derive(Debug, Default)]
pub struct FocusManager {
    focused: Option<NodeId>,
}

impl FocusManager {
    /// Create a focus manager with nothing focused.
    pub const fn new() -> Self {
        Self { focused: None }
    }

    /// The focused node, if any.
    pub const fn focused_node(&self) -> Option<NodeId> {
        self.focused
    }

    /// Move focus to `id`, running blur on the old node and focus on the
    /// new one. Returns `false` if `id` is dead or not focusable.
    pub fn set_focus(&mut self, frame: &mut Frame, id: NodeId) -> bool {
        if !frame.node(id).is_some_and(|node| node.focusable) {
            return false;
        }
        if self.focused == Some(id) {
            return true;
        }
        trace!(from = ?self.focused, to = ?id, "focus");
        if let Some(old) = self.focused.take() {
            frame.invoke_on_blur(old);
        }
        self.focused = Some(id);
        frame.invoke_on_focus(id);
        true
    }

    /// Drop focus, running blur on the old node.
    pub fn clear_focus(&mut self, frame: &mut Frame) {
        if let Some(old) = self.focused.take() {
            frame.invoke_on_blur(old);
        }
    }

    /// Move focus to the next (or previous) node in tab order, wrapping
    /// around. Returns `false` if there is nothing to focus.
    pub fn handle_tab(&mut self, frame: &mut Frame, backwards: bool) -> bool {
        let order = tab_order(frame);
        if order.is_empty() {
            return false;
        }
        let current = self.focused.and_then(|id| order.iter().position(|n| *n == id));
        let next = match (current, backwards) {
            (None, false) => 0,
            (None, true) => order.len() - 1,
            (Some(i), false) => (i + 1) % order.len(),
            (Some(i), true) => (i + order.len() - 1) % order.len(),
        };
        self.set_focus(frame, order[next])
    }

    /// Forget focus if the focused node did not survive into `frame`.
    ///
    /// No blur runs: the old node's callbacks went with the old frame.
    pub fn update_after_rebuild(&mut self, frame: &Frame) {
        if self.focused.is_some_and(|id| !frame.contains(id)) {
            self.focused = None;
        }
    }
}

/// Focusable, visible nodes in tab order: positive tab indices ascending,
/// then tab index zero in tree order. Negative indices are skipped.
pub fn tab_order(frame: &Frame) -> Vec<NodeId> {
    let tree = frame.tree();
    let mut candidates: Vec<(i32, usize, NodeId)> = tree
        .preorder()
        .into_iter()
        .enumerate()
        .filter_map(|(position, id)| {
            let node = tree.get_node(id)?;
            (node.focusable && node.tab_index >= 0 && tree.is_effectively_visible(id))
                .then_some((node.tab_index, position, id))
        })
        .collect();
    // Zero sorts after every positive index.
    candidates.sort_by_key(|(tab, position, _)| (*tab == 0, *tab, *position));
    candidates.into_iter().map(|(_, _, id)| id).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::callback::{append_node_on_blur, append_node_on_focus};
    use crate::tree::Node;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_tab_order() {
        let mut frame = Frame::new();
        let root = frame.create_root(Node::new("root"));
        let a = frame.create_child(root, Node::new("a").with_focusable(true));
        let b = frame.create_child(root, Node::new("b").with_focusable(true));
        let mut c_node = Node::new("c").with_focusable(true);
        c_node.tab_index = 2;
        let c = frame.create_child(root, c_node);
        let mut d_node = Node::new("d").with_focusable(true);
        d_node.tab_index = -1;
        frame.create_child(root, d_node);
        let hidden = frame.create_child(root, Node::new("e").with_focusable(true).with_visible(false));

        let order = tab_order(&frame);
        assert_eq!(order, vec![c, a, b]);
        assert!(!order.contains(&hidden));
    }

    #[test]
    fn test_handle_tab_wraps() {
        let mut frame = Frame::new();
        let a = frame.create_root(Node::new("a").with_focusable(true));
        let b = frame.create_root(Node::new("b").with_focusable(true));
        let mut focus = FocusManager::new();

        assert!(focus.handle_tab(&mut frame, false));
        assert_eq!(focus.focused_node(), Some(a));
        focus.handle_tab(&mut frame, false);
        assert_eq!(focus.focused_node(), Some(b));
        focus.handle_tab(&mut frame, false);
        assert_eq!(focus.focused_node(), Some(a));
        focus.handle_tab(&mut frame, true);
        assert_eq!(focus.focused_node(), Some(b));
    }

    #[test]
    fn test_blur_then_focus() {
        let mut frame = Frame::new();
        let a = frame.create_root(Node::new("a").with_focusable(true));
        let b = frame.create_root(Node::new("b").with_focusable(true));
        let log = Rc::new(RefCell::new(Vec::new()));

        let l = log.clone();
        append_node_on_blur(&mut frame, a, move |_, _| l.borrow_mut().push("blur a"));
        let l = log.clone();
        append_node_on_focus(&mut frame, b, move |_, _| l.borrow_mut().push("focus b"));

        let mut focus = FocusManager::new();
        focus.set_focus(&mut frame, a);
        focus.set_focus(&mut frame, b);
        assert_eq!(*log.borrow(), vec!["blur a", "focus b"]);
    }

    #[test]
    fn test_rejects_unfocusable() {
        let mut frame = Frame::new();
        let plain = frame.create_root(Node::new("plain"));
        let mut focus = FocusManager::new();
        assert!(!focus.set_focus(&mut frame, plain));
        assert!(!focus.handle_tab(&mut frame, false));
    }

    #[test]
    fn test_update_after_rebuild_drops_dead_focus() {
        let mut old = Frame::new();
        let a = old.create_root(Node::new("a").with_focusable(true));
        let mut focus = FocusManager::new();
        focus.set_focus(&mut old, a);

        let new = Frame::new();
        focus.update_after_rebuild(&new);
        assert_eq!(focus.focused_node(), None);
    }
}
