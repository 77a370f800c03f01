//! In-place node patches.
//!
//! Patches mutate fields of an already-built node so feedback shows on
//! the next frame without a rebuild. Each returns `false` if the node is
//! dead, and records invalidation only when the value actually changed:
//! size hints need a layout pass, everything else only a repaint.

use super::{Frame, Invalidation};
use crate::tree::{Node, NodeId, Rgb, SizeHint, VisualStyle};

impl Frame {
    /// Set a node's local offset.
    pub fn patch_offset(&mut self, id: NodeId, x: f32, y: f32) -> bool {
        self.patch(id, Invalidation::PAINT, |node| {
            let changed = node.offset_x != x || node.offset_y != y;
            node.offset_x = x;
            node.offset_y = y;
            changed
        })
    }

    /// Set a node's size hint.
    pub fn patch_size_hint(&mut self, id: NodeId, hint: SizeHint) -> bool {
        self.patch(id, Invalidation::LAYOUT, |node| {
            let changed = node.size_hint != hint;
            node.size_hint = hint;
            changed
        })
    }

    /// Set a node's visibility.
    pub fn patch_visible(&mut self, id: NodeId, visible: bool) -> bool {
        self.patch(id, Invalidation::PAINT, |node| {
            let changed = node.visible != visible;
            node.visible = visible;
            changed
        })
    }

    /// Set a node's opacity, clamped to `[0, 1]`.
    pub fn patch_opacity(&mut self, id: NodeId, opacity: f32) -> bool {
        let opacity = opacity.clamp(0.0, 1.0);
        self.patch(id, Invalidation::PAINT, |node| {
            let changed = node.opacity != opacity;
            node.opacity = opacity;
            changed
        })
    }

    /// Set a node's background.
    pub fn patch_background(&mut self, id: NodeId, background: Option<Rgb>) -> bool {
        self.patch(id, Invalidation::PAINT, |node| {
            let changed = node.background != background;
            node.background = background;
            changed
        })
    }

    /// Set background and opacity together.
    pub fn patch_style(&mut self, id: NodeId, style: VisualStyle) -> bool {
        self.patch(id, Invalidation::PAINT, |node| {
            let changed = node.background != Some(style.background) || node.opacity != style.opacity;
            node.background = Some(style.background);
            node.opacity = style.opacity;
            changed
        })
    }

    /// Replace a node's text.
    pub fn patch_text(&mut self, id: NodeId, text: &str) -> bool {
        self.patch(id, Invalidation::PAINT, |node| {
            if node.text.as_deref() == Some(text) {
                return false;
            }
            node.text = Some(text.to_string());
            true
        })
    }

    fn patch(&mut self, id: NodeId, marks: Invalidation, apply: impl FnOnce(&mut Node) -> bool) -> bool {
        let Some(node) = self.tree.get_node_mut(id) else {
            return false;
        };
        if apply(node) {
            self.invalidation |= marks;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_patch_marks_paint_only_on_change() {
        let mut frame = Frame::new();
        let knob = frame.create_root(Node::new("knob"));

        assert!(frame.patch_offset(knob, 0.0, 0.0));
        assert!(frame.take_invalidation().is_empty());

        assert!(frame.patch_offset(knob, 12.0, 0.0));
        assert_eq!(frame.take_invalidation(), Invalidation::PAINT);
        assert_eq!(frame.node(knob).unwrap().offset_x, 12.0);
    }

    #[test]
    fn test_size_hint_marks_layout() {
        let mut frame = Frame::new();
        let fill = frame.create_root(Node::new("fill"));
        assert!(frame.patch_size_hint(fill, SizeHint::fixed(40.0, 4.0)));
        assert_eq!(frame.take_invalidation(), Invalidation::LAYOUT);
    }

    #[test]
    fn test_patch_never_requests_rebuild() {
        let mut frame = Frame::new();
        let check = frame.create_root(Node::new("check"));
        frame.patch_visible(check, false);
        frame.patch_text(check, "x");
        frame.patch_opacity(check, 2.0);
        assert!(!frame.invalidation().contains(Invalidation::REBUILD));
        assert_eq!(frame.node(check).unwrap().opacity, 1.0);
    }

    #[test]
    fn test_patch_dead_node() {
        let mut frame = Frame::new();
        let node = frame.create_root(Node::new("n"));
        frame.destroy_node(node);
        assert!(!frame.patch_visible(node, false));
        assert!(frame.take_invalidation().is_empty());
    }
}
