//! Node: one materialized element of the widget tree.

use super::color::{Rgb, VisualStyle};

/// Identifier of a node within one tree generation.
///
/// Ids carry the number of the tree that allocated them, so an id held
/// across a rebuild never resolves against the freshly built tree.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId {
    tree: u32,
    slot: u32,
}

impl NodeId {
    /// An id that never refers to a node.
    pub const INVALID: Self = Self {
        tree: 0,
        slot: u32::MAX,
    };

    #[inline]
    pub(crate) const fn new(tree: u32, slot: u32) -> Self {
        Self { tree, slot }
    }

    /// Check whether this id could refer to a node at all.
    ///
    /// A valid id may still be dead (destroyed, or from an older tree).
    #[inline]
    pub const fn is_valid(self) -> bool {
        self.tree != 0
    }

    #[inline]
    pub(crate) const fn tree(self) -> u32 {
        self.tree
    }

    #[inline]
    pub(crate) const fn slot(self) -> usize {
        self.slot as usize
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::INVALID
    }
}

impl std::fmt::Debug for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_valid() {
            write!(f, "NodeId({}#{})", self.tree, self.slot)
        } else {
            f.write_str("NodeId(invalid)")
        }
    }
}

/// Preferred size handed to the layout solver. `None` means "size to fit".
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct SizeHint {
    /// Preferred width.
    pub width: Option<f32>,
    /// Preferred height.
    pub height: Option<f32>,
}

impl SizeHint {
    /// A fixed width and height.
    pub const fn fixed(width: f32, height: f32) -> Self {
        Self {
            width: Some(width),
            height: Some(height),
        }
    }
}

/// A node of the widget tree.
///
/// Fields are plain data: widgets fill them in while building, and the
/// patch operations on [`Frame`](crate::Frame) mutate the visual ones in
/// place afterwards.
#[derive(Clone, Debug)]
pub struct Node {
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    /// Debug name (e.g. `"slider.knob"`).
    pub name: &'static str,
    /// Local x offset relative to where layout places the node.
    pub offset_x: f32,
    /// Local y offset relative to where layout places the node.
    pub offset_y: f32,
    /// Preferred size.
    pub size_hint: SizeHint,
    /// Whether the node (and its subtree) is drawn.
    pub visible: bool,
    /// Opacity in `[0, 1]`.
    pub opacity: f32,
    /// Background fill, if any.
    pub background: Option<Rgb>,
    /// Text content, for text nodes.
    pub text: Option<String>,
    /// Whether the node can take keyboard focus.
    pub focusable: bool,
    /// Whether pointer hit-testing may land on this node.
    pub hit_test_visible: bool,
    /// Tab order: negative skips the node, positive values come first in
    /// ascending order, zero follows in tree order.
    pub tab_index: i32,
}

impl Node {
    /// Create a visible, non-focusable node with no size preference.
    pub const fn new(name: &'static str) -> Self {
        Self {
            parent: None,
            children: Vec::new(),
            name,
            offset_x: 0.0,
            offset_y: 0.0,
            size_hint: SizeHint {
                width: None,
                height: None,
            },
            visible: true,
            opacity: 1.0,
            background: None,
            text: None,
            focusable: false,
            hit_test_visible: true,
            tab_index: 0,
        }
    }

    /// Create a text node. Text nodes never intercept hit-testing.
    pub fn label(name: &'static str, text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            hit_test_visible: false,
            ..Self::new(name)
        }
    }

    /// Set a fixed size hint.
    #[must_use]
    pub const fn with_size(mut self, width: f32, height: f32) -> Self {
        self.size_hint = SizeHint::fixed(width, height);
        self
    }

    /// Set the local offset.
    #[must_use]
    pub const fn with_offset(mut self, x: f32, y: f32) -> Self {
        self.offset_x = x;
        self.offset_y = y;
        self
    }

    /// Set background and opacity from a style.
    #[must_use]
    pub const fn with_style(mut self, style: VisualStyle) -> Self {
        self.background = Some(style.background);
        self.opacity = style.opacity;
        self
    }

    /// Set visibility.
    #[must_use]
    pub const fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    /// Make the node a focus target.
    #[must_use]
    pub const fn with_focusable(mut self, focusable: bool) -> Self {
        self.focusable = focusable;
        self
    }

    /// Set hit-test visibility.
    #[must_use]
    pub const fn with_hit_test(mut self, visible: bool) -> Self {
        self.hit_test_visible = visible;
        self
    }

    /// Parent node, if attached.
    pub const fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Child nodes in paint order.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_id() {
        assert!(!NodeId::INVALID.is_valid());
        assert!(NodeId::new(1, 0).is_valid());
        assert_eq!(NodeId::default(), NodeId::INVALID);
    }

    #[test]
    fn test_label_is_not_hit_testable() {
        let node = Node::label("label", "Save");
        assert!(!node.hit_test_visible);
        assert_eq!(node.text.as_deref(), Some("Save"));
    }
}
