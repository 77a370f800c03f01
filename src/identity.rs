//! Identity reconciler: carries focus across a full tree rebuild.
//!
//! Every rebuild produces brand-new node ids. Widgets that matter for
//! continuity register a stable [`IdentityKey`] while building; before the
//! old tree is dropped, the reconciler remembers which key the focused
//! node had, and afterwards moves focus to whichever new node claimed that
//! key.

use crate::focus::FocusManager;
use crate::frame::Frame;
use crate::tree::NodeId;
use std::borrow::Borrow;
use std::collections::HashMap;
use tracing::{debug, trace};

/// Application-chosen stable name for a logical widget instance.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IdentityKey(String);

impl IdentityKey {
    /// Create a key.
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// The key as a string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for IdentityKey {
    fn from(key: &str) -> Self {
        Self(key.to_string())
    }
}

impl From<String> for IdentityKey {
    fn from(key: String) -> Self {
        Self(key)
    }
}

impl Borrow<str> for IdentityKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for IdentityKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Generation-scoped key to node map.
#[derive(Debug, Default)]
pub struct IdentityReconciler {
    current: HashMap<IdentityKey, NodeId>,
    previous: HashMap<NodeId, IdentityKey>,
    pending_focus: Option<IdentityKey>,
    generation: u64,
}

impl IdentityReconciler {
    /// Create an empty reconciler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Close the outgoing generation and open a new, empty one.
    ///
    /// If `previous_focused` was registered in the outgoing generation its
    /// key is kept for [`restore_focus`](Self::restore_focus).
    pub fn begin_rebuild(&mut self, previous_focused: Option<NodeId>) {
        self.previous = std::mem::take(&mut self.current)
            .into_iter()
            .map(|(key, id)| (id, key))
            .collect();
        self.pending_focus = previous_focused.and_then(|id| self.previous.get(&id).cloned());
        self.generation += 1;
        debug!(
            generation = self.generation,
            focus_key = ?self.pending_focus,
            "identity generation opened"
        );
    }

    /// Map `key` to `id` in the current generation. The last registration
    /// of a key wins.
    pub fn register_node(&mut self, key: impl Into<IdentityKey>, id: NodeId) {
        let key = key.into();
        trace!(%key, node = ?id, "register identity");
        self.current.insert(key, id);
    }

    /// Node registered under `key` in the current generation.
    pub fn find_node<Q>(&self, key: &Q) -> Option<NodeId>
    where
        IdentityKey: Borrow<Q>,
        Q: std::hash::Hash + Eq + ?Sized,
    {
        self.current.get(key).copied()
    }

    /// Key a node of the outgoing generation was registered under.
    pub fn previous_key(&self, old: NodeId) -> Option<&IdentityKey> {
        self.previous.get(&old)
    }

    /// Move focus to the node that claimed the previously focused key.
    ///
    /// Returns `false`, leaving focus alone, if no key was captured, the
    /// key is absent from the new generation, or the new node cannot take
    /// focus. The captured key is consumed by the first call.
    pub fn restore_focus(&mut self, focus: &mut FocusManager, frame: &mut Frame) -> bool {
        let Some(key) = self.pending_focus.take() else {
            return false;
        };
        let Some(id) = self.current.get(&key).copied() else {
            debug!(%key, "focus key not rebuilt");
            return false;
        };
        let restored = focus.set_focus(frame, id);
        debug!(%key, node = ?id, restored, "focus restored");
        restored
    }

    /// Number of rebuilds seen.
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Number of keys registered in the current generation.
    pub fn len(&self) -> usize {
        self.current.len()
    }

    /// Check if nothing is registered in the current generation.
    pub fn is_empty(&self) -> bool {
        self.current.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::Node;

    fn focusable(frame: &mut Frame, name: &'static str) -> NodeId {
        frame.create_root(Node::new(name).with_focusable(true))
    }

    #[test]
    fn test_focus_round_trip() {
        let mut reconciler = IdentityReconciler::new();
        let mut focus = FocusManager::new();

        let mut old = Frame::new();
        let a = focusable(&mut old, "field");
        reconciler.register_node("name-field", a);
        assert!(focus.set_focus(&mut old, a));

        reconciler.begin_rebuild(focus.focused_node());
        let mut new = Frame::new();
        let b = focusable(&mut new, "field");
        reconciler.register_node("name-field", b);
        focus.update_after_rebuild(&mut new);

        assert!(reconciler.restore_focus(&mut focus, &mut new));
        assert_eq!(focus.focused_node(), Some(b));
        assert!(!reconciler.restore_focus(&mut focus, &mut new));
        assert_eq!(focus.focused_node(), Some(b));
    }

    #[test]
    fn test_missing_key_leaves_focus() {
        let mut reconciler = IdentityReconciler::new();
        let mut focus = FocusManager::new();

        let mut old = Frame::new();
        let a = focusable(&mut old, "field");
        reconciler.register_node("name-field", a);
        focus.set_focus(&mut old, a);

        reconciler.begin_rebuild(focus.focused_node());
        let mut new = Frame::new();
        let other = focusable(&mut new, "other");
        reconciler.register_node("other", other);
        focus.update_after_rebuild(&mut new);

        assert!(!reconciler.restore_focus(&mut focus, &mut new));
        assert_eq!(focus.focused_node(), None);
    }

    #[test]
    fn test_last_registration_wins() {
        let mut reconciler = IdentityReconciler::new();
        let mut frame = Frame::new();
        let a = focusable(&mut frame, "a");
        let b = focusable(&mut frame, "b");
        reconciler.register_node("row", a);
        reconciler.register_node("row", b);
        assert_eq!(reconciler.find_node("row"), Some(b));
        assert_eq!(reconciler.find_node("missing"), None);
        assert_eq!(reconciler.len(), 1);
    }

    #[test]
    fn test_previous_key_lookup() {
        let mut reconciler = IdentityReconciler::new();
        let mut frame = Frame::new();
        let a = focusable(&mut frame, "a");
        reconciler.register_node("save", a);

        reconciler.begin_rebuild(None);
        assert_eq!(reconciler.previous_key(a).map(IdentityKey::as_str), Some("save"));
        assert!(reconciler.find_node("save").is_none());
        assert_eq!(reconciler.generation(), 1);

        let mut focus = FocusManager::new();
        assert!(!reconciler.restore_focus(&mut focus, &mut frame));
    }
}
