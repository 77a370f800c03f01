//! Layout output and the layout engine seam.
//!
//! The layout solver itself lives outside this crate. A layout pass takes
//! the current tree and viewport and produces a flat map from node to
//! absolute rectangle; everything here only reads that map.

use super::rect::LayoutRect;
use crate::tree::{NodeId, Tree};
use std::collections::HashMap;

/// Size of the area the UI root is laid out into.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Viewport {
    /// Width.
    pub width: f32,
    /// Height.
    pub height: f32,
}

impl Viewport {
    /// Create a new viewport.
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Result of a layout pass: absolute geometry per node.
///
/// Nodes created after the last layout pass have no entry; callers that
/// need geometry skip such nodes for the current event.
#[derive(Clone, Debug, Default)]
pub struct LayoutOutput {
    rects: HashMap<NodeId, LayoutRect>,
    viewport: Viewport,
}

impl LayoutOutput {
    /// Create an empty layout output for a viewport.
    pub fn new(viewport: Viewport) -> Self {
        Self {
            rects: HashMap::new(),
            viewport,
        }
    }

    /// Record the absolute rectangle of a node.
    pub fn insert(&mut self, id: NodeId, rect: LayoutRect) {
        self.rects.insert(id, rect);
    }

    /// Builder-style variant of [`insert`](Self::insert).
    #[must_use]
    pub fn with(mut self, id: NodeId, rect: LayoutRect) -> Self {
        self.insert(id, rect);
        self
    }

    /// Get the absolute rectangle of a node, if it was laid out.
    #[inline]
    pub fn get(&self, id: NodeId) -> Option<LayoutRect> {
        self.rects.get(&id).copied()
    }

    /// The viewport this output was computed for.
    pub const fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Number of laid-out nodes.
    pub fn len(&self) -> usize {
        self.rects.len()
    }

    /// Check if no node was laid out.
    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }
}

/// An external layout solver.
///
/// Implemented for any `FnMut(&Tree, Viewport) -> LayoutOutput`, so tests
/// and small applications can pass a closure.
pub trait LayoutEngine {
    /// Lay out the whole tree into the viewport.
    fn layout(&mut self, tree: &Tree, viewport: Viewport) -> LayoutOutput;
}

impl<F> LayoutEngine for F
where
    F: FnMut(&Tree, Viewport) -> LayoutOutput,
{
    fn layout(&mut self, tree: &Tree, viewport: Viewport) -> LayoutOutput {
        self(tree, viewport)
    }
}
