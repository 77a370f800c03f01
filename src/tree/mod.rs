//! Tree module: the node arena rebuilt on every application state change.
//!
//! This module contains:
//! - [`Tree`]: slot arena for one generation of nodes
//! - [`Node`]: a node's layout hints, visual fields and focus/hit flags
//! - [`NodeId`]: generation-scoped node handle
//! - [`Rgb`] and [`VisualStyle`]: colors carried on nodes

mod arena;
mod color;
mod node;

pub use arena::Tree;
pub use color::{Rgb, VisualStyle};
pub use node::{Node, NodeId, SizeHint};
