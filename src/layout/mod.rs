//! Layout module: geometry consumed from the external layout solver.
//!
//! Layout runs once per layout pass and is never consulted mid-rebuild.
//! There is no solver here - just the rectangle primitive, the flat
//! `NodeId -> LayoutRect` output and the trait a solver implements.

mod output;
mod rect;

pub use output::{LayoutEngine, LayoutOutput, Viewport};
pub use rect::LayoutRect;
