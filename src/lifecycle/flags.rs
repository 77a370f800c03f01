//! Cascading dirty flags.

use bitflags::bitflags;
use tracing::debug;

bitflags! {
    /// Work pending before the next frame can be presented.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct PendingFlags: u8 {
        /// The tree must be rebuilt.
        const REBUILD = 0b001;
        /// Layout must run.
        const LAYOUT = 0b010;
        /// A frame must be presented.
        const FRAME = 0b100;
    }
}

/// Dirty-flag lifecycle for one UI root.
///
/// The six operations below are the only transitions. Requests cascade
/// downwards (a rebuild implies a layout implies a frame), so whether a
/// layout pass must run before hit-testing is always answered by
/// [`is_layout_pending`](Self::is_layout_pending).
#[derive(Debug, Clone, Copy, Default)]
pub struct Lifecycle {
    flags: PendingFlags,
}

impl Lifecycle {
    /// Create a lifecycle with nothing pending.
    pub const fn new() -> Self {
        Self {
            flags: PendingFlags::empty(),
        }
    }

    /// Request a rebuild (and therefore layout and a frame).
    pub fn request_rebuild(&mut self) {
        self.flags |= PendingFlags::all();
    }

    /// Request layout and a frame.
    pub fn request_layout(&mut self) {
        self.flags |= PendingFlags::LAYOUT | PendingFlags::FRAME;
    }

    /// Request a frame.
    pub fn request_frame(&mut self) {
        self.flags |= PendingFlags::FRAME;
    }

    /// Run `rebuild` if a rebuild is pending. Afterwards layout and a frame
    /// are always pending.
    pub fn run_rebuild_if_needed(&mut self, rebuild: impl FnOnce()) -> bool {
        if !self.flags.contains(PendingFlags::REBUILD) {
            return false;
        }
        debug!("rebuild");
        rebuild();
        self.flags.remove(PendingFlags::REBUILD);
        self.flags |= PendingFlags::LAYOUT | PendingFlags::FRAME;
        true
    }

    /// Run `layout` if layout is pending. Only the layout flag is cleared.
    pub fn run_layout_if_needed(&mut self, layout: impl FnOnce()) -> bool {
        if !self.flags.contains(PendingFlags::LAYOUT) {
            return false;
        }
        debug!("layout");
        layout();
        self.flags.remove(PendingFlags::LAYOUT);
        true
    }

    /// Clear the frame flag.
    pub fn mark_frame_presented(&mut self) {
        self.flags.remove(PendingFlags::FRAME);
    }

    /// Check if a rebuild is pending.
    pub const fn is_rebuild_pending(&self) -> bool {
        self.flags.contains(PendingFlags::REBUILD)
    }

    /// Check if layout is pending.
    pub const fn is_layout_pending(&self) -> bool {
        self.flags.contains(PendingFlags::LAYOUT)
    }

    /// Check if a frame is pending.
    pub const fn is_frame_pending(&self) -> bool {
        self.flags.contains(PendingFlags::FRAME)
    }

    /// All pending flags.
    pub const fn flags(&self) -> PendingFlags {
        self.flags
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[derive(Debug, Clone, Copy)]
    enum Op {
        RequestRebuild,
        RequestLayout,
        RequestFrame,
        RunRebuild,
        RunLayout,
        Present,
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            Just(Op::RequestRebuild),
            Just(Op::RequestLayout),
            Just(Op::RequestFrame),
            Just(Op::RunRebuild),
            Just(Op::RunLayout),
            Just(Op::Present),
        ]
    }

    proptest! {
        #[test]
        fn rebuild_always_leaves_layout_and_frame_pending(ops in proptest::collection::vec(op(), 0..64)) {
            let mut lifecycle = Lifecycle::new();
            for op in ops {
                match op {
                    Op::RequestRebuild => lifecycle.request_rebuild(),
                    Op::RequestLayout => lifecycle.request_layout(),
                    Op::RequestFrame => lifecycle.request_frame(),
                    Op::RunRebuild => {
                        if lifecycle.run_rebuild_if_needed(|| {}) {
                            prop_assert!(lifecycle.is_layout_pending());
                            prop_assert!(lifecycle.is_frame_pending());
                            prop_assert!(!lifecycle.is_rebuild_pending());
                        }
                    }
                    Op::RunLayout => {
                        let was_frame = lifecycle.is_frame_pending();
                        lifecycle.run_layout_if_needed(|| {});
                        prop_assert!(!lifecycle.is_layout_pending());
                        prop_assert_eq!(lifecycle.is_frame_pending(), was_frame);
                    }
                    Op::Present => lifecycle.mark_frame_presented(),
                }
            }
        }
    }

    #[test]
    fn test_request_cascade() {
        let mut lifecycle = Lifecycle::new();
        lifecycle.request_rebuild();
        assert_eq!(lifecycle.flags(), PendingFlags::all());

        let mut lifecycle = Lifecycle::new();
        lifecycle.request_layout();
        assert_eq!(lifecycle.flags(), PendingFlags::LAYOUT | PendingFlags::FRAME);

        let mut lifecycle = Lifecycle::new();
        lifecycle.request_frame();
        assert_eq!(lifecycle.flags(), PendingFlags::FRAME);
    }

    #[test]
    fn test_run_only_when_pending() {
        let mut lifecycle = Lifecycle::new();
        let mut ran = false;
        assert!(!lifecycle.run_rebuild_if_needed(|| ran = true));
        assert!(!lifecycle.run_layout_if_needed(|| ran = true));
        assert!(!ran);

        lifecycle.request_rebuild();
        lifecycle.mark_frame_presented();
        lifecycle.run_layout_if_needed(|| {});
        assert!(lifecycle.run_rebuild_if_needed(|| ran = true));
        assert!(ran);
        assert_eq!(lifecycle.flags(), PendingFlags::LAYOUT | PendingFlags::FRAME);
    }

    #[test]
    fn test_present_clears_frame_only() {
        let mut lifecycle = Lifecycle::new();
        lifecycle.request_rebuild();
        lifecycle.mark_frame_presented();
        assert_eq!(lifecycle.flags(), PendingFlags::REBUILD | PendingFlags::LAYOUT);
    }
}
