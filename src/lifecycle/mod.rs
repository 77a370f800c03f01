//! Frame lifecycle: what must run before the next frame, and when it may
//! be presented.

mod flags;
mod pacer;

pub use flags::{Lifecycle, PendingFlags};
pub use pacer::FramePacer;
