//! Callback composition.
//!
//! Every node has a single callback slot holding at most one
//! [`CallbackRecord`]. Independent producers attach handlers with the
//! `append_node_on_*` functions, which replace the record with one whose
//! chains extend the old one, and [`CallbackOverride`] swaps the record
//! for a scope.

mod compose;
mod record;
mod scoped;
mod slots;

pub use compose::{append_node_on_blur, append_node_on_event, append_node_on_focus};
pub use record::{CallbackKind, CallbackRecord, EventHandler, FocusHandler, RecordId};
pub use scoped::CallbackOverride;
pub(crate) use slots::{CallbackSlots, WeakSlots};
