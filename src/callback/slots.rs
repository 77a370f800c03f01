//! Per-node callback slots.
//!
//! A slot is opened when a node is created and closed when it is
//! destroyed. Scoped overrides hold only a weak handle to the slot table,
//! so restoring into a dropped frame or a closed slot does nothing.

use super::record::CallbackRecord;
use crate::tree::NodeId;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};

type SlotMap = HashMap<NodeId, Option<Rc<CallbackRecord>>>;

/// Slot table owned by a frame.
#[derive(Debug, Default)]
pub(crate) struct CallbackSlots {
    slots: Rc<RefCell<SlotMap>>,
}

impl CallbackSlots {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn open(&self, id: NodeId) {
        self.slots.borrow_mut().insert(id, None);
    }

    pub(crate) fn close(&self, id: NodeId) {
        self.slots.borrow_mut().remove(&id);
    }

    pub(crate) fn get(&self, id: NodeId) -> Option<Rc<CallbackRecord>> {
        self.slots.borrow().get(&id).cloned().flatten()
    }

    /// Replace the record in an open slot, returning `false` if the slot is
    /// closed.
    pub(crate) fn set(&self, id: NodeId, record: Option<Rc<CallbackRecord>>) -> bool {
        store(&self.slots, id, record)
    }

    pub(crate) fn downgrade(&self) -> WeakSlots {
        WeakSlots {
            slots: Rc::downgrade(&self.slots),
        }
    }
}

/// Weak handle to a frame's slot table.
#[derive(Debug, Clone)]
pub(crate) struct WeakSlots {
    slots: Weak<RefCell<SlotMap>>,
}

impl WeakSlots {
    /// Store into the slot if both the table and the slot are still alive.
    pub(crate) fn set(&self, id: NodeId, record: Option<Rc<CallbackRecord>>) -> bool {
        self.slots.upgrade().is_some_and(|slots| store(&slots, id, record))
    }
}

fn store(slots: &RefCell<SlotMap>, id: NodeId, record: Option<Rc<CallbackRecord>>) -> bool {
    match slots.borrow_mut().get_mut(&id) {
        Some(slot) => {
            *slot = record;
            true
        }
        None => false,
    }
}
