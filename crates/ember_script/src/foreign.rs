//! Foreign handles: script-visible tokens for native-owned state
//!
//! The VM's collector cannot trace native memory, so scripted objects
//! never hold pointers. Instead the host hands out opaque tokens and
//! keeps this table mapping each token to a weak reference on the native
//! owner's transform. When the owner is destroyed the weak reference
//! fails to upgrade and every later access resolves to a defined error.

use std::cell::RefCell;
use std::rc::{Rc, Weak};
use ember_core::{Transform, TransformRef};
use slotmap::{new_key_type, SlotMap};
use crate::error::ScriptError;

new_key_type! {
    /// Slot key of a foreign-table entry
    pub struct ForeignKey;
}

/// Opaque script-visible token referencing native-owned state
///
/// Registered with the VM as a custom type; scripts can only pass it back
/// to native accessor functions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ForeignHandle(ForeignKey);

/// Host-side table mapping tokens to native transforms
#[derive(Default)]
pub struct ForeignTable {
    entries: SlotMap<ForeignKey, Weak<RefCell<Transform>>>,
}

/// Shared handle to the foreign table
pub type ForeignTableRef = Rc<RefCell<ForeignTable>>;

impl ForeignTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty table behind a shared handle
    pub fn new_ref() -> ForeignTableRef {
        Rc::new(RefCell::new(Self::new()))
    }

    /// Register a transform and return its token
    pub fn register(&mut self, transform: &TransformRef) -> ForeignHandle {
        ForeignHandle(self.entries.insert(Rc::downgrade(transform)))
    }

    /// Resolve a token to the live transform
    ///
    /// Fails with [`ScriptError::StaleHandle`] once the native owner is
    /// gone or the token was invalidated.
    pub fn resolve(&self, handle: ForeignHandle) -> Result<TransformRef, ScriptError> {
        self.entries
            .get(handle.0)
            .and_then(Weak::upgrade)
            .ok_or(ScriptError::StaleHandle)
    }

    /// Explicitly invalidate a token; returns whether it existed
    pub fn invalidate(&mut self, handle: ForeignHandle) -> bool {
        self.entries.remove(handle.0).is_some()
    }

    /// Number of registered tokens (including dead ones not yet invalidated)
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
