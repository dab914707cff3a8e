//! Owned listener slots with release-on-replace semantics.

use std::cell::RefCell;
use std::rc::Rc;

use crate::host::ListenerBinding;

/// Holds at most one live host listener binding.
///
/// The slot is the owning-resource abstraction around the
/// cross-runtime reference: the *only* two paths that release a
/// binding are [`install`](Self::install) (release the old, then store
/// the new) and [`clear`](Self::clear) (the destroy path). Dispatch
/// borrows the binding via a cheap `Rc` clone so a callback that
/// replaces the listener from inside host code does not trip over an
/// outstanding borrow.
pub struct ListenerSlot<L: ?Sized> {
    binding: RefCell<Option<Rc<L>>>,
}

impl<L: ?Sized + ListenerBinding> ListenerSlot<L> {
    pub fn new() -> Self {
        Self {
            binding: RefCell::new(None),
        }
    }

    /// Install a binding, releasing any previous one first. The old
    /// reference is gone before the new one is stored; the two are
    /// never live at the same time.
    pub fn install(&self, binding: Rc<L>) {
        let old = self.binding.borrow_mut().take();
        if let Some(old) = old {
            old.release();
        }
        *self.binding.borrow_mut() = Some(binding);
    }

    /// Release and empty the slot. Part of window destruction.
    pub fn clear(&self) {
        let old = self.binding.borrow_mut().take();
        if let Some(old) = old {
            old.release();
        }
    }

    /// Current binding, if any. The clone keeps the trait object
    /// alive for the duration of one dispatch even if the slot is
    /// re-installed from inside the host callback.
    pub fn get(&self) -> Option<Rc<L>> {
        self.binding.borrow().clone()
    }

    pub fn is_installed(&self) -> bool {
        self.binding.borrow().is_some()
    }
}

impl<L: ?Sized + ListenerBinding> Default for ListenerSlot<L> {
    fn default() -> Self {
        Self::new()
    }
}
