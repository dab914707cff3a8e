//! Opaque handle registry.
//!
//! Handles are `u32` arena keys, never pointer reinterpretations: 0 is
//! never issued (the host uses it as the "none" sentinel) and every
//! handle-to-reference resolution in the crate happens here. State is
//! thread-local — the bridge runs entirely on the engine's UI loop
//! thread, so a call from any other thread simply finds an empty
//! registry.
//!
//! Dispatch code must not hold the registry borrow while calling into
//! host or engine code; every helper below scopes its borrow to the
//! lookup itself.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::engine::{Engine, View};
use crate::error::BridgeError;
use crate::window::WebWindow;

/// Opaque identifier handed to the host for one native window or view.
pub type Handle = u32;

pub struct Registry {
    engine: Option<Rc<dyn Engine>>,
    next_handle: Handle,
    windows: HashMap<Handle, Rc<WebWindow>>,
    views: HashMap<Handle, Rc<dyn View>>,
    /// Engine-object identity → issued handle, so the same engine view
    /// always resolves to the same handle no matter how many wrapper
    /// objects the backend mints for it.
    view_handles: HashMap<usize, Handle>,
}

impl Registry {
    fn new() -> Self {
        Self {
            engine: None,
            next_handle: 1,
            windows: HashMap::new(),
            views: HashMap::new(),
            view_handles: HashMap::new(),
        }
    }

    pub fn install_engine(&mut self, engine: Rc<dyn Engine>) {
        if self.engine.is_some() {
            log::debug!("engine already installed; keeping the existing instance");
            return;
        }
        self.engine = Some(engine);
    }

    pub fn engine(&self) -> Option<Rc<dyn Engine>> {
        self.engine.clone()
    }

    fn allocate(&mut self) -> Result<Handle, BridgeError> {
        let handle = self.next_handle;
        self.next_handle = self
            .next_handle
            .checked_add(1)
            .ok_or(BridgeError::HandleSpaceExhausted)?;
        Ok(handle)
    }

    pub fn insert_window(&mut self, window: Rc<WebWindow>) -> Result<Handle, BridgeError> {
        let handle = self.allocate()?;
        self.windows.insert(handle, window);
        Ok(handle)
    }

    pub fn window(&self, handle: Handle) -> Option<Rc<WebWindow>> {
        self.windows.get(&handle).cloned()
    }

    /// Remove a window and drop the handle of its own view, if one was
    /// ever handed to the host. Views of other windows are untouched.
    pub fn remove_window(&mut self, handle: Handle) -> Option<Rc<WebWindow>> {
        let window = self.windows.remove(&handle)?;
        if let Some(view_handle) = self.view_handles.remove(&window.view().identity()) {
            self.views.remove(&view_handle);
        }
        Some(window)
    }

    /// Issue (or re-use) the handle for an engine view.
    pub fn intern_view(&mut self, view: &Rc<dyn View>) -> Result<Handle, BridgeError> {
        if let Some(handle) = self.view_handles.get(&view.identity()) {
            return Ok(*handle);
        }
        let handle = self.allocate()?;
        self.view_handles.insert(view.identity(), handle);
        self.views.insert(handle, view.clone());
        Ok(handle)
    }

    pub fn view(&self, handle: Handle) -> Option<Rc<dyn View>> {
        self.views.get(&handle).cloned()
    }

    pub fn window_count(&self) -> usize {
        self.windows.len()
    }
}

thread_local! {
    static REGISTRY: RefCell<Registry> = RefCell::new(Registry::new());
}

/// Execute a closure with mutable access to the thread's registry.
pub fn with_registry<R>(f: impl FnOnce(&mut Registry) -> R) -> R {
    REGISTRY.with(|r| f(&mut r.borrow_mut()))
}

/// Discard all registry state. Test scaffolding only.
#[cfg(test)]
pub(crate) fn reset() {
    REGISTRY.with(|r| *r.borrow_mut() = Registry::new());
}
