//! Host-facing bridge operations.
//!
//! The foreign entry points in `webwindow-native` unwrap their
//! arguments and land here; nothing below this module ever sees a raw
//! host value. Handle resolution failures are reported instead of
//! being undefined behavior — the arena registry makes stale and
//! double-destroyed handles detectable for free.

use std::rc::Rc;

use crate::engine::Engine;
use crate::error::BridgeError;
use crate::host::{HostViewListener, HostWindowListener, ListenerBinding};
use crate::registry::{with_registry, Handle};
use crate::window::{CreateSpec, WebWindow};

/// Install the engine backend. A second call keeps the first engine
/// and is otherwise a no-op.
pub fn init(engine: Rc<dyn Engine>) {
    with_registry(|reg| reg.install_engine(engine));
}

pub fn is_initialized() -> bool {
    with_registry(|reg| reg.engine().is_some())
}

/// Create a window per `spec` and return its handle.
pub fn create_window(spec: &CreateSpec<'_>) -> Result<Handle, BridgeError> {
    let engine = with_registry(|reg| reg.engine()).ok_or(BridgeError::NotInitialized)?;
    let window = WebWindow::create(engine.as_ref(), spec)?;
    with_registry(|reg| reg.insert_window(window))
}

/// Install a window-kind listener. The binding is consumed: on a bad
/// handle it is released here so the caller never has to unwind a
/// half-installed reference.
pub fn set_window_listener(
    handle: Handle,
    listener: Rc<dyn HostWindowListener>,
) -> Result<(), BridgeError> {
    match with_registry(|reg| reg.window(handle)) {
        Some(window) => {
            window.set_window_listener(listener);
            Ok(())
        }
        None => {
            listener.release();
            Err(BridgeError::BadHandle(handle))
        }
    }
}

/// Install a view-kind listener; same ownership contract as
/// [`set_window_listener`].
pub fn set_view_listener(
    handle: Handle,
    listener: Rc<dyn HostViewListener>,
) -> Result<(), BridgeError> {
    match with_registry(|reg| reg.window(handle)) {
        Some(window) => {
            window.set_view_listener(listener);
            Ok(())
        }
        None => {
            listener.release();
            Err(BridgeError::BadHandle(handle))
        }
    }
}

pub fn show(handle: Handle) -> Result<(), BridgeError> {
    resolve(handle)?.show();
    Ok(())
}

pub fn hide(handle: Handle) -> Result<(), BridgeError> {
    resolve(handle)?.hide();
    Ok(())
}

pub fn move_to(handle: Handle, x: i32, y: i32) -> Result<(), BridgeError> {
    resolve(handle)?.move_to(x, y);
    Ok(())
}

/// Destroy a window: both listener bindings are released, then the
/// native overlay and window. The handle is dead afterwards; a second
/// destroy reports [`BridgeError::BadHandle`].
pub fn destroy(handle: Handle) -> Result<(), BridgeError> {
    let window =
        with_registry(|reg| reg.remove_window(handle)).ok_or(BridgeError::BadHandle(handle))?;
    window.destroy();
    Ok(())
}

/// Enter the engine's UI loop. Blocks until [`quit`] is called;
/// every listener callback fires from inside this call.
pub fn run() -> Result<(), BridgeError> {
    let engine = with_registry(|reg| reg.engine()).ok_or(BridgeError::NotInitialized)?;
    engine.run();
    Ok(())
}

pub fn quit() -> Result<(), BridgeError> {
    let engine = with_registry(|reg| reg.engine()).ok_or(BridgeError::NotInitialized)?;
    engine.quit();
    Ok(())
}

fn resolve(handle: Handle) -> Result<Rc<WebWindow>, BridgeError> {
    with_registry(|reg| reg.window(handle)).ok_or(BridgeError::BadHandle(handle))
}
