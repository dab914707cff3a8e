//! Node.js entry points of the webwindow bridge.
//!
//! Each function unwraps its arguments, resolves the opaque handle
//! through `webwindow-core` and forwards; no bridge logic lives here.
//!
//! Threading contract: every function below, and every listener
//! callback, runs on the thread that called `init()` and `run()` —
//! the engine's UI loop thread. The bridge keeps all of its state in
//! thread-local storage, so a call from another thread is answered
//! with "not initialized" rather than corrupting anything.

#[macro_use]
extern crate napi_derive;

mod engine_ffi;
mod host;
mod options;
mod runtime;

pub use options::EngineOptions;
pub use runtime::{check_runtime, RuntimeInfo};

use std::rc::Rc;

use napi::{Env, JsObject, Result};

use webwindow_core::bridge;
use webwindow_core::engine::WindowFlags;
use webwindow_core::error::BridgeError;
use webwindow_core::window::CreateSpec;

use crate::engine_ffi::FfiEngine;
use crate::host::{JsViewListener, JsWindowListener};

fn bridge_err(e: BridgeError) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

/// Load the engine SDK and initialize the bridge.
/// Must be called once, on the thread that will run the event loop,
/// before any other function. A second call is a no-op.
#[napi]
pub fn init(options: Option<EngineOptions>) -> Result<()> {
    if bridge::is_initialized() {
        return Ok(());
    }
    let options = options.unwrap_or_default();
    let engine = FfiEngine::load(&options).map_err(|e| napi::Error::from_reason(e.to_string()))?;
    bridge::init(Rc::new(engine));
    Ok(())
}

/// Create a native window showing `url`, and return its handle.
///
/// The handle is opaque: pass it back verbatim and stop using it the
/// moment `destroy()` is called on it.
#[napi]
#[allow(clippy::too_many_arguments)]
pub fn create_window(
    title: String,
    url: String,
    x: i32,
    y: i32,
    width: u32,
    height: u32,
    full_screen: bool,
    flags: u32,
) -> Result<u32> {
    let spec = CreateSpec {
        title: &title,
        url: &url,
        x,
        y,
        width,
        height,
        fullscreen: full_screen,
        flags: WindowFlags::from_bits_retain(flags),
    };
    bridge::create_window(&spec).map_err(bridge_err)
}

/// Install the window-kind listener. Replaces (and releases) any
/// previous one; the listener object's methods are all optional.
#[napi]
pub fn set_window_listener(env: Env, handle: u32, listener: JsObject) -> Result<()> {
    let binding = JsWindowListener::bind(env, listener)?;
    bridge::set_window_listener(handle, Rc::new(binding)).map_err(bridge_err)
}

/// Install the view-kind listener. Same contract as
/// `setWindowListener`.
#[napi]
pub fn set_view_listener(env: Env, handle: u32, listener: JsObject) -> Result<()> {
    let binding = JsViewListener::bind(env, listener)?;
    bridge::set_view_listener(handle, Rc::new(binding)).map_err(bridge_err)
}

#[napi]
pub fn show(handle: u32) -> Result<()> {
    bridge::show(handle).map_err(bridge_err)
}

#[napi]
pub fn hide(handle: u32) -> Result<()> {
    bridge::hide(handle).map_err(bridge_err)
}

#[napi]
pub fn move_to(handle: u32, x: i32, y: i32) -> Result<()> {
    bridge::move_to(handle, x, y).map_err(bridge_err)
}

/// Destroy a window: releases both listener references, then the
/// native window with its overlay and view. The handle is invalid
/// afterwards.
#[napi]
pub fn destroy(handle: u32) -> Result<()> {
    bridge::destroy(handle).map_err(bridge_err)
}

/// Enter the engine's UI event loop. Blocks the calling thread until
/// `quit()` is invoked (typically from a listener callback); all
/// listener callbacks fire synchronously from inside this call.
#[napi]
pub fn run() -> Result<()> {
    bridge::run().map_err(bridge_err)
}

/// Ask the engine's event loop to exit.
#[napi]
pub fn quit() -> Result<()> {
    bridge::quit().map_err(bridge_err)
}
