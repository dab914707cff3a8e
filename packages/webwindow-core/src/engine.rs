//! The engine's public object model, as consumed by the bridge.
//!
//! The engine itself — window creation, compositing, page rendering,
//! input dispatch — is an external library. These traits mirror its
//! embedding API one to one so the bridge can be driven by the real
//! FFI backend in production and by an instrumented mock in tests.
//!
//! Engine objects are single-threaded reference-counted handles
//! (`Rc<dyn ...>`); listeners are registered as `Weak` references so
//! that an engine object never keeps its own wrapper alive.

use std::any::Any;
use std::rc::{Rc, Weak};

use crate::error::EngineError;
use crate::events::{IntRect, RawKeyEvent, RawMouseEvent, RawScrollEvent};

bitflags::bitflags! {
    /// Window creation flags. The host passes the raw bitfield
    /// verbatim; these names exist so the bridge and its tests can
    /// speak about the engine's documented bits.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct WindowFlags: u32 {
        const BORDERLESS = 1 << 0;
        const TITLED = 1 << 1;
        const RESIZABLE = 1 << 2;
        const MAXIMIZABLE = 1 << 3;
    }
}

/// The engine instance: a window factory plus the shared renderer and
/// the engine-owned UI event loop.
pub trait Engine {
    /// Create a native window. The only fallible engine operation the
    /// bridge consumes; failure aborts window construction with no
    /// partial object.
    fn create_window(
        &self,
        width: u32,
        height: u32,
        fullscreen: bool,
        flags: WindowFlags,
    ) -> Result<Rc<dyn Window>, EngineError>;

    fn renderer(&self) -> Rc<dyn Renderer>;

    /// Run the engine's UI loop until [`Engine::quit`] is called.
    /// Every listener callback fires synchronously on the calling
    /// thread from inside this loop.
    fn run(&self);

    fn quit(&self);
}

/// One native top-level window.
pub trait Window {
    fn show(&self);
    fn hide(&self);
    fn move_to(&self, x: i32, y: i32);
    fn set_title(&self, title: &str);
    /// `cursor` is the engine's own cursor constant, relayed verbatim.
    fn set_cursor(&self, cursor: i32);
    fn width(&self) -> u32;
    fn height(&self) -> u32;
    fn set_listener(&self, listener: Weak<dyn WindowListener>);
    fn create_overlay(&self, width: u32, height: u32, x: i32, y: i32) -> Rc<dyn Overlay>;
    /// Destroy the native window. The window must not be used
    /// afterwards; the bridge guarantees the overlay is destroyed
    /// first.
    fn close(&self);
}

/// A compositing surface attached to a window, hosting one view.
pub trait Overlay {
    fn view(&self) -> Rc<dyn View>;
    fn resize(&self, width: u32, height: u32);
    fn destroy(&self);
}

/// A renderable surface loaded with a URL; the receiver of
/// navigation, console and popup events.
pub trait View {
    fn load_url(&self, url: &str);
    fn width(&self) -> u32;
    fn height(&self) -> u32;
    fn set_listener(&self, listener: Weak<dyn ViewListener>);
    /// Stable identity of the underlying engine object. Two `Rc`
    /// wrappers around the same engine view report the same value;
    /// the handle registry interns views by it.
    fn identity(&self) -> usize;
    /// Backend escape hatch, used by the FFI backend to recover its
    /// concrete view type when handing a view back to the engine.
    fn as_any(&self) -> &dyn Any;
}

/// The engine's shared renderer.
pub trait Renderer {
    fn default_session(&self) -> Rc<dyn Session>;
    fn create_view(&self, width: u32, height: u32, session: &Rc<dyn Session>) -> Rc<dyn View>;
}

/// A browsing session (cookies, cache, local storage scope).
pub trait Session {
    fn name(&self) -> String;
    /// Backend escape hatch, mirroring [`View::as_any`].
    fn as_any(&self) -> &dyn Any;
}

/// Window-level callbacks the engine fires at its registered listener.
/// The wrapper implements this; payloads arrive with raw engine type
/// codes.
pub trait WindowListener {
    fn on_close(&self);
    fn on_resize(&self, width: u32, height: u32);
    /// Returns true when the event was consumed and the engine should
    /// skip its default handling.
    fn on_key_event(&self, event: &RawKeyEvent) -> bool;
    fn on_mouse_event(&self, event: &RawMouseEvent) -> bool;
    fn on_scroll_event(&self, event: &RawScrollEvent) -> bool;
}

/// View-level callbacks the engine fires at its registered listener.
pub trait ViewListener {
    fn on_change_cursor(&self, caller: &Rc<dyn View>, cursor: i32);
    fn on_change_title(&self, caller: &Rc<dyn View>, title: &str);
    fn on_change_tooltip(&self, caller: &Rc<dyn View>, tooltip: &str);
    fn on_request_close(&self, caller: &Rc<dyn View>);
    #[allow(clippy::too_many_arguments)]
    fn on_add_console_message(
        &self,
        caller: &Rc<dyn View>,
        source: i32,
        level: i32,
        message: &str,
        line: u32,
        column: u32,
        source_id: &str,
    );
    fn on_change_url(&self, caller: &Rc<dyn View>, url: &str);
    /// The engine is asking for a view to host a popup. The listener
    /// must always produce one; "no view" is not a legal answer.
    fn on_create_child_view(
        &self,
        caller: &Rc<dyn View>,
        opener_url: &str,
        target_url: &str,
        is_popup: bool,
        rect: IntRect,
    ) -> Rc<dyn View>;
    fn on_create_inspector_view(
        &self,
        caller: &Rc<dyn View>,
        is_local: bool,
        inspected_url: &str,
    ) -> Rc<dyn View>;
}
