//! The native window wrapper: owner of one engine window, its overlay
//! and the overlay's view, and the translation layer between engine
//! callbacks and host listeners.

use std::rc::{Rc, Weak};

use log::{debug, warn};

use crate::engine::{
    self, Engine, Renderer, ViewListener, WindowFlags, WindowListener,
};
use crate::error::EngineError;
use crate::events::{
    Cursor, IntRect, KeyEvent, KeyEventType, MessageLevel, MessageSource, MouseButton, MouseEvent,
    MouseEventType, RawKeyEvent, RawMouseEvent, RawScrollEvent, ScrollEvent, ScrollEventType,
};
use crate::host::{HostViewListener, HostWindowListener};
use crate::listener::ListenerSlot;
use crate::registry::{self, Handle};

/// Parameters of one window construction call.
#[derive(Debug, Clone, Copy)]
pub struct CreateSpec<'a> {
    pub title: &'a str,
    pub url: &'a str,
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
    pub fullscreen: bool,
    pub flags: WindowFlags,
}

/// One native window plus its full-window overlay and that overlay's
/// view. The wrapper is the permanent native-side listener for both
/// the window and the view; host-side targets come and go in the two
/// slots without the native registration ever changing.
pub struct WebWindow {
    window: Rc<dyn engine::Window>,
    overlay: Rc<dyn engine::Overlay>,
    renderer: Rc<dyn Renderer>,
    window_listener: ListenerSlot<dyn HostWindowListener>,
    view_listener: ListenerSlot<dyn HostViewListener>,
}

impl WebWindow {
    /// Create the native window, position and show it, cover it with
    /// an overlay at (0, 0), load `url` into the overlay's view and
    /// register the wrapper as listener on both native objects.
    ///
    /// Engine failure to create the window is the one fatal path; it
    /// propagates with no partial object left behind.
    pub fn create(engine: &dyn Engine, spec: &CreateSpec<'_>) -> Result<Rc<Self>, EngineError> {
        let window = engine.create_window(spec.width, spec.height, spec.fullscreen, spec.flags)?;
        window.move_to(spec.x, spec.y);
        window.set_title(spec.title);
        window.show();

        // The overlay spans the client area the engine actually gave
        // us, which can differ from the requested size.
        let overlay = window.create_overlay(window.width(), window.height(), 0, 0);
        overlay.view().load_url(spec.url);

        let wrapper = Rc::new(Self {
            window,
            overlay,
            renderer: engine.renderer(),
            window_listener: ListenerSlot::new(),
            view_listener: ListenerSlot::new(),
        });

        let window_listener_rc: Rc<dyn WindowListener> = wrapper.clone();
        let window_listener: Weak<dyn WindowListener> = Rc::downgrade(&window_listener_rc);
        wrapper.window.set_listener(window_listener);
        let view_listener_rc: Rc<dyn ViewListener> = wrapper.clone();
        let view_listener: Weak<dyn ViewListener> = Rc::downgrade(&view_listener_rc);
        wrapper.overlay.view().set_listener(view_listener);

        Ok(wrapper)
    }

    pub fn show(&self) {
        self.window.show();
    }

    pub fn hide(&self) {
        self.window.hide();
    }

    pub fn move_to(&self, x: i32, y: i32) {
        self.window.move_to(x, y);
    }

    pub fn view(&self) -> Rc<dyn engine::View> {
        self.overlay.view()
    }

    /// Install the window-kind host listener, releasing the previous
    /// binding first. The native-side registration is untouched.
    pub fn set_window_listener(&self, listener: Rc<dyn HostWindowListener>) {
        self.window_listener.install(listener);
    }

    pub fn set_view_listener(&self, listener: Rc<dyn HostViewListener>) {
        self.view_listener.install(listener);
    }

    /// Release both listener bindings, then tear down the native
    /// objects: overlay first, then the window.
    pub fn destroy(&self) {
        self.window_listener.clear();
        self.view_listener.clear();
        self.overlay.destroy();
        self.window.close();
    }

    /// Handle for `caller`, or `None` if the handle space is gone (in
    /// which case the event is dropped with a warning rather than
    /// crossing to the host with a broken identity).
    fn view_handle(&self, caller: &Rc<dyn engine::View>) -> Option<Handle> {
        match registry::with_registry(|reg| reg.intern_view(caller)) {
            Ok(handle) => Some(handle),
            Err(e) => {
                warn!("cannot issue a view handle: {e}");
                None
            }
        }
    }

    /// Default creation policy: a fresh view from the shared renderer,
    /// default session, sized exactly like the requesting view.
    fn fallback_view(&self, caller: &Rc<dyn engine::View>) -> Rc<dyn engine::View> {
        let session = self.renderer.default_session();
        self.renderer
            .create_view(caller.width(), caller.height(), &session)
    }

    /// Resolve a host-returned view handle, or fall back.
    fn view_or_fallback(
        &self,
        returned: Option<Handle>,
        caller: &Rc<dyn engine::View>,
    ) -> Rc<dyn engine::View> {
        if let Some(handle) = returned {
            if let Some(view) = registry::with_registry(|reg| reg.view(handle)) {
                return view;
            }
            warn!("host returned unknown view handle {handle}; using the default creation policy");
        }
        self.fallback_view(caller)
    }
}

impl WindowListener for WebWindow {
    fn on_close(&self) {
        if let Some(listener) = self.window_listener.get() {
            listener.on_close();
        }
    }

    fn on_resize(&self, width: u32, height: u32) {
        // The overlay tracks the window no matter who is listening.
        self.overlay.resize(width, height);
        if let Some(listener) = self.window_listener.get() {
            listener.on_resize(width, height);
        }
    }

    fn on_key_event(&self, event: &RawKeyEvent) -> bool {
        let Some(listener) = self.window_listener.get() else {
            return false;
        };
        let Some(event_type) = KeyEventType::from_native(event.event_type) else {
            debug!("unsupported key event type {}", event.event_type);
            return false;
        };
        let event = KeyEvent {
            event_type,
            virtual_key_code: event.virtual_key_code,
            native_key_code: event.native_key_code,
            is_system_key: event.is_system_key,
        };
        listener.on_key_event(&event).unwrap_or(false)
    }

    fn on_mouse_event(&self, event: &RawMouseEvent) -> bool {
        let Some(listener) = self.window_listener.get() else {
            return false;
        };
        let Some(event_type) = MouseEventType::from_native(event.event_type) else {
            debug!("unsupported mouse event type {}", event.event_type);
            return false;
        };
        let Some(button) = MouseButton::from_native(event.button) else {
            debug!("unsupported mouse button {}", event.button);
            return false;
        };
        let event = MouseEvent {
            event_type,
            x: event.x,
            y: event.y,
            button,
        };
        listener.on_mouse_event(&event).unwrap_or(false)
    }

    fn on_scroll_event(&self, event: &RawScrollEvent) -> bool {
        let Some(listener) = self.window_listener.get() else {
            return false;
        };
        let Some(event_type) = ScrollEventType::from_native(event.event_type) else {
            debug!("unsupported scroll event type {}", event.event_type);
            return false;
        };
        let event = ScrollEvent {
            event_type,
            delta_x: event.delta_x,
            delta_y: event.delta_y,
        };
        listener.on_scroll_event(&event).unwrap_or(false)
    }
}

impl ViewListener for WebWindow {
    fn on_change_cursor(&self, caller: &Rc<dyn engine::View>, cursor: i32) {
        // The native window always tracks the view's cursor.
        self.window.set_cursor(cursor);
        let Some(listener) = self.view_listener.get() else {
            return;
        };
        let Some(cursor) = Cursor::from_native(cursor) else {
            debug!("unsupported cursor {cursor}");
            return;
        };
        if let Some(handle) = self.view_handle(caller) {
            listener.on_change_cursor(handle, cursor);
        }
    }

    fn on_change_title(&self, caller: &Rc<dyn engine::View>, title: &str) {
        let Some(listener) = self.view_listener.get() else {
            return;
        };
        if let Some(handle) = self.view_handle(caller) {
            listener.on_change_title(handle, title);
        }
    }

    fn on_change_tooltip(&self, caller: &Rc<dyn engine::View>, tooltip: &str) {
        let Some(listener) = self.view_listener.get() else {
            return;
        };
        if let Some(handle) = self.view_handle(caller) {
            listener.on_change_tooltip(handle, tooltip);
        }
    }

    fn on_request_close(&self, caller: &Rc<dyn engine::View>) {
        let Some(listener) = self.view_listener.get() else {
            return;
        };
        if let Some(handle) = self.view_handle(caller) {
            listener.on_request_close(handle);
        }
    }

    fn on_add_console_message(
        &self,
        caller: &Rc<dyn engine::View>,
        source: i32,
        level: i32,
        message: &str,
        line: u32,
        column: u32,
        source_id: &str,
    ) {
        let Some(listener) = self.view_listener.get() else {
            return;
        };
        let Some(source) = MessageSource::from_native(source) else {
            debug!("unsupported console message source {source}");
            return;
        };
        let Some(level) = MessageLevel::from_native(level) else {
            debug!("unsupported console message level {level}");
            return;
        };
        if let Some(handle) = self.view_handle(caller) {
            listener.on_add_console_message(handle, source, level, message, line, column, source_id);
        }
    }

    fn on_change_url(&self, caller: &Rc<dyn engine::View>, url: &str) {
        let Some(listener) = self.view_listener.get() else {
            return;
        };
        if let Some(handle) = self.view_handle(caller) {
            listener.on_change_url(handle, url);
        }
    }

    fn on_create_child_view(
        &self,
        caller: &Rc<dyn engine::View>,
        opener_url: &str,
        target_url: &str,
        is_popup: bool,
        rect: IntRect,
    ) -> Rc<dyn engine::View> {
        let returned = self.view_listener.get().and_then(|listener| {
            let handle = self.view_handle(caller)?;
            listener.on_create_child_view(handle, opener_url, target_url, is_popup, rect)
        });
        self.view_or_fallback(returned, caller)
    }

    fn on_create_inspector_view(
        &self,
        caller: &Rc<dyn engine::View>,
        is_local: bool,
        inspected_url: &str,
    ) -> Rc<dyn engine::View> {
        let returned = self.view_listener.get().and_then(|listener| {
            let handle = self.view_handle(caller)?;
            listener.on_create_inspector_view(handle, is_local, inspected_url)
        });
        self.view_or_fallback(returned, caller)
    }
}
