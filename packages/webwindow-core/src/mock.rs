//! Instrumented engine and host-listener doubles for the test suites.

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use crate::bridge;
use crate::engine::{
    Engine, Overlay, Renderer, Session, View, ViewListener, Window, WindowFlags, WindowListener,
};
use crate::error::EngineError;
use crate::events::{
    Cursor, IntRect, KeyEvent, MessageLevel, MessageSource, MouseEvent, RawKeyEvent, RawMouseEvent,
    RawScrollEvent, ScrollEvent,
};
use crate::host::{HostViewListener, HostWindowListener, ListenerBinding};
use crate::registry::Handle;

// ---- Engine side ----------------------------------------------------

pub struct MockEngine {
    pub windows: RefCell<Vec<Rc<MockWindow>>>,
    pub renderer: Rc<MockRenderer>,
    pub fail_create: Cell<bool>,
    pub run_calls: Cell<u32>,
    pub quit_calls: Cell<u32>,
}

impl MockEngine {
    pub fn new() -> Rc<Self> {
        Rc::new(Self {
            windows: RefCell::new(Vec::new()),
            renderer: Rc::new(MockRenderer::new()),
            fail_create: Cell::new(false),
            run_calls: Cell::new(0),
            quit_calls: Cell::new(0),
        })
    }

    /// Create an engine and install it as the bridge's backend.
    pub fn install() -> Rc<Self> {
        let engine = Self::new();
        bridge::init(engine.clone());
        engine
    }
}

impl Engine for MockEngine {
    fn create_window(
        &self,
        width: u32,
        height: u32,
        fullscreen: bool,
        flags: WindowFlags,
    ) -> Result<Rc<dyn Window>, EngineError> {
        if self.fail_create.get() {
            return Err(EngineError::CreateWindow);
        }
        let window = MockWindow::new(width, height, fullscreen, flags);
        self.windows.borrow_mut().push(window.clone());
        Ok(window)
    }

    fn renderer(&self) -> Rc<dyn Renderer> {
        self.renderer.clone()
    }

    fn run(&self) {
        self.run_calls.set(self.run_calls.get() + 1);
    }

    fn quit(&self) {
        self.quit_calls.set(self.quit_calls.get() + 1);
    }
}

pub struct MockWindow {
    pub width: Cell<u32>,
    pub height: Cell<u32>,
    pub fullscreen: bool,
    pub flags: WindowFlags,
    pub position: Cell<(i32, i32)>,
    pub title: RefCell<String>,
    pub cursor: Cell<Option<i32>>,
    pub visible: Cell<bool>,
    pub show_calls: Cell<u32>,
    pub hide_calls: Cell<u32>,
    pub overlays: RefCell<Vec<Rc<MockOverlay>>>,
    pub closed: Cell<bool>,
    listener: RefCell<Option<Weak<dyn WindowListener>>>,
}

impl MockWindow {
    fn new(width: u32, height: u32, fullscreen: bool, flags: WindowFlags) -> Rc<Self> {
        Rc::new(Self {
            width: Cell::new(width),
            height: Cell::new(height),
            fullscreen,
            flags,
            position: Cell::new((0, 0)),
            title: RefCell::new(String::new()),
            cursor: Cell::new(None),
            visible: Cell::new(false),
            show_calls: Cell::new(0),
            hide_calls: Cell::new(0),
            overlays: RefCell::new(Vec::new()),
            closed: Cell::new(false),
            listener: RefCell::new(None),
        })
    }

    pub fn listener(&self) -> Option<Rc<dyn WindowListener>> {
        self.listener.borrow().as_ref()?.upgrade()
    }

    pub fn overlay(&self) -> Rc<MockOverlay> {
        self.overlays.borrow()[0].clone()
    }

    pub fn fire_close(&self) {
        if let Some(listener) = self.listener() {
            listener.on_close();
        }
    }

    pub fn fire_resize(&self, width: u32, height: u32) {
        self.width.set(width);
        self.height.set(height);
        if let Some(listener) = self.listener() {
            listener.on_resize(width, height);
        }
    }

    pub fn fire_key(&self, event: RawKeyEvent) -> bool {
        self.listener()
            .map(|listener| listener.on_key_event(&event))
            .unwrap_or(false)
    }

    pub fn fire_mouse(&self, event: RawMouseEvent) -> bool {
        self.listener()
            .map(|listener| listener.on_mouse_event(&event))
            .unwrap_or(false)
    }

    pub fn fire_scroll(&self, event: RawScrollEvent) -> bool {
        self.listener()
            .map(|listener| listener.on_scroll_event(&event))
            .unwrap_or(false)
    }
}

impl Window for MockWindow {
    fn show(&self) {
        self.visible.set(true);
        self.show_calls.set(self.show_calls.get() + 1);
    }

    fn hide(&self) {
        self.visible.set(false);
        self.hide_calls.set(self.hide_calls.get() + 1);
    }

    fn move_to(&self, x: i32, y: i32) {
        self.position.set((x, y));
    }

    fn set_title(&self, title: &str) {
        *self.title.borrow_mut() = title.to_string();
    }

    fn set_cursor(&self, cursor: i32) {
        self.cursor.set(Some(cursor));
    }

    fn width(&self) -> u32 {
        self.width.get()
    }

    fn height(&self) -> u32 {
        self.height.get()
    }

    fn set_listener(&self, listener: Weak<dyn WindowListener>) {
        *self.listener.borrow_mut() = Some(listener);
    }

    fn create_overlay(&self, width: u32, height: u32, x: i32, y: i32) -> Rc<dyn Overlay> {
        let overlay = MockOverlay::new(width, height, x, y);
        self.overlays.borrow_mut().push(overlay.clone());
        overlay
    }

    fn close(&self) {
        self.closed.set(true);
    }
}

pub struct MockOverlay {
    pub width: Cell<u32>,
    pub height: Cell<u32>,
    pub x: i32,
    pub y: i32,
    pub view: Rc<MockView>,
    pub resize_calls: Cell<u32>,
    pub destroyed: Cell<bool>,
}

impl MockOverlay {
    fn new(width: u32, height: u32, x: i32, y: i32) -> Rc<Self> {
        Rc::new(Self {
            width: Cell::new(width),
            height: Cell::new(height),
            x,
            y,
            view: MockView::new(width, height),
            resize_calls: Cell::new(0),
            destroyed: Cell::new(false),
        })
    }
}

impl Overlay for MockOverlay {
    fn view(&self) -> Rc<dyn View> {
        self.view.clone()
    }

    fn resize(&self, width: u32, height: u32) {
        self.width.set(width);
        self.height.set(height);
        self.view.width.set(width);
        self.view.height.set(height);
        self.resize_calls.set(self.resize_calls.get() + 1);
    }

    fn destroy(&self) {
        self.destroyed.set(true);
    }
}

pub struct MockView {
    pub width: Cell<u32>,
    pub height: Cell<u32>,
    pub url: RefCell<String>,
    listener: RefCell<Option<Weak<dyn ViewListener>>>,
}

impl MockView {
    pub fn new(width: u32, height: u32) -> Rc<Self> {
        Rc::new(Self {
            width: Cell::new(width),
            height: Cell::new(height),
            url: RefCell::new(String::new()),
            listener: RefCell::new(None),
        })
    }

    pub fn listener(&self) -> Option<Rc<dyn ViewListener>> {
        self.listener.borrow().as_ref()?.upgrade()
    }

    fn caller(self: &Rc<Self>) -> Rc<dyn View> {
        self.clone()
    }

    pub fn fire_change_cursor(self: &Rc<Self>, cursor: i32) {
        if let Some(listener) = self.listener() {
            listener.on_change_cursor(&self.caller(), cursor);
        }
    }

    pub fn fire_change_title(self: &Rc<Self>, title: &str) {
        if let Some(listener) = self.listener() {
            listener.on_change_title(&self.caller(), title);
        }
    }

    pub fn fire_change_tooltip(self: &Rc<Self>, tooltip: &str) {
        if let Some(listener) = self.listener() {
            listener.on_change_tooltip(&self.caller(), tooltip);
        }
    }

    pub fn fire_request_close(self: &Rc<Self>) {
        if let Some(listener) = self.listener() {
            listener.on_request_close(&self.caller());
        }
    }

    #[allow(clippy::too_many_arguments)]
    pub fn fire_console_message(
        self: &Rc<Self>,
        source: i32,
        level: i32,
        message: &str,
        line: u32,
        column: u32,
        source_id: &str,
    ) {
        if let Some(listener) = self.listener() {
            listener.on_add_console_message(
                &self.caller(),
                source,
                level,
                message,
                line,
                column,
                source_id,
            );
        }
    }

    pub fn fire_change_url(self: &Rc<Self>, url: &str) {
        if let Some(listener) = self.listener() {
            listener.on_change_url(&self.caller(), url);
        }
    }

    pub fn fire_create_child_view(
        self: &Rc<Self>,
        opener_url: &str,
        target_url: &str,
        is_popup: bool,
        rect: IntRect,
    ) -> Option<Rc<dyn View>> {
        self.listener().map(|listener| {
            listener.on_create_child_view(&self.caller(), opener_url, target_url, is_popup, rect)
        })
    }

    pub fn fire_create_inspector_view(
        self: &Rc<Self>,
        is_local: bool,
        inspected_url: &str,
    ) -> Option<Rc<dyn View>> {
        self.listener()
            .map(|listener| listener.on_create_inspector_view(&self.caller(), is_local, inspected_url))
    }
}

impl View for MockView {
    fn load_url(&self, url: &str) {
        *self.url.borrow_mut() = url.to_string();
    }

    fn width(&self) -> u32 {
        self.width.get()
    }

    fn height(&self) -> u32 {
        self.height.get()
    }

    fn set_listener(&self, listener: Weak<dyn ViewListener>) {
        *self.listener.borrow_mut() = Some(listener);
    }

    fn identity(&self) -> usize {
        self as *const MockView as usize
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

pub struct MockRenderer {
    session: Rc<MockSession>,
    pub created: RefCell<Vec<Rc<MockView>>>,
    pub sessions_used: RefCell<Vec<Rc<dyn Session>>>,
}

impl MockRenderer {
    fn new() -> Self {
        Self {
            session: Rc::new(MockSession),
            created: RefCell::new(Vec::new()),
            sessions_used: RefCell::new(Vec::new()),
        }
    }

    /// A standalone view, outside the created-by-renderer bookkeeping.
    pub fn make_view(&self, width: u32, height: u32) -> Rc<dyn View> {
        MockView::new(width, height)
    }
}

impl Renderer for MockRenderer {
    fn default_session(&self) -> Rc<dyn Session> {
        self.session.clone()
    }

    fn create_view(&self, width: u32, height: u32, session: &Rc<dyn Session>) -> Rc<dyn View> {
        self.sessions_used.borrow_mut().push(session.clone());
        let view = MockView::new(width, height);
        self.created.borrow_mut().push(view.clone());
        view
    }
}

pub struct MockSession;

impl Session for MockSession {
    fn name(&self) -> String {
        "default".to_string()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

// ---- Host side ------------------------------------------------------

pub struct RecordingWindowListener {
    pub events: RefCell<Vec<String>>,
    pub releases: Cell<u32>,
    /// `None` plays a listener object without the method.
    pub key_result: Cell<Option<bool>>,
    pub mouse_result: Cell<Option<bool>>,
    pub scroll_result: Cell<Option<bool>>,
}

impl RecordingWindowListener {
    pub fn new() -> Rc<Self> {
        Rc::new(Self {
            events: RefCell::new(Vec::new()),
            releases: Cell::new(0),
            key_result: Cell::new(None),
            mouse_result: Cell::new(None),
            scroll_result: Cell::new(None),
        })
    }

    fn record(&self, event: String) {
        self.events.borrow_mut().push(event);
    }
}

impl ListenerBinding for RecordingWindowListener {
    fn release(&self) {
        self.releases.set(self.releases.get() + 1);
    }
}

impl HostWindowListener for RecordingWindowListener {
    fn on_close(&self) {
        self.record("close".to_string());
    }

    fn on_resize(&self, width: u32, height: u32) {
        self.record(format!("resize {width}x{height}"));
    }

    fn on_key_event(&self, event: &KeyEvent) -> Option<bool> {
        self.record(format!("key {} vk={}", event.event_type, event.virtual_key_code));
        self.key_result.get()
    }

    fn on_mouse_event(&self, event: &MouseEvent) -> Option<bool> {
        self.record(format!(
            "mouse {} {} at {},{}",
            event.event_type, event.button, event.x, event.y
        ));
        self.mouse_result.get()
    }

    fn on_scroll_event(&self, event: &ScrollEvent) -> Option<bool> {
        self.record(format!(
            "scroll {} {},{}",
            event.event_type, event.delta_x, event.delta_y
        ));
        self.scroll_result.get()
    }
}

pub struct RecordingViewListener {
    pub events: RefCell<Vec<String>>,
    pub releases: Cell<u32>,
    /// `false` plays a listener object without the create methods; the
    /// lookup fails before any host code would run.
    pub expose_create_methods: Cell<bool>,
    pub child_view_result: Cell<Option<Handle>>,
    pub inspector_result: Cell<Option<Handle>>,
}

impl RecordingViewListener {
    pub fn new() -> Rc<Self> {
        Rc::new(Self {
            events: RefCell::new(Vec::new()),
            releases: Cell::new(0),
            expose_create_methods: Cell::new(true),
            child_view_result: Cell::new(None),
            inspector_result: Cell::new(None),
        })
    }

    fn record(&self, event: String) {
        self.events.borrow_mut().push(event);
    }
}

impl ListenerBinding for RecordingViewListener {
    fn release(&self) {
        self.releases.set(self.releases.get() + 1);
    }
}

impl HostViewListener for RecordingViewListener {
    fn on_change_cursor(&self, view: Handle, cursor: Cursor) {
        self.record(format!("cursor #{view} {cursor}"));
    }

    fn on_change_title(&self, view: Handle, title: &str) {
        self.record(format!("title #{view} {title}"));
    }

    fn on_change_tooltip(&self, view: Handle, tooltip: &str) {
        self.record(format!("tooltip #{view} {tooltip}"));
    }

    fn on_request_close(&self, view: Handle) {
        self.record(format!("request-close #{view}"));
    }

    fn on_add_console_message(
        &self,
        view: Handle,
        source: MessageSource,
        level: MessageLevel,
        message: &str,
        line: u32,
        column: u32,
        source_id: &str,
    ) {
        self.record(format!(
            "console #{view} {source} {level} {message} {line}:{column} {source_id}"
        ));
    }

    fn on_change_url(&self, view: Handle, url: &str) {
        self.record(format!("url #{view} {url}"));
    }

    fn on_create_child_view(
        &self,
        view: Handle,
        opener_url: &str,
        target_url: &str,
        is_popup: bool,
        _rect: IntRect,
    ) -> Option<Handle> {
        if !self.expose_create_methods.get() {
            return None;
        }
        self.record(format!(
            "child-view #{view} {opener_url} -> {target_url} popup={is_popup}"
        ));
        self.child_view_result.get()
    }

    fn on_create_inspector_view(
        &self,
        view: Handle,
        is_local: bool,
        inspected_url: &str,
    ) -> Option<Handle> {
        if !self.expose_create_methods.get() {
            return None;
        }
        self.record(format!(
            "inspector-view #{view} local={is_local} {inspected_url}"
        ));
        self.inspector_result.get()
    }
}
