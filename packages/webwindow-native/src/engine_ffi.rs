//! Engine SDK backend.
//!
//! The engine ships as a vendor dynamic library; like the reference
//! embedder, the bridge loads it at runtime (no link-time dependency)
//! and talks to it through its C embedding API. This module declares
//! that API, loads the symbol table once, and adapts the engine's
//! object model onto the `webwindow-core` traits.
//!
//! Callback flow: each window (and the overlay view, once a listener
//! is installed) registers a static table of `extern "C"` trampolines
//! with a `user_data` pointer to a heap cell holding a `Weak`
//! reference to the bridge wrapper. The cell lives as long as the
//! wrapping object, and the registration is cleared before the native
//! window is destroyed.

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::ffi::{c_char, c_void, CStr, CString};
use std::path::Path;
use std::ptr;
use std::rc::{Rc, Weak};

use libloading::Library;

use webwindow_core::engine::{
    Engine, Overlay, Renderer, Session, View, ViewListener, Window, WindowFlags, WindowListener,
};
use webwindow_core::error::EngineError;
use webwindow_core::events::{IntRect, RawKeyEvent, RawMouseEvent, RawScrollEvent};

use crate::options::EngineOptions;
use crate::runtime;

// ---- C object model -------------------------------------------------

#[repr(C)]
pub struct EwApp {
    _private: [u8; 0],
}

#[repr(C)]
pub struct EwWindow {
    _private: [u8; 0],
}

#[repr(C)]
pub struct EwOverlay {
    _private: [u8; 0],
}

#[repr(C)]
pub struct EwView {
    _private: [u8; 0],
}

#[repr(C)]
pub struct EwRenderer {
    _private: [u8; 0],
}

#[repr(C)]
pub struct EwSession {
    _private: [u8; 0],
}

/// Window callback table, registered once per window.
#[repr(C)]
pub struct EwWindowCallbacks {
    pub on_close: Option<unsafe extern "C" fn(user_data: *mut c_void)>,
    pub on_resize: Option<unsafe extern "C" fn(user_data: *mut c_void, width: u32, height: u32)>,
    pub on_key_event:
        Option<unsafe extern "C" fn(user_data: *mut c_void, event: *const RawKeyEvent) -> bool>,
    pub on_mouse_event:
        Option<unsafe extern "C" fn(user_data: *mut c_void, event: *const RawMouseEvent) -> bool>,
    pub on_scroll_event:
        Option<unsafe extern "C" fn(user_data: *mut c_void, event: *const RawScrollEvent) -> bool>,
}

/// View callback table. Strings are engine-owned, NUL-terminated
/// UTF-8, valid only for the duration of the call. A view returned
/// from the create callbacks carries one reference whose ownership
/// passes to the engine.
#[repr(C)]
pub struct EwViewCallbacks {
    pub on_change_cursor:
        Option<unsafe extern "C" fn(user_data: *mut c_void, caller: *mut EwView, cursor: i32)>,
    pub on_change_title: Option<
        unsafe extern "C" fn(user_data: *mut c_void, caller: *mut EwView, title: *const c_char),
    >,
    pub on_change_tooltip: Option<
        unsafe extern "C" fn(user_data: *mut c_void, caller: *mut EwView, tooltip: *const c_char),
    >,
    pub on_request_close:
        Option<unsafe extern "C" fn(user_data: *mut c_void, caller: *mut EwView)>,
    pub on_add_console_message: Option<
        unsafe extern "C" fn(
            user_data: *mut c_void,
            caller: *mut EwView,
            source: i32,
            level: i32,
            message: *const c_char,
            line: u32,
            column: u32,
            source_id: *const c_char,
        ),
    >,
    pub on_change_url: Option<
        unsafe extern "C" fn(user_data: *mut c_void, caller: *mut EwView, url: *const c_char),
    >,
    pub on_create_child_view: Option<
        unsafe extern "C" fn(
            user_data: *mut c_void,
            caller: *mut EwView,
            opener_url: *const c_char,
            target_url: *const c_char,
            is_popup: bool,
            popup_rect: *const IntRect,
        ) -> *mut EwView,
    >,
    pub on_create_inspector_view: Option<
        unsafe extern "C" fn(
            user_data: *mut c_void,
            caller: *mut EwView,
            is_local: bool,
            inspected_url: *const c_char,
        ) -> *mut EwView,
    >,
}

// ---- Symbol table ---------------------------------------------------

/// The engine's embedding API, resolved once at load time. The
/// `Library` keeps the symbols alive for the lifetime of the table.
pub struct Api {
    _lib: Library,
    version_string: unsafe extern "C" fn() -> *const c_char,
    app_create: unsafe extern "C" fn(resource_dir: *const c_char) -> *mut EwApp,
    app_destroy: unsafe extern "C" fn(app: *mut EwApp),
    app_run: unsafe extern "C" fn(app: *mut EwApp),
    app_quit: unsafe extern "C" fn(app: *mut EwApp),
    app_renderer: unsafe extern "C" fn(app: *mut EwApp) -> *mut EwRenderer,
    window_create: unsafe extern "C" fn(
        app: *mut EwApp,
        width: u32,
        height: u32,
        fullscreen: bool,
        flags: u32,
    ) -> *mut EwWindow,
    window_destroy: unsafe extern "C" fn(window: *mut EwWindow),
    window_show: unsafe extern "C" fn(window: *mut EwWindow),
    window_hide: unsafe extern "C" fn(window: *mut EwWindow),
    window_move_to: unsafe extern "C" fn(window: *mut EwWindow, x: i32, y: i32),
    window_set_title: unsafe extern "C" fn(window: *mut EwWindow, title: *const c_char),
    window_set_cursor: unsafe extern "C" fn(window: *mut EwWindow, cursor: i32),
    window_width: unsafe extern "C" fn(window: *mut EwWindow) -> u32,
    window_height: unsafe extern "C" fn(window: *mut EwWindow) -> u32,
    window_set_callbacks: unsafe extern "C" fn(
        window: *mut EwWindow,
        callbacks: *const EwWindowCallbacks,
        user_data: *mut c_void,
    ),
    overlay_create: unsafe extern "C" fn(
        window: *mut EwWindow,
        width: u32,
        height: u32,
        x: i32,
        y: i32,
    ) -> *mut EwOverlay,
    overlay_destroy: unsafe extern "C" fn(overlay: *mut EwOverlay),
    overlay_view: unsafe extern "C" fn(overlay: *mut EwOverlay) -> *mut EwView,
    overlay_resize: unsafe extern "C" fn(overlay: *mut EwOverlay, width: u32, height: u32),
    view_load_url: unsafe extern "C" fn(view: *mut EwView, url: *const c_char),
    view_width: unsafe extern "C" fn(view: *mut EwView) -> u32,
    view_height: unsafe extern "C" fn(view: *mut EwView) -> u32,
    view_set_callbacks: unsafe extern "C" fn(
        view: *mut EwView,
        callbacks: *const EwViewCallbacks,
        user_data: *mut c_void,
    ),
    view_retain: unsafe extern "C" fn(view: *mut EwView),
    view_release: unsafe extern "C" fn(view: *mut EwView),
    renderer_default_session: unsafe extern "C" fn(renderer: *mut EwRenderer) -> *mut EwSession,
    renderer_create_view: unsafe extern "C" fn(
        renderer: *mut EwRenderer,
        width: u32,
        height: u32,
        session: *mut EwSession,
    ) -> *mut EwView,
    session_name: unsafe extern "C" fn(session: *mut EwSession) -> *const c_char,
}

impl Api {
    pub fn load(path: &Path) -> Result<Rc<Self>, EngineError> {
        let lib = unsafe { Library::new(path) }.map_err(|e| EngineError::Load(e.to_string()))?;

        unsafe fn sym<T: Copy>(lib: &Library, name: &str) -> Result<T, EngineError> {
            let symbol = unsafe { lib.get::<T>(name.as_bytes()) }
                .map_err(|_| EngineError::MissingSymbol(name.to_string()))?;
            Ok(*symbol)
        }

        let api = unsafe {
            Self {
                version_string: sym(&lib, "ew_version_string")?,
                app_create: sym(&lib, "ew_app_create")?,
                app_destroy: sym(&lib, "ew_app_destroy")?,
                app_run: sym(&lib, "ew_app_run")?,
                app_quit: sym(&lib, "ew_app_quit")?,
                app_renderer: sym(&lib, "ew_app_renderer")?,
                window_create: sym(&lib, "ew_window_create")?,
                window_destroy: sym(&lib, "ew_window_destroy")?,
                window_show: sym(&lib, "ew_window_show")?,
                window_hide: sym(&lib, "ew_window_hide")?,
                window_move_to: sym(&lib, "ew_window_move_to")?,
                window_set_title: sym(&lib, "ew_window_set_title")?,
                window_set_cursor: sym(&lib, "ew_window_set_cursor")?,
                window_width: sym(&lib, "ew_window_width")?,
                window_height: sym(&lib, "ew_window_height")?,
                window_set_callbacks: sym(&lib, "ew_window_set_callbacks")?,
                overlay_create: sym(&lib, "ew_overlay_create")?,
                overlay_destroy: sym(&lib, "ew_overlay_destroy")?,
                overlay_view: sym(&lib, "ew_overlay_view")?,
                overlay_resize: sym(&lib, "ew_overlay_resize")?,
                view_load_url: sym(&lib, "ew_view_load_url")?,
                view_width: sym(&lib, "ew_view_width")?,
                view_height: sym(&lib, "ew_view_height")?,
                view_set_callbacks: sym(&lib, "ew_view_set_callbacks")?,
                view_retain: sym(&lib, "ew_view_retain")?,
                view_release: sym(&lib, "ew_view_release")?,
                renderer_default_session: sym(&lib, "ew_renderer_default_session")?,
                renderer_create_view: sym(&lib, "ew_renderer_create_view")?,
                session_name: sym(&lib, "ew_session_name")?,
                _lib: lib,
            }
        };
        Ok(Rc::new(api))
    }

    pub fn version(&self) -> Option<String> {
        let ptr = unsafe { (self.version_string)() };
        if ptr.is_null() {
            return None;
        }
        Some(unsafe { CStr::from_ptr(ptr) }.to_string_lossy().into_owned())
    }
}

/// Engine strings contain no interior NULs; host strings might.
fn c_string(value: &str) -> CString {
    CString::new(value.replace('\0', "")).unwrap_or_default()
}

/// Copy an engine string. The engine frees its buffer after the
/// callback returns, so the copy is the only thing that crosses.
unsafe fn engine_text(ptr: *const c_char) -> String {
    if ptr.is_null() {
        return String::new();
    }
    unsafe { CStr::from_ptr(ptr) }.to_string_lossy().into_owned()
}

// ---- Listener cells and trampolines ---------------------------------

#[derive(Default)]
struct WindowTarget {
    listener: RefCell<Option<Weak<dyn WindowListener>>>,
}

impl WindowTarget {
    fn upgrade(&self) -> Option<Rc<dyn WindowListener>> {
        self.listener.borrow().as_ref()?.upgrade()
    }
}

struct ViewTarget {
    api: Rc<Api>,
    listener: RefCell<Option<Weak<dyn ViewListener>>>,
}

impl ViewTarget {
    fn upgrade(&self) -> Option<Rc<dyn ViewListener>> {
        self.listener.borrow().as_ref()?.upgrade()
    }
}

unsafe extern "C" fn window_on_close(user_data: *mut c_void) {
    let target = unsafe { &*(user_data as *const WindowTarget) };
    if let Some(listener) = target.upgrade() {
        listener.on_close();
    }
}

unsafe extern "C" fn window_on_resize(user_data: *mut c_void, width: u32, height: u32) {
    let target = unsafe { &*(user_data as *const WindowTarget) };
    if let Some(listener) = target.upgrade() {
        listener.on_resize(width, height);
    }
}

unsafe extern "C" fn window_on_key_event(user_data: *mut c_void, event: *const RawKeyEvent) -> bool {
    let target = unsafe { &*(user_data as *const WindowTarget) };
    match (target.upgrade(), unsafe { event.as_ref() }) {
        (Some(listener), Some(event)) => listener.on_key_event(event),
        _ => false,
    }
}

unsafe extern "C" fn window_on_mouse_event(
    user_data: *mut c_void,
    event: *const RawMouseEvent,
) -> bool {
    let target = unsafe { &*(user_data as *const WindowTarget) };
    match (target.upgrade(), unsafe { event.as_ref() }) {
        (Some(listener), Some(event)) => listener.on_mouse_event(event),
        _ => false,
    }
}

unsafe extern "C" fn window_on_scroll_event(
    user_data: *mut c_void,
    event: *const RawScrollEvent,
) -> bool {
    let target = unsafe { &*(user_data as *const WindowTarget) };
    match (target.upgrade(), unsafe { event.as_ref() }) {
        (Some(listener), Some(event)) => listener.on_scroll_event(event),
        _ => false,
    }
}

static WINDOW_CALLBACKS: EwWindowCallbacks = EwWindowCallbacks {
    on_close: Some(window_on_close),
    on_resize: Some(window_on_resize),
    on_key_event: Some(window_on_key_event),
    on_mouse_event: Some(window_on_mouse_event),
    on_scroll_event: Some(window_on_scroll_event),
};

/// Borrowed wrapper for the caller view of a view callback.
fn caller_view(target: &ViewTarget, caller: *mut EwView) -> Rc<dyn View> {
    FfiView::adopt(target.api.clone(), caller, false)
}

unsafe extern "C" fn view_on_change_cursor(user_data: *mut c_void, caller: *mut EwView, cursor: i32) {
    let target = unsafe { &*(user_data as *const ViewTarget) };
    if let Some(listener) = target.upgrade() {
        let caller = caller_view(target, caller);
        listener.on_change_cursor(&caller, cursor);
    }
}

unsafe extern "C" fn view_on_change_title(
    user_data: *mut c_void,
    caller: *mut EwView,
    title: *const c_char,
) {
    let target = unsafe { &*(user_data as *const ViewTarget) };
    if let Some(listener) = target.upgrade() {
        let caller = caller_view(target, caller);
        let title = unsafe { engine_text(title) };
        listener.on_change_title(&caller, &title);
    }
}

unsafe extern "C" fn view_on_change_tooltip(
    user_data: *mut c_void,
    caller: *mut EwView,
    tooltip: *const c_char,
) {
    let target = unsafe { &*(user_data as *const ViewTarget) };
    if let Some(listener) = target.upgrade() {
        let caller = caller_view(target, caller);
        let tooltip = unsafe { engine_text(tooltip) };
        listener.on_change_tooltip(&caller, &tooltip);
    }
}

unsafe extern "C" fn view_on_request_close(user_data: *mut c_void, caller: *mut EwView) {
    let target = unsafe { &*(user_data as *const ViewTarget) };
    if let Some(listener) = target.upgrade() {
        let caller = caller_view(target, caller);
        listener.on_request_close(&caller);
    }
}

unsafe extern "C" fn view_on_add_console_message(
    user_data: *mut c_void,
    caller: *mut EwView,
    source: i32,
    level: i32,
    message: *const c_char,
    line: u32,
    column: u32,
    source_id: *const c_char,
) {
    let target = unsafe { &*(user_data as *const ViewTarget) };
    if let Some(listener) = target.upgrade() {
        let caller = caller_view(target, caller);
        let message = unsafe { engine_text(message) };
        let source_id = unsafe { engine_text(source_id) };
        listener.on_add_console_message(&caller, source, level, &message, line, column, &source_id);
    }
}

unsafe extern "C" fn view_on_change_url(
    user_data: *mut c_void,
    caller: *mut EwView,
    url: *const c_char,
) {
    let target = unsafe { &*(user_data as *const ViewTarget) };
    if let Some(listener) = target.upgrade() {
        let caller = caller_view(target, caller);
        let url = unsafe { engine_text(url) };
        listener.on_change_url(&caller, &url);
    }
}

/// Hand a view produced by the listener back to the engine, with one
/// reference transferred: an owned wrapper gives up its reference, a
/// borrowed one mints a fresh reference for the engine.
fn view_to_engine(view: Rc<dyn View>) -> *mut EwView {
    match view.as_any().downcast_ref::<FfiView>() {
        Some(view) => view.transfer(),
        None => {
            log::error!("listener produced a view that is not backed by the engine");
            ptr::null_mut()
        }
    }
}

unsafe extern "C" fn view_on_create_child_view(
    user_data: *mut c_void,
    caller: *mut EwView,
    opener_url: *const c_char,
    target_url: *const c_char,
    is_popup: bool,
    popup_rect: *const IntRect,
) -> *mut EwView {
    let target = unsafe { &*(user_data as *const ViewTarget) };
    // The wrapper outlives every view event; a dead Weak here means
    // the window is mid-teardown and the engine gets no view.
    let Some(listener) = target.upgrade() else {
        return ptr::null_mut();
    };
    let caller = caller_view(target, caller);
    let opener_url = unsafe { engine_text(opener_url) };
    let target_url = unsafe { engine_text(target_url) };
    let rect = unsafe { popup_rect.as_ref() }.copied().unwrap_or(IntRect {
        left: 0,
        top: 0,
        right: 0,
        bottom: 0,
    });
    let view = listener.on_create_child_view(&caller, &opener_url, &target_url, is_popup, rect);
    view_to_engine(view)
}

unsafe extern "C" fn view_on_create_inspector_view(
    user_data: *mut c_void,
    caller: *mut EwView,
    is_local: bool,
    inspected_url: *const c_char,
) -> *mut EwView {
    let target = unsafe { &*(user_data as *const ViewTarget) };
    let Some(listener) = target.upgrade() else {
        return ptr::null_mut();
    };
    let caller = caller_view(target, caller);
    let inspected_url = unsafe { engine_text(inspected_url) };
    let view = listener.on_create_inspector_view(&caller, is_local, &inspected_url);
    view_to_engine(view)
}

static VIEW_CALLBACKS: EwViewCallbacks = EwViewCallbacks {
    on_change_cursor: Some(view_on_change_cursor),
    on_change_title: Some(view_on_change_title),
    on_change_tooltip: Some(view_on_change_tooltip),
    on_request_close: Some(view_on_request_close),
    on_add_console_message: Some(view_on_add_console_message),
    on_change_url: Some(view_on_change_url),
    on_create_child_view: Some(view_on_create_child_view),
    on_create_inspector_view: Some(view_on_create_inspector_view),
};

// ---- Trait adapters -------------------------------------------------

pub struct FfiEngine {
    api: Rc<Api>,
    app: *mut EwApp,
    renderer: Rc<FfiRenderer>,
}

impl FfiEngine {
    pub fn load(options: &EngineOptions) -> Result<Self, EngineError> {
        let dir = runtime::resolve_sdk_dir(options.sdk_dir.as_deref());
        let path = dir.join(runtime::library_filename());
        if !path.exists() {
            return Err(EngineError::NotFound(path.display().to_string()));
        }
        let api = Api::load(&path)?;

        let resource_dir = options.resource_dir.as_deref().map(c_string);
        let resource_ptr = resource_dir
            .as_ref()
            .map_or(ptr::null(), |dir| dir.as_ptr());
        let app = unsafe { (api.app_create)(resource_ptr) };
        if app.is_null() {
            return Err(EngineError::Load("engine initialization failed".into()));
        }

        let renderer = Rc::new(FfiRenderer {
            api: api.clone(),
            ptr: unsafe { (api.app_renderer)(app) },
        });
        log::debug!(
            "engine loaded from {} (version {})",
            path.display(),
            api.version().unwrap_or_else(|| "unknown".into())
        );
        Ok(Self { api, app, renderer })
    }
}

impl Engine for FfiEngine {
    fn create_window(
        &self,
        width: u32,
        height: u32,
        fullscreen: bool,
        flags: WindowFlags,
    ) -> Result<Rc<dyn Window>, EngineError> {
        let ptr =
            unsafe { (self.api.window_create)(self.app, width, height, fullscreen, flags.bits()) };
        if ptr.is_null() {
            return Err(EngineError::CreateWindow);
        }
        Ok(FfiWindow::adopt(self.api.clone(), ptr))
    }

    fn renderer(&self) -> Rc<dyn Renderer> {
        self.renderer.clone()
    }

    fn run(&self) {
        unsafe { (self.api.app_run)(self.app) }
    }

    fn quit(&self) {
        unsafe { (self.api.app_quit)(self.app) }
    }
}

impl Drop for FfiEngine {
    fn drop(&mut self) {
        unsafe { (self.api.app_destroy)(self.app) }
    }
}

pub struct FfiWindow {
    api: Rc<Api>,
    ptr: *mut EwWindow,
    /// Stable heap cell the engine's `user_data` points at.
    target: Box<WindowTarget>,
    closed: Cell<bool>,
}

impl FfiWindow {
    fn adopt(api: Rc<Api>, ptr: *mut EwWindow) -> Rc<Self> {
        let window = Rc::new(Self {
            api,
            ptr,
            target: Box::new(WindowTarget::default()),
            closed: Cell::new(false),
        });
        let user_data = window.target.as_ref() as *const WindowTarget as *mut c_void;
        unsafe { (window.api.window_set_callbacks)(window.ptr, &WINDOW_CALLBACKS, user_data) };
        window
    }
}

impl Window for FfiWindow {
    fn show(&self) {
        unsafe { (self.api.window_show)(self.ptr) }
    }

    fn hide(&self) {
        unsafe { (self.api.window_hide)(self.ptr) }
    }

    fn move_to(&self, x: i32, y: i32) {
        unsafe { (self.api.window_move_to)(self.ptr, x, y) }
    }

    fn set_title(&self, title: &str) {
        let title = c_string(title);
        unsafe { (self.api.window_set_title)(self.ptr, title.as_ptr()) }
    }

    fn set_cursor(&self, cursor: i32) {
        unsafe { (self.api.window_set_cursor)(self.ptr, cursor) }
    }

    fn width(&self) -> u32 {
        unsafe { (self.api.window_width)(self.ptr) }
    }

    fn height(&self) -> u32 {
        unsafe { (self.api.window_height)(self.ptr) }
    }

    fn set_listener(&self, listener: Weak<dyn WindowListener>) {
        *self.target.listener.borrow_mut() = Some(listener);
    }

    fn create_overlay(&self, width: u32, height: u32, x: i32, y: i32) -> Rc<dyn Overlay> {
        let ptr = unsafe { (self.api.overlay_create)(self.ptr, width, height, x, y) };
        FfiOverlay::adopt(self.api.clone(), ptr)
    }

    fn close(&self) {
        if self.closed.replace(true) {
            return;
        }
        unsafe {
            (self.api.window_set_callbacks)(self.ptr, ptr::null(), ptr::null_mut());
            (self.api.window_destroy)(self.ptr);
        }
    }
}

impl Drop for FfiWindow {
    fn drop(&mut self) {
        self.close();
    }
}

pub struct FfiOverlay {
    api: Rc<Api>,
    ptr: *mut EwOverlay,
    view: Rc<FfiView>,
    destroyed: Cell<bool>,
}

impl FfiOverlay {
    fn adopt(api: Rc<Api>, ptr: *mut EwOverlay) -> Rc<Self> {
        let view_ptr = unsafe { (api.overlay_view)(ptr) };
        let view = FfiView::adopt(api.clone(), view_ptr, false);
        Rc::new(Self {
            api,
            ptr,
            view,
            destroyed: Cell::new(false),
        })
    }
}

impl Overlay for FfiOverlay {
    fn view(&self) -> Rc<dyn View> {
        self.view.clone()
    }

    fn resize(&self, width: u32, height: u32) {
        unsafe { (self.api.overlay_resize)(self.ptr, width, height) }
    }

    fn destroy(&self) {
        if self.destroyed.replace(true) {
            return;
        }
        unsafe { (self.api.overlay_destroy)(self.ptr) }
    }
}

impl Drop for FfiOverlay {
    fn drop(&mut self) {
        self.destroy();
    }
}

pub struct FfiView {
    api: Rc<Api>,
    ptr: *mut EwView,
    target: Box<ViewTarget>,
    registered: Cell<bool>,
    /// Owned views (renderer-created) drop their engine reference;
    /// borrowed views (overlay views, callback callers) never do.
    owned: Cell<bool>,
}

impl FfiView {
    fn adopt(api: Rc<Api>, ptr: *mut EwView, owned: bool) -> Rc<Self> {
        Rc::new(Self {
            api: api.clone(),
            ptr,
            target: Box::new(ViewTarget {
                api,
                listener: RefCell::new(None),
            }),
            registered: Cell::new(false),
            owned: Cell::new(owned),
        })
    }

    /// Give the engine one reference: an owned wrapper's own, or a
    /// freshly retained one for a borrowed wrapper.
    fn transfer(&self) -> *mut EwView {
        if !self.owned.replace(false) {
            unsafe { (self.api.view_retain)(self.ptr) };
        }
        self.ptr
    }
}

impl View for FfiView {
    fn load_url(&self, url: &str) {
        let url = c_string(url);
        unsafe { (self.api.view_load_url)(self.ptr, url.as_ptr()) }
    }

    fn width(&self) -> u32 {
        unsafe { (self.api.view_width)(self.ptr) }
    }

    fn height(&self) -> u32 {
        unsafe { (self.api.view_height)(self.ptr) }
    }

    fn set_listener(&self, listener: Weak<dyn ViewListener>) {
        *self.target.listener.borrow_mut() = Some(listener);
        // Register on first install only. Wrappers minted for callback
        // callers never install a listener, so the registration of the
        // overlay's own wrapper is never clobbered.
        if !self.registered.replace(true) {
            let user_data = self.target.as_ref() as *const ViewTarget as *mut c_void;
            unsafe { (self.api.view_set_callbacks)(self.ptr, &VIEW_CALLBACKS, user_data) };
        }
    }

    fn identity(&self) -> usize {
        self.ptr as usize
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl Drop for FfiView {
    fn drop(&mut self) {
        if self.owned.get() {
            unsafe { (self.api.view_release)(self.ptr) }
        }
    }
}

pub struct FfiRenderer {
    api: Rc<Api>,
    ptr: *mut EwRenderer,
}

impl Renderer for FfiRenderer {
    fn default_session(&self) -> Rc<dyn Session> {
        Rc::new(FfiSession {
            api: self.api.clone(),
            ptr: unsafe { (self.api.renderer_default_session)(self.ptr) },
        })
    }

    fn create_view(&self, width: u32, height: u32, session: &Rc<dyn Session>) -> Rc<dyn View> {
        let session_ptr = match session.as_any().downcast_ref::<FfiSession>() {
            Some(session) => session.ptr,
            None => {
                log::warn!("foreign session object; substituting the engine's default session");
                unsafe { (self.api.renderer_default_session)(self.ptr) }
            }
        };
        let ptr = unsafe { (self.api.renderer_create_view)(self.ptr, width, height, session_ptr) };
        FfiView::adopt(self.api.clone(), ptr, true)
    }
}

pub struct FfiSession {
    api: Rc<Api>,
    ptr: *mut EwSession,
}

impl Session for FfiSession {
    fn name(&self) -> String {
        unsafe { engine_text((self.api.session_name)(self.ptr)) }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
