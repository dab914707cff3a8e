//! JavaScript listener bindings.
//!
//! A binding pins one JS object with a persistent reference
//! (`napi::Ref`, refcount 1) plus the `Env` captured at install time,
//! so the object survives past the call that installed it and can be
//! re-entered from engine callbacks on the same thread. The reference
//! is dropped by `release()`, which the core listener slot invokes
//! exactly once — on replacement or on window destroy.
//!
//! Method resolution is per call and absence-tolerant: a property
//! that is missing or not a function skips the notification and
//! leaves the engine's default behavior in place. An exception thrown
//! by host code is the host runtime's business — it stays pending in
//! the VM and the bridge answers the engine with the native-default
//! result.

use std::cell::RefCell;

use napi::{Env, JsFunction, JsObject, JsUnknown, Ref, ValueType};

use webwindow_core::events::{
    Cursor, IntRect, KeyEvent, MessageLevel, MessageSource, MouseEvent, ScrollEvent,
};
use webwindow_core::host::{HostViewListener, HostWindowListener, ListenerBinding};
use webwindow_core::registry::Handle;

struct JsListener {
    env: Env,
    target: RefCell<Option<Ref<()>>>,
}

impl JsListener {
    fn bind(env: Env, listener: JsObject) -> napi::Result<Self> {
        let target = env.create_reference(listener)?;
        Ok(Self {
            env,
            target: RefCell::new(Some(target)),
        })
    }

    fn object(&self) -> Option<JsObject> {
        let target = self.target.borrow();
        let target = target.as_ref()?;
        self.env.get_reference_value::<JsObject>(target).ok()
    }

    fn method(&self, object: &JsObject, name: &str) -> Option<JsFunction> {
        let value = object.get_named_property::<JsUnknown>(name).ok()?;
        if value.get_type().ok()? != ValueType::Function {
            return None;
        }
        Some(unsafe { value.cast::<JsFunction>() })
    }

    /// Resolve and invoke one listener method. `None` when the
    /// binding is released, the method is not exposed, or the call
    /// produced no usable value.
    fn call_method(
        &self,
        name: &str,
        build: impl FnOnce(&Env) -> napi::Result<Vec<JsUnknown>>,
    ) -> Option<JsUnknown> {
        let object = self.object()?;
        let method = self.method(&object, name)?;
        let args = match build(&self.env) {
            Ok(args) => args,
            Err(e) => {
                log::warn!("failed to marshal arguments for {name}: {e}");
                return None;
            }
        };
        match method.call(Some(&object), &args) {
            Ok(ret) => Some(ret),
            Err(e) => {
                // The exception stays pending in the host VM; the
                // engine gets the native-default result.
                log::debug!("host {name} callback raised: {e}");
                None
            }
        }
    }

    fn notify(&self, name: &str, build: impl FnOnce(&Env) -> napi::Result<Vec<JsUnknown>>) {
        let _ = self.call_method(name, build);
    }

    fn query_bool(
        &self,
        name: &str,
        build: impl FnOnce(&Env) -> napi::Result<Vec<JsUnknown>>,
    ) -> Option<bool> {
        let ret = self.call_method(name, build)?;
        if ret.get_type().ok()? != ValueType::Boolean {
            return None;
        }
        ret.coerce_to_bool().ok()?.get_value().ok()
    }

    fn query_handle(
        &self,
        name: &str,
        build: impl FnOnce(&Env) -> napi::Result<Vec<JsUnknown>>,
    ) -> Option<Handle> {
        let ret = self.call_method(name, build)?;
        match ret.get_type().ok()? {
            ValueType::Number => {
                let value = ret.coerce_to_number().ok()?.get_double().ok()?;
                if !value.is_finite()
                    || value < 1.0
                    || value > f64::from(u32::MAX)
                    || value.fract() != 0.0
                {
                    // 0 is the "none" sentinel; anything else out of
                    // range cannot be a handle this bridge issued.
                    return None;
                }
                Some(value as Handle)
            }
            ValueType::Null | ValueType::Undefined => None,
            other => {
                log::warn!("host {name} returned {other:?}; expected a handle or null");
                None
            }
        }
    }

    fn release(&self) {
        if let Some(mut target) = self.target.borrow_mut().take() {
            if let Err(e) = target.unref(self.env) {
                log::warn!("failed to release listener reference: {e}");
            }
        }
    }
}

// ---- Argument marshalling -------------------------------------------

fn uint(env: &Env, value: u32) -> napi::Result<JsUnknown> {
    Ok(env.create_uint32(value)?.into_unknown())
}

fn int(env: &Env, value: i32) -> napi::Result<JsUnknown> {
    Ok(env.create_int32(value)?.into_unknown())
}

fn text(env: &Env, value: &str) -> napi::Result<JsUnknown> {
    Ok(env.create_string(value)?.into_unknown())
}

fn boolean(env: &Env, value: bool) -> napi::Result<JsUnknown> {
    Ok(env.get_boolean(value)?.into_unknown())
}

fn key_event(env: &Env, event: &KeyEvent) -> napi::Result<JsUnknown> {
    let mut object = env.create_object()?;
    object.set_named_property("type", env.create_int32(event.event_type.native())?)?;
    object.set_named_property("virtualKeyCode", env.create_int32(event.virtual_key_code)?)?;
    object.set_named_property("nativeKeyCode", env.create_int32(event.native_key_code)?)?;
    object.set_named_property("isSystemKey", env.get_boolean(event.is_system_key)?)?;
    Ok(object.into_unknown())
}

fn mouse_event(env: &Env, event: &MouseEvent) -> napi::Result<JsUnknown> {
    let mut object = env.create_object()?;
    object.set_named_property("type", env.create_int32(event.event_type.native())?)?;
    object.set_named_property("x", env.create_int32(event.x)?)?;
    object.set_named_property("y", env.create_int32(event.y)?)?;
    object.set_named_property("button", env.create_int32(event.button.native())?)?;
    Ok(object.into_unknown())
}

fn scroll_event(env: &Env, event: &ScrollEvent) -> napi::Result<JsUnknown> {
    let mut object = env.create_object()?;
    object.set_named_property("type", env.create_int32(event.event_type.native())?)?;
    object.set_named_property("deltaX", env.create_int32(event.delta_x)?)?;
    object.set_named_property("deltaY", env.create_int32(event.delta_y)?)?;
    Ok(object.into_unknown())
}

fn rect(env: &Env, rect: IntRect) -> napi::Result<JsUnknown> {
    let mut object = env.create_object()?;
    object.set_named_property("left", env.create_int32(rect.left)?)?;
    object.set_named_property("top", env.create_int32(rect.top)?)?;
    object.set_named_property("right", env.create_int32(rect.right)?)?;
    object.set_named_property("bottom", env.create_int32(rect.bottom)?)?;
    Ok(object.into_unknown())
}

// ---- Window-kind listener -------------------------------------------

pub struct JsWindowListener {
    inner: JsListener,
}

impl JsWindowListener {
    pub fn bind(env: Env, listener: JsObject) -> napi::Result<Self> {
        Ok(Self {
            inner: JsListener::bind(env, listener)?,
        })
    }
}

impl ListenerBinding for JsWindowListener {
    fn release(&self) {
        self.inner.release();
    }
}

impl HostWindowListener for JsWindowListener {
    fn on_close(&self) {
        self.inner.notify("onClose", |_| Ok(Vec::new()));
    }

    fn on_resize(&self, width: u32, height: u32) {
        self.inner
            .notify("onResize", |env| Ok(vec![uint(env, width)?, uint(env, height)?]));
    }

    fn on_key_event(&self, event: &KeyEvent) -> Option<bool> {
        self.inner
            .query_bool("onKeyEvent", |env| Ok(vec![key_event(env, event)?]))
    }

    fn on_mouse_event(&self, event: &MouseEvent) -> Option<bool> {
        self.inner
            .query_bool("onMouseEvent", |env| Ok(vec![mouse_event(env, event)?]))
    }

    fn on_scroll_event(&self, event: &ScrollEvent) -> Option<bool> {
        self.inner
            .query_bool("onScrollEvent", |env| Ok(vec![scroll_event(env, event)?]))
    }
}

// ---- View-kind listener ---------------------------------------------

pub struct JsViewListener {
    inner: JsListener,
}

impl JsViewListener {
    pub fn bind(env: Env, listener: JsObject) -> napi::Result<Self> {
        Ok(Self {
            inner: JsListener::bind(env, listener)?,
        })
    }
}

impl ListenerBinding for JsViewListener {
    fn release(&self) {
        self.inner.release();
    }
}

impl HostViewListener for JsViewListener {
    fn on_change_cursor(&self, view: Handle, cursor: Cursor) {
        self.inner.notify("onChangeCursor", |env| {
            Ok(vec![uint(env, view)?, int(env, cursor.native())?])
        });
    }

    fn on_change_title(&self, view: Handle, title: &str) {
        self.inner.notify("onChangeTitle", |env| {
            Ok(vec![uint(env, view)?, text(env, title)?])
        });
    }

    fn on_change_tooltip(&self, view: Handle, tooltip: &str) {
        self.inner.notify("onChangeTooltip", |env| {
            Ok(vec![uint(env, view)?, text(env, tooltip)?])
        });
    }

    fn on_request_close(&self, view: Handle) {
        self.inner
            .notify("onRequestClose", |env| Ok(vec![uint(env, view)?]));
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
        self.inner.notify("onAddConsoleMessage", |env| {
            Ok(vec![
                uint(env, view)?,
                int(env, source.native())?,
                int(env, level.native())?,
                text(env, message)?,
                uint(env, line)?,
                uint(env, column)?,
                text(env, source_id)?,
            ])
        });
    }

    fn on_change_url(&self, view: Handle, url: &str) {
        self.inner
            .notify("onChangeURL", |env| Ok(vec![uint(env, view)?, text(env, url)?]));
    }

    fn on_create_child_view(
        &self,
        view: Handle,
        opener_url: &str,
        target_url: &str,
        is_popup: bool,
        popup_rect: IntRect,
    ) -> Option<Handle> {
        self.inner.query_handle("onCreateChildView", |env| {
            Ok(vec![
                uint(env, view)?,
                text(env, opener_url)?,
                text(env, target_url)?,
                boolean(env, is_popup)?,
                rect(env, popup_rect)?,
            ])
        })
    }

    fn on_create_inspector_view(
        &self,
        view: Handle,
        is_local: bool,
        inspected_url: &str,
    ) -> Option<Handle> {
        self.inner.query_handle("onCreateInspectorView", |env| {
            Ok(vec![
                uint(env, view)?,
                boolean(env, is_local)?,
                text(env, inspected_url)?,
            ])
        })
    }
}
