//! The host-side listener capability set.
//!
//! A host listener is one object with a fixed, versioned set of
//! optional methods. Resolution happens per call: a method the host
//! object does not expose is skipped and the engine's default behavior
//! stands. The `Option` returns below carry that tri-state — `None`
//! means "not exposed or produced no usable value", never an error.

use crate::events::{Cursor, IntRect, KeyEvent, MessageLevel, MessageSource, MouseEvent, ScrollEvent};
use crate::registry::Handle;

/// A cross-runtime reference to one host object.
///
/// The reference outlives the foreign call that installed it and must
/// be dropped exactly once, which [`crate::listener::ListenerSlot`]
/// guarantees by releasing only on replacement or on window destroy.
pub trait ListenerBinding {
    /// Drop the cross-runtime reference. Called exactly once per
    /// binding; implementations may tolerate (and log) a second call
    /// but the slot never issues one.
    fn release(&self);
}

/// Window-kind host listener: lifecycle and input.
pub trait HostWindowListener: ListenerBinding {
    fn on_close(&self);
    fn on_resize(&self, width: u32, height: u32);
    /// `Some(true)` marks the event consumed; `None` means the host
    /// did not expose the method.
    fn on_key_event(&self, event: &KeyEvent) -> Option<bool>;
    fn on_mouse_event(&self, event: &MouseEvent) -> Option<bool>;
    fn on_scroll_event(&self, event: &ScrollEvent) -> Option<bool>;
}

/// View-kind host listener: navigation, console and popup creation.
pub trait HostViewListener: ListenerBinding {
    fn on_change_cursor(&self, view: Handle, cursor: Cursor);
    fn on_change_title(&self, view: Handle, title: &str);
    fn on_change_tooltip(&self, view: Handle, tooltip: &str);
    fn on_request_close(&self, view: Handle);
    #[allow(clippy::too_many_arguments)]
    fn on_add_console_message(
        &self,
        view: Handle,
        source: MessageSource,
        level: MessageLevel,
        message: &str,
        line: u32,
        column: u32,
        source_id: &str,
    );
    fn on_change_url(&self, view: Handle, url: &str);
    /// `Some(handle)` supplies an existing view; `None` covers both a
    /// missing method and the host's explicit "none" sentinel, and
    /// sends the bridge to its default creation policy.
    fn on_create_child_view(
        &self,
        view: Handle,
        opener_url: &str,
        target_url: &str,
        is_popup: bool,
        rect: IntRect,
    ) -> Option<Handle>;
    fn on_create_inspector_view(
        &self,
        view: Handle,
        is_local: bool,
        inspected_url: &str,
    ) -> Option<Handle>;
}
