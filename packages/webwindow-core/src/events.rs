//! Event payloads and the fixed enum mapping tables between engine
//! constants and bridge-side values.
//!
//! The engine delivers events with raw integer type codes (`Raw*`
//! structs, `#[repr(C)]` because the FFI backend receives them straight
//! off the wire). Before an event crosses to the host it is mapped
//! through the tables below; an integer the table does not know means
//! "event not supported" and the dispatch short-circuits to the
//! native-default result without touching the host.

use std::fmt;

/// A rectangle in view coordinates, as the engine reports popup
/// geometry. Crosses to the host as an object with four integer
/// fields.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntRect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

// ---- Raw engine payloads --------------------------------------------

/// Key event as delivered by the engine, type code unmapped.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct RawKeyEvent {
    pub event_type: i32,
    pub virtual_key_code: i32,
    pub native_key_code: i32,
    pub is_system_key: bool,
}

/// Mouse event as delivered by the engine, type and button unmapped.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct RawMouseEvent {
    pub event_type: i32,
    pub x: i32,
    pub y: i32,
    pub button: i32,
}

/// Scroll event as delivered by the engine, type code unmapped.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct RawScrollEvent {
    pub event_type: i32,
    pub delta_x: i32,
    pub delta_y: i32,
}

// ---- Typed payloads crossing to the host ----------------------------

#[derive(Debug, Clone, Copy)]
pub struct KeyEvent {
    pub event_type: KeyEventType,
    pub virtual_key_code: i32,
    pub native_key_code: i32,
    pub is_system_key: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct MouseEvent {
    pub event_type: MouseEventType,
    pub x: i32,
    pub y: i32,
    pub button: MouseButton,
}

#[derive(Debug, Clone, Copy)]
pub struct ScrollEvent {
    pub event_type: ScrollEventType,
    pub delta_x: i32,
    pub delta_y: i32,
}

/// Declares an enum whose discriminants are the engine's ABI values,
/// with a total `native()` accessor and a partial `from_native()`
/// lookup. `from_native` returning `None` is the "event not supported"
/// signal.
macro_rules! engine_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident = $value:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[repr(i32)]
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub enum $name {
            $($variant = $value),+
        }

        impl $name {
            pub fn from_native(value: i32) -> Option<Self> {
                match value {
                    $($value => Some(Self::$variant),)+
                    _ => None,
                }
            }

            pub fn native(self) -> i32 {
                self as i32
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Debug::fmt(self, f)
            }
        }
    };
}

engine_enum! {
    /// Key event subtypes.
    KeyEventType {
        KeyDown = 0,
        KeyUp = 1,
        RawKeyDown = 2,
        Char = 3,
    }
}

engine_enum! {
    /// Mouse event subtypes.
    MouseEventType {
        MouseMoved = 0,
        MouseDown = 1,
        MouseUp = 2,
    }
}

engine_enum! {
    /// Mouse buttons. `None` is a real engine value (moves without a
    /// pressed button), not an absence marker.
    MouseButton {
        None = 0,
        Left = 1,
        Middle = 2,
        Right = 3,
    }
}

engine_enum! {
    /// Scroll delta units.
    ScrollEventType {
        ScrollByPixel = 0,
        ScrollByPage = 1,
    }
}

engine_enum! {
    /// Console message origin.
    MessageSource {
        Xml = 0,
        Js = 1,
        Network = 2,
        ConsoleApi = 3,
        Storage = 4,
        AppCache = 5,
        Rendering = 6,
        Css = 7,
        Security = 8,
        ContentBlocker = 9,
        Other = 10,
    }
}

engine_enum! {
    /// Console message severity.
    MessageLevel {
        Log = 1,
        Warning = 2,
        Error = 3,
        Debug = 4,
        Info = 5,
    }
}

engine_enum! {
    /// Pointer cursors, matching the engine's cursor table.
    Cursor {
        Pointer = 0,
        Cross = 1,
        Hand = 2,
        IBeam = 3,
        Wait = 4,
        Help = 5,
        EastResize = 6,
        NorthResize = 7,
        NorthEastResize = 8,
        NorthWestResize = 9,
        SouthResize = 10,
        SouthEastResize = 11,
        SouthWestResize = 12,
        WestResize = 13,
        NorthSouthResize = 14,
        EastWestResize = 15,
        NorthEastSouthWestResize = 16,
        NorthWestSouthEastResize = 17,
        ColumnResize = 18,
        RowResize = 19,
        MiddlePanning = 20,
        EastPanning = 21,
        NorthPanning = 22,
        NorthEastPanning = 23,
        NorthWestPanning = 24,
        SouthPanning = 25,
        SouthEastPanning = 26,
        SouthWestPanning = 27,
        WestPanning = 28,
        Move = 29,
        VerticalText = 30,
        Cell = 31,
        ContextMenu = 32,
        Alias = 33,
        Progress = 34,
        NoDrop = 35,
        Copy = 36,
        None = 37,
        NotAllowed = 38,
        ZoomIn = 39,
        ZoomOut = 40,
        Grab = 41,
        Grabbing = 42,
        Custom = 43,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_event_types_round_trip() {
        for raw in 0..4 {
            let mapped = KeyEventType::from_native(raw).unwrap();
            assert_eq!(mapped.native(), raw);
        }
        assert!(KeyEventType::from_native(4).is_none());
        assert!(KeyEventType::from_native(-1).is_none());
    }

    #[test]
    fn mouse_tables_round_trip() {
        for raw in 0..3 {
            assert_eq!(MouseEventType::from_native(raw).unwrap().native(), raw);
        }
        assert!(MouseEventType::from_native(3).is_none());

        for raw in 0..4 {
            assert_eq!(MouseButton::from_native(raw).unwrap().native(), raw);
        }
        assert!(MouseButton::from_native(4).is_none());
    }

    #[test]
    fn scroll_units_round_trip() {
        assert_eq!(
            ScrollEventType::from_native(0),
            Some(ScrollEventType::ScrollByPixel)
        );
        assert_eq!(
            ScrollEventType::from_native(1),
            Some(ScrollEventType::ScrollByPage)
        );
        assert!(ScrollEventType::from_native(2).is_none());
    }

    #[test]
    fn message_levels_skip_zero() {
        // Severity codes start at 1; 0 is not a valid engine value.
        assert!(MessageLevel::from_native(0).is_none());
        assert_eq!(MessageLevel::from_native(1), Some(MessageLevel::Log));
        assert_eq!(MessageLevel::from_native(5), Some(MessageLevel::Info));
        assert!(MessageLevel::from_native(6).is_none());
    }

    #[test]
    fn message_sources_cover_engine_table() {
        for raw in 0..=10 {
            assert_eq!(MessageSource::from_native(raw).unwrap().native(), raw);
        }
        assert!(MessageSource::from_native(11).is_none());
    }

    #[test]
    fn cursor_table_is_dense() {
        for raw in 0..=43 {
            assert_eq!(Cursor::from_native(raw).unwrap().native(), raw);
        }
        assert!(Cursor::from_native(44).is_none());
    }
}
