//! Native windowing seam

use crate::SessionResult;
use capture_gdi::{DeviceContext, Region};
use std::ops::ControlFlow;

/// `WS_EX_LAYERED`: window is composited through layering
pub const WS_EX_LAYERED: u32 = 0x0008_0000;
/// `WS_EX_TRANSPARENT`: window ignores mouse input
pub const WS_EX_TRANSPARENT: u32 = 0x0000_0020;
/// `WS_EX_TOOLWINDOW`: window is left out of the taskbar and Alt+Tab
pub const WS_EX_TOOLWINDOW: u32 = 0x0000_0080;

/// Extended style bits added while a window is hidden for capture
pub const HIDE_EX_STYLE: u32 = WS_EX_LAYERED | WS_EX_TRANSPARENT | WS_EX_TOOLWINDOW;

/// `LWA_COLORKEY`: pixels of the key color are transparent
pub const LWA_COLORKEY: u32 = 0x0000_0001;
/// `LWA_ALPHA`: the alpha value applies to the whole window
pub const LWA_ALPHA: u32 = 0x0000_0002;

/// Layering attributes as set by `SetLayeredWindowAttributes`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayeredAttributes {
    /// `COLORREF` transparency key
    pub color_key: u32,
    pub alpha: u8,
    /// `LWA_*` flags
    pub flags: u32,
}

impl LayeredAttributes {
    /// Whole window fully transparent
    pub const TRANSPARENT: Self = Self {
        color_key: 0,
        alpha: 0,
        flags: LWA_ALPHA,
    };

    /// Whole window fully opaque
    pub const OPAQUE: Self = Self {
        color_key: 0,
        alpha: 255,
        flags: LWA_ALPHA,
    };
}

/// Opaque top-level window handle
///
/// Not owned. Once the window closes, native calls on it fail or do nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WindowHandle(isize);

impl WindowHandle {
    pub fn from_raw(raw: isize) -> Self {
        Self(raw)
    }

    pub fn raw(&self) -> isize {
        self.0
    }
}

/// Window bounding rectangle in screen coordinates
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Bounds {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Bounds {
    pub fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub fn width(&self) -> u32 {
        (self.right - self.left).max(0) as u32
    }

    pub fn height(&self) -> u32 {
        (self.bottom - self.top).max(0) as u32
    }

    /// Region of the window's own device context covering the whole window
    pub fn capture_region(&self) -> Region {
        Region::new(0, 0, self.width(), self.height())
    }
}

/// Window bound by a title search
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundWindow {
    pub handle: WindowHandle,
    /// Full title text at bind time
    pub title: String,
}

/// Native windowing API used by capture sessions
pub trait WindowSystem {
    /// Visit top-level windows in native order until the visitor breaks
    fn enumerate(&self, visit: &mut dyn FnMut(WindowHandle) -> ControlFlow<()>);

    fn is_minimized(&self, window: WindowHandle) -> bool;

    fn is_visible(&self, window: WindowHandle) -> bool;

    fn title(&self, window: WindowHandle) -> String;

    fn bounds(&self, window: WindowHandle) -> SessionResult<Bounds>;

    fn ex_style(&self, window: WindowHandle) -> u32;

    fn set_ex_style(&self, window: WindowHandle, style: u32) -> SessionResult<()>;

    /// Current layering attributes; `None` unless the window is layered and
    /// its attributes were set through `SetLayeredWindowAttributes`
    fn layered_attributes(&self, window: WindowHandle) -> Option<LayeredAttributes>;

    fn set_layered_attributes(
        &self,
        window: WindowHandle,
        attributes: LayeredAttributes,
    ) -> SessionResult<()>;

    /// Drawing context whose origin is the window's top-left corner
    fn device_context(&self, window: WindowHandle) -> SessionResult<DeviceContext>;
}
