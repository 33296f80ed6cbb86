//! Win32 windowing backend

use crate::dc_cache::{self, DcCache};
use crate::window::{self, Bounds, LayeredAttributes, WindowHandle, WindowSystem, HIDE_EX_STYLE};
use crate::{SessionError, SessionResult};
use capture_gdi::DeviceContext;
use std::ffi::OsString;
use std::ops::ControlFlow;
use std::os::windows::ffi::OsStringExt;
use std::sync::Arc;
use windows::Win32::Foundation::{
    GetLastError, SetLastError, BOOL, COLORREF, ERROR_SUCCESS, HWND, LPARAM, RECT, WIN32_ERROR,
};
use windows::Win32::Graphics::Gdi::GetWindowDC;
use windows::Win32::UI::WindowsAndMessaging::{
    EnumWindows, GetLayeredWindowAttributes, GetWindowLongW, GetWindowRect, GetWindowTextLengthW,
    GetWindowTextW, IsIconic, IsWindowVisible, SetLayeredWindowAttributes, SetWindowLongW,
    GWL_EXSTYLE, LAYERED_WINDOW_ATTRIBUTES_FLAGS, LWA_ALPHA, LWA_COLORKEY, WS_EX_LAYERED,
    WS_EX_TOOLWINDOW, WS_EX_TRANSPARENT,
};

const _: () = assert!(HIDE_EX_STYLE == WS_EX_LAYERED.0 | WS_EX_TRANSPARENT.0 | WS_EX_TOOLWINDOW.0);
const _: () = assert!(window::LWA_ALPHA == LWA_ALPHA.0 && window::LWA_COLORKEY == LWA_COLORKEY.0);

type Visitor<'a> = &'a mut dyn FnMut(WindowHandle) -> ControlFlow<()>;

/// Desktop windows reached through user32
///
/// Device contexts come from `GetWindowDC` and are kept in a [`DcCache`],
/// the process-wide one unless another is injected.
#[derive(Debug, Clone)]
pub struct Win32Windows {
    dc_cache: Arc<DcCache>,
}

impl Win32Windows {
    pub fn new() -> Self {
        Self::with_cache(dc_cache::shared())
    }

    pub fn with_cache(dc_cache: Arc<DcCache>) -> Self {
        Self { dc_cache }
    }
}

impl Default for Win32Windows {
    fn default() -> Self {
        Self::new()
    }
}

fn hwnd(window: WindowHandle) -> HWND {
    HWND(window.raw() as _)
}

unsafe extern "system" fn enum_window_callback(hwnd: HWND, lparam: LPARAM) -> BOOL {
    let visit = &mut *(lparam.0 as *mut Visitor<'_>);

    match visit(WindowHandle::from_raw(hwnd.0 as isize)) {
        ControlFlow::Continue(()) => BOOL(1),
        ControlFlow::Break(()) => BOOL(0), // Stop enumeration
    }
}

impl WindowSystem for Win32Windows {
    fn enumerate(&self, visit: &mut dyn FnMut(WindowHandle) -> ControlFlow<()>) {
        let mut visit: Visitor<'_> = visit;

        unsafe {
            // Fails with no error code when the callback stops early
            let _ = EnumWindows(
                Some(enum_window_callback),
                LPARAM(&mut visit as *mut Visitor<'_> as isize),
            );
        }
    }

    fn is_minimized(&self, window: WindowHandle) -> bool {
        unsafe { IsIconic(hwnd(window)).as_bool() }
    }

    fn is_visible(&self, window: WindowHandle) -> bool {
        unsafe { IsWindowVisible(hwnd(window)).as_bool() }
    }

    fn title(&self, window: WindowHandle) -> String {
        unsafe {
            let len = GetWindowTextLengthW(hwnd(window));
            if len <= 0 {
                return String::new();
            }

            let mut buf = vec![0u16; len as usize + 1];
            let copied = GetWindowTextW(hwnd(window), &mut buf);
            if copied <= 0 {
                return String::new();
            }

            OsString::from_wide(&buf[..copied as usize])
                .to_string_lossy()
                .into_owned()
        }
    }

    fn bounds(&self, window: WindowHandle) -> SessionResult<Bounds> {
        let mut rect = RECT::default();
        unsafe { GetWindowRect(hwnd(window), &mut rect)? };
        Ok(Bounds::new(rect.left, rect.top, rect.right, rect.bottom))
    }

    fn ex_style(&self, window: WindowHandle) -> u32 {
        unsafe { GetWindowLongW(hwnd(window), GWL_EXSTYLE) as u32 }
    }

    fn set_ex_style(&self, window: WindowHandle, style: u32) -> SessionResult<()> {
        // A previous style of zero is only a failure if the last error changed
        let (previous, error) = unsafe {
            SetLastError(WIN32_ERROR(0));
            let previous = SetWindowLongW(hwnd(window), GWL_EXSTYLE, style as i32);
            (previous, GetLastError())
        };

        if previous == 0 && error != ERROR_SUCCESS {
            return Err(SessionError::StyleUpdate {
                window,
                code: error.0,
            });
        }
        Ok(())
    }

    fn layered_attributes(&self, window: WindowHandle) -> Option<LayeredAttributes> {
        let mut color_key = COLORREF(0);
        let mut alpha = 0u8;
        let mut flags = LAYERED_WINDOW_ATTRIBUTES_FLAGS(0);

        // Fails for windows layered through UpdateLayeredWindow
        unsafe {
            GetLayeredWindowAttributes(
                hwnd(window),
                Some(&mut color_key as *mut _),
                Some(&mut alpha as *mut _),
                Some(&mut flags as *mut _),
            )
        }
        .ok()?;

        Some(LayeredAttributes {
            color_key: color_key.0,
            alpha,
            flags: flags.0,
        })
    }

    fn set_layered_attributes(
        &self,
        window: WindowHandle,
        attributes: LayeredAttributes,
    ) -> SessionResult<()> {
        unsafe {
            SetLayeredWindowAttributes(
                hwnd(window),
                COLORREF(attributes.color_key),
                attributes.alpha,
                LAYERED_WINDOW_ATTRIBUTES_FLAGS(attributes.flags),
            )?
        };
        Ok(())
    }

    fn device_context(&self, window: WindowHandle) -> SessionResult<DeviceContext> {
        self.dc_cache.get_or_acquire(|| {
            let dc = unsafe { GetWindowDC(hwnd(window)) };
            if dc.is_invalid() {
                return Err(SessionError::DeviceContext(window));
            }
            Ok(DeviceContext::from_raw(dc.0 as isize))
        })
    }
}
