//! In-memory desktop and grabber standing in for the native collaborators

use crate::dc_cache::DcCache;
use crate::window::{Bounds, LayeredAttributes, WindowHandle, WindowSystem, WS_EX_LAYERED};
use crate::{SessionError, SessionResult};
use capture_gdi::{DeviceContext, Frame, GrabError, GrabResult, Grabber, Region};
use parking_lot::Mutex;
use std::ops::ControlFlow;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FakeWindow {
    pub title: String,
    pub visible: bool,
    pub minimized: bool,
    pub bounds: Bounds,
    pub ex_style: u32,
    /// Cleared whenever `WS_EX_LAYERED` is removed, as Windows does
    pub layered: Option<LayeredAttributes>,
}

impl FakeWindow {
    pub fn new(title: &str, bounds: Bounds) -> Self {
        Self {
            title: title.to_string(),
            visible: true,
            minimized: false,
            bounds,
            ex_style: 0x0000_0100, // WS_EX_WINDOWEDGE
            layered: None,
        }
    }

    pub fn minimized(mut self) -> Self {
        self.minimized = true;
        self
    }

    pub fn invisible(mut self) -> Self {
        self.visible = false;
        self
    }

    pub fn with_ex_style(mut self, ex_style: u32) -> Self {
        self.ex_style = ex_style;
        self
    }

    /// Already layered window, like a shell overlay or a fading popup
    pub fn with_layered(mut self, attributes: LayeredAttributes) -> Self {
        self.ex_style |= WS_EX_LAYERED;
        self.layered = Some(attributes);
        self
    }

    pub fn alpha(&self) -> Option<u8> {
        self.layered.map(|a| a.alpha)
    }
}

#[derive(Debug, Default)]
struct DesktopState {
    windows: Vec<FakeWindow>,
    visited: usize,
    style_writes: usize,
    layered_writes: usize,
    fail_style_writes: bool,
    dc_acquisitions: usize,
}

/// Desktop whose state is shared between clones, so tests can inspect it
/// after a session takes ownership
#[derive(Debug, Clone)]
pub struct FakeDesktop {
    state: Arc<Mutex<DesktopState>>,
    dc_cache: Arc<DcCache>,
}

impl FakeDesktop {
    pub fn new(windows: Vec<FakeWindow>) -> Self {
        Self {
            state: Arc::new(Mutex::new(DesktopState {
                windows,
                ..Default::default()
            })),
            dc_cache: Arc::new(DcCache::new()),
        }
    }

    pub fn handle(&self, index: usize) -> WindowHandle {
        WindowHandle::from_raw(index as isize + 1)
    }

    pub fn window(&self, index: usize) -> FakeWindow {
        self.state.lock().windows[index].clone()
    }

    pub fn set_bounds(&self, index: usize, bounds: Bounds) {
        self.state.lock().windows[index].bounds = bounds;
    }

    pub fn visited(&self) -> usize {
        self.state.lock().visited
    }

    pub fn style_writes(&self) -> usize {
        self.state.lock().style_writes
    }

    pub fn layered_writes(&self) -> usize {
        self.state.lock().layered_writes
    }

    /// Make `set_ex_style` fail until switched back
    pub fn set_style_writes_failing(&self, fail: bool) {
        self.state.lock().fail_style_writes = fail;
    }

    pub fn dc_acquisitions(&self) -> usize {
        self.state.lock().dc_acquisitions
    }

    fn index(window: WindowHandle) -> usize {
        (window.raw() - 1) as usize
    }

    fn with_window<T>(&self, window: WindowHandle, f: impl FnOnce(&mut FakeWindow) -> T) -> T {
        let mut state = self.state.lock();
        f(&mut state.windows[Self::index(window)])
    }
}

impl WindowSystem for FakeDesktop {
    fn enumerate(&self, visit: &mut dyn FnMut(WindowHandle) -> ControlFlow<()>) {
        let count = self.state.lock().windows.len();
        for index in 0..count {
            self.state.lock().visited += 1;
            if visit(self.handle(index)).is_break() {
                break;
            }
        }
    }

    fn is_minimized(&self, window: WindowHandle) -> bool {
        self.with_window(window, |w| w.minimized)
    }

    fn is_visible(&self, window: WindowHandle) -> bool {
        self.with_window(window, |w| w.visible)
    }

    fn title(&self, window: WindowHandle) -> String {
        self.with_window(window, |w| w.title.clone())
    }

    fn bounds(&self, window: WindowHandle) -> SessionResult<Bounds> {
        Ok(self.with_window(window, |w| w.bounds))
    }

    fn ex_style(&self, window: WindowHandle) -> u32 {
        self.with_window(window, |w| w.ex_style)
    }

    fn set_ex_style(&self, window: WindowHandle, style: u32) -> SessionResult<()> {
        {
            let mut state = self.state.lock();
            if state.fail_style_writes {
                // ERROR_ACCESS_DENIED
                return Err(SessionError::StyleUpdate { window, code: 5 });
            }
            state.style_writes += 1;
        }
        self.with_window(window, |w| {
            w.ex_style = style;
            if style & WS_EX_LAYERED == 0 {
                w.layered = None;
            }
        });
        Ok(())
    }

    fn layered_attributes(&self, window: WindowHandle) -> Option<LayeredAttributes> {
        self.with_window(window, |w| {
            if w.ex_style & WS_EX_LAYERED != 0 {
                w.layered
            } else {
                None
            }
        })
    }

    fn set_layered_attributes(
        &self,
        window: WindowHandle,
        attributes: LayeredAttributes,
    ) -> SessionResult<()> {
        self.state.lock().layered_writes += 1;
        self.with_window(window, |w| w.layered = Some(attributes));
        Ok(())
    }

    fn device_context(&self, window: WindowHandle) -> SessionResult<DeviceContext> {
        self.dc_cache.get_or_acquire(|| {
            self.state.lock().dc_acquisitions += 1;
            Ok(DeviceContext::from_raw(0x1000 + window.raw()))
        })
    }
}

/// What the grabber saw at the moment of a grab
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GrabCall {
    pub source: DeviceContext,
    pub region: Region,
    /// Extended style of the watched window during the grab
    pub ex_style: Option<u32>,
}

#[derive(Debug, Default)]
struct GrabberState {
    calls: Vec<GrabCall>,
    fail: bool,
}

#[derive(Debug, Clone, Default)]
pub struct FakeGrabber {
    state: Arc<Mutex<GrabberState>>,
    watch: Option<(FakeDesktop, usize)>,
}

impl FakeGrabber {
    pub fn new() -> Self {
        Self::default()
    }

    /// Grabber recording the live style of one desktop window at grab time
    pub fn watching(desktop: &FakeDesktop, index: usize) -> Self {
        Self {
            watch: Some((desktop.clone(), index)),
            ..Self::default()
        }
    }

    pub fn set_failing(&self, fail: bool) {
        self.state.lock().fail = fail;
    }

    pub fn calls(&self) -> Vec<GrabCall> {
        self.state.lock().calls.clone()
    }
}

impl Grabber for FakeGrabber {
    fn grab(&self, source: DeviceContext, region: Region) -> GrabResult<Frame> {
        let ex_style = self
            .watch
            .as_ref()
            .map(|(desktop, index)| desktop.window(*index).ex_style);

        let mut state = self.state.lock();
        state.calls.push(GrabCall {
            source,
            region,
            ex_style,
        });

        if state.fail {
            return Err(GrabError::Bits);
        }
        if region.is_empty() {
            return Err(GrabError::EmptyRegion {
                width: region.width,
                height: region.height,
            });
        }

        Frame::from_bgra(vec![0x7f; region.byte_len()], region.width, region.height)
    }
}
