//! Capture session bound to one window

use crate::config::CaptureConfig;
use crate::discovery::find_window;
use crate::window::{
    BoundWindow, LayeredAttributes, WindowSystem, HIDE_EX_STYLE, WS_EX_LAYERED,
};
use crate::{SessionError, SessionResult};
use capture_gdi::{Frame, Grabber, Region};
use export::PngExporter;
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// Capture operations offered by every platform session
pub trait WindowCapture {
    /// Window the session is bound to
    fn window(&self) -> &BoundWindow;

    /// Title query the window was found with
    fn query(&self) -> &str;

    fn grab(&mut self) -> SessionResult<Frame>;

    fn save(&mut self, name: &str) -> SessionResult<String>;

    fn shot(&mut self) -> SessionResult<String>;

    /// Path `save(name)` writes to
    fn output_path(&self, name: &str) -> PathBuf;

    /// Restore the window and end the session
    fn close(self: Box<Self>) -> SessionResult<()>;
}

/// Extended style and layering a window had before the first hide
#[derive(Debug, Clone, Copy)]
struct SavedStyle {
    ex_style: u32,
    /// Only read when `ex_style` already carried `WS_EX_LAYERED`
    layered: Option<LayeredAttributes>,
}

impl SavedStyle {
    fn was_layered(&self) -> bool {
        self.ex_style & WS_EX_LAYERED != 0
    }
}

/// Session owning one bound window and, while hidden, its original style
///
/// The window is restored by `close` or on drop, whichever comes first. A
/// restore that fails keeps the saved style, so a later `close` or the drop
/// tries again. Binding the same window from two sessions at once is not
/// supported: their hide and restore would interleave.
///
/// Device contexts come from a cache keyed by thread only. A second session
/// on another window, used from the same thread, captures through the DC of
/// the window that was grabbed first.
pub struct CaptureSession<W: WindowSystem, G: Grabber> {
    windows: W,
    grabber: G,
    exporter: PngExporter,
    output_dir: PathBuf,
    query: String,
    window: BoundWindow,
    silent: bool,
    saved_style: Option<SavedStyle>,
}

impl<W: WindowSystem, G: Grabber> CaptureSession<W, G> {
    /// Find the first window matching `query` and bind to it
    ///
    /// With `silent` set, the window is made invisible on each grab and only
    /// becomes visible again when the session ends.
    pub fn bind(
        windows: W,
        grabber: G,
        query: &str,
        silent: bool,
        config: &CaptureConfig,
    ) -> SessionResult<Self> {
        if query.is_empty() {
            return Err(SessionError::EmptyTitle);
        }
        let exporter = PngExporter::new(config.compression_level)?;

        info!(
            event = "window_capture.session.bind_started",
            query = query,
            silent = silent
        );

        let window = find_window(&windows, query).ok_or_else(|| {
            warn!(event = "window_capture.session.window_not_found", query = query);
            SessionError::WindowNotFound {
                title: query.to_string(),
            }
        })?;

        info!(
            event = "window_capture.session.bind_completed",
            query = query,
            title = %window.title,
            hwnd = window.handle.raw()
        );

        Ok(Self {
            windows,
            grabber,
            exporter,
            output_dir: config.output_dir.clone(),
            query: query.to_string(),
            window,
            silent,
            saved_style: None,
        })
    }

    pub fn window(&self) -> &BoundWindow {
        &self.window
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn is_silent(&self) -> bool {
        self.silent
    }

    /// Whether the window is currently hidden by this session
    pub fn is_hidden(&self) -> bool {
        self.saved_style.is_some()
    }

    /// Live capture region of the bound window
    pub fn region(&self) -> SessionResult<Region> {
        Ok(self.windows.bounds(self.window.handle)?.capture_region())
    }

    /// Grab the window's current area
    pub fn grab(&mut self) -> SessionResult<Frame> {
        if self.silent {
            self.hide()?;
        }

        let region = self.region()?;
        let source = self.windows.device_context(self.window.handle)?;

        debug!(
            event = "window_capture.session.grab_started",
            hwnd = self.window.handle.raw(),
            width = region.width,
            height = region.height
        );

        Ok(self.grabber.grab(source, region)?)
    }

    /// Grab and write `<output_dir>/<name>.png`, returning `name`
    pub fn save(&mut self, name: &str) -> SessionResult<String> {
        let frame = self.grab()?;
        let path = self.output_path(name);
        self.exporter.write(&frame, &path)?;

        info!(
            event = "window_capture.session.save_completed",
            path = %path.display(),
            width = frame.width(),
            height = frame.height()
        );
        Ok(name.to_string())
    }

    /// Save under the bound window's title
    pub fn shot(&mut self) -> SessionResult<String> {
        let title = self.window.title.clone();
        self.save(&title)
    }

    pub fn output_path(&self, name: &str) -> PathBuf {
        self.output_dir.join(format!("{name}.png"))
    }

    /// Restore the window and end the session
    pub fn close(mut self) -> SessionResult<()> {
        self.restore()
    }

    fn hide(&mut self) -> SessionResult<()> {
        let handle = self.window.handle;
        let original = match self.saved_style {
            Some(saved) => saved,
            None => {
                let ex_style = self.windows.ex_style(handle);
                let layered = if ex_style & WS_EX_LAYERED != 0 {
                    self.windows.layered_attributes(handle)
                } else {
                    None
                };
                let saved = SavedStyle { ex_style, layered };
                self.saved_style = Some(saved);
                debug!(
                    event = "window_capture.session.style_saved",
                    hwnd = handle.raw(),
                    ex_style = ex_style,
                    alpha = layered.map(|a| a.alpha)
                );
                saved
            }
        };

        self.windows
            .set_ex_style(handle, original.ex_style | HIDE_EX_STYLE)?;
        self.windows
            .set_layered_attributes(handle, LayeredAttributes::TRANSPARENT)?;

        info!(event = "window_capture.session.window_hidden", hwnd = handle.raw());
        Ok(())
    }

    /// Put back the saved style; no-op unless a hide happened since the last restore
    ///
    /// A window that was layered before the hide also gets its layering
    /// attributes back, fully opaque if they could not be read.
    pub(crate) fn restore(&mut self) -> SessionResult<()> {
        if !self.silent {
            return Ok(());
        }
        let Some(original) = self.saved_style else {
            return Ok(());
        };
        let handle = self.window.handle;

        self.windows.set_ex_style(handle, original.ex_style)?;
        if original.was_layered() {
            let attributes = original.layered.unwrap_or(LayeredAttributes::OPAQUE);
            self.windows.set_layered_attributes(handle, attributes)?;
        }
        self.saved_style = None;

        info!(
            event = "window_capture.session.window_restored",
            hwnd = handle.raw(),
            ex_style = original.ex_style
        );
        Ok(())
    }
}

impl<W: WindowSystem, G: Grabber> Drop for CaptureSession<W, G> {
    fn drop(&mut self) {
        if let Err(e) = self.restore() {
            warn!(
                event = "window_capture.session.restore_failed",
                hwnd = self.window.handle.raw(),
                error = %e
            );
        }
    }
}

impl<W: WindowSystem, G: Grabber> WindowCapture for CaptureSession<W, G> {
    fn window(&self) -> &BoundWindow {
        CaptureSession::window(self)
    }

    fn query(&self) -> &str {
        CaptureSession::query(self)
    }

    fn grab(&mut self) -> SessionResult<Frame> {
        CaptureSession::grab(self)
    }

    fn save(&mut self, name: &str) -> SessionResult<String> {
        CaptureSession::save(self, name)
    }

    fn shot(&mut self) -> SessionResult<String> {
        CaptureSession::shot(self)
    }

    fn output_path(&self, name: &str) -> PathBuf {
        CaptureSession::output_path(self, name)
    }

    fn close(self: Box<Self>) -> SessionResult<()> {
        CaptureSession::close(*self)
    }
}
