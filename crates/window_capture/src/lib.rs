//! Window capture for ghostshot
//!
//! Binds a desktop window by title, optionally hides it while capturing,
//! and saves its area as a PNG.

pub mod config;
pub mod dc_cache;
pub mod discovery;
pub mod platform;
pub mod session;
#[cfg(windows)]
pub mod win32;
pub mod window;

#[cfg(test)]
mod testing;

pub use config::CaptureConfig;
pub use dc_cache::DcCache;
pub use platform::{list, list_for, open, open_for, SessionOptions};
pub use session::{CaptureSession, WindowCapture};
#[cfg(windows)]
pub use win32::Win32Windows;
pub use window::{BoundWindow, Bounds, LayeredAttributes, WindowHandle, WindowSystem};

use capture_gdi::GrabError;
use export::ExportError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Platform {platform:?} is not supported")]
    UnsupportedPlatform { platform: String },

    #[error("Window not found: '{title}'")]
    WindowNotFound { title: String },

    #[error("Window title query must not be empty")]
    EmptyTitle,

    #[error(transparent)]
    Capture(#[from] GrabError),

    #[error(transparent)]
    Export(#[from] ExportError),

    #[cfg(windows)]
    #[error("Windows API error: {0}")]
    Windows(#[from] windows::core::Error),

    #[error("Failed to acquire device context for window {0:?}")]
    DeviceContext(WindowHandle),

    #[error("Failed to set extended style of window {window:?} (error {code})")]
    StyleUpdate { window: WindowHandle, code: u32 },
}

pub type SessionResult<T> = Result<T, SessionError>;
