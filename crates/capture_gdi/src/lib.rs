//! GDI capture engine for ghostshot
//!
//! Grabs a region of a device context into a BGRA frame.

pub mod frame;
#[cfg(windows)]
pub mod gdi;

pub use frame::Frame;
#[cfg(windows)]
pub use gdi::GdiGrabber;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GrabError {
    #[cfg(windows)]
    #[error("Windows API error: {0}")]
    Windows(#[from] windows::core::Error),

    #[error("Cannot grab an empty region ({width}x{height})")]
    EmptyRegion { width: u32, height: u32 },

    #[error("Failed to read bitmap bits")]
    Bits,

    #[error("Pixel buffer holds {actual} bytes, expected {expected}")]
    BufferSize { expected: usize, actual: usize },
}

pub type GrabResult<T> = Result<T, GrabError>;

/// Region to grab, relative to the source device context
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Region {
    pub left: i32,
    pub top: i32,
    pub width: u32,
    pub height: u32,
}

impl Region {
    pub fn new(left: i32, top: i32, width: u32, height: u32) -> Self {
        Self { left, top, width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Number of bytes a 32bpp frame of this region occupies
    pub fn byte_len(&self) -> usize {
        self.width as usize * self.height as usize * 4
    }
}

/// Raw drawing-context handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DeviceContext(isize);

impl DeviceContext {
    pub fn from_raw(raw: isize) -> Self {
        Self(raw)
    }

    pub fn raw(&self) -> isize {
        self.0
    }
}

/// Pixel source for a region of a device context
pub trait Grabber {
    fn grab(&self, source: DeviceContext, region: Region) -> GrabResult<Frame>;
}

impl<G: Grabber + ?Sized> Grabber for &G {
    fn grab(&self, source: DeviceContext, region: Region) -> GrabResult<Frame> {
        (**self).grab(source, region)
    }
}
