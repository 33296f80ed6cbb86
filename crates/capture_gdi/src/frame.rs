//! Captured pixel buffer

use crate::{GrabError, GrabResult};

/// Frame grabbed from a device context, stored as top-down BGRA rows
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    bgra: Vec<u8>,
    width: u32,
    height: u32,
}

impl Frame {
    /// Wrap a BGRA buffer, checking it matches the given size
    pub fn from_bgra(bgra: Vec<u8>, width: u32, height: u32) -> GrabResult<Self> {
        let expected = width as usize * height as usize * 4;
        if bgra.len() != expected {
            return Err(GrabError::BufferSize {
                expected,
                actual: bgra.len(),
            });
        }

        Ok(Self { bgra, width, height })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn bgra(&self) -> &[u8] {
        &self.bgra
    }

    /// Convert BGRA data to packed RGB, dropping alpha
    pub fn to_rgb(&self) -> Vec<u8> {
        let mut rgb = Vec::with_capacity(self.width as usize * self.height as usize * 3);

        for px in self.bgra.chunks_exact(4) {
            rgb.extend_from_slice(&[px[2], px[1], px[0]]);
        }

        rgb
    }
}
