//! Region grab using GDI

use crate::{DeviceContext, Frame, GrabError, GrabResult, Grabber, Region};
use tracing::debug;
use windows::Win32::Graphics::Gdi::{
    BitBlt, CreateCompatibleBitmap, CreateCompatibleDC, DeleteDC, DeleteObject, GetDIBits,
    SelectObject, BITMAPINFO, BITMAPINFOHEADER, BI_RGB, CAPTUREBLT, DIB_RGB_COLORS, HDC,
    ROP_CODE, SRCCOPY,
};

/// Grabber copying pixels out of a device context with BitBlt
#[derive(Debug, Clone, Copy, Default)]
pub struct GdiGrabber;

impl GdiGrabber {
    pub fn new() -> Self {
        Self
    }
}

impl Grabber for GdiGrabber {
    fn grab(&self, source: DeviceContext, region: Region) -> GrabResult<Frame> {
        if region.is_empty() {
            return Err(GrabError::EmptyRegion {
                width: region.width,
                height: region.height,
            });
        }

        let width = region.width as i32;
        let height = region.height as i32;

        debug!(
            event = "capture_gdi.grab_started",
            left = region.left,
            top = region.top,
            width = region.width,
            height = region.height
        );

        unsafe {
            let src_dc = HDC(source.raw() as _);

            // Create compatible DC and bitmap
            let mem_dc = CreateCompatibleDC(src_dc);
            let bitmap = CreateCompatibleBitmap(src_dc, width, height);
            let old_bitmap = SelectObject(mem_dc, bitmap);

            // Copy region to bitmap, including layered windows
            let blit = BitBlt(
                mem_dc,
                0,
                0,
                width,
                height,
                src_dc,
                region.left,
                region.top,
                ROP_CODE(SRCCOPY.0 | CAPTUREBLT.0),
            );

            let mut bmi = BITMAPINFO {
                bmiHeader: BITMAPINFOHEADER {
                    biSize: std::mem::size_of::<BITMAPINFOHEADER>() as u32,
                    biWidth: width,
                    biHeight: -height, // Top-down DIB
                    biPlanes: 1,
                    biBitCount: 32,
                    biCompression: BI_RGB.0,
                    biSizeImage: 0,
                    biXPelsPerMeter: 0,
                    biYPelsPerMeter: 0,
                    biClrUsed: 0,
                    biClrImportant: 0,
                },
                bmiColors: [Default::default()],
            };

            let mut data = vec![0u8; region.byte_len()];
            let lines = if blit.is_ok() {
                GetDIBits(
                    mem_dc,
                    bitmap,
                    0,
                    region.height,
                    Some(data.as_mut_ptr() as *mut _),
                    &mut bmi,
                    DIB_RGB_COLORS,
                )
            } else {
                0
            };

            // Cleanup
            SelectObject(mem_dc, old_bitmap);
            let _ = DeleteObject(bitmap);
            let _ = DeleteDC(mem_dc);

            blit?;
            if lines == 0 {
                return Err(GrabError::Bits);
            }

            Frame::from_bgra(data, region.width, region.height)
        }
    }
}
