//! PNG encoding and writing

use crate::{ExportError, ExportResult, MAX_COMPRESSION_LEVEL};
use capture_gdi::Frame;
use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{ExtendedColorType, ImageEncoder};
use std::ffi::OsString;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// PNG exporter at a fixed compression level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PngExporter {
    level: u8,
}

impl PngExporter {
    /// Create an exporter for a compression level in `0..=9`
    ///
    /// Levels share three encoder presets: `0..=3` fast, `4..=6` default,
    /// `7..=9` best. Level 0 still compresses.
    pub fn new(level: u8) -> ExportResult<Self> {
        if level > MAX_COMPRESSION_LEVEL {
            return Err(ExportError::InvalidCompressionLevel(level));
        }
        Ok(Self { level })
    }

    pub fn level(&self) -> u8 {
        self.level
    }

    fn compression(&self) -> CompressionType {
        match self.level {
            0..=3 => CompressionType::Fast,
            4..=6 => CompressionType::Default,
            _ => CompressionType::Best,
        }
    }

    /// Encode frame as RGB PNG bytes
    pub fn encode(&self, frame: &Frame) -> ExportResult<Vec<u8>> {
        let mut bytes = Vec::new();
        let encoder =
            PngEncoder::new_with_quality(&mut bytes, self.compression(), FilterType::Adaptive);
        encoder.write_image(
            &frame.to_rgb(),
            frame.width(),
            frame.height(),
            ExtendedColorType::Rgb8,
        )?;
        Ok(bytes)
    }

    /// Encode frame and write it to `path`
    ///
    /// Bytes go to a sibling temp file first, so `path` is either fully
    /// written or left untouched.
    pub fn write(&self, frame: &Frame, path: &Path) -> ExportResult<PathBuf> {
        let bytes = self.encode(frame)?;
        let tmp_path = temp_sibling(path);

        debug!(
            event = "export.png.write_started",
            path = %path.display(),
            bytes = bytes.len(),
            level = self.level
        );

        if let Err(e) = write_file(&tmp_path, &bytes).and_then(|_| fs::rename(&tmp_path, path)) {
            let _ = fs::remove_file(&tmp_path);
            return Err(e.into());
        }

        info!(event = "export.png.write_completed", path = %path.display());
        Ok(path.to_path_buf())
    }
}

impl Default for PngExporter {
    fn default() -> Self {
        Self {
            level: crate::DEFAULT_COMPRESSION_LEVEL,
        }
    }
}

fn write_file(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut file = fs::File::create(path)?;
    file.write_all(bytes)?;
    file.sync_all()
}

fn temp_sibling(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(OsString::from)
        .unwrap_or_default();
    name.push(format!(".{}.tmp", uuid::Uuid::new_v4()));
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checker_frame(width: u32, height: u32) -> Frame {
        let mut bgra = Vec::with_capacity((width * height * 4) as usize);
        for y in 0..height {
            for x in 0..width {
                let v = if (x + y) % 2 == 0 { 0xff } else { 0x00 };
                bgra.extend_from_slice(&[v, 0x40, 0x80, 0xff]);
            }
        }
        Frame::from_bgra(bgra, width, height).unwrap()
    }

    #[test]
    fn rejects_level_above_nine() {
        assert!(matches!(
            PngExporter::new(10),
            Err(ExportError::InvalidCompressionLevel(10))
        ));
        assert_eq!(PngExporter::new(9).unwrap().level(), 9);
        assert_eq!(PngExporter::default().level(), 6);
    }

    #[test]
    fn encode_produces_rgb_png_of_frame_size() {
        let frame = checker_frame(8, 5);
        let bytes = PngExporter::new(6).unwrap().encode(&frame).unwrap();

        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");

        let decoded = image::load_from_memory(&bytes).unwrap().to_rgb8();
        assert_eq!(decoded.dimensions(), (8, 5));
        assert_eq!(decoded.get_pixel(0, 0).0, [0x80, 0x40, 0xff]);
        assert_eq!(decoded.get_pixel(1, 0).0, [0x80, 0x40, 0x00]);
    }

    #[test]
    fn every_level_encodes_same_pixels() {
        let frame = checker_frame(4, 4);
        let reference = frame.to_rgb();

        for level in [0, 3, 4, 6, 7, 9] {
            let bytes = PngExporter::new(level).unwrap().encode(&frame).unwrap();
            let decoded = image::load_from_memory(&bytes).unwrap().to_rgb8();
            assert_eq!(decoded.into_raw(), reference, "level {level}");
        }
    }

    #[test]
    fn levels_in_one_preset_encode_identically() {
        let frame = checker_frame(16, 16);
        let encode = |level| PngExporter::new(level).unwrap().encode(&frame).unwrap();

        assert_eq!(encode(0), encode(3));
        assert_eq!(encode(4), encode(6));
        assert_eq!(encode(7), encode(9));
    }

    #[test]
    fn write_leaves_only_target_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Notepad - untitled.png");

        let written = PngExporter::default()
            .write(&checker_frame(3, 3), &path)
            .unwrap();

        assert_eq!(written, path);
        assert!(path.is_file());
        let entries: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn write_into_missing_directory_fails_without_leftovers() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("shot.png");

        let err = PngExporter::default()
            .write(&checker_frame(2, 2), &path)
            .unwrap_err();

        assert!(matches!(err, ExportError::Io(_)));
        assert!(!path.exists());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
