//! Capture configuration

use std::path::PathBuf;

/// Settings passed through to the capture engine and exporter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureConfig {
    /// PNG compression level, 0-9
    pub compression_level: u8,
    /// Directory receiving `<name>.png`
    pub output_dir: PathBuf,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            compression_level: export::DEFAULT_COMPRESSION_LEVEL,
            output_dir: PathBuf::from("."),
        }
    }
}

impl CaptureConfig {
    pub fn with_compression_level(mut self, level: u8) -> Self {
        self.compression_level = level;
        self
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }
}
