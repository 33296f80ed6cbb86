//! Export module for ghostshot
//!
//! Encodes captured frames as PNG files.

mod png;

pub use png::PngExporter;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Invalid PNG compression level {0} (expected 0-9)")]
    InvalidCompressionLevel(u8),
}

pub type ExportResult<T> = Result<T, ExportError>;

/// Default zlib-style compression level
pub const DEFAULT_COMPRESSION_LEVEL: u8 = 6;

/// Highest accepted compression level
pub const MAX_COMPRESSION_LEVEL: u8 = 9;
