//! Image processing backend trait and shared types.
//!
//! The [`ImageBackend`] trait defines the one operation the batch executor
//! needs from an image library: normalize. The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend), built on the `image`
//! crate. Tests use the mock below, which records calls and copies bytes.

use super::params::{Canvas, NormalizeParams};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Decode failed: {0}")]
    Decode(String),
    /// The decoded pixels could not be flattened to 8-bit RGB. `RustBackend`
    /// never returns this: `to_rgb8` handles every color model `image` decodes.
    #[error("Color conversion failed: {0}")]
    Conversion(String),
    #[error("Write failed: {0}")]
    Write(String),
    #[error("Output already exists: {}", .0.display())]
    OutputExists(PathBuf),
}

/// Pixel size of an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub fn as_tuple(self) -> (u32, u32) {
        (self.width, self.height)
    }
}

/// Where a normalized photo ended up on its canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    /// Source size after orientation correction.
    pub source: Dimensions,
    /// Size of the pasted, resized photo.
    pub content: Dimensions,
    /// Top-left corner of the pasted photo.
    pub offset: (u32, u32),
    pub canvas: Canvas,
}

/// Trait for image processing backends.
///
/// `Sync` so one backend can serve directory shards running on a thread pool.
pub trait ImageBackend: Sync {
    /// Decode, orient, fit, letterbox, and encode one photo.
    ///
    /// The output is either written completely or not at all.
    fn normalize(&self, params: &NormalizeParams) -> Result<Placement, BackendError>;
}
