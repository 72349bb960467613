//! Parameter types for image operations.
//!
//! These structs describe *what* to do, not *how* to do it. They are the
//! interface between [`operations`](super::operations), which turns the user's
//! normalization settings into a concrete request, and the
//! [`backend`](super::backend), which does the pixel work. Tests swap in a mock
//! backend without touching operation logic.
//!
//! - [`Quality`]: JPEG encoding quality (1-100, default 85). Clamped on construction.
//! - [`Canvas`]: Output canvas size in pixels.
//! - [`NormalizeParams`]: Everything one normalize needs, paths included.

use std::path::PathBuf;

/// Quality setting for lossy JPEG encoding (1-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(pub u32);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.clamp(1, 100))
    }

    pub fn value(self) -> u32 {
        self.0
    }

    /// The value as the encoder takes it.
    pub fn as_u8(self) -> u8 {
        self.0.clamp(1, 100) as u8
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(85)
    }
}

/// Fixed output canvas every normalized photo is letterboxed into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn as_tuple(self) -> (u32, u32) {
        (self.width, self.height)
    }
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new(1800, 1800)
    }
}

/// Parameters for one normalize operation.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizeParams {
    pub source: PathBuf,
    pub output: PathBuf,
    pub canvas: Canvas,
    pub quality: Quality,
    /// Apply the EXIF orientation tag before fitting.
    pub correct_orientation: bool,
    /// Replace `output` if it exists. When false an existing output is left
    /// alone and the operation fails.
    pub replace_existing: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quality_clamps_to_valid_range() {
        assert_eq!(Quality::new(0).value(), 1);
        assert_eq!(Quality::new(50).value(), 50);
        assert_eq!(Quality::new(150).value(), 100);
    }

    #[test]
    fn quality_default_is_85() {
        assert_eq!(Quality::default().value(), 85);
    }

    #[test]
    fn quality_as_u8_never_overflows() {
        assert_eq!(Quality(1000).as_u8(), 100);
        assert_eq!(Quality::new(85).as_u8(), 85);
    }

    #[test]
    fn canvas_default_is_1800_square() {
        assert_eq!(Canvas::default().as_tuple(), (1800, 1800));
    }
}
