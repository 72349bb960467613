//! Shared test utilities for the shotlist test suite.
//!
//! Provides fixture builders for unit directories and synthetic JPEGs, plus
//! lookup helpers over scan results.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = TempDir::new().unwrap();
//! make_unit(tmp.path(), "2025_1_1_A_9999999_X", 29);
//! let result = scan_units(tmp.path(), PatternMode::Dated, OrderMode::Natural).unwrap();
//!
//! let unit = find_unit(&result, "2025_1_1_A_9999999_X");
//! assert_eq!(unit.files.len(), 29);
//! ```

use image::{ExtendedColorType, ImageEncoder, RgbImage};
use std::fs;
use std::path::{Path, PathBuf};

use crate::scan::ScanResult;
use crate::types::UnitDirectory;

// =========================================================================
// Fixture setup
// =========================================================================

/// Create `root/name` holding `1.jpg`..`count.jpg`.
///
/// The files hold their own name as bytes, not image data. Use
/// [`make_jpeg_unit`] when the photos must decode.
pub fn make_unit(root: &Path, name: &str, count: usize) -> PathBuf {
    let dir = root.join(name);
    fs::create_dir_all(&dir).unwrap();
    for i in 1..=count {
        let file = format!("{}.jpg", i);
        fs::write(dir.join(&file), file.as_bytes()).unwrap();
    }
    dir
}

/// Create `root/name` holding `count` decodable JPEGs of `width`x`height`.
pub fn make_jpeg_unit(root: &Path, name: &str, count: usize, width: u32, height: u32) -> PathBuf {
    let dir = root.join(name);
    fs::create_dir_all(&dir).unwrap();
    for i in 1..=count {
        create_test_jpeg(&dir.join(format!("{}.jpg", i)), width, height);
    }
    dir
}

/// Encode a small gradient JPEG. No pixel of it is white.
pub fn test_jpeg_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x % 200) as u8, (y % 200) as u8, 128])
    });
    let mut buf = Vec::new();
    image::codecs::jpeg::JpegEncoder::new_with_quality(&mut buf, 90)
        .write_image(img.as_raw(), width, height, ExtendedColorType::Rgb8)
        .unwrap();
    buf
}

/// Write a small gradient JPEG. No pixel of it is white.
pub fn create_test_jpeg(path: &Path, width: u32, height: u32) {
    fs::write(path, test_jpeg_bytes(width, height)).unwrap();
}

/// Insert an EXIF APP1 segment carrying only tag `0x0112` right after SOI.
///
/// The TIFF block is big-endian with a single IFD0 entry (SHORT, count 1).
pub fn with_exif_orientation(jpeg: &[u8], orientation: u16) -> Vec<u8> {
    assert_eq!(&jpeg[..2], &[0xFF, 0xD8], "not a JPEG");

    let mut tiff = Vec::new();
    tiff.extend_from_slice(b"MM\0\x2A");
    tiff.extend_from_slice(&8u32.to_be_bytes()); // IFD0 offset
    tiff.extend_from_slice(&1u16.to_be_bytes()); // entry count
    tiff.extend_from_slice(&0x0112u16.to_be_bytes());
    tiff.extend_from_slice(&3u16.to_be_bytes()); // SHORT
    tiff.extend_from_slice(&1u32.to_be_bytes());
    tiff.extend_from_slice(&orientation.to_be_bytes());
    tiff.extend_from_slice(&[0, 0]);
    tiff.extend_from_slice(&0u32.to_be_bytes()); // no IFD1

    let mut payload = b"Exif\0\0".to_vec();
    payload.extend_from_slice(&tiff);

    let mut out = vec![0xFF, 0xD8, 0xFF, 0xE1];
    out.extend_from_slice(&((payload.len() + 2) as u16).to_be_bytes());
    out.extend_from_slice(&payload);
    out.extend_from_slice(&jpeg[2..]);
    out
}

/// Write a gradient JPEG of `width`x`height` as stored, tagged with `orientation`.
pub fn create_oriented_jpeg(path: &Path, width: u32, height: u32, orientation: u16) {
    let bytes = with_exif_orientation(&test_jpeg_bytes(width, height), orientation);
    fs::write(path, bytes).unwrap();
}

// =========================================================================
// Lookup helpers
// =========================================================================

/// Find a unit by directory name. Panics if not found.
pub fn find_unit<'a>(result: &'a ScanResult, name: &str) -> &'a UnitDirectory {
    result
        .units
        .iter()
        .find(|u| u.name == name)
        .unwrap_or_else(|| {
            let names: Vec<&str> = result.units.iter().map(|u| u.name.as_str()).collect();
            panic!("unit '{}' not found. Available: {:?}", name, names)
        })
}

/// Directory names of all scanned units, in scan order.
pub fn unit_names(result: &ScanResult) -> Vec<&str> {
    result.units.iter().map(|u| u.name.as_str()).collect()
}
