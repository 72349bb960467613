//! EXIF orientation handling.
//!
//! Phones store photos in sensor orientation and record how to display them
//! in EXIF tag `0x0112`. Only the three pure rotations are acted on; mirrored
//! variants and unknown values leave the pixels as stored.
//!
//! | Tag | Stored as | Correction |
//! |---|---|---|
//! | 3 | upside down | rotate 180° |
//! | 6 | rotated 90° counter-clockwise | rotate 90° clockwise |
//! | 8 | rotated 90° clockwise | rotate 90° counter-clockwise |

use image::DynamicImage;
use std::io::Cursor;

/// A rotation needed to display a photo upright.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Rotate180,
    Rotate90Cw,
    Rotate90Ccw,
}

impl Orientation {
    /// Map an EXIF orientation value to the correction it needs.
    pub fn from_exif(value: u32) -> Option<Self> {
        match value {
            3 => Some(Orientation::Rotate180),
            6 => Some(Orientation::Rotate90Cw),
            8 => Some(Orientation::Rotate90Ccw),
            _ => None,
        }
    }

    pub fn apply(self, img: DynamicImage) -> DynamicImage {
        match self {
            Orientation::Rotate180 => img.rotate180(),
            Orientation::Rotate90Cw => img.rotate90(),
            Orientation::Rotate90Ccw => img.rotate270(),
        }
    }
}

/// Read the orientation correction from an encoded image.
///
/// Missing or unreadable EXIF data means no correction.
pub fn read_orientation(bytes: &[u8]) -> Option<Orientation> {
    let exif = exif::Reader::new()
        .read_from_container(&mut Cursor::new(bytes))
        .ok()?;
    exif.get_field(exif::Tag::Orientation, exif::In::PRIMARY)
        .and_then(|field| field.value.get_uint(0))
        .and_then(Orientation::from_exif)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{test_jpeg_bytes, with_exif_orientation};
    use image::RgbImage;

    #[test]
    fn from_exif_maps_rotations_only() {
        assert_eq!(Orientation::from_exif(1), None);
        assert_eq!(Orientation::from_exif(2), None);
        assert_eq!(Orientation::from_exif(3), Some(Orientation::Rotate180));
        assert_eq!(Orientation::from_exif(6), Some(Orientation::Rotate90Cw));
        assert_eq!(Orientation::from_exif(8), Some(Orientation::Rotate90Ccw));
        assert_eq!(Orientation::from_exif(42), None);
    }

    #[test]
    fn quarter_turns_swap_dimensions() {
        let img = DynamicImage::ImageRgb8(RgbImage::new(40, 30));
        let turned = Orientation::Rotate90Cw.apply(img.clone());
        assert_eq!((turned.width(), turned.height()), (30, 40));
        let turned = Orientation::Rotate90Ccw.apply(img.clone());
        assert_eq!((turned.width(), turned.height()), (30, 40));
        let flipped = Orientation::Rotate180.apply(img);
        assert_eq!((flipped.width(), flipped.height()), (40, 30));
    }

    #[test]
    fn clockwise_turn_moves_top_left_to_top_right() {
        let mut rgb = RgbImage::new(4, 2);
        rgb.put_pixel(0, 0, image::Rgb([255, 0, 0]));
        let turned = Orientation::Rotate90Cw
            .apply(DynamicImage::ImageRgb8(rgb))
            .to_rgb8();
        // 4x2 becomes 2x4; the old top-left lands at the new top-right.
        assert_eq!(turned.get_pixel(1, 0), &image::Rgb([255, 0, 0]));
    }

    #[test]
    fn garbage_bytes_have_no_orientation() {
        assert_eq!(read_orientation(b"not an image"), None);
        assert_eq!(read_orientation(&[]), None);
    }

    #[test]
    fn jpeg_without_exif_has_no_orientation() {
        assert_eq!(read_orientation(&test_jpeg_bytes(8, 8)), None);
    }

    #[test]
    fn reads_orientation_tag_from_jpeg() {
        let jpeg = test_jpeg_bytes(8, 8);
        assert_eq!(
            read_orientation(&with_exif_orientation(&jpeg, 6)),
            Some(Orientation::Rotate90Cw)
        );
        assert_eq!(
            read_orientation(&with_exif_orientation(&jpeg, 8)),
            Some(Orientation::Rotate90Ccw)
        );
        assert_eq!(
            read_orientation(&with_exif_orientation(&jpeg, 3)),
            Some(Orientation::Rotate180)
        );
        // Upright and mirrored tags need no rotation.
        assert_eq!(read_orientation(&with_exif_orientation(&jpeg, 1)), None);
        assert_eq!(read_orientation(&with_exif_orientation(&jpeg, 5)), None);
    }
}
