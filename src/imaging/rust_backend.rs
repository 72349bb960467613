//! Pure Rust image processing backend.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (JPEG) | `image::ImageReader` |
//! | Orientation | `kamadak-exif` tag `0x0112`, `DynamicImage::rotate*` |
//! | Flatten | `DynamicImage::to_rgb8` |
//! | Resize | `image::imageops::resize` with `Lanczos3` filter |
//! | Letterbox | `RgbImage::from_pixel` (white) + `image::imageops::overlay` |
//! | Encode → JPEG | `image::codecs::jpeg::JpegEncoder::new_with_quality` |
//! | Atomic write | `tempfile::NamedTempFile` in the output directory, then persist |
//!
//! The output takes the source's permission bits. A temporary file starts out
//! owner-only, and normalizing in place must not narrow access to the photo.

use super::backend::{BackendError, Dimensions, ImageBackend, Placement};
use super::calculations::{calculate_fit_dimensions, center_offset};
use super::orientation::read_orientation;
use super::params::{NormalizeParams, Quality};
use image::imageops::FilterType;
use image::{DynamicImage, ExtendedColorType, ImageEncoder, ImageReader, Rgb, RgbImage};
use std::fs::Permissions;
use std::io::{BufWriter, Cursor, Write};
use std::path::Path;

const CANVAS_FILL: Rgb<u8> = Rgb([255, 255, 255]);

/// Pure Rust backend using the `image` crate ecosystem.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// Decode an image held in memory.
fn decode(bytes: &[u8], path: &Path) -> Result<DynamicImage, BackendError> {
    ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| BackendError::Decode(format!("{}: {}", path.display(), e)))?
        .decode()
        .map_err(|e| BackendError::Decode(format!("{}: {}", path.display(), e)))
}

fn write_error(output: &Path, e: impl std::fmt::Display) -> BackendError {
    BackendError::Write(format!("{}: {}", output.display(), e))
}

fn encode_jpeg<W: Write>(writer: W, img: &RgbImage, quality: Quality) -> image::ImageResult<()> {
    image::codecs::jpeg::JpegEncoder::new_with_quality(writer, quality.as_u8()).write_image(
        img.as_raw(),
        img.width(),
        img.height(),
        ExtendedColorType::Rgb8,
    )
}

/// Encode `canvas` as JPEG next to `output`, then move it into place.
///
/// The temporary file lives in the output's directory so the final step is a
/// same-filesystem rename. On any failure the temporary file is removed and
/// `output` is untouched.
fn write_jpeg(
    canvas: &RgbImage,
    output: &Path,
    quality: Quality,
    permissions: Permissions,
    replace_existing: bool,
) -> Result<(), BackendError> {
    let dir = output
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let mut tmp = tempfile::Builder::new()
        .prefix(".shotlist-")
        .suffix(".jpg.tmp")
        .tempfile_in(dir)
        .map_err(|e| write_error(output, e))?;

    {
        let mut writer = BufWriter::new(tmp.as_file_mut());
        encode_jpeg(&mut writer, canvas, quality).map_err(|e| write_error(output, e))?;
        writer.flush().map_err(|e| write_error(output, e))?;
    }
    tmp.as_file()
        .sync_all()
        .map_err(|e| write_error(output, e))?;
    tmp.as_file()
        .set_permissions(permissions)
        .map_err(|e| write_error(output, e))?;

    let persisted = if replace_existing {
        tmp.persist(output)
    } else {
        tmp.persist_noclobber(output)
    };
    match persisted {
        Ok(_) => Ok(()),
        Err(e) if e.error.kind() == std::io::ErrorKind::AlreadyExists => {
            Err(BackendError::OutputExists(output.to_path_buf()))
        }
        Err(e) => Err(write_error(output, e.error)),
    }
}

impl ImageBackend for RustBackend {
    fn normalize(&self, params: &NormalizeParams) -> Result<Placement, BackendError> {
        let unreadable =
            |e: std::io::Error| BackendError::Decode(format!("{}: {}", params.source.display(), e));
        let permissions = std::fs::metadata(&params.source)
            .map_err(unreadable)?
            .permissions();
        let bytes = std::fs::read(&params.source).map_err(unreadable)?;

        let mut img = decode(&bytes, &params.source)?;
        if params.correct_orientation {
            if let Some(orientation) = read_orientation(&bytes) {
                img = orientation.apply(img);
            }
        }

        // Every color model `image` decodes flattens to RGB8, so no
        // conversion failure is possible here.
        let rgb = img.to_rgb8();
        let source = Dimensions {
            width: rgb.width(),
            height: rgb.height(),
        };
        let canvas_size = params.canvas.as_tuple();
        let (w, h) = calculate_fit_dimensions(source.as_tuple(), canvas_size);

        let resized = if (w, h) == source.as_tuple() {
            rgb
        } else {
            image::imageops::resize(&rgb, w, h, FilterType::Lanczos3)
        };

        let offset = center_offset(canvas_size, (w, h));
        let mut canvas = RgbImage::from_pixel(params.canvas.width, params.canvas.height, CANVAS_FILL);
        image::imageops::overlay(&mut canvas, &resized, offset.0 as i64, offset.1 as i64);

        write_jpeg(
            &canvas,
            &params.output,
            params.quality,
            permissions,
            params.replace_existing,
        )?;

        Ok(Placement {
            source,
            content: Dimensions {
                width: w,
                height: h,
            },
            offset,
            canvas: params.canvas,
        })
    }
}
