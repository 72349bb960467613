//! Image normalization, pure Rust.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Orientation** | `kamadak-exif`, then `DynamicImage::rotate*` |
//! | **Fit + letterbox** | Lanczos3 resize onto a white canvas |
//! | **Encode** | `JpegEncoder` at the configured quality, atomic replace |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for fit and centering math (unit testable)
//! - **Parameters**: Data structures describing one normalize request
//! - **Orientation**: EXIF tag lookup and the matching rotation
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]
//! - **Operations**: High-level functions combining parameters + backend

pub mod backend;
pub mod calculations;
pub mod operations;
pub mod orientation;
mod params;
pub mod rust_backend;

pub use backend::{BackendError, Dimensions, ImageBackend, Placement};
pub use operations::{NormalizeConfig, normalize_file, plan_normalize};
pub use params::{Canvas, NormalizeParams, Quality};
pub use rust_backend::RustBackend;
