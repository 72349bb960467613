//! High-level image operations.
//!
//! These functions combine calculations with backend execution.
//! They take configuration, compute parameters, and call the backend.

use super::backend::{BackendError, ImageBackend, Placement};
use super::params::{Canvas, NormalizeParams, Quality};
use std::path::Path;

/// Result type for image operations.
pub type Result<T> = std::result::Result<T, BackendError>;

/// Settings shared by every photo normalized in one batch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizeConfig {
    pub canvas: Canvas,
    pub quality: Quality,
    pub correct_orientation: bool,
}

impl Default for NormalizeConfig {
    fn default() -> Self {
        Self {
            canvas: Canvas::default(),
            quality: Quality::default(),
            correct_orientation: true,
        }
    }
}

/// Build the backend request for one photo.
///
/// Pure; exposed so tests can check what would be asked of the backend.
pub fn plan_normalize(
    source: &Path,
    output: &Path,
    config: &NormalizeConfig,
    replace_existing: bool,
) -> NormalizeParams {
    NormalizeParams {
        source: source.to_path_buf(),
        output: output.to_path_buf(),
        canvas: config.canvas,
        quality: config.quality,
        correct_orientation: config.correct_orientation,
        replace_existing,
    }
}

/// Normalize `source` into `output`.
///
/// `output` may equal `source` when `replace_existing` is set; the backend
/// writes through a temporary file so the original survives a failed encode.
pub fn normalize_file(
    backend: &impl ImageBackend,
    source: &Path,
    output: &Path,
    config: &NormalizeConfig,
    replace_existing: bool,
) -> Result<Placement> {
    let params = plan_normalize(source, output, config, replace_existing);
    let placement = backend.normalize(&params)?;
    tracing::debug!(
        source = %source.display(),
        output = %output.display(),
        from = ?placement.source.as_tuple(),
        content = ?placement.content.as_tuple(),
        offset = ?placement.offset,
        "normalized"
    );
    Ok(placement)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::Dimensions;
    use crate::imaging::backend::tests::{MockBackend, MockFailure, RecordedOp};

    #[test]
    fn plan_normalize_carries_config() {
        let config = NormalizeConfig {
            canvas: Canvas::new(1200, 900),
            quality: Quality::new(70),
            correct_orientation: false,
        };
        let params = plan_normalize(
            Path::new("/unit/1.jpg"),
            Path::new("/unit/out.jpg"),
            &config,
            true,
        );

        assert_eq!(params.canvas.as_tuple(), (1200, 900));
        assert_eq!(params.quality.value(), 70);
        assert!(!params.correct_orientation);
        assert!(params.replace_existing);
        assert_eq!(params.output, Path::new("/unit/out.jpg"));
    }

    #[test]
    fn normalize_file_uses_backend() {
        let tmp = tempfile::TempDir::new().unwrap();
        let source = tmp.path().join("1.jpg");
        let output = tmp.path().join("renamed.jpg");
        std::fs::write(&source, b"jpeg").unwrap();

        let backend = MockBackend::with_dimensions(Dimensions {
            width: 4000,
            height: 3000,
        });
        let placement =
            normalize_file(&backend, &source, &output, &NormalizeConfig::default(), false)
                .unwrap();

        assert_eq!(placement.content.as_tuple(), (1800, 1350));
        assert_eq!(placement.offset, (0, 225));

        let ops = backend.get_operations();
        assert_eq!(ops.len(), 1);
        assert!(matches!(
            &ops[0],
            RecordedOp::Normalize {
                width: 1800,
                height: 1800,
                quality: 85,
                correct_orientation: true,
                replace_existing: false,
                ..
            }
        ));
    }

    #[test]
    fn normalize_file_propagates_backend_errors() {
        let source = Path::new("/unit/bad.jpg");
        let backend = MockBackend::failing_on(source, MockFailure::Conversion);

        let result = normalize_file(
            &backend,
            source,
            Path::new("/unit/out.jpg"),
            &NormalizeConfig::default(),
            false,
        );
        assert!(matches!(result, Err(BackendError::Conversion(_))));
    }
}
