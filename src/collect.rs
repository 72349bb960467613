//! Candidate photo collection within a unit directory.
//!
//! Lists the JPEG files directly inside a directory (no recursion) and puts
//! them in the order that decides which shot type each photo is assigned.
//! Hidden files are skipped; extensions match case-insensitively.

use crate::naming::{is_hidden_name, is_jpeg_name, natural_cmp};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// How collected filenames are ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OrderMode {
    /// Plain codepoint ordering: `1.jpg, 10.jpg, 2.jpg`.
    Lexicographic,
    /// Digit runs compare as integers: `1.jpg, 2.jpg, 10.jpg`.
    #[default]
    Natural,
}

impl std::fmt::Display for OrderMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderMode::Lexicographic => f.write_str("lexicographic"),
            OrderMode::Natural => f.write_str("natural"),
        }
    }
}

/// Sort filenames in place according to `order`.
pub fn sort_names(names: &mut [String], order: OrderMode) {
    match order {
        OrderMode::Lexicographic => names.sort(),
        OrderMode::Natural => names.sort_by(|a, b| natural_cmp(a, b)),
    }
}

/// Collect the JPEG filenames in `dir`, ordered by `order`.
///
/// Only regular files are returned. Names that are not valid UTF-8 are
/// skipped since they cannot be paired with a rule label anyway.
pub fn collect_images(dir: &Path, order: OrderMode) -> std::io::Result<Vec<String>> {
    let mut names: Vec<String> = fs::read_dir(dir)?
        .filter_map(|e| e.ok())
        .filter(|e| e.path().is_file())
        .filter_map(|e| e.file_name().into_string().ok())
        .filter(|name| !is_hidden_name(name) && is_jpeg_name(name))
        .collect();

    sort_names(&mut names, order);

    tracing::debug!(
        dir = %dir.display(),
        count = names.len(),
        %order,
        "collected photos: {:?}",
        names
    );
    Ok(names)
}
