//! Error types for the collage data model.

use std::path::PathBuf;

/// Geometry errors raised while building a layout.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LayoutError {
    #[error("Invalid grid {rows}x{cols}: rows and columns must be at least 1")]
    InvalidGrid { rows: u32, cols: u32 },

    #[error("Cannot size cells without any images")]
    EmptyInput,

    #[error("Cell size has a zero dimension")]
    ZeroSizedCell,

    #[error("Canvas of {width}x{height} pixels exceeds the maximum raster dimension")]
    CanvasTooLarge { width: u64, height: u64 },
}

/// Failure to parse a named option from user input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown {kind}: {value}. Use: {expected}")]
pub struct ParseOptionError {
    pub kind: &'static str,
    pub value: String,
    pub expected: &'static str,
}

/// Errors reading or writing a collage manifest.
#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    #[error("IO error at {path}: {source}")]
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Parse error at {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: serde_json::Error,
    },
}
