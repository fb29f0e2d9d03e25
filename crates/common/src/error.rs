//! Error types shared across collage crates.

use std::path::PathBuf;

use collage_model::LayoutError;

/// Top-level error type for collage operations.
#[derive(Debug, thiserror::Error)]
pub enum CollageError {
    #[error("Invalid grid {rows}x{cols}: rows and columns must be at least 1")]
    InvalidGridSpec { rows: u32, cols: u32 },

    #[error("Insufficient images: a grid with {required} cells needs {required} images, got {supplied}")]
    InsufficientImages { required: u64, supplied: usize },

    #[error("No images supplied")]
    EmptyInput,

    #[error("Failed to decode {source_name}: {message}")]
    Decode {
        source_name: String,
        message: String,
    },

    #[error("{source_name} has {pixels} pixels, above the limit of {limit}")]
    PixelLimitExceeded {
        source_name: String,
        pixels: u64,
        limit: u64,
    },

    #[error("Layout error: {message}")]
    Layout { message: String },

    #[error("Failed to encode {format}: {message}")]
    Encode { format: String, message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias using CollageError.
pub type CollageResult<T> = Result<T, CollageError>;

impl From<LayoutError> for CollageError {
    fn from(err: LayoutError) -> Self {
        match err {
            LayoutError::InvalidGrid { rows, cols } => Self::InvalidGridSpec { rows, cols },
            LayoutError::EmptyInput => Self::EmptyInput,
            other => Self::layout(other.to_string()),
        }
    }
}

impl CollageError {
    pub fn decode(source_name: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Decode {
            source_name: source_name.into(),
            message: msg.into(),
        }
    }

    pub fn layout(msg: impl Into<String>) -> Self {
        Self::Layout {
            message: msg.into(),
        }
    }

    pub fn encode(format: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Encode {
            format: format.into(),
            message: msg.into(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Whether the error was caused by the request itself (bad grid, too few
    /// images, unreadable input) rather than by the environment.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidGridSpec { .. }
                | Self::InsufficientImages { .. }
                | Self::EmptyInput
                | Self::Decode { .. }
                | Self::PixelLimitExceeded { .. }
                | Self::FileNotFound { .. }
        )
    }
}
