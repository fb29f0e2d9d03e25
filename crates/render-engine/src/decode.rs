//! Image decoding with an explicit pixel ceiling.
//!
//! Dimensions are read from the header first so oversized inputs are
//! rejected before any pixel buffer is allocated.

use std::io::Cursor;
use std::path::{Path, PathBuf};

use collage_common::config::DEFAULT_MAX_DECODED_PIXELS;
use collage_common::error::{CollageError, CollageResult};
use collage_model::SourceDimensions;
use image::{ImageReader, Limits};

use crate::source::SourceImage;

/// Worst-case decoded bytes per pixel (RGBA, 32-bit float channels).
const MAX_BYTES_PER_PIXEL: u64 = 16;

/// Upper bound on decoded image size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeLimits {
    /// Largest accepted `width * height`.
    pub max_pixels: u64,
}

impl Default for DecodeLimits {
    fn default() -> Self {
        Self {
            max_pixels: DEFAULT_MAX_DECODED_PIXELS,
        }
    }
}

impl DecodeLimits {
    pub fn new(max_pixels: u64) -> Self {
        Self { max_pixels }
    }

    /// Fail if an image of the given size would exceed the ceiling.
    pub fn check(&self, label: &str, width: u32, height: u32) -> CollageResult<()> {
        let pixels = u64::from(width) * u64::from(height);
        if pixels > self.max_pixels {
            return Err(CollageError::PixelLimitExceeded {
                source_name: label.to_string(),
                pixels,
                limit: self.max_pixels,
            });
        }
        Ok(())
    }

    /// Allocation limits handed to the decoder itself.
    fn image_limits(&self) -> Limits {
        let mut limits = Limits::no_limits();
        limits.max_alloc = Some(self.max_pixels.saturating_mul(MAX_BYTES_PER_PIXEL));
        limits
    }
}

fn reader_for<'a>(label: &str, bytes: &'a [u8]) -> CollageResult<ImageReader<Cursor<&'a [u8]>>> {
    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| CollageError::decode(label, e.to_string()))?;
    if reader.format().is_none() {
        return Err(CollageError::decode(label, "unrecognized image format"));
    }
    Ok(reader)
}

/// Read `(width, height)` from the image header without decoding pixels.
pub fn probe_dimensions(label: &str, bytes: &[u8]) -> CollageResult<(u32, u32)> {
    reader_for(label, bytes)?
        .into_dimensions()
        .map_err(|e| CollageError::decode(label, e.to_string()))
}

/// Decode an in-memory image, enforcing the pixel ceiling.
pub fn decode_bytes(label: &str, bytes: &[u8], limits: &DecodeLimits) -> CollageResult<SourceImage> {
    let (width, height) = probe_dimensions(label, bytes)?;
    limits.check(label, width, height)?;

    let mut reader = reader_for(label, bytes)?;
    let format = reader.format();
    reader.limits(limits.image_limits());
    let image = reader
        .decode()
        .map_err(|e| CollageError::decode(label, e.to_string()))?;

    tracing::debug!(source = label, width, height, format = ?format, "Decoded image");
    Ok(SourceImage::new(label, image))
}

/// Decode an image file.
pub fn decode_file(path: &Path, limits: &DecodeLimits) -> CollageResult<SourceImage> {
    if !path.exists() {
        return Err(CollageError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    let bytes = std::fs::read(path)?;
    decode_bytes(&path.display().to_string(), &bytes, limits)
}

/// Decode every file in order, stopping at the first failure.
pub fn decode_all(paths: &[PathBuf], limits: &DecodeLimits) -> CollageResult<Vec<SourceImage>> {
    paths.iter().map(|path| decode_file(path, limits)).collect()
}

/// Read an image file's dimensions from its header.
pub fn probe_file(path: &Path) -> CollageResult<SourceDimensions> {
    let label = path.display().to_string();
    if !path.exists() {
        return Err(CollageError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    let (width, height) = ImageReader::open(path)?
        .with_guessed_format()?
        .into_dimensions()
        .map_err(|e| CollageError::decode(&label, e.to_string()))?;
    Ok(SourceDimensions::new(label, width, height))
}
