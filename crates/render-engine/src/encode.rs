//! Canvas encoders.

use std::path::Path;

use collage_common::error::{CollageError, CollageResult};
use collage_model::{OutputFormat, PngCompression};
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::{CompressionType, FilterType as PngFilterType, PngEncoder};
use image::{ExtendedColorType, ImageEncoder, RgbImage};

/// Encoder settings shared by all formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodeSettings {
    pub png_compression: PngCompression,

    /// JPEG quality, clamped to 1-100.
    pub jpeg_quality: u8,
}

impl Default for EncodeSettings {
    fn default() -> Self {
        Self {
            png_compression: PngCompression::Default,
            jpeg_quality: 100,
        }
    }
}

/// Trait for per-format canvas encoders.
pub trait CollageEncoder {
    /// Format this encoder produces.
    fn format(&self) -> OutputFormat;

    /// Serialize the canvas.
    fn encode(&self, canvas: &RgbImage) -> CollageResult<Vec<u8>>;
}

/// zlib level used for [`PngCompression::Default`].
pub const DEFAULT_PNG_LEVEL: u8 = 7;

/// Lossless PNG with adaptive row filtering.
pub struct PngCollageEncoder {
    compression: PngCompression,
}

impl PngCollageEncoder {
    pub fn new(compression: PngCompression) -> Self {
        Self { compression }
    }
}

impl CollageEncoder for PngCollageEncoder {
    fn format(&self) -> OutputFormat {
        OutputFormat::Png
    }

    fn encode(&self, canvas: &RgbImage) -> CollageResult<Vec<u8>> {
        let compression = match self.compression {
            PngCompression::Fast => CompressionType::Fast,
            PngCompression::Default => CompressionType::Level(DEFAULT_PNG_LEVEL),
            PngCompression::Best => CompressionType::Best,
        };

        let mut buf = Vec::new();
        PngEncoder::new_with_quality(&mut buf, compression, PngFilterType::Adaptive)
            .write_image(
                canvas.as_raw(),
                canvas.width(),
                canvas.height(),
                ExtendedColorType::Rgb8,
            )
            .map_err(|e| CollageError::encode(self.format().to_string(), e.to_string()))?;
        Ok(buf)
    }
}

/// Baseline JPEG at a fixed quality.
pub struct JpegCollageEncoder {
    quality: u8,
}

impl JpegCollageEncoder {
    pub fn new(quality: u8) -> Self {
        Self {
            quality: quality.clamp(1, 100),
        }
    }
}

impl CollageEncoder for JpegCollageEncoder {
    fn format(&self) -> OutputFormat {
        OutputFormat::Jpeg
    }

    fn encode(&self, canvas: &RgbImage) -> CollageResult<Vec<u8>> {
        let mut buf = Vec::new();
        JpegEncoder::new_with_quality(&mut buf, self.quality)
            .write_image(
                canvas.as_raw(),
                canvas.width(),
                canvas.height(),
                ExtendedColorType::Rgb8,
            )
            .map_err(|e| CollageError::encode(self.format().to_string(), e.to_string()))?;
        Ok(buf)
    }
}

/// Pick the encoder for a format.
pub fn encoder_for(format: OutputFormat, settings: &EncodeSettings) -> Box<dyn CollageEncoder> {
    match format {
        OutputFormat::Png => Box::new(PngCollageEncoder::new(settings.png_compression)),
        OutputFormat::Jpeg => Box::new(JpegCollageEncoder::new(settings.jpeg_quality)),
    }
}

/// An encoded collage ready for delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedCollage {
    pub bytes: Vec<u8>,
    pub format: OutputFormat,
}

impl EncodedCollage {
    /// Suggested download filename.
    pub fn file_name(&self) -> String {
        self.format.file_name()
    }

    pub fn mime_type(&self) -> &'static str {
        self.format.mime_type()
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Write the bytes to `path`, creating parent directories.
    pub fn write_to(&self, path: &Path) -> CollageResult<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, &self.bytes)?;
        tracing::info!(path = %path.display(), bytes = self.bytes.len(), "Wrote collage");
        Ok(())
    }

}

/// Encode a canvas in the requested format.
pub fn encode(
    canvas: &RgbImage,
    format: OutputFormat,
    settings: &EncodeSettings,
) -> CollageResult<EncodedCollage> {
    let bytes = encoder_for(format, settings).encode(canvas)?;
    tracing::debug!(
        format = %format,
        width = canvas.width(),
        height = canvas.height(),
        bytes = bytes.len(),
        "Encoded collage"
    );
    Ok(EncodedCollage { bytes, format })
}
