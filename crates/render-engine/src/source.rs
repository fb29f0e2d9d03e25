//! Decoded source images.

use collage_model::SourceDimensions;
use image::{DynamicImage, GenericImageView};

/// A decoded raster plus a label naming where it came from.
///
/// Borrowed by the compositor for one call; nothing keeps a reference to it
/// afterwards.
#[derive(Debug, Clone)]
pub struct SourceImage {
    pub label: String,
    pub image: DynamicImage,
}

impl SourceImage {
    pub fn new(label: impl Into<String>, image: DynamicImage) -> Self {
        Self {
            label: label.into(),
            image,
        }
    }

    /// `(width, height)` in pixels.
    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    pub fn describe(&self) -> SourceDimensions {
        let (width, height) = self.dimensions();
        SourceDimensions::new(self.label.clone(), width, height)
    }
}
