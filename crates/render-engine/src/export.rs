//! Collage jobs: decode, compose, and encode in one synchronous call.

use std::path::PathBuf;

use collage_common::config::CollageDefaults;
use collage_common::error::{CollageError, CollageResult};
use collage_model::{CollageManifest, FillPolicy, GridSpec, OutputFormat, SourceDimensions};

use crate::compositor::{compose, CompositorOptions};
use crate::decode::{decode_file, DecodeLimits};
use crate::encode::{encode, EncodeSettings, EncodedCollage};
use crate::source::SourceImage;

/// A collage job ready to be rendered.
#[derive(Debug, Clone)]
pub struct CollageJob {
    /// Source image files, in placement order.
    pub sources: Vec<PathBuf>,

    /// Target grid.
    pub grid: GridSpec,

    /// Output encoding.
    pub format: OutputFormat,

    /// Compositor settings.
    pub options: CompositorOptions,

    /// Encoder settings.
    pub encode: EncodeSettings,

    /// Decode-time pixel ceiling.
    pub limits: DecodeLimits,
}

impl CollageJob {
    /// A job with default compositor, encoder, and decode settings.
    pub fn new(sources: Vec<PathBuf>, grid: GridSpec, format: OutputFormat) -> Self {
        Self {
            sources,
            grid,
            format,
            options: CompositorOptions::default(),
            encode: EncodeSettings::default(),
            limits: DecodeLimits::default(),
        }
    }

    /// A job whose settings come from the configured collage defaults.
    pub fn from_defaults(
        sources: Vec<PathBuf>,
        grid: GridSpec,
        format: OutputFormat,
        defaults: &CollageDefaults,
    ) -> Self {
        Self {
            sources,
            grid,
            format,
            options: CompositorOptions {
                fill: defaults.fill_policy,
                filter: defaults.resample_filter,
            },
            encode: EncodeSettings {
                png_compression: defaults.png_compression,
                jpeg_quality: defaults.jpeg_quality,
            },
            limits: DecodeLimits::new(defaults.max_decoded_pixels),
        }
    }

    /// Check the request shape before touching any file.
    pub fn validate(&self) -> CollageResult<()> {
        if self.sources.is_empty() {
            return Err(CollageError::EmptyInput);
        }
        let required = self.grid.cell_count();
        if (self.sources.len() as u64) < required && self.options.fill == FillPolicy::Reject {
            return Err(CollageError::InsufficientImages {
                required,
                supplied: self.sources.len(),
            });
        }
        Ok(())
    }
}

/// Progress callback for collage rendering.
pub type ProgressCallback = Box<dyn Fn(RenderProgress) + Send>;

/// Render progress report.
#[derive(Debug, Clone, Copy)]
pub struct RenderProgress {
    /// Current stage.
    pub stage: RenderStage,

    /// Units done within the stage (images decoded, for `Decoding`).
    pub completed: usize,

    /// Units in the stage.
    pub total: usize,
}

/// Stages of a collage job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderStage {
    Decoding,
    Compositing,
    Encoding,
    Complete,
}

/// Encoded output plus a record of how it was assembled.
#[derive(Debug, Clone)]
pub struct RenderOutput {
    pub encoded: EncodedCollage,
    pub manifest: CollageManifest,
}

fn report(progress: Option<&ProgressCallback>, stage: RenderStage, completed: usize, total: usize) {
    if let Some(cb) = progress {
        cb(RenderProgress {
            stage,
            completed,
            total,
        });
    }
}

/// Render a collage job from files.
///
/// This is the main entry point for front ends that hold file paths.
pub fn render_collage(
    job: &CollageJob,
    progress: Option<&ProgressCallback>,
) -> CollageResult<RenderOutput> {
    tracing::info!(
        sources = job.sources.len(),
        grid = %job.grid,
        format = %job.format,
        "Starting collage"
    );
    job.validate()?;

    let total = job.sources.len();
    report(progress, RenderStage::Decoding, 0, total);
    let mut images = Vec::with_capacity(total);
    for (i, path) in job.sources.iter().enumerate() {
        images.push(decode_file(path, &job.limits)?);
        report(progress, RenderStage::Decoding, i + 1, total);
    }

    render_decoded(
        &images,
        job.grid,
        job.format,
        &job.options,
        &job.encode,
        progress,
    )
}

/// Compose and encode images that are already in memory.
pub fn render_decoded(
    images: &[SourceImage],
    grid: GridSpec,
    format: OutputFormat,
    options: &CompositorOptions,
    settings: &EncodeSettings,
    progress: Option<&ProgressCallback>,
) -> CollageResult<RenderOutput> {
    report(progress, RenderStage::Compositing, 0, 1);
    let collage = compose(images, grid, options)?;
    report(progress, RenderStage::Compositing, 1, 1);

    report(progress, RenderStage::Encoding, 0, 1);
    let encoded = encode(&collage.image, format, settings)?;
    report(progress, RenderStage::Encoding, 1, 1);

    let sources = images
        .iter()
        .map(SourceImage::describe)
        .collect::<Vec<SourceDimensions>>();
    let manifest = CollageManifest::new(&collage.layout, &sources, format, options.fill);

    tracing::info!(
        width = collage.width(),
        height = collage.height(),
        bytes = encoded.len(),
        file_name = %encoded.file_name(),
        "Collage complete"
    );
    report(progress, RenderStage::Complete, 1, 1);

    Ok(RenderOutput { encoded, manifest })
}
