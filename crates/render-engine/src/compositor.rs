//! Grid compositor: resizes sources to a uniform cell and pastes them
//! row-major onto a single RGB canvas.

use collage_common::error::{CollageError, CollageResult};
use collage_model::{CellRect, CellSize, FillPolicy, GridSpec, Layout, ResampleFilter};
use image::imageops::{self, FilterType};
use image::{GenericImageView, RgbImage};

use crate::source::SourceImage;

const RGB_BYTES_PER_PIXEL: u64 = 3;

/// Knobs for a single compose call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompositorOptions {
    /// Behavior when fewer images than cells are supplied.
    pub fill: FillPolicy,

    /// Resampling filter for the resize step.
    pub filter: ResampleFilter,
}

/// A composed canvas together with the layout that produced it.
#[derive(Debug, Clone)]
pub struct Collage {
    pub image: RgbImage,
    pub layout: Layout,

    /// Number of source images actually placed.
    pub placed: usize,
}

impl Collage {
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Copy of the pixels in the cell for image `index`.
    pub fn cell_pixels(&self, index: usize) -> Option<RgbImage> {
        let CellRect {
            x,
            y,
            width,
            height,
        } = self.layout.cell_rect(index)?;
        Some(self.image.view(x, y, width, height).to_image())
    }
}

/// Map a model filter onto the `image` crate's resampler.
pub fn filter_type(filter: ResampleFilter) -> FilterType {
    match filter {
        ResampleFilter::Nearest => FilterType::Nearest,
        ResampleFilter::Triangle => FilterType::Triangle,
        ResampleFilter::CatmullRom => FilterType::CatmullRom,
        ResampleFilter::Gaussian => FilterType::Gaussian,
        ResampleFilter::Lanczos3 => FilterType::Lanczos3,
    }
}

/// Compose `images` into a `grid` collage.
///
/// The cell size is the maximum width and maximum height over all inputs.
/// The first `min(rows * cols, images.len())` images are flattened to RGB,
/// stretched to exactly the cell size, and pasted in row-major order.
/// Inputs past the last cell are ignored. With [`FillPolicy::Reject`] an
/// undersupplied grid fails before any resizing; with
/// [`FillPolicy::BlankFill`] the trailing cells stay black.
pub fn compose(
    images: &[SourceImage],
    grid: GridSpec,
    options: &CompositorOptions,
) -> CollageResult<Collage> {
    if images.is_empty() {
        return Err(CollageError::EmptyInput);
    }

    let required = grid.cell_count();
    if (images.len() as u64) < required && options.fill == FillPolicy::Reject {
        return Err(CollageError::InsufficientImages {
            required,
            supplied: images.len(),
        });
    }

    let layout = Layout::fit(grid, images.iter().map(SourceImage::dimensions))?;
    let canvas_bytes = layout.canvas_bytes(RGB_BYTES_PER_PIXEL);
    if usize::try_from(canvas_bytes).map_or(true, |b| b > isize::MAX as usize) {
        return Err(CollageError::layout(format!(
            "canvas {}x{} needs {canvas_bytes} bytes, more than this platform can allocate",
            layout.canvas_width(),
            layout.canvas_height()
        )));
    }

    let placed = grid.placed_count(images.len());
    tracing::debug!(
        images = images.len(),
        placed,
        grid = %grid,
        cell_width = layout.cell.width,
        cell_height = layout.cell.height,
        "Composing collage"
    );
    if images.len() > placed {
        tracing::debug!(ignored = images.len() - placed, "Ignoring images past the last cell");
    }

    let filter = filter_type(options.filter);
    let cells = images[..placed]
        .iter()
        .map(|src| resize_to_cell(src, layout.cell, filter))
        .collect::<Vec<_>>();

    let mut canvas = RgbImage::new(layout.canvas_width(), layout.canvas_height());
    for (placement, cell) in layout.placements(images.len()).zip(&cells) {
        let (x, y) = layout.offset(&placement);
        imageops::replace(&mut canvas, cell, i64::from(x), i64::from(y));
    }

    tracing::info!(
        width = canvas.width(),
        height = canvas.height(),
        placed,
        blank_cells = grid.blank_cells(images.len()),
        "Collage composed"
    );

    Ok(Collage {
        image: canvas,
        layout,
        placed,
    })
}

/// Flatten to RGB and stretch to exactly the cell size. Produces a new
/// buffer; the source is left untouched.
fn resize_to_cell(source: &SourceImage, cell: CellSize, filter: FilterType) -> RgbImage {
    let rgb = source.image.to_rgb8();
    if rgb.dimensions() == (cell.width, cell.height) {
        return rgb;
    }
    imageops::resize(&rgb, cell.width, cell.height, filter)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, Rgb, Rgba, RgbaImage};

    fn solid(label: &str, width: u32, height: u32, color: [u8; 3]) -> SourceImage {
        SourceImage::new(
            label,
            DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb(color))),
        )
    }

    fn grid(rows: u32, cols: u32) -> GridSpec {
        GridSpec::new(rows, cols).unwrap()
    }

    #[test]
    fn test_empty_input_is_rejected() {
        let err = compose(&[], grid(1, 1), &CompositorOptions::default()).unwrap_err();
        assert!(matches!(err, CollageError::EmptyInput));
    }

    #[test]
    fn test_reject_policy_reports_counts() {
        let images = vec![solid("a", 4, 4, [255, 0, 0]); 3];
        let err = compose(&images, grid(2, 2), &CompositorOptions::default()).unwrap_err();
        assert!(matches!(
            err,
            CollageError::InsufficientImages {
                required: 4,
                supplied: 3
            }
        ));
    }

    #[test]
    fn test_single_cell_keeps_pixels() {
        let images = vec![solid("a", 5, 3, [1, 2, 3])];
        let collage = compose(&images, grid(1, 1), &CompositorOptions::default()).unwrap();
        assert_eq!(collage.image.dimensions(), (5, 3));
        assert!(collage.image.pixels().all(|p| *p == Rgb([1, 2, 3])));
    }

    #[test]
    fn test_nearest_filter_places_exact_colors() {
        let images = vec![
            solid("r", 2, 2, [255, 0, 0]),
            solid("g", 4, 2, [0, 255, 0]),
            solid("b", 2, 4, [0, 0, 255]),
        ];
        let options = CompositorOptions {
            fill: FillPolicy::Reject,
            filter: ResampleFilter::Nearest,
        };
        let collage = compose(&images, grid(1, 3), &options).unwrap();

        assert_eq!(collage.layout.cell, CellSize { width: 4, height: 4 });
        assert_eq!(collage.image.dimensions(), (12, 4));
        for (i, color) in [[255, 0, 0], [0, 255, 0], [0, 0, 255]].iter().enumerate() {
            let cell = collage.cell_pixels(i).unwrap();
            assert_eq!(cell.dimensions(), (4, 4));
            assert!(cell.pixels().all(|p| *p == Rgb(*color)), "cell {i}");
        }
    }

    #[test]
    fn test_alpha_is_dropped_not_blended() {
        let translucent = RgbaImage::from_pixel(3, 3, Rgba([200, 100, 50, 0]));
        let images = vec![SourceImage::new(
            "alpha",
            DynamicImage::ImageRgba8(translucent),
        )];
        let collage = compose(&images, grid(1, 1), &CompositorOptions::default()).unwrap();
        assert!(collage.image.pixels().all(|p| *p == Rgb([200, 100, 50])));
    }

    #[test]
    fn test_inputs_are_not_mutated() {
        let images = vec![solid("small", 2, 2, [9, 9, 9]), solid("big", 8, 8, [1, 1, 1])];
        let _ = compose(&images, grid(1, 2), &CompositorOptions::default()).unwrap();
        assert_eq!(images[0].dimensions(), (2, 2));
        assert_eq!(images[1].dimensions(), (8, 8));
    }

    #[test]
    fn test_cell_size_counts_ignored_images() {
        // The fifth image is never placed but still widens every cell
        let mut images = vec![solid("a", 10, 10, [50, 50, 50]); 4];
        images.push(solid("wide", 30, 10, [0, 0, 0]));
        let collage = compose(&images, grid(2, 2), &CompositorOptions::default()).unwrap();
        assert_eq!(collage.placed, 4);
        assert_eq!(collage.layout.cell, CellSize { width: 30, height: 10 });
        assert_eq!(collage.image.dimensions(), (60, 20));
    }

    #[test]
    fn test_filter_mapping() {
        assert_eq!(filter_type(ResampleFilter::Lanczos3), FilterType::Lanczos3);
        assert_eq!(filter_type(ResampleFilter::Nearest), FilterType::Nearest);
    }
}
