//! Grid geometry: grid shape, cell sizing, and row-major placement.
//!
//! A collage is a `rows x cols` grid of uniform cells. The cell size is the
//! maximum width and maximum height over all inputs, and image `i` lands in
//! cell `(i / cols, i % cols)`.

use serde::{Deserialize, Serialize};

use crate::error::LayoutError;

/// Target grid layout. Both dimensions are at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawGrid", into = "RawGrid")]
pub struct GridSpec {
    rows: u32,
    cols: u32,
}

#[derive(Serialize, Deserialize)]
struct RawGrid {
    rows: u32,
    cols: u32,
}

impl TryFrom<RawGrid> for GridSpec {
    type Error = LayoutError;

    fn try_from(raw: RawGrid) -> Result<Self, Self::Error> {
        GridSpec::new(raw.rows, raw.cols)
    }
}

impl From<GridSpec> for RawGrid {
    fn from(grid: GridSpec) -> Self {
        RawGrid {
            rows: grid.rows,
            cols: grid.cols,
        }
    }
}

impl GridSpec {
    /// Create a grid, rejecting zero rows or columns.
    pub fn new(rows: u32, cols: u32) -> Result<Self, LayoutError> {
        if rows == 0 || cols == 0 {
            return Err(LayoutError::InvalidGrid { rows, cols });
        }
        Ok(Self { rows, cols })
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    pub fn cols(&self) -> u32 {
        self.cols
    }

    /// Total number of cells (`rows * cols`).
    pub fn cell_count(&self) -> u64 {
        u64::from(self.rows) * u64::from(self.cols)
    }

    /// Grid coordinates for a linear image index, or `None` when the index
    /// falls past the last cell.
    pub fn placement(&self, index: usize) -> Option<Placement> {
        let idx = index as u64;
        if idx >= self.cell_count() {
            return None;
        }
        let cols = u64::from(self.cols);
        Some(Placement {
            index,
            row: (idx / cols) as u32,
            col: (idx % cols) as u32,
        })
    }

    /// Number of inputs that actually get placed: oversupply is truncated.
    pub fn placed_count(&self, image_count: usize) -> usize {
        usize::try_from(self.cell_count())
            .map(|cells| cells.min(image_count))
            .unwrap_or(image_count)
    }

    /// Cells left without an image when `image_count` inputs are supplied.
    pub fn blank_cells(&self, image_count: usize) -> u64 {
        self.cell_count().saturating_sub(image_count as u64)
    }
}

impl std::fmt::Display for GridSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.rows, self.cols)
    }
}

/// Uniform cell dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellSize {
    pub width: u32,
    pub height: u32,
}

impl CellSize {
    /// Maximum width and maximum height over all inputs, in one pass.
    pub fn from_dimensions<I>(dimensions: I) -> Result<Self, LayoutError>
    where
        I: IntoIterator<Item = (u32, u32)>,
    {
        let mut iter = dimensions.into_iter();
        let first = iter.next().ok_or(LayoutError::EmptyInput)?;

        let (width, height) = iter.fold(first, |(max_w, max_h), (w, h)| {
            (max_w.max(w), max_h.max(h))
        });

        if width == 0 || height == 0 {
            return Err(LayoutError::ZeroSizedCell);
        }
        Ok(Self { width, height })
    }

    pub fn pixel_count(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }
}

/// Grid coordinates of one placed image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Placement {
    /// Linear index into the input sequence.
    pub index: usize,
    pub row: u32,
    pub col: u32,
}

/// A cell's pixel rectangle on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl CellRect {
    /// Exclusive right edge.
    pub fn right(&self) -> u32 {
        self.x + self.width
    }

    /// Exclusive bottom edge.
    pub fn bottom(&self) -> u32 {
        self.y + self.height
    }

    pub fn contains(&self, px: u32, py: u32) -> bool {
        px >= self.x && px < self.right() && py >= self.y && py < self.bottom()
    }

    /// Pixel at the middle of the cell.
    pub fn center(&self) -> (u32, u32) {
        (self.x + self.width / 2, self.y + self.height / 2)
    }
}

/// A grid combined with its cell size: everything needed to place pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Layout {
    pub grid: GridSpec,
    pub cell: CellSize,
}

impl Layout {
    /// Build a layout, rejecting canvases whose sides overflow `u32`.
    pub fn new(grid: GridSpec, cell: CellSize) -> Result<Self, LayoutError> {
        if cell.width == 0 || cell.height == 0 {
            return Err(LayoutError::ZeroSizedCell);
        }

        let width = u64::from(grid.cols()) * u64::from(cell.width);
        let height = u64::from(grid.rows()) * u64::from(cell.height);
        if width > u64::from(u32::MAX) || height > u64::from(u32::MAX) {
            return Err(LayoutError::CanvasTooLarge { width, height });
        }

        Ok(Self { grid, cell })
    }

    /// Size cells from the given image dimensions and build the layout.
    pub fn fit<I>(grid: GridSpec, dimensions: I) -> Result<Self, LayoutError>
    where
        I: IntoIterator<Item = (u32, u32)>,
    {
        let cell = CellSize::from_dimensions(dimensions)?;
        Self::new(grid, cell)
    }

    /// Canvas width (`cols * cell.width`).
    pub fn canvas_width(&self) -> u32 {
        self.grid.cols() * self.cell.width
    }

    /// Canvas height (`rows * cell.height`).
    pub fn canvas_height(&self) -> u32 {
        self.grid.rows() * self.cell.height
    }

    pub fn canvas_pixels(&self) -> u64 {
        u64::from(self.canvas_width()) * u64::from(self.canvas_height())
    }

    /// Canvas memory footprint for the given bytes per pixel.
    pub fn canvas_bytes(&self, bytes_per_pixel: u64) -> u64 {
        self.canvas_pixels().saturating_mul(bytes_per_pixel)
    }

    /// Top-left pixel offset of a placement.
    pub fn offset(&self, placement: &Placement) -> (u32, u32) {
        (
            placement.col * self.cell.width,
            placement.row * self.cell.height,
        )
    }

    /// Pixel rectangle of the cell holding image `index`.
    pub fn cell_rect(&self, index: usize) -> Option<CellRect> {
        let placement = self.grid.placement(index)?;
        let (x, y) = self.offset(&placement);
        Some(CellRect {
            x,
            y,
            width: self.cell.width,
            height: self.cell.height,
        })
    }

    /// Placements for the first `min(rows * cols, image_count)` inputs, in
    /// row-major order.
    pub fn placements(&self, image_count: usize) -> impl Iterator<Item = Placement> + '_ {
        (0..self.grid.placed_count(image_count)).filter_map(|i| self.grid.placement(i))
    }
}
