//! Preview a collage layout from image headers alone.

use std::path::PathBuf;

use clap::Args;
use collage_common::config::AppConfig;
use collage_model::{GridSpec, Layout, SourceDimensions};
use collage_render::decode::probe_file;

#[derive(Debug, Args)]
pub struct PlanArgs {
    /// Source images, in placement order
    #[arg(required = true)]
    pub images: Vec<PathBuf>,

    /// Number of rows (defaults to config)
    #[arg(short, long)]
    pub rows: Option<u32>,

    /// Number of columns (defaults to config)
    #[arg(short, long)]
    pub cols: Option<u32>,
}

/// What a compose run would produce.
#[derive(Debug)]
pub struct Plan {
    pub layout: Layout,
    pub sources: Vec<SourceDimensions>,
    /// Sources above the configured pixel ceiling.
    pub oversized: Vec<String>,
}

impl Plan {
    /// Rough peak memory: one resized RGB copy per placed image plus the canvas.
    pub fn estimated_peak_bytes(&self) -> u64 {
        let placed = self.layout.grid.placed_count(self.sources.len()) as u64;
        let cells = self.layout.cell.pixel_count().saturating_mul(3).saturating_mul(placed);
        cells.saturating_add(self.layout.canvas_bytes(3))
    }
}

pub fn build_plan(
    images: &[PathBuf],
    grid: GridSpec,
    config: &AppConfig,
) -> anyhow::Result<Plan> {
    let sources = images
        .iter()
        .map(|path| probe_file(path))
        .collect::<Result<Vec<_>, _>>()?;
    let layout = Layout::fit(grid, sources.iter().map(|s| (s.width, s.height)))?;
    let limit = config.collage.max_decoded_pixels;
    let oversized = sources
        .iter()
        .filter(|s| u64::from(s.width) * u64::from(s.height) > limit)
        .map(|s| s.label.clone())
        .collect();

    Ok(Plan {
        layout,
        sources,
        oversized,
    })
}

pub fn run(args: PlanArgs, config: &AppConfig) -> anyhow::Result<()> {
    let rows = args.rows.unwrap_or(config.collage.rows);
    let cols = args.cols.unwrap_or(config.collage.cols);
    let grid = GridSpec::new(rows, cols)?;
    let plan = build_plan(&args.images, grid, config)?;
    let layout = &plan.layout;

    println!("Collage plan: {grid} grid, {} image(s)", plan.sources.len());
    println!("  Cell size: {}x{}", layout.cell.width, layout.cell.height);
    println!(
        "  Canvas: {}x{} ({:.1} MiB RGB)",
        layout.canvas_width(),
        layout.canvas_height(),
        layout.canvas_bytes(3) as f64 / (1024.0 * 1024.0)
    );
    println!(
        "  Estimated peak memory: {:.1} MiB",
        plan.estimated_peak_bytes() as f64 / (1024.0 * 1024.0)
    );
    println!();

    println!("Placements:");
    for placement in layout.placements(plan.sources.len()) {
        let src = &plan.sources[placement.index];
        let (x, y) = layout.offset(&placement);
        println!(
            "  [{},{}] @ ({x}, {y}) <- {} ({}x{})",
            placement.row, placement.col, src.label, src.width, src.height
        );
    }

    let placed = grid.placed_count(plan.sources.len());
    for src in &plan.sources[placed..] {
        println!("  (ignored) {}", src.label);
    }

    let blank = grid.blank_cells(plan.sources.len());
    if blank > 0 {
        println!();
        println!(
            "[WARN] Please select at least {} images for a {rows}x{cols} collage \
             ({blank} cell(s) would be blank; compose needs --allow-blank)",
            grid.cell_count()
        );
    }
    for label in &plan.oversized {
        println!(
            "[WARN] {label} exceeds the {} pixel limit and will be rejected",
            config.collage.max_decoded_pixels
        );
    }

    Ok(())
}
