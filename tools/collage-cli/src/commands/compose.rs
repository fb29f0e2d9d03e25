//! Compose images into a collage.

use std::path::{Path, PathBuf};

use clap::Args;
use collage_common::config::{AppConfig, CollageDefaults};
use collage_model::{FillPolicy, GridSpec, OutputFormat, PngCompression, ResampleFilter};
use collage_render::{render_collage, CollageJob, ProgressCallback, RenderProgress, RenderStage};

#[derive(Debug, Args)]
pub struct ComposeArgs {
    /// Source images, placed row by row in the given order
    #[arg(required = true)]
    pub images: Vec<PathBuf>,

    /// Number of rows (defaults to config)
    #[arg(short, long)]
    pub rows: Option<u32>,

    /// Number of columns (defaults to config)
    #[arg(short, long)]
    pub cols: Option<u32>,

    /// Output format: png or jpeg (defaults to the output extension, then config)
    #[arg(short, long)]
    pub format: Option<OutputFormat>,

    /// Output file path
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Leave trailing cells black instead of failing when images run out
    #[arg(long)]
    pub allow_blank: bool,

    /// Resampling filter: nearest|triangle|catmull-rom|gaussian|lanczos3
    #[arg(long)]
    pub filter: Option<ResampleFilter>,

    /// JPEG quality (1-100)
    #[arg(long)]
    pub jpeg_quality: Option<u8>,

    /// PNG compression: fast|default|best
    #[arg(long)]
    pub png_compression: Option<PngCompression>,

    /// Largest accepted source image, in pixels
    #[arg(long)]
    pub max_pixels: Option<u64>,

    /// Also write a JSON manifest describing the layout
    #[arg(long)]
    pub manifest: Option<PathBuf>,
}

impl ComposeArgs {
    /// Config defaults with command-line overrides applied.
    fn effective_defaults(&self, config: &AppConfig) -> anyhow::Result<CollageDefaults> {
        let mut defaults = config.collage.clone();
        if self.allow_blank {
            defaults.fill_policy = FillPolicy::BlankFill;
        }
        if let Some(filter) = self.filter {
            defaults.resample_filter = filter;
        }
        if let Some(quality) = self.jpeg_quality {
            if !(1..=100).contains(&quality) {
                anyhow::bail!("--jpeg-quality must be within 1-100, got {quality}");
            }
            defaults.jpeg_quality = quality;
        }
        if let Some(compression) = self.png_compression {
            defaults.png_compression = compression;
        }
        if let Some(max_pixels) = self.max_pixels {
            if max_pixels == 0 {
                anyhow::bail!("--max-pixels must be positive");
            }
            defaults.max_decoded_pixels = max_pixels;
        }
        Ok(defaults)
    }

    /// Explicit flag, else the output file's extension, else config.
    fn resolve_format(&self, config: &AppConfig) -> OutputFormat {
        self.format
            .or_else(|| {
                self.output
                    .as_deref()
                    .and_then(Path::extension)
                    .and_then(|ext| ext.to_str())
                    .and_then(|ext| ext.parse().ok())
            })
            .unwrap_or(config.collage.format)
    }
}

pub fn run(args: ComposeArgs, config: &AppConfig) -> anyhow::Result<()> {
    let defaults = args.effective_defaults(config)?;
    let rows = args.rows.unwrap_or(defaults.rows);
    let cols = args.cols.unwrap_or(defaults.cols);
    let grid = GridSpec::new(rows, cols)?;
    let format = args.resolve_format(config);
    let output_path = args
        .output
        .clone()
        .unwrap_or_else(|| config.output_dir.join(format.file_name()));

    println!("Composing {} image(s) into a {grid} grid", args.images.len());

    let job = CollageJob::from_defaults(args.images, grid, format, &defaults);

    let progress_cb: ProgressCallback = Box::new(|p: RenderProgress| match p.stage {
        RenderStage::Decoding => {
            eprint!("\r  Decoding: {}/{} images  ", p.completed, p.total);
        }
        RenderStage::Compositing if p.completed == 0 => eprint!("\n  Compositing...  "),
        RenderStage::Encoding if p.completed == 0 => eprint!("\n  Encoding...  "),
        RenderStage::Complete => eprintln!(),
        _ => {}
    });

    let output = render_collage(&job, Some(&progress_cb))?;
    output.encoded.write_to(&output_path)?;

    let m = &output.manifest;
    println!("Collage complete: {}", output_path.display());
    println!("  Format: {format} ({})", output.encoded.mime_type());
    println!(
        "  Canvas: {}x{} ({}x{} cells of {}x{})",
        m.canvas_width, m.canvas_height, rows, cols, m.cell.width, m.cell.height
    );
    println!("  Size: {} bytes", output.encoded.len());
    if !m.ignored.is_empty() {
        println!("  Ignored {} image(s) past the last cell", m.ignored.len());
    }
    if m.blank_cells > 0 {
        println!("  Left {} cell(s) blank", m.blank_cells);
    }

    if let Some(manifest_path) = &args.manifest {
        m.save(manifest_path)?;
        println!("  Manifest: {}", manifest_path.display());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use collage_model::CollageManifest;
    use image::{DynamicImage, ImageFormat, Rgb, RgbImage};

    fn write_png(dir: &Path, name: &str, w: u32, h: u32) -> PathBuf {
        let path = dir.join(name);
        DynamicImage::ImageRgb8(RgbImage::from_pixel(w, h, Rgb([90, 120, 150])))
            .save_with_format(&path, ImageFormat::Png)
            .unwrap();
        path
    }

    fn args(images: Vec<PathBuf>) -> ComposeArgs {
        ComposeArgs {
            images,
            rows: None,
            cols: None,
            format: None,
            output: None,
            allow_blank: false,
            filter: None,
            jpeg_quality: None,
            png_compression: None,
            max_pixels: None,
            manifest: None,
        }
    }

    #[test]
    fn test_format_falls_back_to_output_extension() {
        let config = AppConfig::default();
        let mut a = args(vec![]);
        a.output = Some(PathBuf::from("out/grid.PNG"));
        assert_eq!(a.resolve_format(&config), OutputFormat::Png);

        a.format = Some(OutputFormat::Jpeg);
        assert_eq!(a.resolve_format(&config), OutputFormat::Jpeg);

        let a = args(vec![]);
        assert_eq!(a.resolve_format(&config), config.collage.format);
    }

    #[test]
    fn test_overrides_are_validated() {
        let config = AppConfig::default();
        let mut a = args(vec![]);
        a.jpeg_quality = Some(0);
        assert!(a.effective_defaults(&config).is_err());

        let mut a = args(vec![]);
        a.allow_blank = true;
        a.max_pixels = Some(64);
        let defaults = a.effective_defaults(&config).unwrap();
        assert_eq!(defaults.fill_policy, FillPolicy::BlankFill);
        assert_eq!(defaults.max_decoded_pixels, 64);
    }

    #[test]
    fn test_run_writes_collage_and_manifest() {
        let dir = tempfile::tempdir().unwrap();
        let images = vec![
            write_png(dir.path(), "a.png", 8, 4),
            write_png(dir.path(), "b.png", 4, 8),
        ];
        let output = dir.path().join("out").join("grid.png");
        let manifest = dir.path().join("out").join("grid.json");

        let mut a = args(images);
        a.rows = Some(1);
        a.cols = Some(2);
        a.output = Some(output.clone());
        a.manifest = Some(manifest.clone());
        run(a, &AppConfig::default()).unwrap();

        let written = image::open(&output).unwrap();
        assert_eq!((written.width(), written.height()), (16, 8));

        let m = CollageManifest::load(&manifest).unwrap();
        assert_eq!(m.format, OutputFormat::Png);
        assert_eq!(m.placements.len(), 2);
    }

    #[test]
    fn test_run_rejects_undersupply_without_allow_blank() {
        let dir = tempfile::tempdir().unwrap();
        let mut a = args(vec![write_png(dir.path(), "a.png", 4, 4)]);
        a.rows = Some(2);
        a.cols = Some(2);
        a.output = Some(dir.path().join("c.png"));
        let err = run(a, &AppConfig::default()).unwrap_err();
        assert!(err.to_string().contains("Insufficient images"));
        assert!(!dir.path().join("c.png").exists());
    }
}
