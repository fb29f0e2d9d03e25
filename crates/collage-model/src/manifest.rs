//! Collage manifest (`collage.json`).
//!
//! A manifest records how a collage was assembled: the grid, the cell size,
//! and for every placed image its source, original dimensions, and canvas
//! offset. It is written next to the encoded output on request.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ManifestError;
use crate::format::OutputFormat;
use crate::grid::{CellSize, GridSpec, Layout};
use crate::policy::FillPolicy;

/// Current manifest schema version.
pub const MANIFEST_VERSION: &str = "1.0";

/// A source image's label and decoded dimensions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceDimensions {
    /// Where the image came from (usually a file path).
    pub label: String,
    pub width: u32,
    pub height: u32,
}

impl SourceDimensions {
    pub fn new(label: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            label: label.into(),
            width,
            height,
        }
    }
}

/// One image as it was placed on the canvas.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacedImage {
    pub index: usize,
    pub source: String,
    pub original_width: u32,
    pub original_height: u32,
    pub row: u32,
    pub col: u32,
    /// Top-left pixel offset on the canvas.
    pub x: u32,
    pub y: u32,
}

/// Record of a produced collage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollageManifest {
    pub version: String,
    pub grid: GridSpec,
    pub cell: CellSize,
    pub canvas_width: u32,
    pub canvas_height: u32,
    pub format: OutputFormat,
    pub fill_policy: FillPolicy,
    pub placements: Vec<PlacedImage>,

    /// Inputs past the last cell that were left out.
    #[serde(default)]
    pub ignored: Vec<String>,

    /// Cells left as background.
    #[serde(default)]
    pub blank_cells: u64,
}

impl CollageManifest {
    /// Describe a layout filled from `sources` in input order.
    pub fn new(
        layout: &Layout,
        sources: &[SourceDimensions],
        format: OutputFormat,
        fill_policy: FillPolicy,
    ) -> Self {
        let placements = layout
            .placements(sources.len())
            .map(|p| {
                let src = &sources[p.index];
                let (x, y) = layout.offset(&p);
                PlacedImage {
                    index: p.index,
                    source: src.label.clone(),
                    original_width: src.width,
                    original_height: src.height,
                    row: p.row,
                    col: p.col,
                    x,
                    y,
                }
            })
            .collect::<Vec<_>>();

        let ignored = sources
            .iter()
            .skip(placements.len())
            .map(|s| s.label.clone())
            .collect();

        Self {
            version: MANIFEST_VERSION.to_string(),
            grid: layout.grid,
            cell: layout.cell,
            canvas_width: layout.canvas_width(),
            canvas_height: layout.canvas_height(),
            format,
            fill_policy,
            placements,
            ignored,
            blank_cells: layout.grid.blank_cells(sources.len()),
        }
    }

    /// Load a manifest from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ManifestError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| ManifestError::IoError {
            path: path.to_path_buf(),
            source: e,
        })?;
        serde_json::from_str(&json).map_err(|e| ManifestError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Write the manifest as pretty-printed JSON, creating parent directories.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ManifestError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| ManifestError::IoError {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let json = serde_json::to_string_pretty(self).map_err(|e| ManifestError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })?;
        std::fs::write(path, json).map_err(|e| ManifestError::IoError {
            path: path.to_path_buf(),
            source: e,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sources(dims: &[(u32, u32)]) -> Vec<SourceDimensions> {
        dims.iter()
            .enumerate()
            .map(|(i, (w, h))| SourceDimensions::new(format!("img{i}.png"), *w, *h))
            .collect()
    }

    #[test]
    fn test_manifest_records_row_major_offsets() {
        let srcs = sources(&[(100, 100), (200, 100), (100, 200), (200, 200)]);
        let grid = GridSpec::new(2, 2).unwrap();
        let layout = Layout::fit(grid, srcs.iter().map(|s| (s.width, s.height))).unwrap();
        let manifest = CollageManifest::new(&layout, &srcs, OutputFormat::Png, FillPolicy::Reject);

        assert_eq!(manifest.canvas_width, 400);
        assert_eq!(manifest.canvas_height, 400);
        assert_eq!(manifest.placements.len(), 4);
        assert_eq!(manifest.placements[1].source, "img1.png");
        assert_eq!((manifest.placements[1].x, manifest.placements[1].y), (200, 0));
        assert_eq!((manifest.placements[2].x, manifest.placements[2].y), (0, 200));
        assert!(manifest.ignored.is_empty());
        assert_eq!(manifest.blank_cells, 0);
    }

    #[test]
    fn test_manifest_tracks_ignored_and_blank() {
        let grid = GridSpec::new(2, 2).unwrap();

        let over = sources(&[(10, 10); 5]);
        let layout = Layout::fit(grid, over.iter().map(|s| (s.width, s.height))).unwrap();
        let manifest = CollageManifest::new(&layout, &over, OutputFormat::Jpeg, FillPolicy::Reject);
        assert_eq!(manifest.placements.len(), 4);
        assert_eq!(manifest.ignored, vec!["img4.png".to_string()]);

        let under = sources(&[(10, 10); 3]);
        let manifest =
            CollageManifest::new(&layout, &under, OutputFormat::Jpeg, FillPolicy::BlankFill);
        assert_eq!(manifest.placements.len(), 3);
        assert_eq!(manifest.blank_cells, 1);
    }

    #[test]
    fn test_manifest_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("collage.json");

        let srcs = sources(&[(30, 20), (20, 30)]);
        let grid = GridSpec::new(1, 2).unwrap();
        let layout = Layout::fit(grid, srcs.iter().map(|s| (s.width, s.height))).unwrap();
        let manifest = CollageManifest::new(&layout, &srcs, OutputFormat::Png, FillPolicy::Reject);

        manifest.save(&path).unwrap();
        let loaded = CollageManifest::load(&path).unwrap();
        assert_eq!(loaded, manifest);
    }

    #[test]
    fn test_manifest_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = CollageManifest::load(dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, ManifestError::IoError { .. }));
    }
}
