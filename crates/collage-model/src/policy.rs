//! Compositing policies.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ParseOptionError;

/// What to do when fewer images are supplied than the grid has cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FillPolicy {
    /// Fail the request before any resizing happens.
    #[default]
    Reject,
    /// Leave trailing cells as black background.
    BlankFill,
}

impl FromStr for FillPolicy {
    type Err = ParseOptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reject" => Ok(Self::Reject),
            "blank" | "blank-fill" | "blank_fill" => Ok(Self::BlankFill),
            _ => Err(ParseOptionError {
                kind: "fill policy",
                value: s.to_string(),
                expected: "reject, blank-fill",
            }),
        }
    }
}

/// Resampling filter used to bring every image to the cell size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResampleFilter {
    Nearest,
    Triangle,
    CatmullRom,
    Gaussian,
    #[default]
    Lanczos3,
}

impl FromStr for ResampleFilter {
    type Err = ParseOptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "nearest" => Ok(Self::Nearest),
            "triangle" | "bilinear" => Ok(Self::Triangle),
            "catmull-rom" | "catmull_rom" | "bicubic" => Ok(Self::CatmullRom),
            "gaussian" => Ok(Self::Gaussian),
            "lanczos3" | "lanczos" => Ok(Self::Lanczos3),
            _ => Err(ParseOptionError {
                kind: "resample filter",
                value: s.to_string(),
                expected: "nearest, triangle, catmull-rom, gaussian, lanczos3",
            }),
        }
    }
}
