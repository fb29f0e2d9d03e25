//! Collage Data Model
//!
//! Defines the core data contracts for grid collages:
//! - **Grid:** Row/column shape, uniform cell size, row-major placement
//! - **Format:** Output encodings and their file/MIME metadata
//! - **Policy:** Undersupply handling and resampling filter selection
//! - **Manifest:** Serializable record of where every source image landed
//!
//! Everything here is pure geometry and metadata. Pixel work lives in
//! `collage-render`.

pub mod error;
pub mod format;
pub mod grid;
pub mod manifest;
pub mod policy;

pub use error::*;
pub use format::*;
pub use grid::*;
pub use manifest::*;
pub use policy::*;
