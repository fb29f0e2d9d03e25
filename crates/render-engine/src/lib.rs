//! Collage Render Engine
//!
//! Turns an ordered list of source images into a single encoded grid
//! collage. Every stage is synchronous and fails fast: the first bad input
//! aborts the whole job and no partial canvas is ever returned.
//!
//! # Pipeline Architecture
//!
//! ```text
//! a.jpg ──┐
//! b.png ──┼── Decode (pixel ceiling) ──┐
//! c.jpg ──┘                            │
//!                                      ├── Cell size = (max w, max h)
//!                                      │
//!                                      ├── Resize each image (Lanczos3)
//!                                      │
//!                                      ├── Paste row-major onto black canvas
//!                                      │
//!                                      ▼
//!                               Encode (PNG / JPEG)
//!                                      │
//!                                      ▼
//!                            collage.png + collage.json
//! ```

pub mod compositor;
pub mod decode;
pub mod encode;
pub mod export;
pub mod source;

pub use compositor::{compose, Collage, CompositorOptions};
pub use decode::DecodeLimits;
pub use encode::{encode, EncodeSettings, EncodedCollage};
pub use export::*;
pub use source::SourceImage;
