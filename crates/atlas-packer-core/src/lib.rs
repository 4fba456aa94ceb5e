//! Core library for packing named RGBA images into texture atlas pages.
//!
//! - Algorithm: growing binary tree (root sized to the largest image, grows right/down up to the page limit)
//! - Trimming of fully transparent borders, with frame rects to restore the original footprint
//! - Optional duplicate detection by content hash; duplicates share their original's placement
//! - `Packer::pack` returns owned RGBA pages plus one serde-serializable entry per source
//!
//! Quick example:
//! ```ignore
//! use image::ImageReader;
//! use atlas_packer_core::{Packer, PackerConfig};
//! # fn main() -> anyhow::Result<()> {
//! let a = ImageReader::open("a.png")?.decode()?.to_rgba8();
//! let b = ImageReader::open("b.png")?.decode()?.to_rgba8();
//! let cfg = PackerConfig { max_page_size: 1024, ..Default::default() };
//! let mut packer = Packer::new(cfg);
//! packer.add_image("a", &a)?;
//! packer.add_image("b", &b)?;
//! let out = packer.pack()?;
//! println!("pages: {}", out.pages.len());
//! # Ok(()) }
//! ```

mod arena;
pub mod compositing;
pub mod config;
pub mod error;
pub mod export;
pub mod model;
pub mod packer;
pub mod pipeline;
pub mod region;
pub mod trim;

pub use config::*;
pub use error::*;
pub use export::*;
pub use model::*;
pub use pipeline::*;
pub use region::*;

/// Convenience prelude for common types and functions.
/// Importing `atlas_packer_core::prelude::*` brings the primary APIs into scope.
pub mod prelude {
    pub use crate::config::{PackerConfig, PackerConfigBuilder};
    pub use crate::error::PackerError;
    pub use crate::model::{Entry, PackStats, Rect, SourceId, SourceImage};
    pub use crate::pipeline::{PackOutput, Packer, Page};
    pub use crate::region::{AtlasRegion, UvRect};
    pub use crate::{to_json_array, to_json_hash};
}
