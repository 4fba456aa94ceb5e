//! Lookup regions for renderers that sample sub-rectangles of uploaded atlas pages.

use crate::model::Entry;
use crate::pipeline::PackOutput;
use serde::{Deserialize, Serialize};

/// Normalized texture coordinates (`0.0..=1.0`), top-left origin.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct UvRect {
    pub u0: f32,
    pub v0: f32,
    pub u1: f32,
    pub v1: f32,
}

/// Where a named image lives in the atlas and how to draw it at its original footprint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AtlasRegion {
    pub name: String,
    pub page: usize,
    pub uv: UvRect,
    /// Trimmed size in pixels.
    pub size: (u32, u32),
    /// Offset of the trimmed pixels inside the original image.
    pub draw_offset: (i32, i32),
    /// Original (untrimmed) image size.
    pub source_size: (u32, u32),
}

impl AtlasRegion {
    /// Builds a region for `entry` placed on a `page_w`x`page_h` page.
    pub fn from_entry(entry: &Entry, page_w: u32, page_h: u32) -> Self {
        let uv = if page_w == 0 || page_h == 0 || entry.packed.is_empty() {
            UvRect::default()
        } else {
            let (pw, ph) = (page_w as f32, page_h as f32);
            let r = &entry.packed;
            UvRect {
                u0: r.x as f32 / pw,
                v0: r.y as f32 / ph,
                u1: (r.x as f32 + r.w as f32) / pw,
                v1: (r.y as f32 + r.h as f32) / ph,
            }
        };
        Self {
            name: entry.name.clone(),
            page: entry.page,
            uv,
            size: (entry.packed.w, entry.packed.h),
            draw_offset: entry.draw_offset(),
            source_size: entry.source_size(),
        }
    }
}

impl PackOutput {
    /// Region of the first entry submitted under `name`.
    pub fn region(&self, name: &str) -> Option<AtlasRegion> {
        let entry = self.entry(name)?;
        let page = self.pages.get(entry.page)?;
        Some(AtlasRegion::from_entry(entry, page.width, page.height))
    }

    /// One region per entry, in entry order.
    pub fn regions(&self) -> Vec<AtlasRegion> {
        self.entries
            .iter()
            .filter_map(|e| {
                let page = self.pages.get(e.page)?;
                Some(AtlasRegion::from_entry(e, page.width, page.height))
            })
            .collect()
    }
}
