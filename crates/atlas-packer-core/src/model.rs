use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range;

/// Axis-aligned rectangle (pixels). `x,y` is top-left; `w,h` are sizes.
///
/// Positions are signed because frame rects carry negative offsets into the untrimmed image.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: u32,
    pub h: u32,
}

impl Rect {
    pub fn new(x: i32, y: i32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }
    /// Inclusive right edge coordinate (`x + w - 1`).
    pub fn right(&self) -> i32 {
        self.x + self.w.saturating_sub(1) as i32
    }
    /// Inclusive bottom edge coordinate (`y + h - 1`).
    pub fn bottom(&self) -> i32 {
        self.y + self.h.saturating_sub(1) as i32
    }
    pub fn area(&self) -> u64 {
        self.w as u64 * self.h as u64
    }
    /// True if the rect covers no pixels.
    pub fn is_empty(&self) -> bool {
        self.w == 0 || self.h == 0
    }
    /// Returns true if `r` is fully inside `self` (inclusive edges).
    pub fn contains(&self, r: &Rect) -> bool {
        r.x >= self.x && r.y >= self.y && r.right() <= self.right() && r.bottom() <= self.bottom()
    }
    /// Returns true if both rects are non-empty and share at least one pixel.
    pub fn intersects(&self, r: &Rect) -> bool {
        if self.is_empty() || r.is_empty() {
            return false;
        }
        self.x <= r.right() && r.x <= self.right() && self.y <= r.bottom() && r.y <= self.bottom()
    }
    /// Grows the rect by `pad` pixels on its right and bottom edges.
    pub fn padded(&self, pad: u32) -> Rect {
        Rect::new(self.x, self.y, self.w + pad, self.h + pad)
    }
}

/// Identifier handed out by [`crate::Packer::add`]. Increases with every accepted source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SourceId(pub u32);

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A submitted image as the packer keeps it between `add` and `pack`.
#[derive(Debug, Clone)]
pub struct SourceImage {
    pub id: SourceId,
    pub name: String,
    /// Trimmed size; position is filled in by the last `pack` call.
    pub packed: Rect,
    /// Trimmed rect relative to the untrimmed image: `(-left, -top, width, height)`.
    pub frame: Rect,
    /// Rolling content hash, 0 unless `combine_duplicates` was on when the source was added.
    pub hash: u32,
    pub duplicate_of: Option<SourceId>,
    /// True if `hash` was computed and may be matched against.
    pub(crate) hashed: bool,
    /// Byte range in the packer's pixel arena (empty for duplicates and empty sources).
    pub(crate) pixels: Range<usize>,
}

impl SourceImage {
    /// True if trimming left nothing to pack.
    pub fn is_empty(&self) -> bool {
        self.packed.is_empty() && self.duplicate_of.is_none()
    }
    pub fn is_duplicate(&self) -> bool {
        self.duplicate_of.is_some()
    }
}

/// Placement of one submitted source.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Entry {
    pub id: SourceId,
    pub name: String,
    /// Index into [`crate::PackOutput::pages`].
    pub page: usize,
    /// Placed rectangle within the page (zero-sized for empty sources).
    pub packed: Rect,
    /// Trimmed rect relative to the untrimmed image.
    pub frame: Rect,
}

impl Entry {
    /// Offset of the trimmed pixels inside the original image.
    pub fn draw_offset(&self) -> (i32, i32) {
        (-self.frame.x, -self.frame.y)
    }
    /// Original (untrimmed) image size.
    pub fn source_size(&self) -> (u32, u32) {
        (self.frame.w, self.frame.h)
    }
    /// True if the source was smaller after trimming.
    pub fn trimmed(&self) -> bool {
        !self.packed.is_empty() && (self.packed.w, self.packed.h) != self.source_size()
    }
}

/// Statistics about atlas packing efficiency.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PackStats {
    /// Total number of pages.
    pub num_pages: usize,
    /// Total number of entries (one per submitted source).
    pub num_entries: usize,
    /// Entries that reuse another source's pixels.
    pub num_duplicates: usize,
    /// Entries that were fully transparent.
    pub num_empty: usize,
    /// Entries that were trimmed.
    pub num_trimmed: usize,
    /// Total area of all pages (sum of width * height for each page).
    pub total_page_area: u64,
    /// Area covered by stored pixels (duplicates counted once).
    pub used_area: u64,
    /// Occupancy ratio: used_area / total_page_area (0.0 to 1.0).
    pub occupancy: f64,
    /// Largest page dimensions.
    pub max_page_width: u32,
    pub max_page_height: u32,
}

impl PackStats {
    /// Returns a human-readable summary of the statistics.
    pub fn summary(&self) -> String {
        format!(
            "Pages: {}, Entries: {}, Occupancy: {:.2}%, Total Area: {} px², Used Area: {} px², Duplicates: {}, Empty: {}, Trimmed: {}",
            self.num_pages,
            self.num_entries,
            self.occupancy * 100.0,
            self.total_page_area,
            self.used_area,
            self.num_duplicates,
            self.num_empty,
            self.num_trimmed,
        )
    }

    /// Returns wasted space in pixels.
    pub fn wasted_area(&self) -> u64 {
        self.total_page_area.saturating_sub(self.used_area)
    }

    /// Returns wasted space as a percentage (0.0 to 100.0).
    pub fn waste_percentage(&self) -> f64 {
        if self.total_page_area > 0 {
            (self.wasted_area() as f64 / self.total_page_area as f64) * 100.0
        } else {
            0.0
        }
    }
}
