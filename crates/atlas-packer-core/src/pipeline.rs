use crate::arena::PixelArena;
use crate::compositing::{blit_rows, next_pow2};
use crate::config::PackerConfig;
use crate::error::{PackerError, Result};
use crate::model::{Entry, PackStats, Rect, SourceId, SourceImage};
use crate::packer::GrowingTree;
use crate::trim;
use image::RgbaImage;
use std::collections::{HashMap, HashSet};
use tracing::{debug, instrument};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// A finished atlas page and its pixels.
#[derive(Debug, Clone)]
pub struct Page {
    pub id: usize,
    pub width: u32,
    pub height: u32,
    pub rgba: RgbaImage,
}

/// Output of a packing run: RGBA pages and one entry per submitted source.
#[derive(Debug, Clone, Default)]
pub struct PackOutput {
    pub pages: Vec<Page>,
    pub entries: Vec<Entry>,
}

impl PackOutput {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries placed on page `page`, duplicates included.
    pub fn entries_on(&self, page: usize) -> impl Iterator<Item = &Entry> + '_ {
        self.entries.iter().filter(move |e| e.page == page)
    }

    /// First entry submitted under `name`.
    pub fn entry(&self, name: &str) -> Option<&Entry> {
        self.entries
            .iter()
            .filter(|e| e.name == name)
            .min_by_key(|e| e.id)
    }

    /// Computes packing statistics for this output.
    pub fn stats(&self) -> PackStats {
        let mut total_page_area = 0u64;
        let mut max_page_width = 0u32;
        let mut max_page_height = 0u32;
        for page in &self.pages {
            total_page_area += page.width as u64 * page.height as u64;
            max_page_width = max_page_width.max(page.width);
            max_page_height = max_page_height.max(page.height);
        }

        let mut num_duplicates = 0;
        let mut num_empty = 0;
        let mut num_trimmed = 0;
        let mut used_area = 0u64;
        let mut seen: HashSet<(usize, Rect)> = HashSet::new();
        for e in &self.entries {
            if e.packed.is_empty() {
                num_empty += 1;
                continue;
            }
            if e.trimmed() {
                num_trimmed += 1;
            }
            if !seen.insert((e.page, e.packed)) {
                num_duplicates += 1;
            } else {
                used_area += e.packed.area();
            }
        }

        let occupancy = if total_page_area > 0 {
            used_area as f64 / total_page_area as f64
        } else {
            0.0
        };

        PackStats {
            num_pages: self.pages.len(),
            num_entries: self.entries.len(),
            num_duplicates,
            num_empty,
            num_trimmed,
            total_page_area,
            used_area,
            occupancy,
            max_page_width,
            max_page_height,
        }
    }
}

/// Sources handled on one page, in placement order.
struct PageLayout {
    width: u32,
    height: u32,
    handled: Vec<usize>,
}

/// Accumulates source images and packs them into atlas pages.
///
/// Notes:
/// - Sources are ordered by trimmed area (descending), ties by submission order, so the
///   layout only depends on the submitted images and the configuration.
/// - Not synchronized: every mutating call takes `&mut self`.
///
/// ```ignore
/// use atlas_packer_core::{Packer, PackerConfig};
/// let mut packer = Packer::new(PackerConfig::builder().max_page_size(1024).build());
/// packer.add("player", 32, 32, &[255; 32 * 32 * 4])?;
/// let out = packer.pack()?;
/// println!("pages: {}", out.pages.len());
/// ```
#[derive(Debug, Clone, Default)]
pub struct Packer {
    config: PackerConfig,
    sources: Vec<SourceImage>,
    arena: PixelArena,
    next_id: u32,
}

impl Packer {
    pub fn new(config: PackerConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    pub fn config(&self) -> &PackerConfig {
        &self.config
    }

    /// Configuration used by later `add` and `pack` calls.
    pub fn config_mut(&mut self) -> &mut PackerConfig {
        &mut self.config
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Sources in submission order.
    pub fn sources(&self) -> &[SourceImage] {
        &self.sources
    }

    pub fn source(&self, id: SourceId) -> Option<&SourceImage> {
        self.sources
            .binary_search_by_key(&id, |s| s.id)
            .ok()
            .map(|i| &self.sources[i])
    }

    /// Adds a `width`x`height` RGBA8 image. `pixels` must hold exactly `width * height * 4` bytes.
    ///
    /// Trimming and duplicate detection follow the configuration at the time of the call.
    pub fn add(
        &mut self,
        name: impl Into<String>,
        width: u32,
        height: u32,
        pixels: &[u8],
    ) -> Result<SourceId> {
        let name = name.into();
        let expected = width as usize * height as usize * 4;
        if pixels.len() != expected {
            return Err(PackerError::InvalidInput(format!(
                "'{}': expected {} bytes for a {}x{} RGBA8 image, got {}",
                name,
                expected,
                width,
                height,
                pixels.len()
            )));
        }
        let next_id = self.next_id.checked_add(1).ok_or_else(|| {
            PackerError::InvalidInput("source identifiers exhausted".into())
        })?;
        let id = SourceId(self.next_id);
        self.next_id = next_id;

        let bounds = if self.config.trim {
            trim::opaque_bounds(width, height, pixels)
        } else {
            Some(Rect::new(0, 0, width, height)).filter(|r| !r.is_empty())
        };

        let mut source = SourceImage {
            id,
            name,
            packed: Rect::default(),
            frame: Rect::new(0, 0, width, height),
            hash: 0,
            duplicate_of: None,
            hashed: false,
            pixels: 0..0,
        };

        if let Some(b) = bounds {
            source.packed = Rect::new(0, 0, b.w, b.h);
            source.frame = Rect::new(-b.x, -b.y, width, height);

            if self.config.combine_duplicates {
                source.hash = trim::content_hash(width, pixels, &b);
                source.hashed = true;
                source.duplicate_of = self
                    .sources
                    .iter()
                    .find(|s| s.hashed && s.hash == source.hash)
                    .map(|s| s.duplicate_of.unwrap_or(s.id));
            }

            if let Some(original) = source.duplicate_of {
                debug!(%id, %original, name = %source.name, "duplicate source");
                source.packed = Rect::default();
            } else {
                let len = b.w as usize * b.h as usize * 4;
                source.pixels = self.arena.push_rows(len, trim::rows(width, pixels, &b));
            }
        }

        self.sources.push(source);
        Ok(id)
    }

    /// Adds an `image` RGBA buffer.
    pub fn add_image(&mut self, name: impl Into<String>, image: &RgbaImage) -> Result<SourceId> {
        let (w, h) = image.dimensions();
        self.add(name, w, h, image.as_raw())
    }

    /// Drops every source and the stored pixels. Identifiers keep increasing.
    pub fn clear(&mut self) {
        self.sources.clear();
        self.arena.clear();
    }

    #[instrument(skip_all, fields(sources = self.sources.len(), arena_bytes = self.arena.len()))]
    /// Packs all sources into pages and returns pages plus one entry per source.
    ///
    /// Fails with [`PackerError::OversizedSource`] before doing any work if a source cannot fit
    /// on an empty page. Calling `pack` again without adding sources yields the same output.
    pub fn pack(&mut self) -> Result<PackOutput> {
        self.config.validate()?;

        if self.sources.is_empty() {
            return Ok(PackOutput::default());
        }

        let max = self.config.effective_page_size();
        if let Some(s) = self
            .sources
            .iter()
            .find(|s| s.packed.w > max || s.packed.h > max)
        {
            return Err(PackerError::OversizedSource {
                name: s.name.clone(),
                width: s.packed.w,
                height: s.packed.h,
                max,
            });
        }

        let mut order: Vec<usize> = (0..self.sources.len()).collect();
        order.sort_by(|&a, &b| {
            let (a, b) = (&self.sources[a], &self.sources[b]);
            b.packed
                .area()
                .cmp(&a.packed.area())
                .then_with(|| a.id.cmp(&b.id))
        });

        let layouts = self.layout_pages(&order);
        let pages = self.compose_pages(&layouts);

        let mut entries: Vec<Entry> = Vec::with_capacity(self.sources.len());
        for (page, layout) in layouts.iter().enumerate() {
            for &idx in &layout.handled {
                let s = &self.sources[idx];
                entries.push(Entry {
                    id: s.id,
                    name: s.name.clone(),
                    page,
                    packed: s.packed,
                    frame: s.frame,
                });
            }
        }

        let by_id: HashMap<SourceId, usize> = entries
            .iter()
            .enumerate()
            .map(|(i, e)| (e.id, i))
            .collect();
        for s in &self.sources {
            let Some(original) = s.duplicate_of else {
                continue;
            };
            if let Some(&i) = by_id.get(&original) {
                let e = &entries[i];
                entries.push(Entry {
                    id: s.id,
                    name: s.name.clone(),
                    page: e.page,
                    packed: e.packed,
                    frame: e.frame,
                });
            }
        }

        debug!(pages = pages.len(), entries = entries.len(), "pack finished");
        Ok(PackOutput { pages, entries })
    }

    /// Runs the growing tree page by page and writes placements back into the sources.
    fn layout_pages(&mut self, order: &[usize]) -> Vec<PageLayout> {
        let pad = self.config.padding;
        let limit = self.config.tree_limit();
        let mut layouts = Vec::new();
        let mut next = 0;

        while next < order.len() {
            let mut tree: Option<GrowingTree> = None;
            let mut handled = Vec::new();

            while next < order.len() {
                let idx = order[next];
                let src = &mut self.sources[idx];
                if src.is_duplicate() {
                    next += 1;
                    continue;
                }
                if src.is_empty() {
                    src.packed.x = 0;
                    src.packed.y = 0;
                    handled.push(idx);
                    next += 1;
                    continue;
                }

                let (w, h) = (src.packed.w + pad, src.packed.h + pad);
                let remaining = order.len() - next;
                let tree = tree.get_or_insert_with(|| GrowingTree::new(w, h, limit, remaining * 4));
                match tree.insert(w, h) {
                    Some((x, y)) => {
                        src.packed.x = x as i32;
                        src.packed.y = y as i32;
                        handled.push(idx);
                        next += 1;
                    }
                    None => break,
                }
            }

            let (mut width, mut height) = tree
                .as_ref()
                .map(|t| (t.width() - pad, t.height() - pad))
                .unwrap_or((0, 0));
            if self.config.power_of_two {
                width = next_pow2(width);
                height = next_pow2(height);
            }
            debug!(
                page = layouts.len(),
                width,
                height,
                entries = handled.len(),
                nodes = tree.as_ref().map_or(0, GrowingTree::node_count),
                "page laid out"
            );
            layouts.push(PageLayout {
                width,
                height,
                handled,
            });
        }
        layouts
    }

    fn compose_pages(&self, layouts: &[PageLayout]) -> Vec<Page> {
        #[cfg(feature = "parallel")]
        {
            if self.config.parallel {
                return layouts
                    .par_iter()
                    .enumerate()
                    .map(|(id, layout)| self.compose_page(id, layout))
                    .collect();
            }
        }
        layouts
            .iter()
            .enumerate()
            .map(|(id, layout)| self.compose_page(id, layout))
            .collect()
    }

    fn compose_page(&self, id: usize, layout: &PageLayout) -> Page {
        let mut canvas = RgbaImage::new(layout.width, layout.height);
        for &idx in &layout.handled {
            let s = &self.sources[idx];
            if s.is_empty() {
                continue;
            }
            blit_rows(self.arena.get(s.pixels.clone()), &mut canvas, &s.packed);
        }
        Page {
            id,
            width: layout.width,
            height: layout.height,
            rgba: canvas,
        }
    }
}
