use std::path::{Path, PathBuf};

use globset::{Glob, GlobSet, GlobSetBuilder};
use image::{ImageReader, RgbaImage};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, warn};
use walkdir::WalkDir;

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg"];

/// Include/exclude globs matched against `/`-separated paths.
#[derive(Debug, Default)]
pub struct PathFilter {
    include: Option<GlobSet>,
    exclude: Option<GlobSet>,
}

impl PathFilter {
    pub fn new(include: &[String], exclude: &[String]) -> anyhow::Result<Self> {
        Ok(Self {
            include: globset_of(include)?,
            exclude: globset_of(exclude)?,
        })
    }

    pub fn accepts(&self, p: &Path) -> bool {
        if !has_image_extension(p) {
            return false;
        }
        let s = p.to_string_lossy().replace('\\', "/");
        if self.exclude.as_ref().is_some_and(|ex| ex.is_match(&s)) {
            return false;
        }
        self.include.as_ref().is_none_or(|inc| inc.is_match(&s))
    }
}

fn globset_of(patterns: &[String]) -> anyhow::Result<Option<GlobSet>> {
    if patterns.is_empty() {
        return Ok(None);
    }
    let mut builder = GlobSetBuilder::new();
    for pat in patterns {
        builder.add(Glob::new(pat)?);
    }
    Ok(Some(builder.build()?))
}

fn has_image_extension(p: &Path) -> bool {
    p.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| IMAGE_EXTENSIONS.iter().any(|known| ext.eq_ignore_ascii_case(known)))
}

/// Image files under `root` (or `root` itself) accepted by `filter`, sorted.
pub fn collect_paths(root: &Path, filter: &PathFilter) -> Vec<PathBuf> {
    let mut list: Vec<PathBuf> = if root.is_file() {
        vec![root.to_path_buf()]
    } else {
        WalkDir::new(root)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .map(|e| e.into_path())
            .collect()
    };
    list.retain(|p| filter.accepts(p));
    list.sort();
    debug!(root = %root.display(), count = list.len(), "collected input paths");
    list
}

/// Key for `p`: path relative to `root` with `/` separators (file name for a single-file input).
pub fn source_key(root: &Path, p: &Path) -> String {
    let rel = match p.strip_prefix(root) {
        Ok(rel) if !rel.as_os_str().is_empty() => rel,
        _ => p.file_name().map(Path::new).unwrap_or(p),
    };
    rel.to_string_lossy().replace('\\', "/")
}

/// Decodes every path to RGBA8, keyed by [`source_key`]. Undecodable files are logged and skipped.
pub fn decode_all(
    root: &Path,
    paths: &[PathBuf],
    show_progress: bool,
) -> anyhow::Result<Vec<(String, RgbaImage)>> {
    let bar = if show_progress {
        let bar = ProgressBar::new(paths.len() as u64);
        bar.set_style(ProgressStyle::with_template(
            "{spinner:.cyan} decoding {pos}/{len} [{elapsed_precise}] {wide_msg}",
        )?);
        Some(bar)
    } else {
        None
    };

    let mut decoded = Vec::with_capacity(paths.len());
    for p in paths {
        let key = source_key(root, p);
        if let Some(bar) = &bar {
            bar.set_message(key.clone());
        }
        match decode(p) {
            Ok(img) => decoded.push((key, img)),
            Err(e) => warn!(path = %p.display(), error = %e, "skipping undecodable image"),
        }
        if let Some(bar) = &bar {
            bar.inc(1);
        }
    }
    if let Some(bar) = bar {
        bar.finish_and_clear();
    }
    Ok(decoded)
}

fn decode(p: &Path) -> anyhow::Result<RgbaImage> {
    Ok(ImageReader::open(p)?.with_guessed_format()?.decode()?.to_rgba8())
}
