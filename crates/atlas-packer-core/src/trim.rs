use crate::model::Rect;
use image::RgbaImage;

/// Tight bounding box of pixels with alpha > 0 in a tightly packed RGBA8 buffer.
///
/// Scans top rows first, then left columns, right columns and bottom rows, each pass limited
/// by the bounds found so far. Returns `None` for fully transparent (or zero-sized) images.
pub fn opaque_bounds(width: u32, height: u32, pixels: &[u8]) -> Option<Rect> {
    let stride = width as usize * 4;
    let alpha = |x: u32, y: u32| pixels[y as usize * stride + x as usize * 4 + 3];

    let mut top = 0;
    while top < height && (0..width).all(|x| alpha(x, top) == 0) {
        top += 1;
    }
    if top >= height {
        return None;
    }

    let mut left = 0;
    while left < width && (top..height).all(|y| alpha(left, y) == 0) {
        left += 1;
    }

    let mut right = width;
    while right > left && (top..height).all(|y| alpha(right - 1, y) == 0) {
        right -= 1;
    }

    let mut bottom = height;
    while bottom > top && (left..right).all(|x| alpha(x, bottom - 1) == 0) {
        bottom -= 1;
    }

    Some(Rect::new(
        left as i32,
        top as i32,
        right - left,
        bottom - top,
    ))
}

/// Same as [`opaque_bounds`] for an `image` buffer.
pub fn compute_trim_rect(rgba: &RgbaImage) -> Option<Rect> {
    let (w, h) = rgba.dimensions();
    opaque_bounds(w, h, rgba.as_raw())
}

/// Rolling `hash * 31 + pixel` over the pixels inside `bounds`, row-major.
/// Each pixel is its RGBA bytes read as a little-endian `u32`.
pub fn content_hash(width: u32, pixels: &[u8], bounds: &Rect) -> u32 {
    let mut hash = 0u32;
    for row in rows(width, pixels, bounds) {
        for px in row.chunks_exact(4) {
            let value = u32::from_le_bytes([px[0], px[1], px[2], px[3]]);
            hash = hash.wrapping_mul(31).wrapping_add(value);
        }
    }
    hash
}

/// Byte slices of each row of `bounds` inside a `width`-wide RGBA8 buffer.
pub(crate) fn rows<'a>(
    width: u32,
    pixels: &'a [u8],
    bounds: &Rect,
) -> impl Iterator<Item = &'a [u8]> + 'a {
    let stride = width as usize * 4;
    let start = bounds.x as usize * 4;
    let len = bounds.w as usize * 4;
    let top = bounds.y as usize;
    (top..top + bounds.h as usize).map(move |y| {
        let off = y * stride + start;
        &pixels[off..off + len]
    })
}
