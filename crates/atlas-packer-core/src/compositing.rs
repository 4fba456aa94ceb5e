use crate::model::Rect;
use image::RgbaImage;

/// Copy tightly packed RGBA8 rows (`dst.w * 4` bytes each) into `canvas` at `dst`.
///
/// Rows or columns falling outside the canvas are clipped.
pub fn blit_rows(src: &[u8], canvas: &mut RgbaImage, dst: &Rect) {
    let (cw, ch) = canvas.dimensions();
    if dst.is_empty() || dst.x < 0 || dst.y < 0 {
        return;
    }
    let (dx, dy) = (dst.x as u32, dst.y as u32);
    if dx >= cw || dy >= ch {
        return;
    }
    let src_stride = dst.w as usize * 4;
    let copy_w = dst.w.min(cw - dx) as usize * 4;
    let rows = dst.h.min(ch - dy) as usize;
    let canvas_stride = cw as usize * 4;
    let buf: &mut [u8] = canvas;
    for (row, line) in src.chunks_exact(src_stride).take(rows).enumerate() {
        let off = (dy as usize + row) * canvas_stride + dx as usize * 4;
        buf[off..off + copy_w].copy_from_slice(&line[..copy_w]);
    }
}

/// Smallest power of two that is >= `v` (1 for 0).
pub fn next_pow2(v: u32) -> u32 {
    v.max(1).next_power_of_two()
}

/// Largest power of two that is <= `v` (0 for 0).
pub fn prev_pow2(v: u32) -> u32 {
    if v == 0 {
        0
    } else {
        1 << (31 - v.leading_zeros())
    }
}
