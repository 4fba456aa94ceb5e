use atlas_packer_core::prelude::*;
use atlas_packer_core::trim::{compute_trim_rect, content_hash, opaque_bounds};
use image::{Rgba, RgbaImage};

fn transparent(w: u32, h: u32) -> RgbaImage {
    RgbaImage::from_pixel(w, h, Rgba([0, 0, 0, 0]))
}

#[test]
fn single_pixel_is_trimmed_to_one_by_one() {
    let mut img = transparent(4, 4);
    img.put_pixel(1, 1, Rgba([255, 0, 0, 255]));

    let mut packer = Packer::new(PackerConfig::default());
    let id = packer.add_image("dot", &img).expect("add");
    let src = packer.source(id).expect("source");
    assert_eq!(src.packed.w, 1);
    assert_eq!(src.packed.h, 1);
    assert_eq!(src.frame, Rect::new(-1, -1, 4, 4));

    let out = packer.pack().expect("pack");
    let e = out.entry("dot").expect("entry");
    assert_eq!((e.packed.w, e.packed.h), (1, 1));
    assert_eq!(e.frame, Rect::new(-1, -1, 4, 4));
    assert_eq!(e.draw_offset(), (1, 1));
    assert_eq!(e.source_size(), (4, 4));
    assert!(e.trimmed());
}

#[test]
fn fully_transparent_image_is_empty_not_an_error() {
    let img = transparent(8, 6);
    let mut packer = Packer::new(PackerConfig::default());
    let id = packer.add_image("blank", &img).expect("add");
    let src = packer.source(id).expect("source");
    assert!(src.is_empty());
    assert_eq!(src.frame, Rect::new(0, 0, 8, 6));

    let out = packer.pack().expect("pack");
    assert_eq!(out.entries.len(), 1);
    let e = &out.entries[0];
    assert!(e.packed.is_empty());
    assert_eq!(e.frame, Rect::new(0, 0, 8, 6));
    assert_eq!(e.page, 0);
}

#[test]
fn trim_disabled_keeps_full_bounds() {
    let mut img = transparent(5, 3);
    img.put_pixel(2, 1, Rgba([1, 2, 3, 4]));
    let cfg = PackerConfig::builder().trim(false).build();
    let mut packer = Packer::new(cfg);
    let id = packer.add_image("wide", &img).expect("add");
    let src = packer.source(id).expect("source");
    assert_eq!((src.packed.w, src.packed.h), (5, 3));
    assert_eq!(src.frame, Rect::new(0, 0, 5, 3));
}

#[test]
fn bounds_cover_scattered_pixels() {
    let mut img = transparent(10, 8);
    img.put_pixel(2, 6, Rgba([0, 0, 0, 1]));
    img.put_pixel(7, 1, Rgba([0, 0, 0, 200]));
    img.put_pixel(4, 4, Rgba([9, 9, 9, 255]));
    assert_eq!(compute_trim_rect(&img), Some(Rect::new(2, 1, 6, 6)));
}

#[test]
fn color_without_alpha_counts_as_transparent() {
    let mut img = transparent(3, 3);
    img.put_pixel(0, 0, Rgba([255, 255, 255, 0]));
    img.put_pixel(2, 2, Rgba([0, 0, 0, 10]));
    assert_eq!(compute_trim_rect(&img), Some(Rect::new(2, 2, 1, 1)));
}

#[test]
fn opaque_image_is_untouched() {
    let img = RgbaImage::from_pixel(6, 2, Rgba([10, 20, 30, 255]));
    assert_eq!(compute_trim_rect(&img), Some(Rect::new(0, 0, 6, 2)));
}

#[test]
fn zero_sized_image_has_no_bounds() {
    assert_eq!(opaque_bounds(0, 5, &[]), None);
    assert_eq!(opaque_bounds(5, 0, &[]), None);

    let mut packer = Packer::new(PackerConfig::default());
    let id = packer.add("nothing", 0, 4, &[]).expect("add");
    assert!(packer.source(id).expect("source").is_empty());
}

#[test]
fn hash_depends_on_pixel_order() {
    let mut a = transparent(2, 1);
    a.put_pixel(0, 0, Rgba([1, 0, 0, 255]));
    a.put_pixel(1, 0, Rgba([2, 0, 0, 255]));
    let mut b = transparent(2, 1);
    b.put_pixel(0, 0, Rgba([2, 0, 0, 255]));
    b.put_pixel(1, 0, Rgba([1, 0, 0, 255]));
    let full = Rect::new(0, 0, 2, 1);
    assert_ne!(
        content_hash(2, a.as_raw(), &full),
        content_hash(2, b.as_raw(), &full)
    );
}

#[test]
fn hash_only_sees_trimmed_pixels() {
    let mut small = transparent(2, 2);
    small.put_pixel(0, 0, Rgba([5, 6, 7, 255]));
    let mut big = transparent(9, 9);
    big.put_pixel(4, 4, Rgba([5, 6, 7, 255]));

    let hs = content_hash(2, small.as_raw(), &Rect::new(0, 0, 1, 1));
    let hb = content_hash(9, big.as_raw(), &Rect::new(4, 4, 1, 1));
    assert_eq!(hs, hb);
    assert_eq!(hs, u32::from_le_bytes([5, 6, 7, 255]));
}
