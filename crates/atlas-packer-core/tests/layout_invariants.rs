use atlas_packer_core::prelude::*;
use rand::{Rng, SeedableRng};

fn is_pow2(v: u32) -> bool {
    v != 0 && (v & (v - 1)) == 0
}

fn pack_random(cfg: PackerConfig, seed: u64, count: usize, max_side: u32) -> (Packer, PackOutput) {
    let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
    let mut packer = Packer::new(cfg);
    for i in 0..count {
        let w = rng.gen_range(1..=max_side);
        let h = rng.gen_range(1..=max_side);
        let shade = rng.gen_range(0..4u8);
        let px = vec![shade * 60; (w * h * 4) as usize];
        // shade 0 is fully transparent and trims to nothing
        packer.add(format!("r{}", i), w, h, &px).expect("add");
    }
    let out = packer.pack().expect("pack");
    (packer, out)
}

fn check_no_overlap(packer: &Packer, out: &PackOutput, pad: u32) {
    for page in &out.pages {
        let placed: Vec<&Entry> = out
            .entries_on(page.id)
            .filter(|e| !e.packed.is_empty())
            .filter(|e| !packer.source(e.id).expect("source").is_duplicate())
            .collect();
        for i in 0..placed.len() {
            for j in (i + 1)..placed.len() {
                let a = placed[i].packed.padded(pad);
                let b = placed[j].packed.padded(pad);
                assert!(
                    !a.intersects(&b),
                    "entries overlap: {:?} vs {:?}",
                    placed[i],
                    placed[j]
                );
            }
        }
        for e in &placed {
            assert!(e.packed.x >= 0 && e.packed.y >= 0);
            assert!(e.packed.right() < page.width as i32);
            assert!(e.packed.bottom() < page.height as i32);
        }
    }
}

#[test]
fn random_no_overlap_with_padding() {
    let cfg = PackerConfig::builder().max_page_size(256).padding(3).build();
    let (packer, out) = pack_random(cfg, 42, 300, 64);
    check_no_overlap(&packer, &out, 3);
    for p in &out.pages {
        assert!(p.width <= 256 && p.height <= 256);
    }
}

#[test]
fn every_source_gets_exactly_one_entry() {
    let cfg = PackerConfig::builder()
        .max_page_size(200)
        .combine_duplicates(true)
        .build();
    let (packer, out) = pack_random(cfg, 5, 250, 50);
    assert_eq!(out.entries.len(), packer.len());
    let mut ids: Vec<SourceId> = out.entries.iter().map(|e| e.id).collect();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), packer.len());
    for e in &out.entries {
        assert!(e.page < out.pages.len());
    }
}

#[test]
fn pow2_pages_stay_within_limit() {
    // 300 is not a power of two: layouts are capped at 256
    let cfg = PackerConfig::builder()
        .max_page_size(300)
        .padding(1)
        .pow2(true)
        .build();
    let (packer, out) = pack_random(cfg, 2024, 200, 64);
    check_no_overlap(&packer, &out, 1);
    for p in &out.pages {
        assert!(is_pow2(p.width), "width {}", p.width);
        assert!(is_pow2(p.height), "height {}", p.height);
        assert!(p.width <= 256 && p.height <= 256);
        for e in out.entries_on(p.id) {
            assert!(e.packed.x as u32 + e.packed.w <= p.width);
            assert!(e.packed.y as u32 + e.packed.h <= p.height);
        }
    }
}

#[test]
fn pow2_rounds_each_axis_independently() {
    let cfg = PackerConfig::builder()
        .max_page_size(1024)
        .padding(0)
        .trim(false)
        .pow2(true)
        .build();
    let mut packer = Packer::new(cfg);
    packer.add("strip", 100, 3, &[255; 100 * 3 * 4]).expect("add");
    let out = packer.pack().expect("pack");
    assert_eq!((out.pages[0].width, out.pages[0].height), (128, 4));
}

#[test]
fn pages_are_roughly_square() {
    let cfg = PackerConfig::builder()
        .max_page_size(4096)
        .padding(0)
        .trim(false)
        .build();
    let mut packer = Packer::new(cfg);
    for i in 0..64 {
        packer.add(format!("t{}", i), 16, 16, &[255; 16 * 16 * 4]).expect("add");
    }
    let out = packer.pack().expect("pack");
    assert_eq!(out.pages.len(), 1);
    assert_eq!((out.pages[0].width, out.pages[0].height), (128, 128));
}
