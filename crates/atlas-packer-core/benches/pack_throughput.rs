use atlas_packer_core::prelude::*;
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use rand::{Rng, SeedableRng};
use std::hint::black_box;

fn generate_sprites(count: usize, min_size: u32, max_size: u32) -> Vec<(String, u32, u32, Vec<u8>)> {
    let mut rng = rand::rngs::StdRng::seed_from_u64(count as u64);
    (0..count)
        .map(|i| {
            let w = rng.gen_range(min_size..=max_size);
            let h = rng.gen_range(min_size..=max_size);
            let shade = rng.gen_range(1..=255u8);
            (format!("sprite_{}", i), w, h, vec![shade; (w * h * 4) as usize])
        })
        .collect()
}

fn fill(cfg: &PackerConfig, sprites: &[(String, u32, u32, Vec<u8>)]) -> Packer {
    let mut packer = Packer::new(cfg.clone());
    for (name, w, h, px) in sprites {
        let _ = packer.add(name.as_str(), *w, *h, px);
    }
    packer
}

fn bench_add(c: &mut Criterion) {
    let mut group = c.benchmark_group("add");

    for count in [100, 500, 1000] {
        let sprites = generate_sprites(count, 8, 64);
        group.throughput(Throughput::Elements(count as u64));

        for (label, combine) in [("plain", false), ("dedup", true)] {
            let cfg = PackerConfig::builder().combine_duplicates(combine).build();
            group.bench_with_input(BenchmarkId::new(label, count), &sprites, |b, sprites| {
                b.iter(|| black_box(fill(&cfg, sprites)));
            });
        }
    }

    group.finish();
}

fn bench_pack(c: &mut Criterion) {
    let mut group = c.benchmark_group("pack");

    for count in [100, 500, 1000] {
        let sprites = generate_sprites(count, 8, 64);
        group.throughput(Throughput::Elements(count as u64));

        for (label, max) in [("page_1024", 1024), ("page_256", 256)] {
            let cfg = PackerConfig::builder().max_page_size(max).build();
            let packer = fill(&cfg, &sprites);
            group.bench_with_input(BenchmarkId::new(label, count), &packer, |b, packer| {
                b.iter(|| {
                    let mut packer = packer.clone();
                    black_box(packer.pack())
                });
            });
        }
    }

    group.finish();
}

criterion_group!(benches, bench_add, bench_pack);
criterion_main!(benches);
