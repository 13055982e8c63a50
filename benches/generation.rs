use criterion::{Criterion, black_box, criterion_group, criterion_main};

use rand::SeedableRng;
use rand_pcg::Pcg64Mcg;

use voxtree::generation::{TreeGenerator, TreeParams, TreeStyle, grow};
use voxtree::vox;
use voxtree::voxel::{Palette, PaletteIndexMap};

fn bench_broadleaf_skeleton(c: &mut Criterion) {
    let params = TreeParams::broadleaf().clamped();

    c.bench_function("broadleaf_skeleton", |b| {
        b.iter(|| {
            let mut rng = Pcg64Mcg::seed_from_u64(black_box(1));
            grow(black_box(&params), &mut rng)
        });
    });
}

fn bench_conifer_skeleton(c: &mut Criterion) {
    let params = TreeParams::conifer().clamped();

    c.bench_function("conifer_skeleton", |b| {
        b.iter(|| {
            let mut rng = Pcg64Mcg::seed_from_u64(black_box(1));
            grow(black_box(&params), &mut rng)
        });
    });
}

fn bench_broadleaf_generate(c: &mut Criterion) {
    let generator = TreeGenerator::from_style(TreeStyle::Broadleaf, 1);
    let palette = Palette::builtin();
    let slots = PaletteIndexMap::default();

    c.bench_function("broadleaf_generate", |b| {
        b.iter(|| generator.generate(black_box(&palette), black_box(&slots)));
    });
}

fn bench_conifer_generate(c: &mut Criterion) {
    let generator = TreeGenerator::from_style(TreeStyle::Conifer, 1);
    let palette = Palette::builtin();
    let slots = PaletteIndexMap::default();

    c.bench_function("conifer_generate", |b| {
        b.iter(|| generator.generate(black_box(&palette), black_box(&slots)));
    });
}

fn bench_vox_encode(c: &mut Criterion) {
    let generator = TreeGenerator::from_style(TreeStyle::Broadleaf, 1);
    let palette = Palette::builtin();
    let grid = generator.build_grid(&PaletteIndexMap::default());

    c.bench_function("vox_encode", |b| {
        b.iter(|| vox::encode(black_box(&grid), black_box(&palette)));
    });
}

criterion_group!(
    benches,
    bench_broadleaf_skeleton,
    bench_conifer_skeleton,
    bench_broadleaf_generate,
    bench_conifer_generate,
    bench_vox_encode,
);
criterion_main!(benches);
