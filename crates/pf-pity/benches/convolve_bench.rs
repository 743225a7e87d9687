use criterion::{Criterion, black_box, criterion_group, criterion_main};
use pf_pity::{BannerConfig, CurveKind, PullDistribution, convolve};

fn bench_pickup(c: &mut Criterion) {
    let banner = BannerConfig::for_kind(CurveKind::Character);
    c.bench_function("character_pickup_distribution", |b| {
        b.iter(|| black_box(&banner).pickup_distribution().unwrap())
    });
}

fn bench_convolve(c: &mut Criterion) {
    let character = BannerConfig::for_kind(CurveKind::Character).pickup_distribution().unwrap();
    let light_cone = BannerConfig::for_kind(CurveKind::LightCone).pickup_distribution().unwrap();
    let two = convolve(&character, &character);

    let mut group = c.benchmark_group("convolve");
    group.sample_size(10);
    group.bench_function("character_x_light_cone", |b| {
        b.iter(|| convolve(black_box(&character), black_box(&light_cone)))
    });
    group.bench_function("two_characters_x_light_cone", |b| {
        b.iter(|| convolve(black_box(&two), black_box(&light_cone)))
    });
    group.bench_function("unit_identity", |b| {
        b.iter(|| convolve(black_box(&PullDistribution::unit()), black_box(&character)))
    });
    group.finish();
}

criterion_group!(benches, bench_pickup, bench_convolve);
criterion_main!(benches);
