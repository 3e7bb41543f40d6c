use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;

use kirchhoff_core::model::{ParamConstraint, ParameterSchema};
use kirchhoff_core::render::render;
use kirchhoff_core::sampler::sample;

fn divider_schema() -> ParameterSchema {
    ParameterSchema::default()
        .with_param("Vs", ParamConstraint::bounded(5.0, 24.0))
        .with_param("R1", ParamConstraint::default())
        .with_param("R2", ParamConstraint::default())
        .with_param("R3", ParamConstraint::default())
}

fn bench_sample(c: &mut Criterion) {
    let mut group = c.benchmark_group("sample");
    let schema = divider_schema();

    group.bench_function("divider", |b| {
        let mut rng = StdRng::seed_from_u64(0);
        b.iter(|| sample(black_box(&schema), &mut rng))
    });

    let wide = (0..32).fold(ParameterSchema::default(), |schema, i| {
        schema.with_param(&format!("k{i}"), ParamConstraint::bounded(0.0, 1000.0))
    });
    group.bench_function("32_quantities", |b| {
        let mut rng = StdRng::seed_from_u64(0);
        b.iter(|| sample(black_box(&wide), &mut rng))
    });

    group.finish();
}

fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("render");
    let params = sample(&divider_schema(), &mut StdRng::seed_from_u64(1)).unwrap();

    let short = "A {{Vs}} V source drives R1 = {{R1}} Ω in series with R2 = {{R2}} Ω \
                 in parallel with R3 = {{R3}} Ω. Find Vx.";

    let long = {
        let mut s = String::new();
        for i in 0..200 {
            s.push_str(&format!("Step {i}: Vs={{{{Vs}}}}, R1={{{{R1}}}}, {{{{missing}}}}.\n"));
        }
        s
    };

    group.bench_function("short", |b| {
        b.iter(|| render(black_box(short), black_box(&params)))
    });

    group.bench_function("long_with_unmatched", |b| {
        b.iter(|| render(black_box(&long), black_box(&params)))
    });

    group.finish();
}

criterion_group!(benches, bench_sample, bench_render);
criterion_main!(benches);
