//! Benchmarks for the bitviz pipeline.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use bitviz::parser::compile;
use bitviz::types::{BuiltIn, GenerationRequest, Mode, Resolution};
use bitviz::{generate, Generator};

// -- Compilation benchmarks --

fn bench_compile(c: &mut Criterion) {
    let mut group = c.benchmark_group("compile");

    group.bench_function("compile_simple", |b| {
        b.iter(|| compile(black_box("x ^ (x << 13)")).unwrap())
    });

    group.bench_function("compile_complex", |b| {
        b.iter(|| compile(black_box("(x ^ (x >> 15)) * (x | 0x55555555) ROL 7 + ~x")).unwrap())
    });

    group.finish();
}

// -- Step function benchmarks --

fn bench_step(c: &mut Criterion) {
    let mut group = c.benchmark_group("step");

    let custom = Generator::Custom(compile("x ^ (x << 13)").unwrap());
    let builtin = Generator::BuiltIn(BuiltIn::Xorshift32);

    group.bench_function("custom_1k", |b| {
        b.iter(|| custom.iter(black_box(12345)).take(1000).fold(0u32, |a, v| a ^ v))
    });

    group.bench_function("builtin_1k", |b| {
        b.iter(|| builtin.iter(black_box(12345)).take(1000).fold(0u32, |a, v| a ^ v))
    });

    group.finish();
}

// -- Generation benchmarks --

fn bench_generate(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate");
    group.sample_size(20);

    for mode in Mode::ALL {
        let request = GenerationRequest::new("x ^ (x ROL 13)")
            .with_resolution(Resolution::R256)
            .with_mode(mode);

        group.bench_function(format!("generate_256_{}", mode.id()), |b| {
            b.iter(|| generate(black_box(&request), &mut |_: f64| {}).unwrap())
        });
    }

    let stretched = GenerationRequest::built_in(BuiltIn::Lcg)
        .with_contrast(bitviz::ContrastConfig::auto());
    group.bench_function("generate_256_contrast", |b| {
        b.iter(|| generate(black_box(&stretched), &mut |_: f64| {}).unwrap())
    });

    group.finish();
}

criterion_group!(benches, bench_compile, bench_step, bench_generate);
criterion_main!(benches);
