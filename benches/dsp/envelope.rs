//! Benchmarks for ADSR envelope generator.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use quad_fm::dsp::Envelope;

use crate::{BLOCK_SIZES, SAMPLE_RATE};

fn run(env: &mut Envelope, size: usize) -> f32 {
    let mut sum = 0.0f32;
    for _ in 0..size {
        sum += env.apply(black_box(1.0));
    }
    sum
}

pub fn bench_envelope(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/envelope");

    for &size in BLOCK_SIZES {
        // Attack phase (ramping up)
        let mut env = Envelope::adsr(SAMPLE_RATE, 10.0, 0.1, 0.7, 0.3);
        env.note_on();
        group.bench_with_input(BenchmarkId::new("attack", size), &size, |b, &size| {
            b.iter(|| run(&mut env, size))
        });

        // Sustain phase (holding steady)
        let mut env = Envelope::adsr(SAMPLE_RATE, 0.001, 0.001, 0.7, 0.3);
        env.note_on();
        for _ in 0..200 {
            env.apply(1.0);
        }
        group.bench_with_input(BenchmarkId::new("sustain", size), &size, |b, &size| {
            b.iter(|| run(&mut env, size))
        });

        // Release phase (ramping down)
        let mut env = Envelope::adsr(SAMPLE_RATE, 0.001, 0.001, 0.7, 10.0);
        env.note_on();
        for _ in 0..200 {
            env.apply(1.0);
        }
        env.note_off();
        group.bench_with_input(BenchmarkId::new("release", size), &size, |b, &size| {
            b.iter(|| run(&mut env, size))
        });
    }

    group.finish();
}
