//! Benchmarks for the FM operator oscillator.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use quad_fm::dsp::{Oscillator, Waveform};

use crate::{BLOCK_SIZES, SAMPLE_RATE};

pub fn bench_oscillator(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/oscillator");

    for &size in BLOCK_SIZES {
        for waveform in Waveform::ALL {
            let mut osc = Oscillator::new().with_waveform(waveform).with_level(1.0);
            osc.set_sample_rate(SAMPLE_RATE);
            osc.set_frequency(440.0);
            osc.note_on();

            let id = BenchmarkId::new(format!("{waveform:?}").to_lowercase(), size);
            group.bench_with_input(id, &size, |b, &size| {
                b.iter(|| {
                    let mut sum = 0.0f32;
                    for _ in 0..size {
                        sum += osc.next_sample();
                    }
                    black_box(sum)
                })
            });
        }

        // Frequency rewritten every sample, as the matrix does for carriers
        let mut osc = Oscillator::new().with_level(1.0);
        osc.set_sample_rate(SAMPLE_RATE);
        osc.note_on();
        group.bench_with_input(BenchmarkId::new("modulated", size), &size, |b, &size| {
            b.iter(|| {
                let mut sum = 0.0f32;
                for n in 0..size {
                    osc.set_frequency(black_box(440.0 + (n % 7) as f32 * 30.0));
                    sum += osc.next_sample();
                }
                black_box(sum)
            })
        });
    }

    group.finish();
}
