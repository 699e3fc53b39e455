//! Benchmarks for the stereo reverb tank.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use quad_fm::dsp::reverb::StereoReverb;

use crate::{BLOCK_SIZES, SAMPLE_RATE};

pub fn bench_reverb(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/reverb");

    for &size in BLOCK_SIZES {
        // Impulse-like start with a quiet tail
        let input: Vec<f32> = (0..size)
            .map(|i| {
                if i < 10 {
                    1.0 - (i as f32 / 10.0)
                } else {
                    (i as f32 * 0.05).sin() * 0.1
                }
            })
            .collect();

        for (name, room, damping) in [("small_room", 0.3, 0.5), ("large_room", 0.9, 0.3)] {
            let mut reverb = StereoReverb::new(SAMPLE_RATE);
            reverb.set_room_size(room);
            reverb.set_damping(damping);
            group.bench_with_input(BenchmarkId::new(name, size), &size, |b, _| {
                b.iter(|| {
                    let mut sum = 0.0f32;
                    for &sample in &input {
                        let (l, r) = reverb.process(black_box(sample), black_box(sample));
                        sum += l + r;
                    }
                    sum
                })
            });
        }
    }

    group.finish();
}
