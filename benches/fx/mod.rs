//! Benchmarks for the effect units and the chain.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use quad_fm::{
    fx::{EffectChain, EffectKind, EffectUnit},
    io::AudioBlock,
};

use crate::{stereo_signal, BLOCK_SIZES, SAMPLE_RATE};

pub fn bench_effects(c: &mut Criterion) {
    let mut group = c.benchmark_group("fx/unit");

    for &size in BLOCK_SIZES {
        let input = stereo_signal(size);
        let mut buffer = input.clone();

        for kind in EffectKind::ALL {
            let mut unit = EffectUnit::new(kind, SAMPLE_RATE);
            let id = BenchmarkId::new(kind.name().to_lowercase(), size);
            group.bench_with_input(id, &size, |b, _| {
                b.iter(|| {
                    buffer.copy_from_slice(&input);
                    if let Ok(mut block) = AudioBlock::new(&mut buffer, 2) {
                        unit.process_block(black_box(&mut block));
                    }
                })
            });
        }
    }

    group.finish();
}

pub fn bench_chain(c: &mut Criterion) {
    let mut group = c.benchmark_group("fx/chain");

    for &size in BLOCK_SIZES {
        let input = stereo_signal(size);
        let mut buffer = input.clone();

        let mut chain = EffectChain::new(SAMPLE_RATE);
        group.bench_with_input(BenchmarkId::new("bypassed", size), &size, |b, _| {
            b.iter(|| {
                buffer.copy_from_slice(&input);
                if let Ok(mut block) = AudioBlock::new(&mut buffer, 2) {
                    chain.process(black_box(&mut block));
                }
            })
        });

        let mut chain = EffectChain::new(SAMPLE_RATE);
        for slot in 0..chain.len() {
            let _ = chain.set_enabled(slot, true);
        }
        group.bench_with_input(BenchmarkId::new("all_enabled", size), &size, |b, _| {
            b.iter(|| {
                buffer.copy_from_slice(&input);
                if let Ok(mut block) = AudioBlock::new(&mut buffer, 2) {
                    chain.process(black_box(&mut block));
                }
            })
        });
    }

    group.finish();
}
