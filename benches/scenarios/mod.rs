//! Whole-engine scenarios.
//!
//! These model the patches a player actually builds: a plain operator,
//! stacked FM and a full patch with effects.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use quad_fm::{EngineConfig, FmEngine};

use crate::{BLOCK_SIZES, SAMPLE_RATE};

fn engine(edges: &[(usize, usize, f32)], effects: &[usize]) -> FmEngine {
    let mut engine = FmEngine::new(&EngineConfig::default().with_sample_rate(SAMPLE_RATE));
    for osc in 0..4 {
        let _ = engine.set_level(osc, if osc == 0 { 1.0 } else { 0.0 });
    }
    for &(modulator, carrier, depth) in edges {
        engine.set_modulation_depth(modulator, carrier, depth);
    }
    for &slot in effects {
        let _ = engine.chain_mut().set_enabled(slot, true);
    }
    engine.note_on(220.0);
    engine
}

pub fn bench_engine(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/engine");

    let patches: [(&str, FmEngine); 4] = [
        ("single_operator", engine(&[], &[])),
        ("two_op_fm", engine(&[(1, 0, 300.0)], &[])),
        (
            "four_op_stack",
            engine(&[(3, 2, 80.0), (2, 1, 150.0), (1, 0, 300.0)], &[]),
        ),
        (
            "stack_with_chorus_reverb",
            engine(&[(3, 2, 80.0), (2, 1, 150.0), (1, 0, 300.0)], &[1, 4]),
        ),
    ];

    for &size in BLOCK_SIZES {
        for (name, patch) in &patches {
            let mut engine_state = patch.clone();
            let mut buffer = vec![0.0f32; size * 2];
            group.bench_with_input(BenchmarkId::new(*name, size), &size, |b, _| {
                b.iter(|| {
                    let _ = engine_state.render_interleaved(black_box(&mut buffer), 2);
                })
            });
        }
    }

    group.finish();
}
