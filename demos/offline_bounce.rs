//! Render a few seconds of the FM voice offline and print level statistics.
//!
//! Run with: cargo run --example offline_bounce

use quad_fm::{split, EngineConfig, SynthError};

const SAMPLE_RATE: f32 = 48_000.0;
const BLOCK_FRAMES: usize = 256;

fn main() -> Result<(), SynthError> {
    tracing_subscriber::fmt::init();

    let config = EngineConfig::default().with_sample_rate(SAMPLE_RATE);
    let (mut controller, mut synth) = split(&config);

    controller.set_level(0, 0.8)?;
    controller.set_attack(0, 0.01)?;
    controller.set_release(0, 0.5)?;
    controller.set_modulation_depth(2, 0, 150.0)?;
    controller.set_modulation_depth(3, 2, 80.0)?;
    controller.set_effect_enabled(2, true)?; // Delay
    controller.set_effect_param(2, 1, 0.25)?;

    let mut block = vec![0.0f32; BLOCK_FRAMES * config.channels];
    let blocks_per_second = (SAMPLE_RATE as usize) / BLOCK_FRAMES;

    for (second, freq) in [220.0, 277.18, 329.63].into_iter().enumerate() {
        controller.note_on(freq)?;
        let (mut peak, mut energy) = (0.0f32, 0.0f32);

        for b in 0..blocks_per_second {
            if b == blocks_per_second / 2 {
                controller.note_off()?;
            }
            synth.render(&mut block)?;
            for &s in block.iter().step_by(config.channels) {
                peak = peak.max(s.abs());
                energy += s * s;
            }
        }

        let rms = (energy / (blocks_per_second * BLOCK_FRAMES) as f32).sqrt();
        println!("second {second}: {freq:>7.2} Hz  peak {peak:.3}  rms {rms:.3}");
    }
    Ok(())
}
