//! quadfm - play a short FM arpeggio through the default output device
//!
//! Run with: cargo run --bin quadfm

use std::{
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
    thread,
    time::Duration,
};

use color_eyre::eyre::{eyre, Result, WrapErr};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use quad_fm::{fx::EffectKind, io::converter::midi_note_to_freq, split, EngineConfig};
use tracing::{error, info, warn};

/// Keys of the arpeggio, played one octave lower by the voice.
const ARPEGGIO: [u8; 8] = [60, 64, 67, 72, 76, 72, 67, 64];
const NOTE_MS: u64 = 300;
const GATE_MS: u64 = 220;

fn main() -> Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt::init();

    let host = cpal::default_host();
    let device = host
        .default_output_device()
        .ok_or_else(|| eyre!("no audio output device found"))?;
    info!("Audio device: {}", device.name()?);

    let config = device
        .default_output_config()
        .wrap_err("querying default output config")?;
    if config.sample_format() != cpal::SampleFormat::F32 {
        return Err(eyre!("unsupported sample format {:?}", config.sample_format()));
    }

    let sample_rate = config.sample_rate().0 as f32;
    let channels = config.channels() as usize;
    if channels < 2 {
        return Err(eyre!("need a stereo output device, got {channels} channel(s)"));
    }
    info!(sample_rate, channels, "audio config");

    let engine_config = EngineConfig::default()
        .with_sample_rate(sample_rate)
        .with_channels(channels);
    let (mut controller, mut synth) = split(&engine_config);

    // Patch: osc 1 drives osc 0, only osc 0 is heard
    controller.set_level(0, 0.6)?;
    controller.set_attack(0, 0.01)?;
    controller.set_decay(0, 0.2)?;
    controller.set_sustain(0, 0.5)?;
    controller.set_release(0, 0.4)?;
    controller.set_octave(1, 1)?;
    controller.set_sustain(1, 0.8)?;
    controller.set_modulation_depth(1, 0, 300.0)?;

    for kind in [EffectKind::Chorus, EffectKind::Reverb] {
        let slot = controller
            .effects()
            .iter()
            .position(|slot| slot.kind == kind)
            .ok_or_else(|| eyre!("{} missing from the chain", kind.name()))?;
        controller.set_effect_enabled(slot, true)?;
    }

    // The callback only counts failures; they are reported from this thread
    let render_failures = Arc::new(AtomicUsize::new(0));
    let callback_failures = Arc::clone(&render_failures);

    let stream = device.build_output_stream(
        &config.into(),
        move |data: &mut [f32], _| {
            if synth.render(data).is_err() {
                data.fill(0.0);
                callback_failures.fetch_add(1, Ordering::Relaxed);
            }
        },
        |err| error!("Audio stream error: {}", err),
        None,
    )?;
    stream.play()?;
    info!("playing");

    let mut reported = 0;
    let mut report_failures = || {
        let failures = render_failures.load(Ordering::Relaxed);
        if failures > reported {
            warn!(
                failures = failures - reported,
                channels, "device buffers did not match the channel layout; output silenced"
            );
            reported = failures;
        }
    };

    for &key in ARPEGGIO.iter().cycle().take(ARPEGGIO.len() * 2) {
        controller.note_on(midi_note_to_freq(key))?;
        thread::sleep(Duration::from_millis(GATE_MS));
        controller.note_off()?;
        thread::sleep(Duration::from_millis(NOTE_MS - GATE_MS));
        report_failures();
    }

    // Let the release and reverb tails ring out
    thread::sleep(Duration::from_secs(2));
    report_failures();
    Ok(())
}
