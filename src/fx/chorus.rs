use crate::{
    dsp::{delay::DelayLine, lfo::LfoPhase},
    io::AudioBlock,
};
use std::f32::consts::PI;

/*
Chorus
======

Two interpolated taps swept in opposite phase, each with a slight extra
pitch wobble, mixed with the dry signal:

    pm1 = 1 + 0.001 · sin(lfo + 0.5)
    pm2 = 1 + 0.001 · sin(lfo − 0.5)

    d1  = 20 + depth_ms · sr · (0.5 + 0.4 · sin(lfo))     / 1000 · pm1
    d2  = 20 + depth_ms · sr · (0.5 + 0.4 · sin(lfo + π)) / 1000 · pm2

    out = 0.3 · dry + 0.3 · tap(d1) + 0.4 · tap(d2)

The mixed output is written back into the buffer, so the taps also carry
earlier chorus output. The loop gain is at most 0.7 and always decays.

The buffer is sized once from `BUFFER_SECONDS · sample_rate` and is far
longer than the deepest sweep (20 + 15 ms · 0.9 at any rate).
*/

const BASE_DELAY_SAMPLES: f32 = 20.0;
const BUFFER_SECONDS: f32 = 0.5;
const PITCH_WOBBLE: f32 = 0.001;

const DRY: f32 = 0.3;
const WET_1: f32 = 0.3;
const WET_2: f32 = 0.4;

#[derive(Debug, Clone)]
pub struct Chorus {
    /// LFO rate in Hz.
    rate: f32,
    /// Sweep depth in milliseconds.
    depth: f32,
    lfo: LfoPhase,
    line: DelayLine,
    sample_rate: f32,
}

impl Chorus {
    pub fn new(sample_rate: f32, rate_hz: f32, depth_ms: f32) -> Self {
        Self {
            rate: rate_hz,
            depth: depth_ms,
            lfo: LfoPhase::new(),
            line: DelayLine::new(buffer_len(sample_rate)),
            sample_rate,
        }
    }

    pub fn set_rate(&mut self, rate_hz: f32) {
        self.rate = rate_hz;
    }

    pub fn set_depth(&mut self, depth_ms: f32) {
        self.depth = depth_ms;
    }

    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        let len = buffer_len(sample_rate);
        self.line.grow(len);
        self.line.set_len(len);
    }

    /// Tap delays in samples for LFO phase `phase`.
    pub fn tap_delays(&self, phase: f32) -> (f32, f32) {
        let pm1 = 1.0 + PITCH_WOBBLE * (phase + 0.5).sin();
        let pm2 = 1.0 + PITCH_WOBBLE * (phase - 0.5).sin();
        let span = self.depth * self.sample_rate / 1000.0;

        let d1 = BASE_DELAY_SAMPLES + span * (0.5 + 0.4 * phase.sin()) * pm1;
        let d2 = BASE_DELAY_SAMPLES + span * (0.5 + 0.4 * (phase + PI).sin()) * pm2;
        (d1, d2)
    }

    pub fn process_block(&mut self, block: &mut AudioBlock) {
        let (rate, sample_rate) = (self.rate, self.sample_rate);

        for frame in block.frames_mut() {
            let dry = frame[0];
            let (d1, d2) = self.tap_delays(self.lfo.phase());
            self.lfo.advance(rate, sample_rate);

            let out = dry * DRY
                + self.line.tap_interpolated(d1) * WET_1
                + self.line.tap_interpolated(d2) * WET_2;

            self.line.write(out);
            self.line.advance();
            frame.fill(out);
        }
    }
}

fn buffer_len(sample_rate: f32) -> usize {
    ((BUFFER_SECONDS * sample_rate) as usize).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn taps_sweep_in_opposite_phase() {
        let chorus = Chorus::new(48_000.0, 0.25, 7.5);
        // 7.5 ms at 48 kHz = 360 samples of span
        let (d1, d2) = chorus.tap_delays(0.0);
        let pm1 = 1.0 + 0.001 * 0.5f32.sin();
        let pm2 = 1.0 + 0.001 * (-0.5f32).sin();
        assert!((d1 - (20.0 + 180.0 * pm1)).abs() < 1e-2, "d1 {d1}");
        assert!((d2 - (20.0 + 180.0 * pm2)).abs() < 1e-2, "d2 {d2}");

        let (d1, d2) = chorus.tap_delays(PI / 2.0);
        assert!(d1 > d2, "first tap at its longest when the second is shortest");
    }

    #[test]
    fn output_is_mirrored_and_bounded() {
        let mut chorus = Chorus::new(48_000.0, 2.0, 15.0);
        let mut data: Vec<f32> = (0..48_000)
            .flat_map(|n| {
                let s = (n as f32 * 0.05).sin();
                [s, 0.0]
            })
            .collect();
        let mut block = AudioBlock::new(&mut data, 2).unwrap();
        chorus.process_block(&mut block);

        for frame in data.chunks_exact(2) {
            assert_eq!(frame[0], frame[1]);
            // |out| ≤ 0.3 / (1 − 0.7)
            assert!(frame[0].abs() <= 1.0 + 1e-4, "got {}", frame[0]);
        }
    }

    #[test]
    fn silence_in_silence_out() {
        let mut chorus = Chorus::new(44_100.0, 0.25, 7.5);
        let mut data = vec![0.0; 2 * 1_024];
        let mut block = AudioBlock::new(&mut data, 2).unwrap();
        chorus.process_block(&mut block);
        assert!(data.iter().all(|&s| s == 0.0));
    }
}
