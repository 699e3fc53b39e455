use crate::{
    dsp::{delay::DelayLine, lfo::LfoPhase},
    io::AudioBlock,
};

/*
Flanger
=======

A short delay swept by an LFO and mixed back with the dry signal. The
comb-filter notches produced by the mix move with the sweep.

    depth_samples = depth_ms · sample_rate / 1000
    tap           = ⌊depth_samples · (0.5 + 0.4 · sin(lfo))⌋
    out           = 0.7 · dry + 0.3 · buffer[pos − tap]

The tap sweeps between 10% and 90% of the depth, and the buffer wraps at
exactly `depth_samples` so the tap never reaches past it. Only the dry
signal is written back: there is no feedback path.
*/

const DRY: f32 = 0.7;
const WET: f32 = 0.3;

#[derive(Debug, Clone)]
pub struct Flanger {
    /// LFO rate in Hz.
    rate: f32,
    /// Sweep depth in milliseconds.
    depth: f32,
    lfo: LfoPhase,
    line: DelayLine,
    sample_rate: f32,
}

impl Flanger {
    pub fn new(sample_rate: f32, rate_hz: f32, depth_ms: f32) -> Self {
        let mut flanger = Self {
            rate: rate_hz,
            depth: depth_ms,
            lfo: LfoPhase::new(),
            line: DelayLine::new(1),
            sample_rate,
        };
        flanger.resize();
        flanger
    }

    pub fn set_rate(&mut self, rate_hz: f32) {
        self.rate = rate_hz;
    }

    pub fn set_depth(&mut self, depth_ms: f32) {
        self.depth = depth_ms;
        self.resize();
    }

    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.resize();
    }

    pub fn depth_samples(&self) -> f32 {
        self.depth * self.sample_rate / 1000.0
    }

    /// Wrap length of the delay buffer.
    pub fn buffer_len(&self) -> usize {
        self.line.len()
    }

    fn resize(&mut self) {
        let len = (self.depth_samples() as usize).max(1);
        self.line.grow(len);
        self.line.set_len(len);
    }

    pub fn process_block(&mut self, block: &mut AudioBlock) {
        let depth_samples = self.depth_samples();
        let (rate, sample_rate) = (self.rate, self.sample_rate);
        let Self { lfo, line, .. } = self;

        block.process_mono(|dry| {
            let sweep = depth_samples * (0.5 + 0.4 * lfo.phase().sin());
            lfo.advance(rate, sample_rate);

            let delayed = line.tap(sweep as usize);
            line.write(dry);
            line.advance();

            dry * DRY + delayed * WET
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buffer_tracks_depth() {
        let mut flanger = Flanger::new(48_000.0, 1.25, 7.5);
        assert_eq!(flanger.buffer_len(), 360);

        flanger.set_depth(15.0);
        assert_eq!(flanger.buffer_len(), 720);

        flanger.set_depth(1.0);
        assert_eq!(flanger.buffer_len(), 48);

        flanger.set_depth(0.0);
        assert_eq!(flanger.buffer_len(), 1, "never zero length");
    }

    #[test]
    fn dc_passes_at_unity_once_buffer_fills() {
        let mut flanger = Flanger::new(48_000.0, 1.0, 5.0);
        let mut data = vec![1.0; 2 * 4_800];
        let mut block = AudioBlock::new(&mut data, 2).unwrap();
        flanger.process_block(&mut block);

        // 0.7 · 1 + 0.3 · 1 once the whole buffer holds the DC input
        for frame in data.chunks_exact(2).skip(1_000) {
            assert!((frame[0] - 1.0).abs() < 1e-6, "got {}", frame[0]);
            assert_eq!(frame[0], frame[1]);
        }
    }

    #[test]
    fn impulse_echo_lands_inside_sweep_range() {
        let mut flanger = Flanger::new(10_000.0, 0.1, 10.0);
        let mut data = vec![0.0; 2 * 200];
        data[0] = 1.0;
        let mut block = AudioBlock::new(&mut data, 2).unwrap();
        flanger.process_block(&mut block);

        let left: Vec<f32> = data.chunks_exact(2).map(|f| f[0]).collect();
        assert!((left[0] - DRY).abs() < 1e-6);

        let echo = left
            .iter()
            .enumerate()
            .skip(1)
            .find(|(_, s)| s.abs() > 1e-6)
            .map(|(i, _)| i);
        // 100-sample depth: taps sweep 10..=90 samples back
        let echo = echo.unwrap();
        assert!((10..=90).contains(&echo), "echo at {echo}");
        assert!((left[echo] - WET).abs() < 1e-6);
    }
}
