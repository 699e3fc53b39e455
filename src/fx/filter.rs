use crate::{dsp::filter::SVFilter, io::AudioBlock};

/*
Filter
======

A band-limiting pair: high-pass, then low-pass.

    input ──→ [HP @ 21 kHz · low_cut] ──→ [LP @ 21 kHz · high_cut] ──→ output

Both parameters are fractions of 21 kHz. With the defaults (low_cut 0.01,
high_cut 1.0) the pass band is 210 Hz up to the top of the audio range.
Cutoffs above Nyquist are clamped by the filter itself. Both stages share
one resonance value.
*/

pub const MAX_CUTOFF_HZ: f32 = 21_000.0;
const DEFAULT_RESONANCE: f32 = 1.0;

#[derive(Debug, Clone)]
pub struct Filter {
    high_cut: f32,
    low_cut: f32,
    highpass: SVFilter,
    lowpass: SVFilter,
    sample_rate: f32,
}

impl Filter {
    pub fn new(sample_rate: f32) -> Self {
        let mut filter = Self {
            high_cut: 1.0,
            low_cut: 0.01,
            highpass: SVFilter::highpass(MAX_CUTOFF_HZ * 0.01),
            lowpass: SVFilter::lowpass(MAX_CUTOFF_HZ),
            sample_rate,
        };
        filter.set_resonance(DEFAULT_RESONANCE);
        filter.update_filters();
        filter
    }

    /// Low-pass cutoff as a fraction of 21 kHz.
    pub fn set_high_cut(&mut self, high_cut: f32) {
        self.high_cut = high_cut;
    }

    /// High-pass cutoff as a fraction of 21 kHz.
    pub fn set_low_cut(&mut self, low_cut: f32) {
        self.low_cut = low_cut;
    }

    pub fn set_resonance(&mut self, q: f32) {
        self.highpass.set_q(q);
        self.lowpass.set_q(q);
    }

    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
    }

    pub fn cutoffs_hz(&self) -> (f32, f32) {
        (MAX_CUTOFF_HZ * self.low_cut, MAX_CUTOFF_HZ * self.high_cut)
    }

    fn update_filters(&mut self) {
        let (low, high) = self.cutoffs_hz();
        self.highpass.set_cutoff(low);
        self.highpass.update_coefficients(self.sample_rate);
        self.lowpass.set_cutoff(high);
        self.lowpass.update_coefficients(self.sample_rate);
    }

    pub fn process_block(&mut self, block: &mut AudioBlock) {
        self.update_filters();

        let Self {
            highpass, lowpass, ..
        } = self;
        block.process_mono(|sample| lowpass.process(highpass.process(sample)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::TAU;

    fn rms_after(filter: &mut Filter, freq: f32) -> f32 {
        let frames = 9_600;
        let mut data: Vec<f32> = (0..frames)
            .flat_map(|n| {
                let s = (TAU * freq * n as f32 / 48_000.0).sin();
                [s, s]
            })
            .collect();
        let mut block = AudioBlock::new(&mut data, 2).unwrap();
        filter.process_block(&mut block);

        let tail: Vec<f32> = data.chunks_exact(2).skip(4_800).map(|f| f[0]).collect();
        (tail.iter().map(|x| x * x).sum::<f32>() / tail.len() as f32).sqrt()
    }

    #[test]
    fn parameters_map_to_hertz() {
        let mut filter = Filter::new(48_000.0);
        assert_eq!(filter.cutoffs_hz(), (210.0, 21_000.0));
        filter.set_low_cut(0.1);
        filter.set_high_cut(0.5);
        assert_eq!(filter.cutoffs_hz(), (2_100.0, 10_500.0));
    }

    #[test]
    fn passes_mid_band_and_cuts_below_low_cut() {
        let mut filter = Filter::new(48_000.0);
        filter.set_low_cut(0.05); // 1050 Hz
        let mid = rms_after(&mut filter, 5_000.0);

        let mut filter = Filter::new(48_000.0);
        filter.set_low_cut(0.05);
        let low = rms_after(&mut filter, 50.0);

        assert!(mid > 0.5, "mid band rms {mid}");
        assert!(low < 0.05, "sub-cutoff rms {low}");
    }

    #[test]
    fn high_cut_attenuates_treble() {
        let mut filter = Filter::new(48_000.0);
        filter.set_high_cut(0.02); // 420 Hz
        let treble = rms_after(&mut filter, 8_000.0);
        assert!(treble < 0.05, "treble rms {treble}");
    }
}
