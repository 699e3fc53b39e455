use crate::{
    dsp::{distortion::saturate, filter::SVFilter},
    io::AudioBlock,
};

/*
Overdrive
=========

    input ──→ tanh(x · drive · 100) ──→ low-pass ──→ output

The saturator adds harmonics and the low-pass tames the fizz they bring.
`tone` sweeps the low-pass cutoff linearly:

    cutoff = 500 Hz + (5000 Hz − 500 Hz) · tone

Mono: channel 0 is processed and copied to the other channels.
*/

const MIN_CUTOFF_HZ: f32 = 500.0;
const MAX_CUTOFF_HZ: f32 = 5_000.0;

#[derive(Debug, Clone)]
pub struct Overdrive {
    drive: f32,
    tone: f32,
    filter: SVFilter,
    sample_rate: f32,
}

impl Overdrive {
    pub fn new(sample_rate: f32) -> Self {
        let mut overdrive = Self {
            drive: 0.5,
            tone: 0.5,
            filter: SVFilter::lowpass(MIN_CUTOFF_HZ),
            sample_rate,
        };
        overdrive.update_filter();
        overdrive
    }

    pub fn set_drive(&mut self, drive: f32) {
        self.drive = drive;
    }

    pub fn set_tone(&mut self, tone: f32) {
        self.tone = tone;
    }

    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
    }

    pub fn cutoff_hz(&self) -> f32 {
        MIN_CUTOFF_HZ + (MAX_CUTOFF_HZ - MIN_CUTOFF_HZ) * self.tone
    }

    fn update_filter(&mut self) {
        self.filter.set_cutoff(self.cutoff_hz());
        self.filter.update_coefficients(self.sample_rate);
    }

    pub fn process_block(&mut self, block: &mut AudioBlock) {
        self.update_filter();

        let drive = self.drive;
        let filter = &mut self.filter;
        block.process_mono(|sample| filter.process(saturate(sample, drive)));
    }
}
