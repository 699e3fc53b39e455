use crate::{dsp::delay::DelayLine, io::AudioBlock};

/*
Delay
=====

A feedback echo over a one-second circular buffer.

Per sample, at the write cursor:

    delayed   = buffer[pos]                    (written `time` seconds ago)
    buffer[pos] = dry + delayed · feedback
    out       = 0.5 · dry + 0.5 · delayed

The slot is overwritten before the output is formed, but the output uses
the value read before the overwrite. Feedback is hard-limited to 0.95 so
the loop always decays, whatever the caller asks for.

The buffer holds exactly one second at the current sample rate; `time`
only moves the wrap point inside it.
*/

/// Upper bound on the feedback gain.
pub const MAX_FEEDBACK: f32 = 0.95;
const MIX: f32 = 0.5;

#[derive(Debug, Clone)]
pub struct Delay {
    time: f32,
    feedback: f32,
    line: DelayLine,
    sample_rate: f32,
}

impl Delay {
    pub fn new(sample_rate: f32) -> Self {
        let mut delay = Self {
            time: 0.5,
            feedback: 0.5,
            line: DelayLine::new(one_second(sample_rate)),
            sample_rate,
        };
        delay.update_length();
        delay
    }

    /// Delay time in seconds, at most one second.
    pub fn set_time(&mut self, seconds: f32) {
        self.time = seconds;
        self.update_length();
    }

    /// Requested feedback. Values above [`MAX_FEEDBACK`] are limited when
    /// processing.
    pub fn set_feedback(&mut self, feedback: f32) {
        self.feedback = feedback;
    }

    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.line.grow(one_second(sample_rate));
        self.update_length();
    }

    /// Delay length in samples currently in use.
    pub fn delay_samples(&self) -> usize {
        self.line.len()
    }

    pub fn effective_feedback(&self) -> f32 {
        self.feedback.min(MAX_FEEDBACK)
    }

    fn update_length(&mut self) {
        let samples = (self.sample_rate * self.time) as usize;
        self.line.set_len(samples.min(one_second(self.sample_rate)));
    }

    pub fn process_block(&mut self, block: &mut AudioBlock) {
        let feedback = self.effective_feedback();
        let line = &mut self.line;

        block.process_mono(|dry| {
            let delayed = line.current();
            line.write(dry + delayed * feedback);
            line.advance();
            dry * MIX + delayed * MIX
        });
    }
}

fn one_second(sample_rate: f32) -> usize {
    (sample_rate.round() as usize).max(1)
}
