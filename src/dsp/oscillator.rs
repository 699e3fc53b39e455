use std::f32::consts::{PI, TAU};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{dsp::envelope::Envelope, DEFAULT_SAMPLE_RATE};

/*
Audio Oscillator
================

One operator of the FM voice. Every tick it:

  1. computes the raw waveform value at the current phase
  2. runs it through a one-pole smoothing stage
  3. advances the phase
  4. shapes the result with its own envelope

Waveforms (phase in [0, 2π)):

  Sine      sin(phase)
  Square    +1 when sin(phase) >= 0, else -1
  Triangle  (2/π) · asin(sin(phase))
  Saw       2 · phase/2π − 1

Smoothing
---------

    filtered = raw − last + 0.995 · last
    last     = filtered

This leaks a little of the previous output back out of the current one and
takes the edge off the Square and Saw discontinuities.

Pitch
-----

The phase increment is always

    frequency · 2^octave · 2^(cents/1200) · 2π / sample_rate

and is recomputed whenever any factor changes. The modulation matrix
rewrites `frequency` transiently inside a tick, so this recompute runs on
the hot path and stays branch-free.
*/

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Waveform {
    #[default]
    Sine,
    Square,
    Triangle,
    Saw,
}

impl Waveform {
    pub const ALL: [Waveform; 4] = [
        Waveform::Sine,
        Waveform::Square,
        Waveform::Triangle,
        Waveform::Saw,
    ];

    /// Raw waveform value at `phase`, before smoothing.
    #[inline]
    pub fn value_at(self, phase: f32) -> f32 {
        match self {
            Waveform::Sine => phase.sin(),
            Waveform::Square => {
                if phase.sin() >= 0.0 {
                    1.0
                } else {
                    -1.0
                }
            }
            Waveform::Triangle => 2.0 * phase.sin().asin() / PI,
            Waveform::Saw => 2.0 * (phase / TAU) - 1.0,
        }
    }
}

const SMOOTHING: f32 = 0.995;

#[derive(Debug, Clone)]
pub struct Oscillator {
    waveform: Waveform,
    frequency: f32,
    phase: f32,
    phase_increment: f32,
    sample_rate: f32,
    octave_multiplier: f32,
    detune_factor: f32,
    level: f32,
    last_sample: f32,
    envelope: Envelope,
}

impl Default for Oscillator {
    fn default() -> Self {
        Self::new()
    }
}

impl Oscillator {
    pub fn new() -> Self {
        let mut osc = Self {
            waveform: Waveform::Sine,
            frequency: 0.0,
            phase: 0.0,
            phase_increment: 0.0,
            sample_rate: DEFAULT_SAMPLE_RATE,
            octave_multiplier: 1.0,
            detune_factor: 1.0,
            level: 0.0,
            last_sample: 0.0,
            envelope: Envelope::new(),
        };
        osc.update_phase_increment();
        osc
    }

    pub fn with_waveform(mut self, waveform: Waveform) -> Self {
        self.waveform = waveform;
        self
    }

    pub fn with_level(mut self, level: f32) -> Self {
        self.level = level;
        self
    }

    /// Generate one enveloped sample and advance the phase.
    #[inline]
    pub fn next_sample(&mut self) -> f32 {
        let raw = self.waveform.value_at(self.phase);

        let filtered = raw - self.last_sample + SMOOTHING * self.last_sample;
        self.last_sample = filtered;

        // A modulated increment can be negative or exceed a full turn
        self.phase = (self.phase + self.phase_increment).rem_euclid(TAU);
        if self.phase >= TAU {
            // rem_euclid can round up to exactly TAU for tiny negative inputs
            self.phase = 0.0;
        }

        self.envelope.apply(filtered)
    }

    #[inline]
    fn update_phase_increment(&mut self) {
        self.phase_increment = self.frequency * self.octave_multiplier * self.detune_factor * TAU
            / self.sample_rate;
    }

    #[inline]
    pub fn set_frequency(&mut self, frequency: f32) {
        self.frequency = frequency;
        self.update_phase_increment();
    }

    pub fn frequency(&self) -> f32 {
        self.frequency
    }

    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.envelope.set_sample_rate(sample_rate);
        self.update_phase_increment();
    }

    /// Shift by whole octaves (the UI range is -4..=4).
    pub fn set_octave(&mut self, octave: i32) {
        self.octave_multiplier = 2.0_f32.powi(octave);
        self.update_phase_increment();
    }

    /// Detune in cents (the UI range is -50..=50).
    pub fn set_detune(&mut self, cents: f32) {
        self.detune_factor = 2.0_f32.powf(cents / 1200.0);
        self.update_phase_increment();
    }

    pub fn set_waveform(&mut self, waveform: Waveform) {
        self.waveform = waveform;
    }

    pub fn waveform(&self) -> Waveform {
        self.waveform
    }

    /// Mix level used by the modulation matrix when summing outputs.
    pub fn set_level(&mut self, level: f32) {
        self.level = level;
    }

    pub fn level(&self) -> f32 {
        self.level
    }

    pub fn phase(&self) -> f32 {
        self.phase
    }

    pub fn phase_increment(&self) -> f32 {
        self.phase_increment
    }

    /// Zero phase and increment and silence the envelope.
    ///
    /// The increment comes back on the next `set_frequency`.
    pub fn reset(&mut self) {
        self.phase = 0.0;
        self.phase_increment = 0.0;
        self.envelope.reset();
    }

    pub fn note_on(&mut self) {
        self.envelope.note_on();
    }

    pub fn note_off(&mut self) {
        self.envelope.note_off();
    }

    pub fn set_attack_time(&mut self, seconds: f32) {
        self.envelope.set_attack_time(seconds);
    }

    pub fn set_decay_time(&mut self, seconds: f32) {
        self.envelope.set_decay_time(seconds);
    }

    pub fn set_sustain_level(&mut self, level: f32) {
        self.envelope.set_sustain_level(level);
    }

    pub fn set_release_time(&mut self, seconds: f32) {
        self.envelope.set_release_time(seconds);
    }

    pub fn envelope(&self) -> &Envelope {
        &self.envelope
    }
}
