//! Low Frequency Oscillator phase.

use std::f32::consts::TAU;

/*
Low Frequency Oscillators
=========================

An LFO is an oscillator running at control rate (~0.01 Hz to ~20 Hz). The
flanger and chorus use one to sweep their delay time. They only need the
phase: each computes its own sweep shape from `sin(phase)`.

  period          Time for one complete oscillation.
                  At 5 Hz: period = 1/5 = 0.2 seconds = 200ms

  increment       rate · 2π / sample_rate radians per sample

The phase wraps at 2π so it never loses precision on long sessions.
*/

#[derive(Debug, Clone, Copy, Default)]
pub struct LfoPhase {
    phase: f32,
}

impl LfoPhase {
    pub fn new() -> Self {
        Self { phase: 0.0 }
    }

    #[inline]
    pub fn phase(&self) -> f32 {
        self.phase
    }

    /// Step one sample forward at `rate_hz`.
    #[inline]
    pub fn advance(&mut self, rate_hz: f32, sample_rate: f32) {
        self.phase += rate_hz * TAU / sample_rate;
        if self.phase >= TAU {
            self.phase -= TAU;
        }
    }
}
