//! Reverb - Room Simulation via Delay Networks
//!
//! Reverb simulates the sound of a space by creating many delayed, filtered
//! reflections of the input signal. This implementation uses the classic
//! Schroeder reverb algorithm, run twice with slightly different delay
//! times to decorrelate the left and right outputs.
//!
//! # Schroeder Reverb Architecture
//!
//! ```text
//! Input ──┬──→ [Comb 1] ──┐
//!         ├──→ [Comb 2] ──┤
//!         ├──→ [Comb 3] ──┼──→ (+) ──→ [Allpass 1] ──→ [Allpass 2] ──→ Output
//!         └──→ [Comb 4] ──┘
//! ```
//!
//! ## Comb Filters
//!
//! ```text
//! y[n] = x[n] + feedback * lowpass(y[n - delay])
//! ```
//!
//! The delay times are chosen to be mutually prime (no common factors) to avoid
//! resonant buildup at specific frequencies.
//!
//! ## Allpass Filters
//!
//! ```text
//! y[n] = -g * x[n] + x[n - delay] + g * y[n - delay]
//! ```
//!
//! # Parameters
//!
//! - **Room Size**: comb feedback, 0.7 (small) to 0.98 (large)
//! - **Damping**: High-frequency absorption (higher = darker sound). The
//!   0..1 control is scaled by 0.4 before it reaches the comb low-pass, so
//!   full damping still lets low frequencies recirculate.
//!
//! Storage is sized for 192 kHz at construction, so changing the sample
//! rate later only moves the wrap points.

/// Max comb filter delay: 50ms at 192kHz = 9600 samples
const MAX_COMB_DELAY: usize = 9600;
/// Max allpass filter delay: 10ms at 192kHz = 1920 samples
const MAX_ALLPASS_DELAY: usize = 1920;

const COMB_DELAYS_MS: [f32; 4] = [29.7, 37.1, 41.1, 43.7];
const ALLPASS_DELAYS_MS: [f32; 2] = [5.0, 1.7];
/// Extra delay on the right tank (23 samples at 44.1 kHz).
const STEREO_SPREAD_MS: f32 = 0.52;
/// Comb low-pass coefficient at full damping.
const DAMP_SCALE: f32 = 0.4;

#[inline]
fn ms_to_samples(ms: f32, sample_rate: f32) -> usize {
    (ms * sample_rate / 1000.0) as usize
}

/// A simple comb filter for reverb (pre-allocated, RT-safe)
#[derive(Debug, Clone)]
pub struct CombFilter {
    buffer: Vec<f32>,
    delay_samples: usize,
    write_pos: usize,
    feedback: f32,
    damp: f32,
    filter_state: f32,
}

impl CombFilter {
    pub fn new(delay_samples: usize) -> Self {
        Self {
            buffer: vec![0.0; MAX_COMB_DELAY],
            delay_samples: delay_samples.clamp(1, MAX_COMB_DELAY),
            write_pos: 0,
            feedback: 0.5,
            damp: 0.5,
            filter_state: 0.0,
        }
    }

    pub fn set_feedback(&mut self, feedback: f32) {
        self.feedback = feedback.clamp(0.0, 0.99);
    }

    pub fn set_damp(&mut self, damp: f32) {
        self.damp = damp.clamp(0.0, 1.0);
    }

    /// Set delay length (RT-safe, no allocation)
    pub fn set_delay(&mut self, delay_samples: usize) {
        self.delay_samples = delay_samples.clamp(1, MAX_COMB_DELAY);
        self.write_pos %= self.delay_samples;
    }

    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let output = self.buffer[self.write_pos];

        // One-pole lowpass filter for damping (absorbs high frequencies)
        self.filter_state = output * (1.0 - self.damp) + self.filter_state * self.damp;

        self.buffer[self.write_pos] = input + self.filter_state * self.feedback;
        self.write_pos = (self.write_pos + 1) % self.delay_samples;

        output
    }
}

/// An allpass filter for reverb diffusion (pre-allocated, RT-safe)
#[derive(Debug, Clone)]
pub struct AllpassFilter {
    buffer: Vec<f32>,
    delay_samples: usize,
    write_pos: usize,
    feedback: f32,
}

impl AllpassFilter {
    pub fn new(delay_samples: usize) -> Self {
        Self {
            buffer: vec![0.0; MAX_ALLPASS_DELAY],
            delay_samples: delay_samples.clamp(1, MAX_ALLPASS_DELAY),
            write_pos: 0,
            feedback: 0.5,
        }
    }

    /// Set delay length (RT-safe, no allocation)
    pub fn set_delay(&mut self, delay_samples: usize) {
        self.delay_samples = delay_samples.clamp(1, MAX_ALLPASS_DELAY);
        self.write_pos %= self.delay_samples;
    }

    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let delayed = self.buffer[self.write_pos];
        let output = -self.feedback * input + delayed;

        self.buffer[self.write_pos] = input + self.feedback * output;
        self.write_pos = (self.write_pos + 1) % self.delay_samples;

        output
    }
}

/// Schroeder reverb with 4 comb filters and 2 allpass filters
#[derive(Debug, Clone)]
pub struct SchroederReverb {
    combs: [CombFilter; 4],
    allpasses: [AllpassFilter; 2],
    offset_ms: f32,
}

impl SchroederReverb {
    /// `offset_ms` is added to every delay time; the right tank uses it to
    /// decorrelate from the left.
    pub fn new(sample_rate: f32, offset_ms: f32) -> Self {
        let mut reverb = Self {
            combs: std::array::from_fn(|_| CombFilter::new(1)),
            allpasses: std::array::from_fn(|_| AllpassFilter::new(1)),
            offset_ms,
        };
        reverb.configure(sample_rate);
        reverb
    }

    /// Configure delay times for a specific sample rate (RT-safe, no allocation).
    pub fn configure(&mut self, sample_rate: f32) {
        for (comb, &delay_ms) in self.combs.iter_mut().zip(COMB_DELAYS_MS.iter()) {
            comb.set_delay(ms_to_samples(delay_ms + self.offset_ms, sample_rate));
        }
        for (allpass, &delay_ms) in self.allpasses.iter_mut().zip(ALLPASS_DELAYS_MS.iter()) {
            allpass.set_delay(ms_to_samples(delay_ms + self.offset_ms, sample_rate));
        }
    }

    /// Set the room size (scales feedback for longer/shorter decay)
    pub fn set_room_size(&mut self, size: f32) {
        let feedback = 0.7 + size.clamp(0.0, 1.0) * 0.28; // 0.7 to 0.98
        for comb in &mut self.combs {
            comb.set_feedback(feedback);
        }
    }

    /// Set damping (high frequency absorption)
    pub fn set_damping(&mut self, damp: f32) {
        let damp = damp.clamp(0.0, 1.0) * DAMP_SCALE;
        for comb in &mut self.combs {
            comb.set_damp(damp);
        }
    }

    /// Process a single sample through the reverb
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let mut output = 0.0;
        for comb in &mut self.combs {
            output += comb.process(input);
        }
        output *= 0.25; // Normalize for 4 combs

        for allpass in &mut self.allpasses {
            output = allpass.process(output);
        }

        output
    }
}

/// Two Schroeder tanks fed from the mono sum of the input pair.
#[derive(Debug, Clone)]
pub struct StereoReverb {
    left: SchroederReverb,
    right: SchroederReverb,
}

impl StereoReverb {
    pub fn new(sample_rate: f32) -> Self {
        Self {
            left: SchroederReverb::new(sample_rate, 0.0),
            right: SchroederReverb::new(sample_rate, STEREO_SPREAD_MS),
        }
    }

    pub fn configure(&mut self, sample_rate: f32) {
        self.left.configure(sample_rate);
        self.right.configure(sample_rate);
    }

    pub fn set_room_size(&mut self, size: f32) {
        self.left.set_room_size(size);
        self.right.set_room_size(size);
    }

    pub fn set_damping(&mut self, damp: f32) {
        self.left.set_damping(damp);
        self.right.set_damping(damp);
    }

    /// Fully wet output pair for one input frame.
    #[inline]
    pub fn process(&mut self, left: f32, right: f32) -> (f32, f32) {
        let input = (left + right) * 0.5;
        (self.left.process(input), self.right.process(input))
    }
}
