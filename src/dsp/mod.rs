//! Low-level DSP primitives used by the synth engine and the effect units.
//!
//! These components are allocation-free once constructed and realtime-safe,
//! making them safe to embed directly inside the engine and effect structs.
//! They stay focused on the signal-processing math; orchestration lives in
//! `synth` and `fx`.

/// Circular delay buffer with a grow-only capacity.
pub mod delay;
/// `tanh` waveshaper used by the overdrive.
pub mod distortion;
/// Attack/decay/sustain/release envelope generator.
pub mod envelope;
/// State-variable low-pass/high-pass filter.
pub mod filter;
/// LFO phase accumulator for modulated delays.
pub mod lfo;
/// Oscillator waveforms, smoothing and pitch.
pub mod oscillator;
/// Schroeder reverb tanks.
pub mod reverb;

pub use envelope::{Envelope, EnvelopeState};
pub use oscillator::{Oscillator, Waveform};
