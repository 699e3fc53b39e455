//! Waveshaping
//!
//! A waveshaper applies a transfer function to each sample:
//!   output = f(input * gain)
//!
//! With `tanh` as the transfer function, small signals pass almost
//! unchanged and large ones are squashed smoothly towards ±1. The overdrive
//! effect feeds it `drive * 100`, so even drive = 0.01 already saturates a
//! full-scale signal.

/// Gain applied on top of the overdrive `drive` parameter.
pub const DRIVE_SCALE: f32 = 100.0;

/// `tanh(sample * drive * DRIVE_SCALE)`.
#[inline]
pub fn saturate(sample: f32, drive: f32) -> f32 {
    (sample * drive * DRIVE_SCALE).tanh()
}
