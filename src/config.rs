//! Engine configuration.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{DEFAULT_SAMPLE_RATE, MAX_BLOCK_SIZE};

/// Settings fixed for the lifetime of an engine instance.
///
/// The sample rate can still be changed later through
/// [`FmEngine::set_sample_rate`](crate::FmEngine::set_sample_rate), which is
/// what a host does when it prepares playback.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineConfig {
    pub sample_rate: f32,
    /// Interleaved output channels. Channels 0 and 1 are always written.
    /// `FmSynth::render` only accepts buffers laid out with this count.
    pub channels: usize,
    pub max_block_size: usize,
    /// Capacity of the control → audio message queue.
    pub message_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            sample_rate: DEFAULT_SAMPLE_RATE,
            channels: 2,
            max_block_size: MAX_BLOCK_SIZE,
            message_capacity: 256,
        }
    }
}

impl EngineConfig {
    pub fn with_sample_rate(mut self, sample_rate: f32) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    pub fn with_channels(mut self, channels: usize) -> Self {
        self.channels = channels;
        self
    }
}
