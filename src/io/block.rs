//! Interleaved multi-channel audio block.

use crate::error::SynthError;

/// A mutable view over an interleaved buffer of `frames × channels`.
///
/// The engine always writes channels 0 and 1, so a block has at least two
/// channels. Effects that work on one reference channel process channel 0
/// and copy the result into every other channel of the frame.
pub struct AudioBlock<'a> {
    data: &'a mut [f32],
    channels: usize,
}

impl<'a> AudioBlock<'a> {
    pub fn new(data: &'a mut [f32], channels: usize) -> Result<Self, SynthError> {
        if channels < 2 {
            return Err(SynthError::ChannelCount { found: channels });
        }
        if data.len() % channels != 0 {
            return Err(SynthError::MisalignedBlock {
                len: data.len(),
                channels,
            });
        }
        Ok(Self { data, channels })
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    pub fn frames(&self) -> usize {
        self.data.len() / self.channels
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Iterate frames as `[ch0, ch1, ...]` slices.
    #[inline]
    pub fn frames_mut(&mut self) -> std::slice::ChunksExactMut<'_, f32> {
        self.data.chunks_exact_mut(self.channels)
    }

    /// Channel `channel` of every frame, in order.
    pub fn channel(&self, channel: usize) -> impl Iterator<Item = f32> + '_ {
        self.data
            .chunks_exact(self.channels)
            .map(move |frame| frame[channel])
    }

    /// Run `f` over channel 0 of every frame and copy its output to the
    /// remaining channels.
    #[inline]
    pub fn process_mono<F>(&mut self, mut f: F)
    where
        F: FnMut(f32) -> f32,
    {
        for frame in self.frames_mut() {
            let out = f(frame[0]);
            frame.fill(out);
        }
    }
}
