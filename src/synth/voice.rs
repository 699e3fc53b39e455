//! Audio-thread side of the synth: an engine plus its message inbox.

use crate::{
    config::EngineConfig,
    error::SynthError,
    io::AudioBlock,
    synth::{engine::FmEngine, message::MessageReceiver},
};

/// Renders an [`FmEngine`], applying queued control messages first.
///
/// Output is rendered in chunks of at most `max_block_size` frames and the
/// inbox is drained before each chunk, so control changes land within one
/// chunk of being sent even when the host asks for large buffers. The
/// channel layout is fixed by the [`EngineConfig`] the synth was built with.
pub struct FmSynth<R: MessageReceiver> {
    engine: FmEngine,
    rx: R,
    channels: usize,
    max_block_size: usize,
}

impl<R: MessageReceiver> FmSynth<R> {
    pub fn new(engine: FmEngine, rx: R, config: &EngineConfig) -> Self {
        Self {
            engine,
            rx,
            channels: config.channels,
            max_block_size: config.max_block_size.max(1),
        }
    }

    /// Interleaved channel count every rendered buffer must use.
    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Apply every pending control message.
    pub fn drain(&mut self) {
        while let Some(msg) = self.rx.pop() {
            self.engine.apply(msg);
        }
    }

    /// Render into an interleaved buffer laid out with [`Self::channels`]
    /// channels.
    pub fn render(&mut self, out: &mut [f32]) -> Result<(), SynthError> {
        let channels = self.channels;
        // Validate the whole buffer up front so no chunk fails halfway
        AudioBlock::new(out, channels)?;

        for chunk in out.chunks_mut(self.max_block_size * channels) {
            self.drain();
            let mut block = AudioBlock::new(chunk, channels)?;
            self.engine.render(&mut block);
        }
        Ok(())
    }

    pub fn engine(&self) -> &FmEngine {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut FmEngine {
        &mut self.engine
    }
}
