use snafu::Snafu;

/// Errors reported by the synth core.
///
/// None of these are produced on the per-sample path. They come out of
/// construction, graph edits and control-side validation.
#[derive(Debug, Clone, PartialEq, Eq, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum SynthError {
    #[snafu(display("expected exactly {expected} oscillators, got {found}"))]
    OscillatorCount { expected: usize, found: usize },

    #[snafu(display("oscillator {index} cannot modulate itself"))]
    SelfModulation { index: usize },

    #[snafu(display("oscillator index {index} is out of range"))]
    OscillatorOutOfRange { index: usize },

    #[snafu(display("modulation graph contains a cycle, cannot order oscillators"))]
    CyclicGraph,

    #[snafu(display("audio block needs at least 2 channels, got {found}"))]
    ChannelCount { found: usize },

    #[snafu(display("buffer of {len} samples does not divide into {channels} channels"))]
    MisalignedBlock { len: usize, channels: usize },

    #[snafu(display("effect slot {slot} is out of range"))]
    EffectSlotOutOfRange { slot: usize },

    #[snafu(display("effect slot {slot} has no parameter {index}"))]
    ParameterOutOfRange { slot: usize, index: usize },

    #[snafu(display("control queue is full, message dropped"))]
    QueueFull,
}
