#[cfg(feature = "rtrb")]
use rtrb::Consumer;

use crate::dsp::Waveform;

/// Control → audio thread message. Applied at the start of the next block.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum SynthMessage {
    NoteOn { frequency: f32 },
    NoteOff,

    SetWaveform { osc: usize, waveform: Waveform },
    SetOctave { osc: usize, octave: i32 },
    SetDetune { osc: usize, cents: f32 },
    SetLevel { osc: usize, level: f32 },
    SetAttack { osc: usize, seconds: f32 },
    SetDecay { osc: usize, seconds: f32 },
    SetSustain { osc: usize, level: f32 },
    SetRelease { osc: usize, seconds: f32 },

    /// A negative depth removes the edge.
    SetModulation { modulator: usize, carrier: usize, depth: f32 },
    SetMasterLevel(f32),

    SetEffectEnabled { slot: usize, enabled: bool },
    SetEffectParam { slot: usize, index: usize, value: f32 },
    MoveEffectUp(usize),
    MoveEffectDown(usize),
}

pub trait MessageReceiver {
    fn pop(&mut self) -> Option<SynthMessage>;
}

#[cfg(feature = "rtrb")]
impl MessageReceiver for Consumer<SynthMessage> {
    fn pop(&mut self) -> Option<SynthMessage> {
        Consumer::pop(self).ok()
    }
}

/// Replays a fixed list of messages. Lets offline renders and tests drive
/// a synth without a ring buffer.
impl MessageReceiver for std::collections::VecDeque<SynthMessage> {
    fn pop(&mut self) -> Option<SynthMessage> {
        self.pop_front()
    }
}
