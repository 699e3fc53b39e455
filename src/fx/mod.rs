//! Post-synth effect units and the reorderable chain that runs them.
//!
//! Every unit exposes two parameters, addressed by index in alphabetical
//! order of their names, with values normally in `[0, 1]`. The unit maps
//! those normalized values to its own physical ranges.

pub mod chain;
pub mod chorus;
pub mod delay;
pub mod filter;
pub mod flanger;
pub mod overdrive;
pub mod reverb;

pub use chain::{EffectChain, EffectParam, EffectSlot, SlotState};

use crate::io::AudioBlock;
use chorus::Chorus;
use delay::Delay;
use filter::Filter;
use flanger::Flanger;
use overdrive::Overdrive;
use reverb::Reverb;

/// Flanger depth in milliseconds per unit of the Depth parameter.
const FLANGER_DEPTH_MS: f32 = 15.0;
/// Flanger LFO rate in Hz per unit of the Rate parameter.
const FLANGER_RATE_HZ: f32 = 5.0;
/// Chorus depth in milliseconds per unit of the Depth parameter.
const CHORUS_DEPTH_MS: f32 = 15.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EffectKind {
    Overdrive,
    Reverb,
    Delay,
    Flanger,
    Chorus,
    Filter,
}

impl EffectKind {
    /// Initial chain order.
    pub const ALL: [EffectKind; 6] = [
        EffectKind::Overdrive,
        EffectKind::Reverb,
        EffectKind::Delay,
        EffectKind::Flanger,
        EffectKind::Chorus,
        EffectKind::Filter,
    ];

    pub fn name(self) -> &'static str {
        match self {
            EffectKind::Overdrive => "Overdrive",
            EffectKind::Reverb => "Reverb",
            EffectKind::Delay => "Delay",
            EffectKind::Flanger => "Flanger",
            EffectKind::Chorus => "Chorus",
            EffectKind::Filter => "Filter",
        }
    }

    /// Parameter names, alphabetically ordered.
    pub fn param_names(self) -> [&'static str; 2] {
        match self {
            EffectKind::Overdrive => ["Drive", "Tone"],
            EffectKind::Reverb => ["Damping", "Room Size"],
            EffectKind::Delay => ["Feedback", "Time"],
            EffectKind::Flanger | EffectKind::Chorus => ["Depth", "Rate"],
            EffectKind::Filter => ["HighCut", "LowCut"],
        }
    }

    pub fn default_params(self) -> [f32; 2] {
        match self {
            EffectKind::Overdrive => [0.5, 0.5],
            EffectKind::Reverb => [0.7, 0.6],
            EffectKind::Delay => [0.5, 0.5],
            EffectKind::Flanger | EffectKind::Chorus => [0.5, 0.25],
            EffectKind::Filter => [1.0, 0.01],
        }
    }
}

/// One of the six effect processors.
#[derive(Debug, Clone)]
pub enum EffectUnit {
    Overdrive(Overdrive),
    Reverb(Reverb),
    Delay(Delay),
    Flanger(Flanger),
    Chorus(Chorus),
    Filter(Filter),
}

impl EffectUnit {
    /// Build a unit of `kind` with its default parameters applied.
    pub fn new(kind: EffectKind, sample_rate: f32) -> Self {
        let [first, second] = kind.default_params();
        let mut unit = match kind {
            EffectKind::Overdrive => EffectUnit::Overdrive(Overdrive::new(sample_rate)),
            EffectKind::Reverb => EffectUnit::Reverb(Reverb::new(sample_rate)),
            EffectKind::Delay => EffectUnit::Delay(Delay::new(sample_rate)),
            EffectKind::Flanger => EffectUnit::Flanger(Flanger::new(
                sample_rate,
                second * FLANGER_RATE_HZ,
                first * FLANGER_DEPTH_MS,
            )),
            EffectKind::Chorus => EffectUnit::Chorus(Chorus::new(
                sample_rate,
                second,
                first * CHORUS_DEPTH_MS,
            )),
            EffectKind::Filter => EffectUnit::Filter(Filter::new(sample_rate)),
        };
        unit.set_param(0, first);
        unit.set_param(1, second);
        unit
    }

    pub fn kind(&self) -> EffectKind {
        match self {
            EffectUnit::Overdrive(_) => EffectKind::Overdrive,
            EffectUnit::Reverb(_) => EffectKind::Reverb,
            EffectUnit::Delay(_) => EffectKind::Delay,
            EffectUnit::Flanger(_) => EffectKind::Flanger,
            EffectUnit::Chorus(_) => EffectKind::Chorus,
            EffectUnit::Filter(_) => EffectKind::Filter,
        }
    }

    /// Apply normalized parameter `index` (0 or 1). Returns `false` for any
    /// other index.
    pub fn set_param(&mut self, index: usize, value: f32) -> bool {
        match (self, index) {
            (EffectUnit::Overdrive(od), 0) => od.set_drive(value),
            (EffectUnit::Overdrive(od), 1) => od.set_tone(value),
            (EffectUnit::Reverb(rv), 0) => rv.set_damping(value),
            (EffectUnit::Reverb(rv), 1) => rv.set_room_size(value),
            (EffectUnit::Delay(dl), 0) => dl.set_feedback(value),
            (EffectUnit::Delay(dl), 1) => dl.set_time(value),
            (EffectUnit::Flanger(fl), 0) => fl.set_depth(value * FLANGER_DEPTH_MS),
            (EffectUnit::Flanger(fl), 1) => fl.set_rate(value * FLANGER_RATE_HZ),
            (EffectUnit::Chorus(ch), 0) => ch.set_depth(value * CHORUS_DEPTH_MS),
            (EffectUnit::Chorus(ch), 1) => ch.set_rate(value),
            (EffectUnit::Filter(f), 0) => f.set_high_cut(value),
            (EffectUnit::Filter(f), 1) => f.set_low_cut(value),
            _ => return false,
        }
        true
    }

    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        match self {
            EffectUnit::Overdrive(od) => od.set_sample_rate(sample_rate),
            EffectUnit::Reverb(rv) => rv.set_sample_rate(sample_rate),
            EffectUnit::Delay(dl) => dl.set_sample_rate(sample_rate),
            EffectUnit::Flanger(fl) => fl.set_sample_rate(sample_rate),
            EffectUnit::Chorus(ch) => ch.set_sample_rate(sample_rate),
            EffectUnit::Filter(f) => f.set_sample_rate(sample_rate),
        }
    }

    #[inline]
    pub fn process_block(&mut self, block: &mut AudioBlock) {
        match self {
            EffectUnit::Overdrive(od) => od.process_block(block),
            EffectUnit::Reverb(rv) => rv.process_block(block),
            EffectUnit::Delay(dl) => dl.process_block(block),
            EffectUnit::Flanger(fl) => fl.process_block(block),
            EffectUnit::Chorus(ch) => ch.process_block(block),
            EffectUnit::Filter(f) => f.process_block(block),
        }
    }
}
