//! The monophonic FM voice: four oscillators, their modulation graph and
//! the effect chain, rendered block by block.

use tracing::{debug, info};

use crate::{
    config::EngineConfig,
    dsp::{Oscillator, Waveform},
    error::SynthError,
    fx::EffectChain,
    io::AudioBlock,
    synth::{matrix::ModulationMatrix, message::SynthMessage},
    OSCILLATOR_COUNT,
};

/*
Per-block pipeline
==================

    for each frame:
        s = matrix.process(oscillators)      one FM tick, all four operators
        frame[..] = s                        every channel gets the voice

    chain.process(block)                     enabled effects, in chain order

There is exactly one voice. `note_on` retriggers all four oscillators at
the new pitch and `note_off` releases them; the matrix and the effects run
on every block regardless, so release and effect tails keep sounding.
*/

#[derive(Clone)]
pub struct FmEngine {
    oscillators: [Oscillator; OSCILLATOR_COUNT],
    matrix: ModulationMatrix,
    chain: EffectChain,
    sample_rate: f32,
}

impl FmEngine {
    pub fn new(config: &EngineConfig) -> Self {
        let oscillators = std::array::from_fn(|_| {
            let mut osc = Oscillator::new();
            osc.set_sample_rate(config.sample_rate);
            osc
        });
        info!(sample_rate = config.sample_rate, "fm engine created");

        Self {
            oscillators,
            matrix: ModulationMatrix::new(),
            chain: EffectChain::new(config.sample_rate),
            sample_rate: config.sample_rate,
        }
    }

    /// Build an engine around caller-configured oscillators. Fails unless
    /// exactly four are given.
    pub fn from_oscillators(
        oscillators: Vec<Oscillator>,
        config: &EngineConfig,
    ) -> Result<Self, SynthError> {
        let matrix = ModulationMatrix::for_oscillators(&oscillators)?;
        let found = oscillators.len();
        let mut oscillators: [Oscillator; OSCILLATOR_COUNT] =
            oscillators
                .try_into()
                .map_err(|_| SynthError::OscillatorCount {
                    expected: OSCILLATOR_COUNT,
                    found,
                })?;

        for osc in &mut oscillators {
            osc.set_sample_rate(config.sample_rate);
        }
        info!(sample_rate = config.sample_rate, "fm engine created");

        Ok(Self {
            oscillators,
            matrix,
            chain: EffectChain::new(config.sample_rate),
            sample_rate: config.sample_rate,
        })
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Propagate a new sample rate to every oscillator, envelope and effect.
    ///
    /// Envelope rates already set keep their per-sample values; only rates
    /// set afterwards use the new rate.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        debug!(from = self.sample_rate, to = sample_rate, "sample rate change");
        self.sample_rate = sample_rate;
        for osc in &mut self.oscillators {
            osc.set_sample_rate(sample_rate);
        }
        self.chain.set_sample_rate(sample_rate);
    }

    /// Retrigger the voice at `frequency` Hz.
    pub fn note_on(&mut self, frequency: f32) {
        for osc in &mut self.oscillators {
            osc.reset();
            osc.set_frequency(frequency);
            osc.note_on();
        }
    }

    pub fn note_off(&mut self) {
        for osc in &mut self.oscillators {
            osc.note_off();
        }
    }

    pub fn oscillators(&self) -> &[Oscillator; OSCILLATOR_COUNT] {
        &self.oscillators
    }

    pub fn oscillator(&self, index: usize) -> Option<&Oscillator> {
        self.oscillators.get(index)
    }

    pub fn oscillator_mut(&mut self, index: usize) -> Result<&mut Oscillator, SynthError> {
        self.oscillators
            .get_mut(index)
            .ok_or(SynthError::OscillatorOutOfRange { index })
    }

    pub fn set_waveform(&mut self, osc: usize, waveform: Waveform) -> Result<(), SynthError> {
        self.oscillator_mut(osc)?.set_waveform(waveform);
        Ok(())
    }

    pub fn set_octave(&mut self, osc: usize, octave: i32) -> Result<(), SynthError> {
        self.oscillator_mut(osc)?.set_octave(octave);
        Ok(())
    }

    pub fn set_detune(&mut self, osc: usize, cents: f32) -> Result<(), SynthError> {
        self.oscillator_mut(osc)?.set_detune(cents);
        Ok(())
    }

    pub fn set_level(&mut self, osc: usize, level: f32) -> Result<(), SynthError> {
        self.oscillator_mut(osc)?.set_level(level);
        Ok(())
    }

    pub fn set_attack(&mut self, osc: usize, seconds: f32) -> Result<(), SynthError> {
        self.oscillator_mut(osc)?.set_attack_time(seconds);
        Ok(())
    }

    pub fn set_decay(&mut self, osc: usize, seconds: f32) -> Result<(), SynthError> {
        self.oscillator_mut(osc)?.set_decay_time(seconds);
        Ok(())
    }

    pub fn set_sustain(&mut self, osc: usize, level: f32) -> Result<(), SynthError> {
        self.oscillator_mut(osc)?.set_sustain_level(level);
        Ok(())
    }

    pub fn set_release(&mut self, osc: usize, seconds: f32) -> Result<(), SynthError> {
        self.oscillator_mut(osc)?.set_release_time(seconds);
        Ok(())
    }

    /// Add, update or (with a negative `depth`) remove the edge
    /// `modulator → carrier`. Returns whether the edge is active afterwards.
    pub fn set_modulation_depth(&mut self, modulator: usize, carrier: usize, depth: f32) -> bool {
        if depth < 0.0 {
            self.matrix.remove_modulation(modulator, carrier);
            return false;
        }
        self.matrix
            .set_modulation(modulator, carrier, depth)
            .unwrap_or(false)
    }

    pub fn set_master_level(&mut self, level: f32) {
        self.matrix.set_level(level);
    }

    pub fn master_level(&self) -> f32 {
        self.matrix.level()
    }

    pub fn matrix(&self) -> &ModulationMatrix {
        &self.matrix
    }

    pub fn chain(&self) -> &EffectChain {
        &self.chain
    }

    pub fn chain_mut(&mut self) -> &mut EffectChain {
        &mut self.chain
    }

    /// Apply one control message.
    ///
    /// Senders validate indices before queueing, so a rejected message is a
    /// bug on the control side. Debug builds panic on one; release builds
    /// drop it.
    pub fn apply(&mut self, msg: SynthMessage) {
        let result = match msg {
            SynthMessage::NoteOn { frequency } => {
                self.note_on(frequency);
                Ok(())
            }
            SynthMessage::NoteOff => {
                self.note_off();
                Ok(())
            }
            SynthMessage::SetWaveform { osc, waveform } => self.set_waveform(osc, waveform),
            SynthMessage::SetOctave { osc, octave } => self.set_octave(osc, octave),
            SynthMessage::SetDetune { osc, cents } => self.set_detune(osc, cents),
            SynthMessage::SetLevel { osc, level } => self.set_level(osc, level),
            SynthMessage::SetAttack { osc, seconds } => self.set_attack(osc, seconds),
            SynthMessage::SetDecay { osc, seconds } => self.set_decay(osc, seconds),
            SynthMessage::SetSustain { osc, level } => self.set_sustain(osc, level),
            SynthMessage::SetRelease { osc, seconds } => self.set_release(osc, seconds),
            SynthMessage::SetModulation {
                modulator,
                carrier,
                depth,
            } => {
                self.set_modulation_depth(modulator, carrier, depth);
                Ok(())
            }
            SynthMessage::SetMasterLevel(level) => {
                self.set_master_level(level);
                Ok(())
            }
            SynthMessage::SetEffectEnabled { slot, enabled } => {
                self.chain.set_enabled(slot, enabled)
            }
            SynthMessage::SetEffectParam { slot, index, value } => {
                self.chain.set_param(slot, index, value)
            }
            SynthMessage::MoveEffectUp(slot) => {
                self.chain.move_up(slot);
                Ok(())
            }
            SynthMessage::MoveEffectDown(slot) => {
                self.chain.move_down(slot);
                Ok(())
            }
        };
        debug_assert!(result.is_ok(), "control message rejected: {result:?}");
    }

    /// One FM tick, without effects.
    #[inline]
    pub fn next_sample(&mut self) -> f32 {
        self.matrix.process(&mut self.oscillators)
    }

    /// Fill `block` with the voice on every channel, then run the chain.
    pub fn render(&mut self, block: &mut AudioBlock) {
        for frame in block.frames_mut() {
            let sample = self.matrix.process(&mut self.oscillators);
            frame.fill(sample);
        }
        self.chain.process(block);
    }

    /// Render into a raw interleaved buffer.
    pub fn render_interleaved(&mut self, out: &mut [f32], channels: usize) -> Result<(), SynthError> {
        let mut block = AudioBlock::new(out, channels)?;
        self.render(&mut block);
        Ok(())
    }
}
