//! Control-thread handle.
//!
//! [`FmController`] is the only way the UI or host talks to a running
//! synth. It clamps values to the ranges the controls expose, checks
//! indices, keeps a shadow copy of the modulation graph and the effect
//! chain layout, and forwards every accepted change through a lock-free
//! ring buffer. The audio thread picks the changes up at its next chunk.
//!
//! Because the shadow graph runs the same cycle check as the engine, edge
//! requests are answered immediately, without a round trip through the
//! audio thread.

use rtrb::{Consumer, Producer, RingBuffer};
use tracing::{debug, info, warn};

use crate::{
    config::EngineConfig,
    dsp::Waveform,
    error::SynthError,
    fx::chain::{swap_down, swap_up, SlotState},
    synth::{engine::FmEngine, matrix::ModulationMatrix, message::SynthMessage, voice::FmSynth},
    OSCILLATOR_COUNT,
};

pub const OCTAVE_RANGE: (i32, i32) = (-4, 4);
pub const DETUNE_RANGE_CENTS: (f32, f32) = (-50.0, 50.0);
pub const TIME_RANGE_SECONDS: (f32, f32) = (0.01, 5.0);
pub const EFFECT_PARAM_RANGE: (f32, f32) = (0.01, 1.0);

/// Build a connected controller / synth pair.
pub fn split(config: &EngineConfig) -> (FmController, FmSynth<Consumer<SynthMessage>>) {
    let (tx, rx) = RingBuffer::new(config.message_capacity.max(1));
    let engine = FmEngine::new(config);
    let synth = FmSynth::new(engine, rx, config);
    (FmController::new(tx), synth)
}

pub struct FmController {
    tx: Producer<SynthMessage>,
    matrix: ModulationMatrix,
    effects: [SlotState; 6],
}

impl FmController {
    pub fn new(tx: Producer<SynthMessage>) -> Self {
        Self {
            tx,
            matrix: ModulationMatrix::new(),
            effects: SlotState::default_layout(),
        }
    }

    fn send(&mut self, msg: SynthMessage) -> Result<(), SynthError> {
        self.tx.push(msg).map_err(|_| {
            warn!(?msg, "control queue full, dropping message");
            SynthError::QueueFull
        })
    }

    fn check_osc(osc: usize) -> Result<(), SynthError> {
        if osc >= OSCILLATOR_COUNT {
            return Err(SynthError::OscillatorOutOfRange { index: osc });
        }
        Ok(())
    }

    fn check_slot(&self, slot: usize) -> Result<(), SynthError> {
        if slot >= self.effects.len() {
            return Err(SynthError::EffectSlotOutOfRange { slot });
        }
        Ok(())
    }

    pub fn note_on(&mut self, frequency: f32) -> Result<(), SynthError> {
        self.send(SynthMessage::NoteOn { frequency })
    }

    pub fn note_off(&mut self) -> Result<(), SynthError> {
        self.send(SynthMessage::NoteOff)
    }

    pub fn set_waveform(&mut self, osc: usize, waveform: Waveform) -> Result<(), SynthError> {
        Self::check_osc(osc)?;
        self.send(SynthMessage::SetWaveform { osc, waveform })
    }

    pub fn set_octave(&mut self, osc: usize, octave: i32) -> Result<(), SynthError> {
        Self::check_osc(osc)?;
        let octave = octave.clamp(OCTAVE_RANGE.0, OCTAVE_RANGE.1);
        self.send(SynthMessage::SetOctave { osc, octave })
    }

    pub fn set_detune(&mut self, osc: usize, cents: f32) -> Result<(), SynthError> {
        Self::check_osc(osc)?;
        let cents = cents.clamp(DETUNE_RANGE_CENTS.0, DETUNE_RANGE_CENTS.1);
        self.send(SynthMessage::SetDetune { osc, cents })
    }

    pub fn set_level(&mut self, osc: usize, level: f32) -> Result<(), SynthError> {
        Self::check_osc(osc)?;
        let level = level.clamp(0.0, 1.0);
        self.send(SynthMessage::SetLevel { osc, level })
    }

    pub fn set_attack(&mut self, osc: usize, seconds: f32) -> Result<(), SynthError> {
        Self::check_osc(osc)?;
        let seconds = clamp_time(seconds);
        self.send(SynthMessage::SetAttack { osc, seconds })
    }

    pub fn set_decay(&mut self, osc: usize, seconds: f32) -> Result<(), SynthError> {
        Self::check_osc(osc)?;
        let seconds = clamp_time(seconds);
        self.send(SynthMessage::SetDecay { osc, seconds })
    }

    pub fn set_sustain(&mut self, osc: usize, level: f32) -> Result<(), SynthError> {
        Self::check_osc(osc)?;
        let level = level.clamp(0.0, 1.0);
        self.send(SynthMessage::SetSustain { osc, level })
    }

    pub fn set_release(&mut self, osc: usize, seconds: f32) -> Result<(), SynthError> {
        Self::check_osc(osc)?;
        let seconds = clamp_time(seconds);
        self.send(SynthMessage::SetRelease { osc, seconds })
    }

    /// Add, update or (negative `depth`) remove an edge.
    ///
    /// Returns whether the edge is active afterwards. Self-loops,
    /// out-of-range indices and cycle-closing edges give `Ok(false)`.
    pub fn set_modulation_depth(
        &mut self,
        modulator: usize,
        carrier: usize,
        depth: f32,
    ) -> Result<bool, SynthError> {
        let previous = self.matrix.clone();

        if depth < 0.0 {
            self.matrix.remove_modulation(modulator, carrier);
            if self.matrix == previous {
                return Ok(false);
            }
            debug!(modulator, carrier, "modulation removed");
        } else {
            match self.matrix.set_modulation(modulator, carrier, depth) {
                Ok(true) => info!(modulator, carrier, depth, "modulation set"),
                Ok(false) => {
                    info!(modulator, carrier, "modulation rejected, would create a cycle");
                    return Ok(false);
                }
                Err(err) => {
                    info!(modulator, carrier, %err, "modulation rejected");
                    return Ok(false);
                }
            }
        }

        let msg = SynthMessage::SetModulation {
            modulator,
            carrier,
            depth,
        };
        if let Err(err) = self.send(msg) {
            self.matrix = previous;
            return Err(err);
        }
        Ok(depth >= 0.0)
    }

    pub fn set_master_level(&mut self, level: f32) -> Result<(), SynthError> {
        let level = level.clamp(0.0, 1.0);
        self.send(SynthMessage::SetMasterLevel(level))?;
        self.matrix.set_level(level);
        Ok(())
    }

    /// Flip a slot on or off. Returns the new state.
    pub fn toggle_effect(&mut self, slot: usize) -> Result<bool, SynthError> {
        self.check_slot(slot)?;
        let enabled = !self.effects[slot].enabled;
        self.set_effect_enabled(slot, enabled)?;
        Ok(enabled)
    }

    pub fn set_effect_enabled(&mut self, slot: usize, enabled: bool) -> Result<(), SynthError> {
        self.check_slot(slot)?;
        self.send(SynthMessage::SetEffectEnabled { slot, enabled })?;
        self.effects[slot].enabled = enabled;
        debug!(effect = self.effects[slot].name(), enabled, "effect toggled");
        Ok(())
    }

    pub fn set_effect_param(&mut self, slot: usize, index: usize, value: f32) -> Result<(), SynthError> {
        self.check_slot(slot)?;
        if index >= self.effects[slot].params.len() {
            return Err(SynthError::ParameterOutOfRange { slot, index });
        }
        let value = value.clamp(EFFECT_PARAM_RANGE.0, EFFECT_PARAM_RANGE.1);
        self.send(SynthMessage::SetEffectParam { slot, index, value })?;
        self.effects[slot].params[index].value = value;
        Ok(())
    }

    /// Swap `slot` with the one before it. `Ok(false)` at the front.
    pub fn move_effect_up(&mut self, slot: usize) -> Result<bool, SynthError> {
        self.check_slot(slot)?;
        if slot == 0 {
            return Ok(false);
        }
        self.send(SynthMessage::MoveEffectUp(slot))?;
        Ok(swap_up(&mut self.effects, slot))
    }

    /// Swap `slot` with the one after it. `Ok(false)` at the back.
    pub fn move_effect_down(&mut self, slot: usize) -> Result<bool, SynthError> {
        self.check_slot(slot)?;
        if slot + 1 == self.effects.len() {
            return Ok(false);
        }
        self.send(SynthMessage::MoveEffectDown(slot))?;
        Ok(swap_down(&mut self.effects, slot))
    }

    /// Effect slots as last sent, in chain order.
    pub fn effects(&self) -> &[SlotState] {
        &self.effects
    }

    /// The modulation graph as last sent.
    pub fn matrix(&self) -> &ModulationMatrix {
        &self.matrix
    }
}

fn clamp_time(seconds: f32) -> f32 {
    seconds.clamp(TIME_RANGE_SECONDS.0, TIME_RANGE_SECONDS.1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small() -> (FmController, FmSynth<Consumer<SynthMessage>>) {
        let config = EngineConfig {
            message_capacity: 4,
            ..EngineConfig::default()
        };
        split(&config)
    }

    #[test]
    fn edge_answers_are_synchronous() {
        let (mut ctl, _synth) = small();
        assert_eq!(ctl.set_modulation_depth(0, 1, 5000.0), Ok(true));
        assert_eq!(ctl.set_modulation_depth(1, 0, 5000.0), Ok(false));
        assert_eq!(ctl.set_modulation_depth(2, 2, 10.0), Ok(false));
        assert_eq!(ctl.set_modulation_depth(0, 1, -1.0), Ok(false));
        assert!(!ctl.matrix().is_connected(0, 1));
    }

    #[test]
    fn rejected_edges_are_not_sent() {
        let (mut ctl, mut synth) = small();
        ctl.set_modulation_depth(0, 1, 100.0).unwrap();
        ctl.set_modulation_depth(1, 0, 100.0).unwrap();

        let mut out = vec![0.0; 2 * 16];
        synth.render(&mut out).unwrap();
        assert_eq!(synth.engine().matrix(), ctl.matrix());
    }

    #[test]
    fn full_queue_rolls_back_the_shadow() {
        let (mut ctl, _synth) = small();
        for _ in 0..4 {
            ctl.note_on(100.0).unwrap();
        }
        assert_eq!(ctl.note_off(), Err(SynthError::QueueFull));
        assert_eq!(
            ctl.set_modulation_depth(2, 3, 10.0),
            Err(SynthError::QueueFull)
        );
        assert!(!ctl.matrix().is_connected(2, 3));
        assert_eq!(ctl.toggle_effect(0), Err(SynthError::QueueFull));
        assert!(!ctl.effects()[0].enabled);
    }

    #[test]
    fn bad_indices_never_reach_the_queue() {
        let (mut ctl, _synth) = small();
        assert_eq!(
            ctl.set_level(4, 1.0),
            Err(SynthError::OscillatorOutOfRange { index: 4 })
        );
        assert_eq!(
            ctl.toggle_effect(6),
            Err(SynthError::EffectSlotOutOfRange { slot: 6 })
        );
        assert_eq!(
            ctl.set_effect_param(0, 2, 0.5),
            Err(SynthError::ParameterOutOfRange { slot: 0, index: 2 })
        );
        // Nothing queued, so four sends still fit
        for _ in 0..4 {
            ctl.note_off().unwrap();
        }
    }

    #[test]
    fn shadow_chain_tracks_moves() {
        let (mut ctl, mut synth) = small();
        assert_eq!(ctl.move_effect_up(0), Ok(false));
        assert_eq!(ctl.move_effect_down(5), Ok(false));
        assert_eq!(ctl.move_effect_down(0), Ok(true));
        assert_eq!(ctl.effects()[0].name(), "Reverb");
        ctl.set_effect_param(1, 0, 0.0).unwrap();
        assert_eq!(ctl.effects()[1].params[0].value, 0.01, "clamped");

        let mut out = vec![0.0; 2 * 8];
        synth.render(&mut out).unwrap();
        let names: Vec<_> = synth.engine().chain().slots().iter().map(|s| s.name()).collect();
        let shadow: Vec<_> = ctl.effects().iter().map(|s| s.name()).collect();
        assert_eq!(names, shadow);
        assert_eq!(synth.engine().chain().slot(1).unwrap().params()[0].value, 0.01);
    }

    #[test]
    fn values_are_clamped_to_control_ranges() {
        let (mut ctl, mut synth) = small();
        ctl.set_octave(0, 9).unwrap();
        ctl.set_master_level(3.0).unwrap();
        let mut out = vec![0.0; 2 * 8];
        synth.render(&mut out).unwrap();

        assert_eq!(synth.engine().master_level(), 1.0);
        assert_eq!(ctl.matrix().level(), 1.0);
    }
}
