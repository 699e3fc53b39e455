use crate::DEFAULT_SAMPLE_RATE;

/*
ADSR Envelope Generator
=======================

Each oscillator owns one of these. It shapes the oscillator's amplitude one
sample at a time: `apply(sample)` advances the state machine, then returns
`sample * level`.

Vocabulary
----------

  level       Current gain, 0.0 to 1.0.

  stage       Idle, Attack, Decay, Sustain or Release.

  rate        How much `level` moves per sample in a ramping stage. Rates are
              derived from a time in seconds when their setter is called:

                attack_rate  = 1 / (sr * t)
                decay_rate   = (1 - sustain) / (sr * t)
                release_rate = sustain / (sr * t)

              They are snapshots. Changing the sustain level or the sample
              rate later does not rescale a rate that was already computed;
              call the setter again for that.


The State Machine
-----------------

    ┌──────┐ note_on ┌────────┐ level>=1 ┌───────┐ level<=S ┌─────────┐
    │ Idle │ ──────→ │ Attack │ ───────→ │ Decay │ ───────→ │ Sustain │
    └──────┘         └────────┘          └───────┘          └─────────┘
        ↑                                                         │
        │ level<=0        ┌─────────┐          note_off           │
        └──────────────── │ Release │ ←───────────────────────────┘
                          └─────────┘      (from any stage)

note_on jumps to Attack from any stage and ramps up from the CURRENT level,
so a retrigger during release does not click back to zero.

Every tick clamps the level to the bound of the stage it just ramped
towards: 1.0 for Attack, the sustain level for Decay, 0.0 for Release.
*/

/// The current stage of the envelope state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvelopeState {
    Idle,    // level held, expected 0
    Attack,  // ramping up to 1.0
    Decay,   // ramping down to sustain level
    Sustain, // holding
    Release, // ramping down to 0
}

#[derive(Debug, Clone)]
pub struct Envelope {
    state: EnvelopeState,
    level: f32,

    // Per-sample increments, snapshotted by the setters
    attack_rate: f32,
    decay_rate: f32,
    release_rate: f32,

    sustain_level: f32,
    sample_rate: f32,
}

impl Default for Envelope {
    fn default() -> Self {
        Self::new()
    }
}

impl Envelope {
    pub fn new() -> Self {
        Self {
            state: EnvelopeState::Idle,
            level: 0.0,
            attack_rate: 0.001,
            decay_rate: 0.001,
            release_rate: 0.001,
            sustain_level: 0.7,
            sample_rate: DEFAULT_SAMPLE_RATE,
        }
    }

    /// Build an envelope from times in seconds and a sustain level.
    ///
    /// Sustain is applied first so decay and release derive from it.
    pub fn adsr(sample_rate: f32, attack: f32, decay: f32, sustain: f32, release: f32) -> Self {
        let mut env = Self::new();
        env.set_sample_rate(sample_rate);
        env.set_sustain_level(sustain);
        env.set_attack_time(attack);
        env.set_decay_time(decay);
        env.set_release_time(release);
        env
    }

    /// Advance one sample and scale `sample` by the new level.
    #[inline]
    pub fn apply(&mut self, sample: f32) -> f32 {
        match self.state {
            EnvelopeState::Attack => {
                self.level += self.attack_rate;
                if self.level >= 1.0 {
                    self.level = 1.0;
                    self.state = EnvelopeState::Decay;
                }
            }
            EnvelopeState::Decay => {
                self.level -= self.decay_rate;
                if self.level <= self.sustain_level {
                    self.level = self.sustain_level;
                    self.state = EnvelopeState::Sustain;
                }
            }
            EnvelopeState::Release => {
                self.level -= self.release_rate;
                if self.level <= 0.0 {
                    self.level = 0.0;
                    self.state = EnvelopeState::Idle;
                }
            }
            EnvelopeState::Sustain | EnvelopeState::Idle => {}
        }

        sample * self.level
    }

    /// Gate high: restart the attack from the current level.
    pub fn note_on(&mut self) {
        self.state = EnvelopeState::Attack;
    }

    /// Gate low: release from whatever stage we are in.
    pub fn note_off(&mut self) {
        self.state = EnvelopeState::Release;
    }

    pub fn set_attack_time(&mut self, seconds: f32) {
        self.attack_rate = 1.0 / (self.sample_rate * seconds);
    }

    pub fn set_decay_time(&mut self, seconds: f32) {
        self.decay_rate = (1.0 - self.sustain_level) / (self.sample_rate * seconds);
    }

    pub fn set_sustain_level(&mut self, level: f32) {
        self.sustain_level = level.clamp(0.0, 1.0);
    }

    pub fn set_release_time(&mut self, seconds: f32) {
        self.release_rate = self.sustain_level / (self.sample_rate * seconds);
    }

    /// Only affects rates set after this call.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
    }

    pub fn reset(&mut self) {
        self.state = EnvelopeState::Idle;
        self.level = 0.0;
    }

    pub fn is_active(&self) -> bool {
        self.state != EnvelopeState::Idle
    }

    pub fn level(&self) -> f32 {
        self.level
    }

    pub fn state(&self) -> EnvelopeState {
        self.state
    }

    pub fn sustain_level(&self) -> f32 {
        self.sustain_level
    }

    pub fn attack_rate(&self) -> f32 {
        self.attack_rate
    }

    pub fn decay_rate(&self) -> f32 {
        self.decay_rate
    }

    pub fn release_rate(&self) -> f32 {
        self.release_rate
    }
}
