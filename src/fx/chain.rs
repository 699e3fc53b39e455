//! Ordered, individually bypassable effect slots.

use crate::{
    error::SynthError,
    fx::{EffectKind, EffectUnit},
    io::AudioBlock,
};

/*
Effect Chain
============

    engine ──→ [slot 0] ──→ [slot 1] ──→ ... ──→ [slot 5] ──→ output
                  │ disabled slots pass the block through untouched

The chain always holds one slot per effect kind, created disabled in the
order Overdrive, Reverb, Delay, Flanger, Chorus, Filter. Slots can be
swapped with a neighbour; a unit keeps its state when it moves.

Each slot carries the display state (name, enabled flag, parameter name and
last value) alongside the processor itself, so a UI can read the chain
without knowing about the units.
*/

/// A named parameter with its last-set normalized value.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct EffectParam {
    pub name: &'static str,
    pub value: f32,
}

/// Name, enabled flag and parameter values of one effect, without the
/// processor.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SlotState {
    pub kind: EffectKind,
    pub enabled: bool,
    pub params: [EffectParam; 2],
}

impl SlotState {
    pub fn new(kind: EffectKind) -> Self {
        let names = kind.param_names();
        let values = kind.default_params();
        Self {
            kind,
            enabled: false,
            params: std::array::from_fn(|i| EffectParam {
                name: names[i],
                value: values[i],
            }),
        }
    }

    pub fn name(&self) -> &'static str {
        self.kind.name()
    }

    /// The default layout: every effect kind, disabled.
    pub fn default_layout() -> [SlotState; 6] {
        EffectKind::ALL.map(SlotState::new)
    }
}

#[derive(Debug, Clone)]
pub struct EffectSlot {
    state: SlotState,
    unit: EffectUnit,
}

impl EffectSlot {
    pub fn new(kind: EffectKind, sample_rate: f32) -> Self {
        Self {
            state: SlotState::new(kind),
            unit: EffectUnit::new(kind, sample_rate),
        }
    }

    pub fn kind(&self) -> EffectKind {
        self.state.kind
    }

    pub fn name(&self) -> &'static str {
        self.state.name()
    }

    pub fn is_enabled(&self) -> bool {
        self.state.enabled
    }

    pub fn params(&self) -> &[EffectParam; 2] {
        &self.state.params
    }

    pub fn state(&self) -> &SlotState {
        &self.state
    }

    pub fn unit(&self) -> &EffectUnit {
        &self.unit
    }
}

/// Swap `items[index]` with its neighbour towards the front. No-op at the
/// front or out of range.
pub(crate) fn swap_up<T>(items: &mut [T], index: usize) -> bool {
    if index == 0 || index >= items.len() {
        return false;
    }
    items.swap(index, index - 1);
    true
}

/// Swap `items[index]` with its neighbour towards the back. No-op at the
/// back or out of range.
pub(crate) fn swap_down<T>(items: &mut [T], index: usize) -> bool {
    if index + 1 >= items.len() {
        return false;
    }
    items.swap(index, index + 1);
    true
}

#[derive(Debug, Clone)]
pub struct EffectChain {
    slots: Vec<EffectSlot>,
}

impl EffectChain {
    pub fn new(sample_rate: f32) -> Self {
        Self {
            slots: EffectKind::ALL
                .iter()
                .map(|&kind| EffectSlot::new(kind, sample_rate))
                .collect(),
        }
    }

    pub fn slots(&self) -> &[EffectSlot] {
        &self.slots
    }

    pub fn slot(&self, index: usize) -> Option<&EffectSlot> {
        self.slots.get(index)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Current position of `kind` in the chain.
    pub fn position(&self, kind: EffectKind) -> Option<usize> {
        self.slots.iter().position(|slot| slot.kind() == kind)
    }

    fn slot_mut(&mut self, index: usize) -> Result<&mut EffectSlot, SynthError> {
        self.slots
            .get_mut(index)
            .ok_or(SynthError::EffectSlotOutOfRange { slot: index })
    }

    /// Flip the enabled flag. Returns the new state.
    pub fn toggle(&mut self, index: usize) -> Result<bool, SynthError> {
        let slot = self.slot_mut(index)?;
        slot.state.enabled = !slot.state.enabled;
        Ok(slot.state.enabled)
    }

    pub fn set_enabled(&mut self, index: usize, enabled: bool) -> Result<(), SynthError> {
        self.slot_mut(index)?.state.enabled = enabled;
        Ok(())
    }

    /// Store and apply normalized parameter `param` of slot `index`.
    pub fn set_param(&mut self, index: usize, param: usize, value: f32) -> Result<(), SynthError> {
        let slot = self.slot_mut(index)?;
        let stored = slot
            .state
            .params
            .get_mut(param)
            .ok_or(SynthError::ParameterOutOfRange {
                slot: index,
                index: param,
            })?;
        stored.value = value;
        slot.unit.set_param(param, value);
        Ok(())
    }

    pub fn move_up(&mut self, index: usize) -> bool {
        swap_up(&mut self.slots, index)
    }

    pub fn move_down(&mut self, index: usize) -> bool {
        swap_down(&mut self.slots, index)
    }

    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        for slot in &mut self.slots {
            slot.unit.set_sample_rate(sample_rate);
        }
    }

    /// Run every enabled slot over `block`, in chain order.
    pub fn process(&mut self, block: &mut AudioBlock) {
        for slot in self.slots.iter_mut().filter(|slot| slot.state.enabled) {
            slot.unit.process_block(block);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order(chain: &EffectChain) -> Vec<&'static str> {
        chain.slots().iter().map(|s| s.name()).collect()
    }

    #[test]
    fn starts_with_every_effect_disabled() {
        let chain = EffectChain::new(48_000.0);
        assert_eq!(
            order(&chain),
            ["Overdrive", "Reverb", "Delay", "Flanger", "Chorus", "Filter"]
        );
        assert!(chain.slots().iter().all(|s| !s.is_enabled()));

        let reverb = chain.slot(1).unwrap();
        assert_eq!(reverb.params()[0], EffectParam { name: "Damping", value: 0.7 });
        assert_eq!(reverb.params()[1], EffectParam { name: "Room Size", value: 0.6 });
    }

    #[test]
    fn disabled_chain_is_a_bypass() {
        let mut chain = EffectChain::new(48_000.0);
        let input: Vec<f32> = (0..256).map(|n| (n as f32 * 0.1).sin()).collect();
        let mut data = input.clone();
        let mut block = AudioBlock::new(&mut data, 2).unwrap();
        chain.process(&mut block);
        assert_eq!(data, input);
    }

    #[test]
    fn moves_swap_neighbours_and_ignore_edges() {
        let mut chain = EffectChain::new(48_000.0);

        assert!(!chain.move_up(0));
        assert!(!chain.move_down(5));
        assert!(!chain.move_up(17));
        assert!(!chain.move_down(17));

        assert!(chain.move_down(0));
        assert_eq!(order(&chain)[..2], ["Reverb", "Overdrive"]);
        assert!(chain.move_up(5));
        assert_eq!(order(&chain)[4..], ["Filter", "Chorus"]);
        assert_eq!(chain.position(EffectKind::Chorus), Some(5));
    }

    #[test]
    fn state_travels_with_the_slot() {
        let mut chain = EffectChain::new(48_000.0);
        chain.set_enabled(2, true).unwrap();
        chain.set_param(2, 1, 0.1).unwrap();

        chain.move_up(2);
        let delay = chain.slot(1).unwrap();
        assert_eq!(delay.kind(), EffectKind::Delay);
        assert!(delay.is_enabled());
        assert_eq!(delay.params()[1].value, 0.1);
    }

    #[test]
    fn toggle_flips_and_reports() {
        let mut chain = EffectChain::new(48_000.0);
        assert_eq!(chain.toggle(3), Ok(true));
        assert_eq!(chain.toggle(3), Ok(false));
        assert_eq!(
            chain.toggle(6),
            Err(SynthError::EffectSlotOutOfRange { slot: 6 })
        );
    }

    #[test]
    fn bad_parameter_index_changes_nothing() {
        let mut chain = EffectChain::new(48_000.0);
        assert_eq!(
            chain.set_param(0, 2, 0.9),
            Err(SynthError::ParameterOutOfRange { slot: 0, index: 2 })
        );
        assert_eq!(chain.slot(0).unwrap().params()[0].value, 0.5);
    }

    #[test]
    fn enabled_delay_colours_the_signal() {
        let mut chain = EffectChain::new(1_000.0);
        chain.set_param(2, 1, 0.01).unwrap(); // 10 samples
        chain.set_enabled(2, true).unwrap();

        let mut data = vec![0.0; 2 * 32];
        data[0] = 1.0;
        data[1] = 1.0;
        let mut block = AudioBlock::new(&mut data, 2).unwrap();
        chain.process(&mut block);

        assert_eq!(data[0], 0.5);
        assert_eq!(data[20], 0.5, "echo 10 frames later");
    }
}
