// Purpose - external interfaces: host audio blocks and decoded MIDI

pub mod block;
pub mod converter;
pub mod midi;

pub use block::AudioBlock;
