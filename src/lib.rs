pub mod config;
pub mod dsp;
pub mod error;
pub mod fx; // Effect units and the effect chain
pub mod io;
pub mod synth; // Modulation matrix, engine and control plumbing

pub use config::EngineConfig;
pub use error::SynthError;
pub use synth::{FmEngine, FmSynth, ModulationMatrix, SynthMessage};
#[cfg(feature = "rtrb")]
pub use synth::{split, FmController};

pub const MAX_BLOCK_SIZE: usize = 2048;
pub const DEFAULT_SAMPLE_RATE: f32 = 48_000.0;
/// The engine always owns exactly this many oscillators.
pub const OSCILLATOR_COUNT: usize = 4;
