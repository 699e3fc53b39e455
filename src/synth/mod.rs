// Purpose: the FM voice itself and the plumbing that drives it
// Matrix and engine are audio-thread types; the controller lives on the
// control thread and talks to the engine through `message`.

#[cfg(feature = "rtrb")]
pub mod controller;
pub mod engine;
pub mod matrix;
pub mod message;
pub mod voice;

#[cfg(feature = "rtrb")]
pub use controller::{split, FmController};
pub use engine::FmEngine;
pub use matrix::ModulationMatrix;
pub use message::{MessageReceiver, SynthMessage};
pub use voice::FmSynth;
