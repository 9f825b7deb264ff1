// Playback module - Live countdown across a compiled sequence
//
// The machine owns the position and timer state and reports audio/visual
// cues as return values. The scheduler decides when a tick is due; the
// controller wires the two together and forwards cues to the audio output.

pub mod display;
pub mod machine;
pub mod scheduler;
pub mod state;

pub use display::{DisplayFrame, format_clock};
pub use machine::{PlaybackError, PlaybackMachine};
pub use scheduler::TickScheduler;
pub use state::{Cue, TimerState};
