// HIIT Timer - Library exports for the binary, tests and benchmarks

pub mod app;
pub mod audio;
pub mod config;
pub mod generator;
pub mod library;
pub mod messaging;
pub mod playback;
pub mod routine;
pub mod sequence;
pub mod ui;

// Re-export commonly used types for convenience
pub use app::{Controller, Tab};
pub use audio::{Tone, ToneOutput, ToneSink};
pub use config::Settings;
pub use generator::{BodyTarget, GeneratorOptions, generate};
pub use library::{RoutineLibrary, parse_routine};
pub use playback::{Cue, DisplayFrame, PlaybackMachine, TickScheduler, TimerState};
pub use routine::{Exercise, HiitConfig, PhaseList, Routine};
pub use sequence::{Activity, Phase, SequenceCache, Step, compile, total_duration};
