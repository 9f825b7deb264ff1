// Sequence module - Flattened, timed view of a routine
// The compiler is a pure function: Routine in, ordered Step list out

pub mod cache;
pub mod compiler;
pub mod step;

pub use cache::SequenceCache;
pub use compiler::{READY_DURATION_SECS, checked_total_duration, compile, total_duration};
pub use step::{Activity, Phase, Step};
