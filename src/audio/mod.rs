// Audio module - Cue tones rendered through a lazily opened CPAL stream

pub mod device;
pub mod format_conversion;
pub mod output;
pub mod status;
pub mod tone;
pub mod voice;

pub use output::{AudioError, SharedVolume, ToneOutput};
pub use status::{AtomicStreamStatus, StreamStatus};
pub use tone::{Tone, ToneSink};
pub use voice::ToneVoice;
