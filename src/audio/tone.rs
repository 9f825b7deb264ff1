// Tones - Frequency/duration/volume triples for every playback cue

use crate::playback::Cue;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    /// Frequency in Hz
    pub frequency: f32,
    /// Length in seconds
    pub duration_secs: f32,
    /// Peak gain (0.0 to 1.0)
    pub volume: f32,
}

impl Tone {
    /// Countdown about to expire
    pub const WARNING: Tone = Tone::new(1200.0, 0.35, 1.0);
    /// Step boundary
    pub const TRANSITION: Tone = Tone::new(1500.0, 0.6, 1.0);
    /// Sequence completed
    pub const COMPLETED: Tone = Tone::new(800.0, 1.2, 1.0);
    /// Routine imported successfully
    pub const IMPORT_CONFIRM: Tone = Tone::new(1000.0, 0.3, 0.5);

    pub const fn new(frequency: f32, duration_secs: f32, volume: f32) -> Self {
        Self {
            frequency,
            duration_secs,
            volume,
        }
    }

    /// Number of samples the tone lasts at `sample_rate`
    pub fn sample_count(&self, sample_rate: f32) -> usize {
        (self.duration_secs.max(0.0) * sample_rate).round() as usize
    }
}

impl From<Cue> for Tone {
    fn from(cue: Cue) -> Self {
        match cue {
            Cue::Warning => Tone::WARNING,
            Cue::Transition => Tone::TRANSITION,
            Cue::Completed => Tone::COMPLETED,
        }
    }
}

/// Anything that can play a tone
///
/// Fire-and-forget: implementations must not block the caller. Failing to
/// produce sound is not an error for the caller.
pub trait ToneSink {
    /// Acquire (or resume) the output resource ahead of time
    ///
    /// Called from a user interaction before playback starts. Idempotent.
    fn ensure_ready(&mut self) {}

    fn play_tone(&mut self, tone: Tone);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cue_tones_are_distinct() {
        let warning = Tone::from(Cue::Warning);
        let transition = Tone::from(Cue::Transition);
        let completed = Tone::from(Cue::Completed);

        assert_ne!(warning.frequency, transition.frequency);
        assert_ne!(transition.frequency, completed.frequency);
        assert_ne!(warning.duration_secs, completed.duration_secs);
    }

    #[test]
    fn test_sample_count() {
        assert_eq!(Tone::WARNING.sample_count(48000.0), 16800);
        assert_eq!(Tone::new(440.0, -1.0, 1.0).sample_count(48000.0), 0);
    }
}
