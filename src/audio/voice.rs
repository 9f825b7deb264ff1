// Tone voice - Square wave with an exponential gain ramp
//
// Runs inside the CPAL callback: no allocation, no locking. A new tone
// replaces whatever is still sounding.

use super::tone::Tone;

/// Gain the ramp ends on (an exponential ramp cannot reach zero)
const RAMP_FLOOR: f32 = 0.01;

#[derive(Debug, Clone)]
pub struct ToneVoice {
    sample_rate: f32,
    phase: f32,
    phase_increment: f32,
    gain: f32,
    decay: f32,
    remaining: usize,
}

impl ToneVoice {
    pub fn new(sample_rate: f32) -> Self {
        Self {
            sample_rate,
            phase: 0.0,
            phase_increment: 0.0,
            gain: 0.0,
            decay: 1.0,
            remaining: 0,
        }
    }

    /// Start sounding `tone` from its first sample
    pub fn start(&mut self, tone: Tone) {
        let samples = tone.sample_count(self.sample_rate);
        let volume = tone.volume.clamp(0.0, 1.0);

        self.phase = 0.0;
        self.phase_increment = tone.frequency / self.sample_rate;
        self.gain = volume;
        self.remaining = samples;
        // Per-sample factor taking the gain from `volume` to the floor
        self.decay = if samples > 0 && volume > RAMP_FLOOR {
            (RAMP_FLOOR / volume).powf(1.0 / samples as f32)
        } else {
            1.0
        };
    }

    pub fn is_active(&self) -> bool {
        self.remaining > 0
    }

    pub fn next_sample(&mut self) -> f32 {
        if self.remaining == 0 {
            return 0.0;
        }

        let square = if self.phase < 0.5 { 1.0 } else { -1.0 };
        let sample = square * self.gain;

        self.phase += self.phase_increment;
        if self.phase >= 1.0 {
            self.phase -= 1.0;
        }
        self.gain *= self.decay;
        self.remaining -= 1;

        sample
    }
}
