// Format conversion for CPAL output buffers
//
// Tones are rendered in f32 and converted to the device sample format
// (f32, i16, u16) while writing each frame. Allocation-free.

use cpal::{FromSample, Sample};

/// Write one mono sample to every channel of an interleaved frame
#[inline]
pub fn write_mono_to_frame<T>(sample: f32, frame: &mut [T])
where
    T: Sample + FromSample<f32>,
{
    let value: T = T::from_sample(sample.clamp(-1.0, 1.0));
    for channel in frame.iter_mut() {
        *channel = value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_f32_frame() {
        let mut frame = [0.0f32; 2];
        write_mono_to_frame(0.5, &mut frame);
        assert_eq!(frame, [0.5, 0.5]);
    }

    #[test]
    fn test_write_i16_frame_clamps() {
        let mut frame = [0i16; 2];
        write_mono_to_frame(2.0, &mut frame);
        assert_eq!(frame[0], i16::MAX);
        assert_eq!(frame[0], frame[1]);

        write_mono_to_frame(0.0, &mut frame);
        assert_eq!(frame, [0, 0]);
    }

    #[test]
    fn test_write_u16_frame_silence_is_midpoint() {
        let mut frame = [0u16; 1];
        write_mono_to_frame(0.0, &mut frame);
        assert_eq!(frame[0], 32768);
    }
}
