// Lock-free tone channel (UI thread -> CPAL callback)

use crate::audio::tone::Tone;
use ringbuf::{HeapRb, traits::Split};

pub type ToneProducer = ringbuf::HeapProd<Tone>;
pub type ToneConsumer = ringbuf::HeapCons<Tone>;

pub fn create_tone_channel(capacity: usize) -> (ToneProducer, ToneConsumer) {
    let rb = HeapRb::<Tone>::new(capacity);
    rb.split()
}
