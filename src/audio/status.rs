// Stream status shared between the UI thread and the audio error callback

use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamStatus {
    /// Never opened (audio is acquired on first use)
    Closed = 0,
    Open = 1,
    /// Platform refused or failed to open an output
    Unavailable = 2,
    /// Stream reported an error after opening
    Error = 3,
}

impl From<u8> for StreamStatus {
    fn from(value: u8) -> Self {
        match value {
            1 => StreamStatus::Open,
            2 => StreamStatus::Unavailable,
            3 => StreamStatus::Error,
            _ => StreamStatus::Closed,
        }
    }
}

/// Atomic wrapper so the CPAL error callback can flag a broken stream
#[derive(Clone, Debug)]
pub struct AtomicStreamStatus {
    inner: Arc<AtomicU8>,
}

impl AtomicStreamStatus {
    pub fn new(status: StreamStatus) -> Self {
        Self {
            inner: Arc::new(AtomicU8::new(status as u8)),
        }
    }

    pub fn get(&self) -> StreamStatus {
        StreamStatus::from(self.inner.load(Ordering::Relaxed))
    }

    pub fn set(&self, status: StreamStatus) {
        self.inner.store(status as u8, Ordering::Relaxed);
    }
}

impl Default for AtomicStreamStatus {
    fn default() -> Self {
        Self::new(StreamStatus::Closed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_roundtrip_through_clone() {
        let status = AtomicStreamStatus::default();
        let callback_side = status.clone();
        assert_eq!(status.get(), StreamStatus::Closed);

        callback_side.set(StreamStatus::Error);
        assert_eq!(status.get(), StreamStatus::Error);
    }

    #[test]
    fn test_unknown_value_is_closed() {
        assert_eq!(StreamStatus::from(42), StreamStatus::Closed);
    }
}
