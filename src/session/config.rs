//! Scan session configuration.

use crate::core::DecodeHints;

use std::time::Duration;

/// Configuration for a [`ScanSessionController`](crate::session::ScanSessionController).
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Time between frame samples. A zero interval is treated as 1 ms.
    pub frame_interval: Duration,

    /// Hints passed to the decoder with each frame.
    pub decode_hints: DecodeHints,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            frame_interval: Duration::from_millis(100),
            decode_hints: DecodeHints::default(),
        }
    }
}

impl SessionConfig {
    /// Creates a new configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the time between frame samples.
    pub fn with_frame_interval(mut self, interval: Duration) -> Self {
        self.frame_interval = interval.max(Duration::from_millis(1));
        self
    }

    /// Sets the decode hints.
    pub fn with_decode_hints(mut self, hints: DecodeHints) -> Self {
        self.decode_hints = hints;
        self
    }
}
