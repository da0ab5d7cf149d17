//! Scan session state machine.

use crate::core::DeviceId;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle status of a scan session.
///
/// `Idle → Starting → Running → {Stopped | Failed}`. A session that cannot
/// find a camera goes from `Starting` back to `Idle`. `Stopped` and `Failed`
/// return to `Starting` when the caller activates again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    /// No session has been started, or no camera was found.
    #[default]
    Idle,
    /// Acquiring the camera.
    Starting,
    /// The decode loop is running.
    Running,
    /// Ended by a detection, the caller, or the feed closing.
    Stopped,
    /// Ended by an error.
    Failed,
}

impl SessionStatus {
    /// Returns `true` while a camera is being acquired or decoded from.
    pub fn is_in_flight(&self) -> bool {
        matches!(self, Self::Starting | Self::Running)
    }

    /// Returns `true` if the decode loop is running.
    pub fn is_running(&self) -> bool {
        matches!(self, Self::Running)
    }

    /// Returns `true` if the session ended on its own or was stopped.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Stopped | Self::Failed)
    }

    /// Returns the name of the status.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Starting => "starting",
            Self::Running => "running",
            Self::Stopped => "stopped",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Point-in-time view of a controller's session.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SessionSnapshot {
    /// Identifier of the current or most recent activation.
    pub session_id: Option<String>,
    /// Whether the caller currently wants the camera on.
    pub active: bool,
    /// The camera chosen for this session; `None` means platform default.
    pub device_id: Option<DeviceId>,
    /// Lifecycle status.
    pub status: SessionStatus,
}

/// Counters about controller behaviour across activations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionMetrics {
    /// Number of activations that reached `Starting`.
    pub sessions_started: u64,
    /// Number of successful detections.
    pub detections: u64,
    /// Number of sessions that ended in `Failed`.
    pub failures: u64,
    /// Number of sessions stopped by the caller.
    pub cancellations: u64,
    /// Number of frames handed to the decoder.
    pub frames_decoded: u64,
}

impl SessionMetrics {
    /// Creates new empty metrics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a session start.
    pub fn record_started(&mut self) {
        self.sessions_started += 1;
    }

    /// Records a detection.
    pub fn record_detection(&mut self) {
        self.detections += 1;
    }

    /// Records a failure.
    pub fn record_failure(&mut self) {
        self.failures += 1;
    }

    /// Records a caller stop.
    pub fn record_cancellation(&mut self) {
        self.cancellations += 1;
    }

    /// Records a decoded frame.
    pub fn record_frame(&mut self) {
        self.frames_decoded += 1;
    }

    /// Returns the fraction of started sessions that produced a code.
    pub fn detection_rate(&self) -> f64 {
        if self.sessions_started == 0 {
            return 0.0;
        }
        self.detections as f64 / self.sessions_started as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_default_and_names() {
        assert_eq!(SessionStatus::default(), SessionStatus::Idle);
        assert_eq!(SessionStatus::Running.to_string(), "running");
        assert_eq!(SessionStatus::Failed.name(), "failed");
    }

    #[test]
    fn test_status_predicates() {
        assert!(SessionStatus::Starting.is_in_flight());
        assert!(SessionStatus::Running.is_in_flight());
        assert!(!SessionStatus::Stopped.is_in_flight());
        assert!(SessionStatus::Stopped.is_terminal());
        assert!(SessionStatus::Failed.is_terminal());
        assert!(!SessionStatus::Idle.is_terminal());
    }

    #[test]
    fn test_metrics() {
        let mut metrics = SessionMetrics::new();
        assert_eq!(metrics.detection_rate(), 0.0);

        metrics.record_started();
        metrics.record_started();
        metrics.record_detection();
        metrics.record_cancellation();

        assert_eq!(metrics.detection_rate(), 0.5);
        assert_eq!(metrics.cancellations, 1);
    }
}
