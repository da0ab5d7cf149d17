//! The scan session controller.

use crate::audit;
use crate::core::{
    select_preferred_device, ArcCamera, ArcDecoder, CameraError, DecodedCode, SessionError,
    VideoStream,
};
use crate::session::config::SessionConfig;
use crate::session::events::{EndReason, SessionEvent, SessionEvents};
use crate::session::state::{SessionMetrics, SessionSnapshot, SessionStatus};

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, RwLock};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use uuid::Uuid;

const MIN_FRAME_INTERVAL: Duration = Duration::from_millis(1);

/// Owns the camera-acquisition and decode-loop lifecycle.
///
/// Each activation acquires a camera, samples frames on a spawned task and
/// feeds them to the decoder. The first decoded code releases the camera,
/// moves the session to [`SessionStatus::Stopped`] and is delivered as a
/// single [`SessionEvent::Detected`]. Errors are delivered as events too;
/// nothing is retried automatically.
///
/// # Example
///
/// ```rust,ignore
/// use shelfscan::backends::{MockCamera, MockDecoder};
/// use shelfscan::session::{ScanSessionController, SessionConfig, SessionEvent};
/// use std::sync::Arc;
///
/// let camera = Arc::new(MockCamera::with_back_camera());
/// let decoder = Arc::new(MockDecoder::always("7791234567890"));
/// let (controller, mut events) = ScanSessionController::new(camera, decoder, SessionConfig::default());
///
/// controller.request_active(true).await;
/// if let Some(SessionEvent::Detected { code, .. }) = events.recv().await {
///     println!("scanned {code}");
/// }
/// ```
pub struct ScanSessionController {
    inner: Arc<Inner>,
}

struct Inner {
    camera: ArcCamera,
    decoder: ArcDecoder,
    config: SessionConfig,
    // Lock order: `stream` before `state`.
    stream: Mutex<Option<Box<dyn VideoStream>>>,
    state: Mutex<SessionState>,
    generation: AtomicU64,
    events: mpsc::UnboundedSender<SessionEvent>,
    metrics: RwLock<SessionMetrics>,
}

#[derive(Debug, Default)]
struct SessionState {
    status: SessionStatus,
    requested_active: bool,
    device_id: Option<crate::core::DeviceId>,
    session_id: Option<String>,
    frames: u64,
}

enum Acquisition {
    Ready(Box<dyn VideoStream>),
    Failed(CameraError),
    Superseded,
}

enum LoopStep {
    Continue,
    Finished,
}

enum Outcome {
    Detected(DecodedCode),
    Failed(SessionError),
    Ended(EndReason),
}

impl ScanSessionController {
    /// Creates a controller and the receiver for its events.
    pub fn new(
        camera: ArcCamera,
        decoder: ArcDecoder,
        config: SessionConfig,
    ) -> (Self, SessionEvents) {
        let (tx, events) = SessionEvents::channel();
        let inner = Inner {
            camera,
            decoder,
            config,
            stream: Mutex::new(None),
            state: Mutex::new(SessionState::default()),
            generation: AtomicU64::new(0),
            events: tx,
            metrics: RwLock::new(SessionMetrics::new()),
        };
        (
            Self {
                inner: Arc::new(inner),
            },
            events,
        )
    }

    /// Applies the caller's requested state.
    ///
    /// `true` starts a session unless one is already starting or running;
    /// `false` stops it before returning.
    pub async fn request_active(&self, requested: bool) {
        if requested {
            self.start().await;
        } else {
            self.stop();
        }
    }

    /// Starts a session: acquire the preferred camera and begin decoding.
    ///
    /// Returns once the decode loop is running or the acquisition has
    /// ended. Failures are reported as events, never returned.
    pub async fn start(&self) {
        let Some((generation, session_id)) = self.inner.begin() else {
            return;
        };

        audit::emit_session_started(
            &session_id,
            self.inner.camera.name(),
            self.inner.decoder.name(),
        );

        match self.inner.acquire(generation, &session_id).await {
            Acquisition::Ready(stream) => {
                Arc::clone(&self.inner).begin_decoding(generation, session_id, stream)
            }
            Acquisition::Failed(error) => self.inner.fail_acquisition(generation, &session_id, error),
            Acquisition::Superseded => {
                tracing::debug!(session_id = %session_id, "Acquisition superseded by a newer request");
            }
        }
    }

    /// Stops the current session and releases the camera.
    ///
    /// Idempotent. When a session was starting or running, an
    /// [`EndReason::Cancelled`] event is emitted.
    ///
    /// Blocks until a frame capture or decode that is already under way
    /// has finished, so the caller waits at most one
    /// [`BarcodeDecoder::decode`](crate::core::BarcodeDecoder::decode) call.
    pub fn stop(&self) {
        self.inner.stop();
    }

    /// Returns the current status.
    pub fn status(&self) -> SessionStatus {
        self.inner.lock_state().status
    }

    /// Returns `true` if the caller currently wants the camera on.
    pub fn is_active(&self) -> bool {
        self.inner.lock_state().requested_active
    }

    /// Returns a snapshot of the current session.
    pub fn snapshot(&self) -> SessionSnapshot {
        let state = self.inner.lock_state();
        SessionSnapshot {
            session_id: state.session_id.clone(),
            active: state.requested_active,
            device_id: state.device_id.clone(),
            status: state.status,
        }
    }

    /// Returns a copy of the current metrics.
    pub fn metrics(&self) -> SessionMetrics {
        self.inner
            .metrics
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Returns a reference to the configuration.
    pub fn config(&self) -> &SessionConfig {
        &self.inner.config
    }
}

impl Drop for ScanSessionController {
    fn drop(&mut self) {
        self.inner.stop();
    }
}

impl fmt::Debug for ScanSessionController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScanSessionController")
            .field("camera", &self.inner.camera.name())
            .field("decoder", &self.inner.decoder.name())
            .field("status", &self.status())
            .field("config", &self.inner.config)
            .finish()
    }
}

impl Inner {
    fn lock_state(&self) -> MutexGuard<'_, SessionState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn lock_stream(&self) -> MutexGuard<'_, Option<Box<dyn VideoStream>>> {
        self.stream
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn is_current(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation
    }

    fn record(&self, f: impl FnOnce(&mut SessionMetrics)) {
        let mut metrics = self
            .metrics
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        f(&mut *metrics);
    }

    fn emit(&self, event: SessionEvent) {
        if self.events.send(event).is_err() {
            tracing::debug!("Session event receiver dropped");
        }
    }

    /// Moves to `Starting` and opens a new generation, unless a session is
    /// already in flight.
    fn begin(&self) -> Option<(u64, String)> {
        let mut state = self.lock_state();
        state.requested_active = true;
        if state.status.is_in_flight() {
            tracing::debug!(status = %state.status, "Session already active, ignoring start");
            return None;
        }

        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let session_id = Uuid::new_v4().to_string();
        state.status = SessionStatus::Starting;
        state.device_id = None;
        state.session_id = Some(session_id.clone());
        state.frames = 0;
        drop(state);

        self.record(SessionMetrics::record_started);
        Some((generation, session_id))
    }

    async fn acquire(&self, generation: u64, session_id: &str) -> Acquisition {
        let access = match self.camera.request_access().await {
            Ok(access) => access,
            Err(error) => return Acquisition::Failed(error),
        };
        if !self.is_current(generation) {
            return Acquisition::Superseded;
        }

        let devices = match self.camera.list_video_inputs(&access).await {
            Ok(devices) => devices,
            Err(error) => return Acquisition::Failed(error),
        };
        if !self.is_current(generation) {
            return Acquisition::Superseded;
        }

        let selected = select_preferred_device(&devices).map(|device| device.device_id.clone());
        audit::emit_device_selected(session_id, selected.as_ref(), devices.len());
        {
            let mut state = self.lock_state();
            if !self.is_current(generation) {
                return Acquisition::Superseded;
            }
            state.device_id = selected.clone();
        }

        match self.camera.open(&access, selected.as_ref()).await {
            Ok(stream) => Acquisition::Ready(stream),
            Err(error) => Acquisition::Failed(error),
        }
    }

    fn begin_decoding(
        self: Arc<Self>,
        generation: u64,
        session_id: String,
        mut stream: Box<dyn VideoStream>,
    ) {
        {
            let mut slot = self.lock_stream();
            let mut state = self.lock_state();
            if !self.is_current(generation) {
                drop(state);
                drop(slot);
                stream.release();
                tracing::debug!(
                    session_id = %session_id,
                    "Session cancelled during acquisition, camera released"
                );
                return;
            }

            if let Some(mut orphan) = slot.take() {
                tracing::warn!(session_id = %session_id, "Releasing camera left from a previous session");
                orphan.release();
            }
            *slot = Some(stream);
            state.status = SessionStatus::Running;
        }

        tracing::debug!(
            session_id = %session_id,
            interval_ms = self.frame_interval().as_millis() as u64,
            "Decode loop starting"
        );
        tokio::spawn(self.decode_loop(generation, session_id));
    }

    /// The configured interval, never zero.
    fn frame_interval(&self) -> Duration {
        self.config.frame_interval.max(MIN_FRAME_INTERVAL)
    }

    async fn decode_loop(self: Arc<Self>, generation: u64, session_id: String) {
        let mut ticker = tokio::time::interval(self.frame_interval());
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            if let LoopStep::Finished = self.step(generation, &session_id) {
                break;
            }
        }

        tracing::debug!(session_id = %session_id, "Decode loop exited");
    }

    /// Captures and decodes one frame.
    ///
    /// Runs entirely under the stream lock, so `stop` cannot return while a
    /// capture or decode is in progress. The decoder is reset under the same
    /// lock, before a new session can install its stream.
    fn step(&self, generation: u64, session_id: &str) -> LoopStep {
        let mut slot = self.lock_stream();
        if !self.is_current(generation) {
            return LoopStep::Finished;
        }
        let Some(stream) = slot.as_mut() else {
            return LoopStep::Finished;
        };

        let outcome = match stream.capture() {
            Ok(Some(frame)) => {
                self.lock_state().frames += 1;
                self.record(SessionMetrics::record_frame);
                match self.decoder.decode(&frame, &self.config.decode_hints) {
                    Ok(code) => Outcome::Detected(code),
                    Err(error) if error.is_not_found() => {
                        tracing::trace!(session_id = %session_id, sequence = frame.sequence, "No code in frame");
                        return LoopStep::Continue;
                    }
                    Err(error) => Outcome::Failed(SessionError::decode_stream(error.to_string())),
                }
            }
            Ok(None) => Outcome::Ended(EndReason::StreamClosed),
            Err(error) => Outcome::Failed(SessionError::decode_stream(error.to_string())),
        };

        // The camera is released before anyone hears about the outcome.
        if let Some(mut stream) = slot.take() {
            stream.release();
        }
        let frames = {
            let mut state = self.lock_state();
            self.generation.fetch_add(1, Ordering::SeqCst);
            state.requested_active = false;
            state.status = match outcome {
                Outcome::Failed(_) => SessionStatus::Failed,
                _ => SessionStatus::Stopped,
            };
            state.frames
        };
        self.decoder.reset();
        drop(slot);

        let event = match outcome {
            Outcome::Detected(code) => {
                self.record(SessionMetrics::record_detection);
                audit::emit_code_detected(session_id, &code, frames);
                SessionEvent::Detected {
                    session_id: session_id.to_string(),
                    code,
                }
            }
            Outcome::Failed(error) => {
                self.record(SessionMetrics::record_failure);
                audit::emit_session_failed(session_id, &error);
                SessionEvent::Error {
                    session_id: session_id.to_string(),
                    error,
                }
            }
            Outcome::Ended(reason) => {
                audit::emit_session_stopped(session_id, "stream_closed");
                SessionEvent::Ended {
                    session_id: session_id.to_string(),
                    reason,
                }
            }
        };
        self.emit(event);
        LoopStep::Finished
    }

    fn fail_acquisition(&self, generation: u64, session_id: &str, error: CameraError) {
        let mut state = self.lock_state();
        if !self.is_current(generation) {
            return;
        }

        if error.is_no_device() {
            // Devices often enumerate late; the caller can activate again.
            state.status = SessionStatus::Idle;
            drop(state);
            tracing::debug!(session_id = %session_id, "No camera found, staying idle");
            return;
        }

        state.status = SessionStatus::Failed;
        state.requested_active = false;
        drop(state);

        let error = SessionError::from(error);
        self.record(SessionMetrics::record_failure);
        audit::emit_session_failed(session_id, &error);
        self.emit(SessionEvent::Error {
            session_id: session_id.to_string(),
            error,
        });
    }

    fn stop(&self) {
        let session_id = {
            let mut slot = self.lock_stream();
            let mut state = self.lock_state();
            state.requested_active = false;
            if !state.status.is_in_flight() {
                return;
            }

            self.generation.fetch_add(1, Ordering::SeqCst);
            if let Some(mut stream) = slot.take() {
                stream.release();
            }
            state.status = SessionStatus::Stopped;
            let session_id = state.session_id.clone().unwrap_or_default();
            drop(state);

            self.decoder.reset();
            session_id
        };

        self.record(SessionMetrics::record_cancellation);
        audit::emit_session_stopped(&session_id, "cancelled");
        self.emit(SessionEvent::Ended {
            session_id,
            reason: EndReason::Cancelled,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::{MockCamera, MockDecoder};
    use crate::core::{
        BarcodeDecoder, CameraError, DecodeError, DecodeHints, DeviceDescriptor, Frame,
    };
    use std::sync::atomic::AtomicBool;

    /// A decoder that never finds a code and can be slowed down, recording
    /// any decode that overlaps a reset.
    #[derive(Debug, Default)]
    struct SlowDecoder {
        decode_delay: Duration,
        reset_delay: Duration,
        resetting: AtomicBool,
        started: AtomicU64,
        finished: AtomicU64,
        resets: AtomicU64,
        overlapping: AtomicU64,
    }

    impl BarcodeDecoder for SlowDecoder {
        fn name(&self) -> &str {
            "slow"
        }

        fn decode(&self, _frame: &Frame, _hints: &DecodeHints) -> Result<DecodedCode, DecodeError> {
            self.started.fetch_add(1, Ordering::SeqCst);
            if self.resetting.load(Ordering::SeqCst) {
                self.overlapping.fetch_add(1, Ordering::SeqCst);
            }
            std::thread::sleep(self.decode_delay);
            self.finished.fetch_add(1, Ordering::SeqCst);
            Err(DecodeError::NotFound)
        }

        fn reset(&self) {
            self.resetting.store(true, Ordering::SeqCst);
            std::thread::sleep(self.reset_delay);
            self.resetting.store(false, Ordering::SeqCst);
            self.resets.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn controller(
        camera: MockCamera,
        decoder: ArcDecoder,
    ) -> (ScanSessionController, SessionEvents) {
        ScanSessionController::new(
            Arc::new(camera),
            decoder,
            SessionConfig::new().with_frame_interval(Duration::from_millis(1)),
        )
    }

    async fn next_event(events: &mut SessionEvents) -> SessionEvent {
        tokio::time::timeout(Duration::from_secs(2), events.recv())
            .await
            .expect("timed out waiting for a session event")
            .expect("event channel closed")
    }

    #[tokio::test]
    async fn test_detects_once_and_releases_camera() {
        let camera = MockCamera::with_back_camera();
        let stats = camera.stats();
        let decoder = Arc::new(
            MockDecoder::new()
                .then_not_found(2)
                .then_detect("7791234567890")
                .then_detect("second"),
        );
        let (controller, mut events) = controller(camera, decoder.clone());

        controller.start().await;
        let event = next_event(&mut events).await;

        assert_eq!(event.code().map(|c| c.as_str()), Some("7791234567890"));
        assert_eq!(stats.open_handles(), 0);
        assert_eq!(controller.status(), SessionStatus::Stopped);

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(decoder.calls(), 3);
        assert!(events.try_recv().is_none());
        assert_eq!(stats.captures_after_release(), 0);
        assert_eq!(controller.metrics().detections, 1);
    }

    #[tokio::test]
    async fn test_not_found_frames_keep_running() {
        let camera = MockCamera::with_back_camera();
        let decoder = Arc::new(MockDecoder::new());
        let (controller, mut events) = controller(camera, decoder.clone());

        controller.start().await;
        tokio::time::sleep(Duration::from_millis(30)).await;

        assert_eq!(controller.status(), SessionStatus::Running);
        assert!(decoder.calls() > 1);
        assert!(events.try_recv().is_none());
        controller.stop();
    }

    #[tokio::test]
    async fn test_stop_while_running() {
        let camera = MockCamera::with_back_camera();
        let stats = camera.stats();
        let decoder = Arc::new(MockDecoder::new());
        let (controller, mut events) = controller(camera, decoder.clone());

        controller.request_active(true).await;
        assert_eq!(controller.status(), SessionStatus::Running);
        assert_eq!(stats.open_handles(), 1);

        controller.request_active(false).await;
        assert_eq!(controller.status(), SessionStatus::Stopped);
        assert_eq!(stats.open_handles(), 0);
        assert!(!controller.is_active());

        let event = next_event(&mut events).await;
        assert!(matches!(
            event,
            SessionEvent::Ended {
                reason: EndReason::Cancelled,
                ..
            }
        ));

        let calls = decoder.calls();
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(decoder.calls(), calls);
        assert!(events.try_recv().is_none());
        assert_eq!(stats.captures_after_release(), 0);
    }

    #[tokio::test]
    async fn test_stop_is_idempotent() {
        let (controller, mut events) =
            controller(MockCamera::with_back_camera(), Arc::new(MockDecoder::new()));

        controller.stop();
        assert_eq!(controller.status(), SessionStatus::Idle);
        assert!(events.try_recv().is_none());

        controller.start().await;
        controller.stop();
        controller.stop();
        assert!(next_event(&mut events).await.error().is_none());
        assert!(events.try_recv().is_none());
        assert_eq!(controller.metrics().cancellations, 1);
    }

    #[tokio::test]
    async fn test_reactivation_while_running_is_noop() {
        let camera = MockCamera::with_back_camera();
        let stats = camera.stats();
        let (controller, _events) = controller(camera, Arc::new(MockDecoder::new()));

        controller.request_active(true).await;
        let first = controller.snapshot().session_id;
        controller.request_active(true).await;

        assert_eq!(stats.opened(), 1);
        assert_eq!(controller.snapshot().session_id, first);
        controller.stop();
    }

    #[tokio::test]
    async fn test_permission_denied_is_reported_once() {
        for camera in [
            MockCamera::with_back_camera()
                .with_access_error(CameraError::permission_denied("NotAllowedError")),
            MockCamera::with_back_camera()
                .with_enumerate_error(CameraError::permission_denied("NotAllowedError")),
        ] {
            let stats = camera.stats();
            let (controller, mut events) = controller(camera, Arc::new(MockDecoder::new()));

            controller.start().await;
            assert_eq!(controller.status(), SessionStatus::Failed);

            let event = next_event(&mut events).await;
            assert!(event.error().is_some_and(SessionError::is_permission_denied));
            assert!(events.try_recv().is_none());
            assert_eq!(stats.opened(), 0);
        }
    }

    #[tokio::test]
    async fn test_no_device_is_silent() {
        let camera = MockCamera::new();
        let (controller, mut events) = controller(camera, Arc::new(MockDecoder::new()));

        controller.start().await;

        assert_eq!(controller.status(), SessionStatus::Idle);
        assert!(controller.is_active());
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(events.try_recv().is_none());
    }

    #[tokio::test]
    async fn test_open_failure_is_camera_error() {
        let camera = MockCamera::with_back_camera().with_open_error(CameraError::backend("busy"));
        let (controller, mut events) = controller(camera, Arc::new(MockDecoder::new()));

        controller.start().await;

        assert_eq!(controller.status(), SessionStatus::Failed);
        let event = next_event(&mut events).await;
        assert!(matches!(
            event.error(),
            Some(SessionError::Camera { .. })
        ));
    }

    #[tokio::test]
    async fn test_selects_rear_camera() {
        let camera = MockCamera::new()
            .with_device(DeviceDescriptor::video("front", "Front Camera"))
            .with_device(DeviceDescriptor::video("back", "Back Camera (environment)"));
        let stats = camera.stats();
        let (controller, _events) = controller(camera, Arc::new(MockDecoder::new()));

        controller.start().await;

        assert_eq!(stats.last_opened(), Some(Some("back".into())));
        assert_eq!(controller.snapshot().device_id, Some("back".into()));
        controller.stop();
    }

    #[tokio::test]
    async fn test_decode_error_fails_session() {
        let camera = MockCamera::with_back_camera();
        let stats = camera.stats();
        let decoder = Arc::new(MockDecoder::new().then_not_found(1).then_error(DecodeError::Checksum));
        let (controller, mut events) = controller(camera, decoder.clone());

        controller.start().await;
        let event = next_event(&mut events).await;

        assert!(matches!(
            event.error(),
            Some(SessionError::DecodeStream { .. })
        ));
        assert_eq!(controller.status(), SessionStatus::Failed);
        assert_eq!(stats.open_handles(), 0);
        assert!(decoder.resets() >= 1);
    }

    #[tokio::test]
    async fn test_capture_error_fails_session() {
        let camera = MockCamera::with_back_camera().with_capture_error_at(1);
        let (controller, mut events) = controller(camera, Arc::new(MockDecoder::new()));

        controller.start().await;
        let event = next_event(&mut events).await;

        assert!(matches!(
            event.error(),
            Some(SessionError::DecodeStream { .. })
        ));
        assert_eq!(controller.status(), SessionStatus::Failed);
    }

    #[tokio::test]
    async fn test_feed_closing_ends_session() {
        let camera = MockCamera::with_back_camera().with_frame_limit(2);
        let stats = camera.stats();
        let (controller, mut events) = controller(camera, Arc::new(MockDecoder::new()));

        controller.start().await;
        let event = next_event(&mut events).await;

        assert!(matches!(
            event,
            SessionEvent::Ended {
                reason: EndReason::StreamClosed,
                ..
            }
        ));
        assert_eq!(controller.status(), SessionStatus::Stopped);
        assert_eq!(stats.open_handles(), 0);
    }

    #[tokio::test]
    async fn test_stop_during_acquisition_discards_camera() {
        let camera = MockCamera::with_back_camera().with_open_latency(Duration::from_millis(50));
        let stats = camera.stats();
        let decoder = Arc::new(MockDecoder::always("7791234567890"));
        let (controller, mut events) = controller(camera, decoder.clone());
        let controller = Arc::new(controller);

        let starting = {
            let controller = Arc::clone(&controller);
            tokio::spawn(async move { controller.start().await })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(controller.status(), SessionStatus::Starting);

        controller.stop();
        assert_eq!(controller.status(), SessionStatus::Stopped);
        starting.await.unwrap();

        assert_eq!(controller.status(), SessionStatus::Stopped);
        assert_eq!(stats.opened(), 1);
        assert_eq!(stats.open_handles(), 0);
        assert_eq!(decoder.calls(), 0);

        let event = next_event(&mut events).await;
        assert!(matches!(
            event,
            SessionEvent::Ended {
                reason: EndReason::Cancelled,
                ..
            }
        ));
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(events.try_recv().is_none());
    }

    #[tokio::test]
    async fn test_restart_after_detection() {
        let camera = MockCamera::with_back_camera();
        let stats = camera.stats();
        let decoder = Arc::new(MockDecoder::new().then_detect("first").then_not_found(1000));
        let (controller, mut events) = controller(camera, decoder);

        controller.start().await;
        let first = next_event(&mut events).await;
        assert_eq!(controller.status(), SessionStatus::Stopped);

        controller.request_active(true).await;
        assert_eq!(controller.status(), SessionStatus::Running);
        assert_ne!(controller.snapshot().session_id.as_deref(), Some(first.session_id()));
        assert_eq!(stats.access_requests(), 2);
        controller.stop();
    }

    #[tokio::test]
    async fn test_drop_releases_camera() {
        let camera = MockCamera::with_back_camera();
        let stats = camera.stats();
        let (controller, _events) = controller(camera, Arc::new(MockDecoder::new()));

        controller.start().await;
        assert_eq!(stats.open_handles(), 1);
        drop(controller);
        assert_eq!(stats.open_handles(), 0);
    }

    #[tokio::test]
    async fn test_zero_interval_field_still_scans() {
        let camera = MockCamera::with_back_camera();
        let stats = camera.stats();
        let config = SessionConfig {
            frame_interval: Duration::ZERO,
            ..SessionConfig::default()
        };
        let (controller, mut events) = ScanSessionController::new(
            Arc::new(camera),
            Arc::new(MockDecoder::new().then_not_found(3).then_detect("7791234567890")),
            config,
        );

        controller.start().await;
        let event = next_event(&mut events).await;

        assert_eq!(event.code().map(|c| c.as_str()), Some("7791234567890"));
        assert_eq!(controller.status(), SessionStatus::Stopped);
        assert_eq!(stats.open_handles(), 0);
    }

    #[tokio::test]
    async fn test_decoder_reset_before_event() {
        let decoder = Arc::new(MockDecoder::new().then_detect("7791234567890"));
        let (controller, mut events) = controller(MockCamera::with_back_camera(), decoder.clone());

        controller.start().await;
        next_event(&mut events).await;
        assert_eq!(decoder.resets(), 1);

        controller.start().await;
        controller.stop();
        assert_eq!(decoder.resets(), 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_restart_waits_for_decoder_reset() {
        let decoder = Arc::new(SlowDecoder {
            reset_delay: Duration::from_millis(50),
            ..SlowDecoder::default()
        });
        let (controller, _events) = controller(MockCamera::with_back_camera(), decoder.clone());
        let controller = Arc::new(controller);

        controller.start().await;
        let stopping = {
            let controller = Arc::clone(&controller);
            tokio::task::spawn_blocking(move || controller.stop())
        };
        tokio::time::timeout(Duration::from_secs(2), async {
            while !decoder.resetting.load(Ordering::SeqCst) {
                tokio::time::sleep(Duration::from_millis(1)).await;
            }
        })
        .await
        .expect("reset never started");

        controller.start().await;
        stopping.await.unwrap();
        tokio::time::sleep(Duration::from_millis(20)).await;

        assert_eq!(controller.status(), SessionStatus::Running);
        assert!(decoder.started.load(Ordering::SeqCst) > 0);
        assert_eq!(decoder.overlapping.load(Ordering::SeqCst), 0);
        controller.stop();
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_stop_waits_for_decode_in_progress() {
        let camera = MockCamera::with_back_camera();
        let stats = camera.stats();
        let decoder = Arc::new(SlowDecoder {
            decode_delay: Duration::from_millis(30),
            ..SlowDecoder::default()
        });
        let (controller, _events) = controller(camera, decoder.clone());

        controller.start().await;
        tokio::time::timeout(Duration::from_secs(2), async {
            while decoder.started.load(Ordering::SeqCst) == 0 {
                tokio::time::sleep(Duration::from_millis(1)).await;
            }
        })
        .await
        .expect("decode never started");

        controller.stop();

        let started = decoder.started.load(Ordering::SeqCst);
        assert_eq!(decoder.finished.load(Ordering::SeqCst), started);
        assert_eq!(stats.open_handles(), 0);
        assert_eq!(decoder.resets.load(Ordering::SeqCst), 1);

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(decoder.started.load(Ordering::SeqCst), started);
    }
}
