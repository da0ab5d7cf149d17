//! Mock camera and decoder for testing.
//!
//! This module provides a configurable camera and a scripted decoder that
//! can be used in tests to drive scan sessions without real hardware. The
//! camera keeps counters of opened and released devices so tests can assert
//! that no device handle is left behind.

use crate::core::{
    BarcodeDecoder, CameraAccess, CameraError, CameraProvider, DecodeError, DecodeHints,
    DecodedCode, DeviceDescriptor, DeviceId, Frame, VideoStream,
};

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, RwLock};
use std::time::Duration;

/// Counters shared between a [`MockCamera`] and the streams it opens.
#[derive(Debug, Default)]
pub struct CameraStats {
    access_requests: AtomicU64,
    opened: AtomicU64,
    released: AtomicU64,
    frames_captured: AtomicU64,
    captures_after_release: AtomicU64,
    last_opened: Mutex<Option<Option<DeviceId>>>,
}

impl CameraStats {
    /// Number of times access was requested.
    pub fn access_requests(&self) -> u64 {
        self.access_requests.load(Ordering::SeqCst)
    }

    /// Number of streams opened.
    pub fn opened(&self) -> u64 {
        self.opened.load(Ordering::SeqCst)
    }

    /// Number of streams released.
    pub fn released(&self) -> u64 {
        self.released.load(Ordering::SeqCst)
    }

    /// Number of streams currently holding a device.
    pub fn open_handles(&self) -> u64 {
        self.opened().saturating_sub(self.released())
    }

    /// Number of frames handed out.
    pub fn frames_captured(&self) -> u64 {
        self.frames_captured.load(Ordering::SeqCst)
    }

    /// Number of capture attempts on an already released stream.
    pub fn captures_after_release(&self) -> u64 {
        self.captures_after_release.load(Ordering::SeqCst)
    }

    /// The device passed to the most recent `open`, if any call was made.
    ///
    /// The inner `None` means the platform default was requested.
    pub fn last_opened(&self) -> Option<Option<DeviceId>> {
        self.last_opened
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

/// A mock camera for testing purposes.
///
/// # Examples
///
/// ```rust
/// use shelfscan::backends::MockCamera;
/// use shelfscan::core::{CameraError, DeviceDescriptor};
///
/// // A phone with two cameras
/// let camera = MockCamera::new()
///     .with_device(DeviceDescriptor::video("front", "Front Camera"))
///     .with_device(DeviceDescriptor::video("back", "Back Camera"));
///
/// // A browser where the user refused the prompt
/// let camera = MockCamera::new().with_access_error(CameraError::permission_denied("NotAllowedError"));
/// ```
#[derive(Debug)]
pub struct MockCamera {
    name: String,
    devices: RwLock<Vec<DeviceDescriptor>>,
    access_error: RwLock<Option<CameraError>>,
    enumerate_error: RwLock<Option<CameraError>>,
    open_error: RwLock<Option<CameraError>>,
    open_latency: Option<Duration>,
    frame_limit: Option<u64>,
    capture_error_at: Option<u64>,
    stats: Arc<CameraStats>,
}

impl MockCamera {
    /// Creates a camera provider with no devices.
    ///
    /// Opening the platform default with no devices fails with
    /// [`CameraError::NoDevice`].
    pub fn new() -> Self {
        Self {
            name: "mock".to_string(),
            devices: RwLock::new(Vec::new()),
            access_error: RwLock::new(None),
            enumerate_error: RwLock::new(None),
            open_error: RwLock::new(None),
            open_latency: None,
            frame_limit: None,
            capture_error_at: None,
            stats: Arc::new(CameraStats::default()),
        }
    }

    /// Creates a provider with a single rear camera.
    pub fn with_back_camera() -> Self {
        Self::new().with_device(DeviceDescriptor::video("back", "Back Camera"))
    }

    /// Sets the name of this provider.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Adds a device to the enumeration.
    pub fn with_device(self, device: DeviceDescriptor) -> Self {
        self.devices
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(device);
        self
    }

    /// Makes `request_access` fail.
    pub fn with_access_error(self, error: CameraError) -> Self {
        self.set_access_error(Some(error));
        self
    }

    /// Makes `list_video_inputs` fail.
    pub fn with_enumerate_error(self, error: CameraError) -> Self {
        *self
            .enumerate_error
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(error);
        self
    }

    /// Makes `open` fail.
    pub fn with_open_error(self, error: CameraError) -> Self {
        *self
            .open_error
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(error);
        self
    }

    /// Delays `open` to simulate a slow device.
    pub fn with_open_latency(mut self, latency: Duration) -> Self {
        self.open_latency = Some(latency);
        self
    }

    /// Ends every feed after `frames` frames.
    pub fn with_frame_limit(mut self, frames: u64) -> Self {
        self.frame_limit = Some(frames);
        self
    }

    /// Fails the capture of frame number `sequence` with a disconnect.
    pub fn with_capture_error_at(mut self, sequence: u64) -> Self {
        self.capture_error_at = Some(sequence);
        self
    }

    /// Sets or clears the access error (mutable version).
    pub fn set_access_error(&self, error: Option<CameraError>) {
        *self
            .access_error
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = error;
    }

    /// Returns the shared counters.
    pub fn stats(&self) -> Arc<CameraStats> {
        Arc::clone(&self.stats)
    }

    fn configured_error(slot: &RwLock<Option<CameraError>>) -> Option<CameraError> {
        slot.read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl Default for MockCamera {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CameraProvider for MockCamera {
    fn name(&self) -> &str {
        &self.name
    }

    async fn request_access(&self) -> Result<CameraAccess, CameraError> {
        self.stats.access_requests.fetch_add(1, Ordering::SeqCst);
        match Self::configured_error(&self.access_error) {
            Some(error) => Err(error),
            None => Ok(CameraAccess::granted(&self.name)),
        }
    }

    async fn list_video_inputs(
        &self,
        _access: &CameraAccess,
    ) -> Result<Vec<DeviceDescriptor>, CameraError> {
        if let Some(error) = Self::configured_error(&self.enumerate_error) {
            return Err(error);
        }
        Ok(self
            .devices
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .iter()
            .filter(|device| device.is_video_input())
            .cloned()
            .collect())
    }

    async fn open(
        &self,
        _access: &CameraAccess,
        device: Option<&DeviceId>,
    ) -> Result<Box<dyn VideoStream>, CameraError> {
        if let Some(latency) = self.open_latency {
            tokio::time::sleep(latency).await;
        }

        *self
            .stats
            .last_opened
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(device.cloned());

        if let Some(error) = Self::configured_error(&self.open_error) {
            return Err(error);
        }

        let device_id = {
            let devices = self
                .devices
                .read()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            match device {
                Some(id) => devices
                    .iter()
                    .find(|d| d.device_id == *id)
                    .map(|d| d.device_id.clone())
                    .ok_or(CameraError::NoDevice)?,
                None => devices
                    .first()
                    .map(|d| d.device_id.clone())
                    .ok_or(CameraError::NoDevice)?,
            }
        };

        self.stats.opened.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(MockStream {
            device_id,
            next_sequence: 0,
            frame_limit: self.frame_limit,
            capture_error_at: self.capture_error_at,
            released: false,
            stats: Arc::clone(&self.stats),
        }))
    }
}

/// A stream opened by [`MockCamera`]. Produces blank frames.
#[derive(Debug)]
pub struct MockStream {
    device_id: DeviceId,
    next_sequence: u64,
    frame_limit: Option<u64>,
    capture_error_at: Option<u64>,
    released: bool,
    stats: Arc<CameraStats>,
}

impl VideoStream for MockStream {
    fn device_id(&self) -> Option<&DeviceId> {
        Some(&self.device_id)
    }

    fn capture(&mut self) -> Result<Option<Frame>, CameraError> {
        if self.released {
            self.stats
                .captures_after_release
                .fetch_add(1, Ordering::SeqCst);
            return Err(CameraError::Disconnected {
                device_id: self.device_id.to_string(),
            });
        }

        let sequence = self.next_sequence;
        if self.frame_limit.is_some_and(|limit| sequence >= limit) {
            return Ok(None);
        }
        if self.capture_error_at == Some(sequence) {
            return Err(CameraError::Disconnected {
                device_id: self.device_id.to_string(),
            });
        }

        self.next_sequence += 1;
        self.stats.frames_captured.fetch_add(1, Ordering::SeqCst);
        Ok(Some(Frame::new(sequence, 640, 480, vec![0u8; 16])))
    }

    fn release(&mut self) {
        if !self.released {
            self.released = true;
            self.stats.released.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn is_released(&self) -> bool {
        self.released
    }
}

impl Drop for MockStream {
    fn drop(&mut self) {
        self.release();
    }
}

/// A scripted decoder for testing purposes.
///
/// Each call to `decode` consumes the next scripted outcome; once the script
/// is exhausted the default outcome (normally "not found") is returned.
///
/// # Examples
///
/// ```rust
/// use shelfscan::backends::MockDecoder;
/// use shelfscan::core::DecodeError;
///
/// // Two empty frames, then a code
/// let decoder = MockDecoder::new()
///     .then_not_found(2)
///     .then_detect("7791234567890");
///
/// // A decoder that finds a code in every frame
/// let decoder = MockDecoder::always("7791234567890");
///
/// // A decoder that breaks on the first frame
/// let decoder = MockDecoder::new().then_error(DecodeError::Checksum);
/// ```
#[derive(Debug)]
pub struct MockDecoder {
    name: String,
    script: Mutex<VecDeque<Result<DecodedCode, DecodeError>>>,
    default_outcome: Result<DecodedCode, DecodeError>,
    calls: AtomicU64,
    resets: AtomicU64,
}

impl MockDecoder {
    /// Creates a decoder that never finds anything.
    pub fn new() -> Self {
        Self {
            name: "mock".to_string(),
            script: Mutex::new(VecDeque::new()),
            default_outcome: Err(DecodeError::NotFound),
            calls: AtomicU64::new(0),
            resets: AtomicU64::new(0),
        }
    }

    /// Creates a decoder that decodes `code` from every frame.
    pub fn always(code: impl Into<String>) -> Self {
        Self {
            default_outcome: Ok(DecodedCode::new(code)),
            ..Self::new()
        }
    }

    /// Sets the name of this decoder.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Appends an outcome to the script.
    pub fn then(self, outcome: Result<DecodedCode, DecodeError>) -> Self {
        self.script
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push_back(outcome);
        self
    }

    /// Appends `frames` empty frames to the script.
    pub fn then_not_found(mut self, frames: usize) -> Self {
        for _ in 0..frames {
            self = self.then(Err(DecodeError::NotFound));
        }
        self
    }

    /// Appends a successful decode of `code`.
    pub fn then_detect(self, code: impl Into<String>) -> Self {
        self.then(Ok(DecodedCode::new(code)))
    }

    /// Appends a decode failure.
    pub fn then_error(self, error: DecodeError) -> Self {
        self.then(Err(error))
    }

    /// Number of frames passed to `decode`.
    pub fn calls(&self) -> u64 {
        self.calls.load(Ordering::SeqCst)
    }

    /// Number of times `reset` was called.
    pub fn resets(&self) -> u64 {
        self.resets.load(Ordering::SeqCst)
    }
}

impl Default for MockDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl BarcodeDecoder for MockDecoder {
    fn name(&self) -> &str {
        &self.name
    }

    fn decode(&self, _frame: &Frame, hints: &DecodeHints) -> Result<DecodedCode, DecodeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let outcome = self
            .script
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .pop_front()
            .unwrap_or_else(|| self.default_outcome.clone());

        match outcome {
            Ok(code) if code.format.is_some_and(|format| !hints.allows(format)) => {
                Err(DecodeError::NotFound)
            }
            other => other,
        }
    }

    fn reset(&self) {
        self.resets.fetch_add(1, Ordering::SeqCst);
    }
}
