//! Capability traits for the shelfscan library.
//!
//! Camera access, barcode decoding and product lookup are external
//! capabilities. The session controller and the views only talk to them
//! through these traits, so tests can inject fakes.

use crate::core::error::{CameraError, DecodeError, LookupError};
use crate::core::product::Product;
use crate::core::types::{DecodeHints, DecodedCode, DeviceDescriptor, DeviceId, Frame};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::fmt::Debug;
use std::sync::Arc;

/// Proof that camera access was granted.
///
/// Obtained once per session from [`CameraProvider::request_access`] and
/// required by every other camera call, so permission state is never
/// queried ad hoc.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CameraAccess {
    provider: String,
    granted_at: DateTime<Utc>,
}

impl CameraAccess {
    /// Records a grant from the named provider.
    pub fn granted(provider: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            granted_at: Utc::now(),
        }
    }

    /// Name of the provider that granted access.
    pub fn provider(&self) -> &str {
        &self.provider
    }

    /// When access was granted.
    pub fn granted_at(&self) -> DateTime<Utc> {
        self.granted_at
    }
}

/// A source of camera devices.
///
/// # Implementation Notes
///
/// - `request_access` is where a platform permission prompt happens. A
///   refusal must be reported as [`CameraError::PermissionDenied`], distinct
///   from [`CameraError::NoDevice`].
/// - `open` with `None` opens the platform default camera.
/// - Implementations should never panic; all errors are returned as
///   `CameraError`.
///
/// # Example Implementation
///
/// ```rust,ignore
/// use shelfscan::core::{CameraAccess, CameraError, CameraProvider, DeviceDescriptor, DeviceId, VideoStream};
/// use async_trait::async_trait;
///
/// #[derive(Debug)]
/// struct V4lCamera;
///
/// #[async_trait]
/// impl CameraProvider for V4lCamera {
///     fn name(&self) -> &str {
///         "v4l"
///     }
///
///     async fn request_access(&self) -> Result<CameraAccess, CameraError> {
///         Ok(CameraAccess::granted(self.name()))
///     }
///
///     async fn list_video_inputs(&self, _access: &CameraAccess) -> Result<Vec<DeviceDescriptor>, CameraError> {
///         // Enumerate /dev/video*...
///         todo!()
///     }
///
///     async fn open(&self, _access: &CameraAccess, _device: Option<&DeviceId>) -> Result<Box<dyn VideoStream>, CameraError> {
///         todo!()
///     }
/// }
/// ```
#[async_trait]
pub trait CameraProvider: Send + Sync + Debug {
    /// Returns a stable name for this provider.
    fn name(&self) -> &str;

    /// Asks the platform for camera access.
    async fn request_access(&self) -> Result<CameraAccess, CameraError>;

    /// Lists the available video input devices.
    async fn list_video_inputs(
        &self,
        access: &CameraAccess,
    ) -> Result<Vec<DeviceDescriptor>, CameraError>;

    /// Opens a live feed from `device`, or from the platform default when
    /// `device` is `None`.
    async fn open(
        &self,
        access: &CameraAccess,
        device: Option<&DeviceId>,
    ) -> Result<Box<dyn VideoStream>, CameraError>;
}

/// A live feed from an opened camera.
///
/// The stream holds the device until [`release`](VideoStream::release) is
/// called. Implementations should also release on drop.
pub trait VideoStream: Send + Debug {
    /// Identifier of the device backing this stream, if known.
    fn device_id(&self) -> Option<&DeviceId>;

    /// Grabs the current frame.
    ///
    /// Returns `Ok(None)` once the feed has ended.
    fn capture(&mut self) -> Result<Option<Frame>, CameraError>;

    /// Releases the device. Must be idempotent.
    fn release(&mut self);

    /// Returns `true` once the device has been released.
    fn is_released(&self) -> bool;
}

/// An external barcode decoder.
pub trait BarcodeDecoder: Send + Sync + Debug {
    /// Returns a stable name for this decoder.
    fn name(&self) -> &str;

    /// Attempts to decode a code from `frame`.
    ///
    /// Returns [`DecodeError::NotFound`] when the frame simply holds no
    /// readable code; any other error ends the session.
    ///
    /// Called synchronously from the session's decode task on a runtime
    /// worker, with the session's stream lock held. It should return within
    /// a frame interval: a slow decode stalls that worker, and
    /// `ScanSessionController::stop` waits for it to finish.
    fn decode(&self, frame: &Frame, hints: &DecodeHints) -> Result<DecodedCode, DecodeError>;

    /// Drops any per-session decoder state.
    ///
    /// Called once a session ends, before the next one can decode.
    fn reset(&self) {}
}

/// Maps a scanned code to a product record.
///
/// # Implementation Notes
///
/// - Not-found and transport failures are both [`LookupError`]s; callers
///   present them the same way and let the user rescan.
/// - Implementations must not retry on their own.
#[async_trait]
pub trait ProductLookup: Send + Sync + Debug {
    /// Returns a stable name for this lookup backend.
    fn name(&self) -> &str;

    /// Fetches the product registered under `code`.
    async fn fetch(&self, code: &str) -> Result<Product, LookupError>;
}

/// An arc-wrapped camera provider for shared ownership.
pub type ArcCamera = Arc<dyn CameraProvider>;

/// An arc-wrapped decoder for shared ownership.
pub type ArcDecoder = Arc<dyn BarcodeDecoder>;

/// An arc-wrapped lookup for shared ownership.
pub type ArcLookup = Arc<dyn ProductLookup>;
