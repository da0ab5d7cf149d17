//! Error types for the shelfscan library.
//!
//! Errors are split by layer: camera and decoder capabilities report
//! [`CameraError`] and [`DecodeError`], the scan session surfaces
//! [`SessionError`] to its caller, and the product lookup reports
//! [`LookupError`]. The library never panics; all errors are returned as
//! values or delivered as session events.

use std::time::Duration;
use thiserror::Error;

/// User-facing message for a refused camera permission.
pub const MSG_PERMISSION_DENIED: &str =
    "No tenemos permiso para usar la cámara. Revisá los permisos del dispositivo.";

/// User-facing message for a failed decode stream.
pub const MSG_DECODE_FAILED: &str =
    "No pudimos leer el código. Revisá la iluminación y volvé a intentar.";

/// User-facing message for a camera that could not be opened.
pub const MSG_CAMERA_UNAVAILABLE: &str =
    "No pudimos acceder a la cámara. Revisá permisos y volvé a intentar.";

/// User-facing message when no camera is present.
pub const MSG_NO_CAMERA: &str = "No encontramos ninguna cámara disponible.";

/// User-facing message for a failed product lookup.
pub const MSG_PRODUCT_NOT_FOUND: &str = "No encontramos el producto";

/// Errors reported by a [`CameraProvider`](crate::core::CameraProvider) or
/// one of its video streams.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CameraError {
    /// Access to the camera was refused by the user or the platform.
    #[error("camera permission denied: {reason}")]
    PermissionDenied {
        /// Reason given by the platform.
        reason: String,
    },

    /// No video input device is present.
    #[error("no camera device found")]
    NoDevice,

    /// The device went away while it was in use.
    #[error("camera device '{device_id}' disconnected")]
    Disconnected {
        /// Identifier of the device that disconnected.
        device_id: String,
    },

    /// Any other backend failure.
    #[error("camera backend error: {message}")]
    Backend {
        /// Description of the failure.
        message: String,
    },
}

impl CameraError {
    /// Creates a `PermissionDenied` error.
    pub fn permission_denied(reason: impl Into<String>) -> Self {
        Self::PermissionDenied {
            reason: reason.into(),
        }
    }

    /// Creates a `Backend` error.
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend {
            message: message.into(),
        }
    }

    /// Returns `true` if no camera was found.
    pub fn is_no_device(&self) -> bool {
        matches!(self, Self::NoDevice)
    }
}

/// Errors reported by a [`BarcodeDecoder`](crate::core::BarcodeDecoder) for
/// a single frame.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// No code was found in this frame. Transient; the loop keeps going.
    #[error("no code found in frame")]
    NotFound,

    /// A code was located but failed its checksum.
    #[error("checksum mismatch")]
    Checksum,

    /// A code was located but its contents were malformed.
    #[error("malformed code: {reason}")]
    Format {
        /// What was wrong with the symbol.
        reason: String,
    },

    /// The decoder itself failed.
    #[error("decoder error: {message}")]
    Backend {
        /// Description of the failure.
        message: String,
    },
}

impl DecodeError {
    /// Returns `true` for the transient "nothing in this frame" condition.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound)
    }
}

/// Errors a scan session surfaces to its caller.
///
/// These are delivered as [`SessionEvent::Error`](crate::session::SessionEvent)
/// values rather than returned, so a failing camera never unwinds through
/// the caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// Camera access was refused.
    #[error("camera permission denied: {reason}")]
    PermissionDenied {
        /// Reason given by the platform.
        reason: String,
    },

    /// No camera is available. The controller treats this as silent.
    #[error("no camera device available")]
    DeviceUnavailable,

    /// The decode loop failed for a reason other than "nothing found".
    #[error("decode stream failed: {reason}")]
    DecodeStream {
        /// Underlying decoder or capture failure.
        reason: String,
    },

    /// The camera could not be acquired.
    #[error("camera could not be opened: {reason}")]
    Camera {
        /// Underlying camera failure.
        reason: String,
    },
}

impl SessionError {
    /// Creates a `DecodeStream` error.
    pub fn decode_stream(reason: impl Into<String>) -> Self {
        Self::DecodeStream {
            reason: reason.into(),
        }
    }

    /// Returns `true` if the camera permission was refused.
    pub fn is_permission_denied(&self) -> bool {
        matches!(self, Self::PermissionDenied { .. })
    }

    /// Returns the message shown to the user for this error.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::PermissionDenied { .. } => MSG_PERMISSION_DENIED,
            Self::DeviceUnavailable => MSG_NO_CAMERA,
            Self::DecodeStream { .. } => MSG_DECODE_FAILED,
            Self::Camera { .. } => MSG_CAMERA_UNAVAILABLE,
        }
    }
}

impl From<CameraError> for SessionError {
    fn from(err: CameraError) -> Self {
        match err {
            CameraError::PermissionDenied { reason } => Self::PermissionDenied { reason },
            CameraError::NoDevice => Self::DeviceUnavailable,
            other => Self::Camera {
                reason: other.to_string(),
            },
        }
    }
}

/// Errors from a product lookup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    /// The backend has no product for this code.
    #[error("product '{code}' not found")]
    NotFound {
        /// The code that was looked up.
        code: String,
        /// Message returned by the backend, if any.
        detail: Option<String>,
    },

    /// The request could not reach the backend.
    #[error("network error: {message}")]
    Network {
        /// Transport error description.
        message: String,
    },

    /// The request did not complete in time.
    #[error("lookup timed out after {elapsed:?}")]
    Timeout {
        /// The bound that was exceeded.
        elapsed: Duration,
    },

    /// The backend answered with an unexpected status.
    #[error("unexpected status {status} looking up '{code}'")]
    Status {
        /// HTTP status code.
        status: u16,
        /// The code that was looked up; empty for a health check.
        code: String,
    },

    /// The response body could not be parsed.
    #[error("invalid response: {details}")]
    InvalidResponse {
        /// Parser error.
        details: String,
    },

    /// The code is empty or otherwise unusable; no request was made.
    #[error("invalid code '{code}'")]
    InvalidCode {
        /// The rejected code.
        code: String,
    },

    /// The client is misconfigured.
    #[error("configuration error: {message}")]
    Configuration {
        /// Description of the problem.
        message: String,
    },
}

impl LookupError {
    /// Creates a `NotFound` error without a backend message.
    pub fn not_found(code: impl Into<String>) -> Self {
        Self::NotFound {
            code: code.into(),
            detail: None,
        }
    }

    /// Creates a `Network` error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    /// Creates a `Configuration` error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Returns `true` if the product does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns `true` if the failure was on the way to the backend rather
    /// than an answer from it.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Network { .. } | Self::Timeout { .. })
    }

    /// Returns the heading shown to the user for this error.
    pub fn user_message(&self) -> &'static str {
        MSG_PRODUCT_NOT_FOUND
    }
}

/// A specialized `Result` type for session operations.
pub type SessionResult<T> = Result<T, SessionError>;

/// A specialized `Result` type for lookup operations.
pub type LookupResult<T> = Result<T, LookupError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camera_error_maps_to_session_error() {
        let denied: SessionError = CameraError::permission_denied("NotAllowedError").into();
        assert!(denied.is_permission_denied());
        assert_eq!(denied.user_message(), MSG_PERMISSION_DENIED);

        let missing: SessionError = CameraError::NoDevice.into();
        assert_eq!(missing, SessionError::DeviceUnavailable);

        let other: SessionError = CameraError::backend("busy").into();
        assert!(matches!(other, SessionError::Camera { .. }));
        assert_eq!(other.user_message(), MSG_CAMERA_UNAVAILABLE);
    }

    #[test]
    fn test_decode_error_not_found() {
        assert!(DecodeError::NotFound.is_not_found());
        assert!(!DecodeError::Checksum.is_not_found());
        assert_eq!(
            SessionError::decode_stream(DecodeError::Checksum.to_string()).user_message(),
            MSG_DECODE_FAILED
        );
    }

    #[test]
    fn test_lookup_error_kinds() {
        let missing = LookupError::not_found("000");
        assert!(missing.is_not_found());
        assert!(!missing.is_transport());
        assert!(missing.to_string().contains("000"));

        let timeout = LookupError::Timeout {
            elapsed: Duration::from_secs(8),
        };
        assert!(timeout.is_transport());
        assert!(LookupError::network("refused").is_transport());
    }
}
