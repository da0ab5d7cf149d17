//! Events delivered by a scan session to its caller.

use crate::core::{DecodedCode, SessionError};

use futures::Stream;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::mpsc;

/// Why a session ended without a detection or an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndReason {
    /// The caller stopped the session.
    Cancelled,
    /// The camera feed closed.
    StreamClosed,
}

/// Something that happened in a scan session.
///
/// Every activation that reaches the camera ends with exactly one of these.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// A code was decoded. The camera has already been released.
    Detected {
        /// Activation that produced the code.
        session_id: String,
        /// The decoded code.
        code: DecodedCode,
    },

    /// The session failed.
    Error {
        /// Activation that failed.
        session_id: String,
        /// What went wrong.
        error: SessionError,
    },

    /// The session ended without a code.
    Ended {
        /// Activation that ended.
        session_id: String,
        /// Why it ended.
        reason: EndReason,
    },
}

impl SessionEvent {
    /// Returns the activation this event belongs to.
    pub fn session_id(&self) -> &str {
        match self {
            Self::Detected { session_id, .. }
            | Self::Error { session_id, .. }
            | Self::Ended { session_id, .. } => session_id,
        }
    }

    /// Returns the decoded code for a detection.
    pub fn code(&self) -> Option<&DecodedCode> {
        match self {
            Self::Detected { code, .. } => Some(code),
            _ => None,
        }
    }

    /// Returns the error for a failure.
    pub fn error(&self) -> Option<&SessionError> {
        match self {
            Self::Error { error, .. } => Some(error),
            _ => None,
        }
    }
}

/// Receiving half of a controller's event channel.
#[derive(Debug)]
pub struct SessionEvents {
    rx: mpsc::UnboundedReceiver<SessionEvent>,
}

impl SessionEvents {
    pub(crate) fn channel() -> (mpsc::UnboundedSender<SessionEvent>, Self) {
        let (tx, rx) = mpsc::unbounded_channel();
        (tx, Self { rx })
    }

    /// Waits for the next event.
    ///
    /// Returns `None` once the controller and all its tasks are gone.
    pub async fn recv(&mut self) -> Option<SessionEvent> {
        self.rx.recv().await
    }

    /// Returns the next event if one is already queued.
    pub fn try_recv(&mut self) -> Option<SessionEvent> {
        self.rx.try_recv().ok()
    }
}

impl Stream for SessionEvents {
    type Item = SessionEvent;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.rx.poll_recv(cx)
    }
}
