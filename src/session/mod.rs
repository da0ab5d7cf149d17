//! Scan session lifecycle.
//!
//! The [`ScanSessionController`] acquires a camera, runs the decode loop as
//! a cancellable task and reports exactly one outcome per activation through
//! [`SessionEvents`].
//!
//! ## States
//!
//! - **Idle**: nothing started, or no camera was found.
//! - **Starting**: requesting access, enumerating and opening the camera.
//! - **Running**: sampling frames and decoding.
//! - **Stopped**: a code was detected, the caller stopped, or the feed closed.
//! - **Failed**: permission refused, camera or decoder error.

mod config;
mod controller;
mod events;
mod state;

pub use config::SessionConfig;
pub use controller::ScanSessionController;
pub use events::{EndReason, SessionEvent, SessionEvents};
pub use state::{SessionMetrics, SessionSnapshot, SessionStatus};
