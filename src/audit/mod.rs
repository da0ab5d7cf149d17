//! Structured audit logging for scan sessions and lookups.
//!
//! This module emits milestone events using the `tracing` crate under the
//! `shelfscan::audit` target. Events can be captured by any tracing
//! subscriber (JSON file, OpenTelemetry, etc.) and filtered separately from
//! per-frame debug output.

mod events;

pub use events::{
    emit_code_detected, emit_device_selected, emit_lookup_completed, emit_session_failed,
    emit_session_started, emit_session_stopped,
};
