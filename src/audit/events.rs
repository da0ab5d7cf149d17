//! Audit event emission functions.

use crate::core::{DecodedCode, DeviceId, LookupError, Product, SessionError};

use std::time::Duration;

/// Emits an audit event for a session starting.
pub fn emit_session_started(session_id: &str, camera: &str, decoder: &str) {
    tracing::info!(
        target: "shelfscan::audit",
        event_type = "session_started",
        session_id = %session_id,
        camera = %camera,
        decoder = %decoder,
        "Scan session started"
    );
}

/// Emits an audit event for the camera chosen by the preference heuristic.
pub fn emit_device_selected(session_id: &str, device_id: Option<&DeviceId>, candidates: usize) {
    tracing::info!(
        target: "shelfscan::audit",
        event_type = "device_selected",
        session_id = %session_id,
        device_id = ?device_id.map(DeviceId::as_str),
        platform_default = device_id.is_none(),
        candidates = candidates,
        "Camera selected"
    );
}

/// Emits an audit event for a detected code.
pub fn emit_code_detected(session_id: &str, code: &DecodedCode, frames: u64) {
    tracing::info!(
        target: "shelfscan::audit",
        event_type = "code_detected",
        session_id = %session_id,
        code = %code.text,
        format = ?code.format,
        frames = frames,
        "Code detected"
    );
}

/// Emits an audit event for a session that ended in an error.
pub fn emit_session_failed(session_id: &str, error: &SessionError) {
    tracing::warn!(
        target: "shelfscan::audit",
        event_type = "session_failed",
        session_id = %session_id,
        error = %error,
        permission_denied = error.is_permission_denied(),
        "Scan session failed"
    );
}

/// Emits an audit event for a session stopped without a detection.
pub fn emit_session_stopped(session_id: &str, reason: &str) {
    tracing::info!(
        target: "shelfscan::audit",
        event_type = "session_stopped",
        session_id = %session_id,
        reason = %reason,
        "Scan session stopped"
    );
}

/// Emits an audit event for a finished product lookup.
pub fn emit_lookup_completed(
    backend: &str,
    code: &str,
    result: &Result<Product, LookupError>,
    elapsed: Duration,
) {
    match result {
        Ok(product) => tracing::info!(
            target: "shelfscan::audit",
            event_type = "lookup_completed",
            backend = %backend,
            code = %code,
            outcome = "found",
            title = %product.title,
            duration_ms = elapsed.as_millis() as u64,
            "Product lookup completed"
        ),
        Err(error) => {
            let outcome = if error.is_not_found() {
                "not_found"
            } else {
                "error"
            };
            tracing::info!(
                target: "shelfscan::audit",
                event_type = "lookup_completed",
                backend = %backend,
                code = %code,
                outcome = outcome,
                error = %error,
                duration_ms = elapsed.as_millis() as u64,
                "Product lookup completed"
            )
        }
    }
}
