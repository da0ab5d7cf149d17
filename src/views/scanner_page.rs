//! The scanner page.

use crate::core::error::{MSG_CAMERA_UNAVAILABLE, MSG_DECODE_FAILED, MSG_PERMISSION_DENIED};
use crate::session::{SessionEvent, SessionStatus};
use crate::views::route::Route;

/// Page heading.
pub const HEADING: &str = "Escaneá un producto";

/// Instructions under the heading.
pub const INSTRUCTIONS: &str = "Permití el acceso a la cámara y enfocá el código de barras.";

/// Control that starts the camera.
pub const START_CONTROL: &str = "[Iniciar cámara]";

/// Placeholder for the live preview.
pub const PREVIEW: &str = "[Vista previa de la cámara]";

/// State of the scanner page.
///
/// The page only mirrors a session: it never touches the camera itself.
/// Callers forward session events to [`handle_event`](Self::handle_event)
/// and follow the route it returns.
#[derive(Debug, Clone, Default)]
pub struct ScannerPage {
    active: bool,
    error_message: Option<String>,
    status: SessionStatus,
}

impl ScannerPage {
    /// Creates an inactive page.
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks the scanner as active and clears any previous error.
    pub fn activate(&mut self) {
        self.active = true;
        self.error_message = None;
    }

    /// Marks the scanner as inactive.
    pub fn deactivate(&mut self) {
        self.active = false;
    }

    /// Returns `true` while the camera is requested.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Returns the message shown to the user, if any.
    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    /// Records the latest session status.
    pub fn observe_status(&mut self, status: SessionStatus) {
        self.status = status;
    }

    /// Applies a session event. Returns the route to follow after a
    /// detection.
    pub fn handle_event(&mut self, event: &SessionEvent) -> Option<Route> {
        self.active = false;
        match event {
            SessionEvent::Detected { code, .. } => {
                self.status = SessionStatus::Stopped;
                Some(Route::product(code.as_str()))
            }
            SessionEvent::Error { error, .. } => {
                self.status = SessionStatus::Failed;
                let message = if error.is_permission_denied() {
                    MSG_PERMISSION_DENIED
                } else {
                    MSG_DECODE_FAILED
                };
                self.error_message = Some(message.to_string());
                None
            }
            SessionEvent::Ended { .. } => {
                self.status = SessionStatus::Stopped;
                None
            }
        }
    }

    /// Renders the page.
    pub fn render(&self) -> String {
        let mut lines = vec![HEADING, INSTRUCTIONS];

        if self.active {
            lines.push(PREVIEW);
            if !self.status.is_running() {
                lines.push(MSG_CAMERA_UNAVAILABLE);
            }
        } else {
            lines.push(START_CONTROL);
        }

        if let Some(message) = &self.error_message {
            lines.push(message.as_str());
        }

        let mut out = lines.join("\n");
        out.push('\n');
        out
    }
}
