//! # Shelfscan
//!
//! In-store product scanning: point a camera at a barcode, read it once,
//! and look the product up.
//!
//! ## Overview
//!
//! Shelfscan drives a single scan session over pluggable capabilities,
//! allowing you to:
//!
//! - Pick the rear-facing camera when the device has several
//! - Sample frames and decode them until the first code is read
//! - Release the camera before the code is handed back, every time
//! - Cancel a session at any point, including while the camera is opening
//! - Look the code up against the product API
//! - Render the scanner and product pages
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use shelfscan::backends::{MockCamera, MockDecoder};
//! use shelfscan::lookup::MockLookup;
//! use shelfscan::prelude::*;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() {
//!     let camera = Arc::new(MockCamera::with_back_camera());
//!     let decoder = Arc::new(MockDecoder::always("7791234567890"));
//!     let lookup = Arc::new(MockLookup::new());
//!
//!     let (controller, mut events) =
//!         ScanSessionController::new(camera, decoder, SessionConfig::default());
//!     let mut app = App::new(lookup);
//!
//!     app.run_scan(&controller, &mut events).await;
//!     println!("{}", app.render());
//! }
//! ```
//!
//! ## Features
//!
//! - `default` - Includes the HTTP lookup client
//! - `http` - [`HttpLookupClient`](lookup::HttpLookupClient) via reqwest
//!
//! ## Architecture
//!
//! The library is organized into several layers:
//!
//! - **Core**: Device, frame and product types, capability traits, errors
//! - **Backends**: Camera and decoder implementations
//! - **Session**: The scan session controller and its events
//! - **Lookup**: Product lookup clients
//! - **Views**: Routes and page state rendered to text
//! - **Audit**: Structured milestone logging

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod audit;
pub mod backends;
pub mod core;
pub mod lookup;
pub mod session;
pub mod views;

// Re-export commonly used types at the crate root
pub use crate::core::{
    BarcodeDecoder, BarcodeFormat, CameraError, CameraProvider, DecodeError, DecodeHints,
    DecodedCode, DeviceDescriptor, DeviceId, Frame, LookupError, Product, ProductLookup,
    SessionError, VideoStream,
};

pub use crate::lookup::{LookupConfig, MockLookup};
pub use crate::session::{
    ScanSessionController, SessionConfig, SessionEvent, SessionEvents, SessionStatus,
};
pub use crate::views::{App, Route};

#[cfg(feature = "http")]
pub use crate::lookup::HttpLookupClient;

/// Prelude module for convenient imports.
///
/// ```rust
/// use shelfscan::prelude::*;
/// ```
pub mod prelude {
    pub use crate::core::{
        BarcodeDecoder, CameraProvider, DecodedCode, DeviceId, LookupError, Product,
        ProductLookup, SessionError,
    };
    pub use crate::lookup::LookupConfig;
    pub use crate::session::{
        EndReason, ScanSessionController, SessionConfig, SessionEvent, SessionEvents,
        SessionStatus,
    };
    pub use crate::views::{App, ProductPage, Route, ScannerPage};
}
