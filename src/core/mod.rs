//! Core types and traits for the shelfscan library.
//!
//! This module provides the fundamental building blocks used throughout
//! the library:
//!
//! - [`types`] - Devices, frames, decoded codes and decode hints
//! - [`traits`] - The camera, decoder and lookup capability traits
//! - [`error`] - Structured error types
//! - [`device`] - Rear-camera preference heuristic
//! - [`product`] - Product records from the lookup API

pub mod device;
pub mod error;
pub mod product;
pub mod traits;
pub mod types;

// Re-export commonly used types at the core level
pub use device::{is_rear_facing, select_preferred_device};
pub use error::{
    CameraError, DecodeError, LookupError, LookupResult, SessionError, SessionResult,
};
pub use product::{AttributeValue, Product};
pub use traits::{
    ArcCamera, ArcDecoder, ArcLookup, BarcodeDecoder, CameraAccess, CameraProvider, ProductLookup,
    VideoStream,
};
pub use types::{
    BarcodeFormat, DecodeHints, DecodedCode, DeviceDescriptor, DeviceId, DeviceKind, Frame,
};
