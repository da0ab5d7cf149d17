//! Camera and decoder backend implementations.
//!
//! Real cameras and decoders are platform specific and live outside this
//! crate; they plug in by implementing [`CameraProvider`](crate::core::CameraProvider)
//! and [`BarcodeDecoder`](crate::core::BarcodeDecoder).
//!
//! ## Available Backends
//!
//! - [`mock`] - A scriptable camera and decoder for testing
//!
//! ## Implementing a Custom Decoder
//!
//! ```rust,ignore
//! use shelfscan::core::{BarcodeDecoder, DecodeError, DecodeHints, DecodedCode, Frame};
//!
//! #[derive(Debug)]
//! pub struct MyDecoder;
//!
//! impl BarcodeDecoder for MyDecoder {
//!     fn name(&self) -> &str {
//!         "my-decoder"
//!     }
//!
//!     fn decode(&self, frame: &Frame, hints: &DecodeHints) -> Result<DecodedCode, DecodeError> {
//!         // Locate and read a symbol in frame.data
//!         Err(DecodeError::NotFound)
//!     }
//! }
//! ```

pub mod mock;

// Re-exports
pub use mock::{CameraStats, MockCamera, MockDecoder, MockStream};
