//! Core types used throughout the shelfscan library.
//!
//! This module defines camera device descriptors, sampled frames, decoded
//! codes and the hints passed to a decoder.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Instant;

/// Identifier of a camera device as reported by the platform.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeviceId(String);

impl DeviceId {
    /// Creates a new device identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DeviceId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Kind of media device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceKind {
    /// A camera.
    VideoInput,
    /// A microphone.
    AudioInput,
}

/// A media device as enumerated by a camera provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceDescriptor {
    /// Platform identifier used to open the device.
    pub device_id: DeviceId,

    /// Human-readable label, e.g. "Back Camera". May be empty before the
    /// user has granted camera access.
    pub label: String,

    /// Kind of device.
    pub kind: DeviceKind,
}

impl DeviceDescriptor {
    /// Creates a descriptor for a video input device.
    pub fn video(device_id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            device_id: DeviceId::new(device_id),
            label: label.into(),
            kind: DeviceKind::VideoInput,
        }
    }

    /// Sets the device kind.
    pub fn with_kind(mut self, kind: DeviceKind) -> Self {
        self.kind = kind;
        self
    }

    /// Returns `true` if this is a camera.
    pub fn is_video_input(&self) -> bool {
        self.kind == DeviceKind::VideoInput
    }
}

/// Barcode symbology reported by a decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BarcodeFormat {
    /// EAN-13, the usual retail product code.
    Ean13,
    /// EAN-8.
    Ean8,
    /// UPC-A.
    UpcA,
    /// UPC-E.
    UpcE,
    /// Code 128.
    Code128,
    /// Code 39.
    Code39,
    /// ITF (interleaved 2 of 5).
    Itf,
    /// QR code.
    QrCode,
    /// Data Matrix.
    DataMatrix,
}

impl fmt::Display for BarcodeFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Ean13 => "EAN-13",
            Self::Ean8 => "EAN-8",
            Self::UpcA => "UPC-A",
            Self::UpcE => "UPC-E",
            Self::Code128 => "Code 128",
            Self::Code39 => "Code 39",
            Self::Itf => "ITF",
            Self::QrCode => "QR Code",
            Self::DataMatrix => "Data Matrix",
        };
        f.write_str(name)
    }
}

/// A code produced by a successful decode.
///
/// The payload is opaque at this layer; it is handed unchanged to
/// navigation and lookup.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DecodedCode {
    /// Decoded text.
    pub text: String,

    /// Symbology, if the decoder reports it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<BarcodeFormat>,
}

impl DecodedCode {
    /// Creates a decoded code without format information.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            format: None,
        }
    }

    /// Sets the symbology.
    pub fn with_format(mut self, format: BarcodeFormat) -> Self {
        self.format = Some(format);
        self
    }

    /// Returns the decoded text.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Consumes the code and returns its text.
    pub fn into_string(self) -> String {
        self.text
    }
}

impl fmt::Display for DecodedCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// One frame sampled from a live video feed.
#[derive(Debug, Clone)]
pub struct Frame {
    /// Position of this frame in its stream, starting at 0.
    pub sequence: u64,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Raw pixel data (luma or RGBA depending on the backend).
    pub data: Vec<u8>,
    /// When the frame was captured.
    pub captured_at: Instant,
}

impl Frame {
    /// Creates a new frame captured now.
    pub fn new(sequence: u64, width: u32, height: u32, data: Vec<u8>) -> Self {
        Self {
            sequence,
            width,
            height,
            data,
            captured_at: Instant::now(),
        }
    }
}

/// Hints passed to the decoder with every frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodeHints {
    /// Spend more time per frame looking for a code.
    pub try_harder: bool,

    /// Symbologies to look for. Empty means all supported formats.
    #[serde(default)]
    pub formats: Vec<BarcodeFormat>,
}

impl Default for DecodeHints {
    fn default() -> Self {
        Self {
            try_harder: true,
            formats: Vec::new(),
        }
    }
}

impl DecodeHints {
    /// Creates the default hints.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables or disables the slower, more thorough search.
    pub fn with_try_harder(mut self, try_harder: bool) -> Self {
        self.try_harder = try_harder;
        self
    }

    /// Restricts decoding to the given symbologies.
    pub fn with_formats(mut self, formats: impl IntoIterator<Item = BarcodeFormat>) -> Self {
        self.formats = formats.into_iter().collect();
        self
    }

    /// Returns `true` if codes of `format` should be reported.
    pub fn allows(&self, format: BarcodeFormat) -> bool {
        self.formats.is_empty() || self.formats.contains(&format)
    }
}
