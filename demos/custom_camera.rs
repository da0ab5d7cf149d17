//! Custom camera and decoder example.
//!
//! This example shows how to:
//! - Implement `CameraProvider` and `VideoStream` for a new frame source
//! - Implement `BarcodeDecoder` with checksum validation
//! - Handle detection and error events from a session
//!
//! Run with: cargo run --example custom_camera

use async_trait::async_trait;
use shelfscan::core::{
    BarcodeFormat, CameraAccess, CameraError, DecodeError, DecodeHints, DeviceDescriptor, Frame,
};
use shelfscan::prelude::*;
use shelfscan::VideoStream;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// A "camera" that replays a fixed list of frames, one per capture.
///
/// Each frame's pixels are the ASCII text printed on the label it shows,
/// which keeps the decoder below trivial.
#[derive(Debug)]
struct SlideshowCamera {
    slides: Vec<Vec<u8>>,
}

impl SlideshowCamera {
    fn new(slides: impl IntoIterator<Item = &'static str>) -> Self {
        Self {
            slides: slides.into_iter().map(|s| s.as_bytes().to_vec()).collect(),
        }
    }
}

#[async_trait]
impl CameraProvider for SlideshowCamera {
    fn name(&self) -> &str {
        "slideshow"
    }

    async fn request_access(&self) -> Result<CameraAccess, CameraError> {
        Ok(CameraAccess::granted(self.name()))
    }

    async fn list_video_inputs(
        &self,
        _access: &CameraAccess,
    ) -> Result<Vec<DeviceDescriptor>, CameraError> {
        Ok(vec![DeviceDescriptor::video("slides", "Rear slideshow")])
    }

    async fn open(
        &self,
        _access: &CameraAccess,
        device: Option<&DeviceId>,
    ) -> Result<Box<dyn VideoStream>, CameraError> {
        tracing::info!(device = ?device, "Opening slideshow");
        Ok(Box::new(SlideshowStream {
            device_id: DeviceId::new("slides"),
            slides: self.slides.iter().cloned().collect(),
            sequence: 0,
            released: false,
        }))
    }
}

#[derive(Debug)]
struct SlideshowStream {
    device_id: DeviceId,
    slides: VecDeque<Vec<u8>>,
    sequence: u64,
    released: bool,
}

impl VideoStream for SlideshowStream {
    fn device_id(&self) -> Option<&DeviceId> {
        Some(&self.device_id)
    }

    fn capture(&mut self) -> Result<Option<Frame>, CameraError> {
        if self.released {
            return Err(CameraError::Disconnected {
                device_id: self.device_id.to_string(),
            });
        }
        let Some(data) = self.slides.pop_front() else {
            return Ok(None);
        };
        let frame = Frame::new(self.sequence, data.len() as u32, 1, data);
        self.sequence += 1;
        Ok(Some(frame))
    }

    fn release(&mut self) {
        if !self.released {
            self.released = true;
            tracing::info!(device = %self.device_id, "Slideshow released");
        }
    }

    fn is_released(&self) -> bool {
        self.released
    }
}

/// Reads an EAN-13 printed as ASCII digits and checks its check digit.
#[derive(Debug)]
struct AsciiEanDecoder;

impl AsciiEanDecoder {
    fn check_digit(digits: &[u32]) -> u32 {
        let sum: u32 = digits
            .iter()
            .enumerate()
            .map(|(i, d)| if i % 2 == 0 { *d } else { d * 3 })
            .sum();
        (10 - sum % 10) % 10
    }
}

impl BarcodeDecoder for AsciiEanDecoder {
    fn name(&self) -> &str {
        "ascii-ean13"
    }

    fn decode(&self, frame: &Frame, hints: &DecodeHints) -> Result<DecodedCode, DecodeError> {
        if !hints.allows(BarcodeFormat::Ean13) {
            return Err(DecodeError::NotFound);
        }

        let text = String::from_utf8_lossy(&frame.data);
        let digits: Vec<u32> = text.chars().filter_map(|c| c.to_digit(10)).collect();
        if digits.len() != 13 {
            return Err(DecodeError::NotFound);
        }
        if Self::check_digit(&digits[..12]) != digits[12] {
            return Err(DecodeError::Checksum);
        }

        let code: String = digits.iter().map(|d| char::from(b'0' + *d as u8)).collect();
        Ok(DecodedCode::new(code).with_format(BarcodeFormat::Ean13))
    }
}

async fn scan(title: &str, camera: SlideshowCamera) {
    println!("--- {title} ---");

    let (controller, mut events) = ScanSessionController::new(
        Arc::new(camera),
        Arc::new(AsciiEanDecoder),
        SessionConfig::new().with_frame_interval(Duration::from_millis(20)),
    );
    controller.request_active(true).await;

    match events.recv().await {
        Some(SessionEvent::Detected { code, .. }) => {
            println!("Detected {} ({:?})", code, code.format);
        }
        Some(SessionEvent::Error { error, .. }) => {
            println!("Error: {error}");
            println!("Shown to the user: {}", error.user_message());
        }
        Some(SessionEvent::Ended { reason, .. }) => println!("Ended: {reason:?}"),
        None => println!("Session closed"),
    }
    println!("Final status: {}\n", controller.status());
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    println!("=== Custom Camera Example ===\n");

    scan(
        "Readable label",
        SlideshowCamera::new(["", "blurry", "7791234567898"]),
    )
    .await;

    scan(
        "Damaged label",
        SlideshowCamera::new(["blurry", "7791234567890"]),
    )
    .await;

    scan("Nothing in view", SlideshowCamera::new(["", "", ""])).await;
}
