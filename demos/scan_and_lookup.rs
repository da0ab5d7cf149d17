//! Scan-and-lookup example: one scan session followed by a product lookup.
//!
//! This example shows how to:
//! - Build a scan session over a camera and a decoder
//! - Drive it through the application pages
//! - Look the code up against the product API, or an in-memory catalogue
//!
//! Run with: cargo run --example scan_and_lookup
//!
//! Set `SHELFSCAN_API_URL` (e.g. `http://localhost:8000/api`) to query a
//! running product API instead of the in-memory catalogue.

use shelfscan::backends::{MockCamera, MockDecoder};
use shelfscan::core::{ArcLookup, DeviceDescriptor};
use shelfscan::lookup::API_URL_ENV;
use shelfscan::prelude::*;
use shelfscan::MockLookup;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

const YERBA: &str = "7791234567890";

fn catalogue() -> MockLookup {
    MockLookup::new()
        .with_product(
            YERBA,
            Product::new("Yerba Mate 1kg", 1200.0, "ARS")
                .with_brand("Playadito")
                .with_description("Yerba mate elaborada con palo.")
                .with_attribute("peso", "1kg")
                .with_attribute("origen", "Misiones"),
        )
        .with_latency(Duration::from_millis(150))
}

#[cfg(feature = "http")]
fn api_lookup() -> Result<Option<ArcLookup>, Box<dyn std::error::Error>> {
    if std::env::var(API_URL_ENV).is_err() {
        return Ok(None);
    }
    let client = shelfscan::HttpLookupClient::new(LookupConfig::from_env())?;
    println!("Using product API at {}\n", client.config().base_url);
    Ok(Some(Arc::new(client)))
}

#[cfg(not(feature = "http"))]
fn api_lookup() -> Result<Option<ArcLookup>, Box<dyn std::error::Error>> {
    Ok(None)
}

fn lookup() -> Result<ArcLookup, Box<dyn std::error::Error>> {
    if let Some(lookup) = api_lookup()? {
        return Ok(lookup);
    }
    println!("{API_URL_ENV} not set, using the in-memory catalogue\n");
    Ok(Arc::new(catalogue()))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing; RUST_LOG=shelfscan=debug shows the decode loop
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    println!("=== Shelfscan Scan and Lookup Example ===\n");

    // A phone with a front and a rear camera; the rear one is picked
    let camera = Arc::new(
        MockCamera::new()
            .with_name("phone")
            .with_device(DeviceDescriptor::video("cam-0", "Front Camera"))
            .with_device(DeviceDescriptor::video("cam-1", "Back Camera (environment)")),
    );
    let stats = camera.stats();

    // The code comes into focus after a few blurry frames
    let decoder = Arc::new(MockDecoder::new().then_not_found(5).then_detect(YERBA));

    let (controller, mut events) = ScanSessionController::new(
        camera,
        decoder,
        SessionConfig::new().with_frame_interval(Duration::from_millis(50)),
    );

    let mut app = App::new(lookup()?);
    println!("{}\n", app.render());

    let route = app.run_scan(&controller, &mut events).await;

    println!("Route: {route}");
    println!(
        "Camera opened {} time(s), released {} time(s)",
        stats.opened(),
        stats.released()
    );
    println!("Session metrics: {:?}\n", controller.metrics());
    println!("{}", app.render());

    // Scan the unknown code path too
    app.open("/p/000");
    app.load_product().await;
    println!("{}", app.render());

    Ok(())
}
