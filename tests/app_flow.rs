//! Scanning through the application pages.

use shelfscan::backends::{MockCamera, MockDecoder};
use shelfscan::core::error::{MSG_CAMERA_UNAVAILABLE, MSG_PERMISSION_DENIED, MSG_PRODUCT_NOT_FOUND};
use shelfscan::core::{CameraError, Product};
use shelfscan::lookup::MockLookup;
use shelfscan::session::{ScanSessionController, SessionConfig, SessionEvents};
use shelfscan::views::{App, ProductView, Route};
use std::sync::Arc;
use std::time::Duration;

fn session(camera: MockCamera, decoder: MockDecoder) -> (ScanSessionController, SessionEvents) {
    ScanSessionController::new(
        Arc::new(camera),
        Arc::new(decoder),
        SessionConfig::new().with_frame_interval(Duration::from_millis(2)),
    )
}

#[tokio::test]
async fn test_scan_to_product() {
    let camera = MockCamera::with_back_camera();
    let stats = camera.stats();
    let (controller, mut events) = session(
        camera,
        MockDecoder::new().then_not_found(3).then_detect("7791234567890"),
    );
    let lookup = Arc::new(MockLookup::new().with_product(
        "7791234567890",
        Product::new("Yerba Mate 1kg", 1200.0, "ARS").with_brand("Playadito"),
    ));
    let mut app = App::new(lookup.clone());

    let route = app.run_scan(&controller, &mut events).await;

    assert_eq!(route, Route::product("7791234567890"));
    assert_eq!(route.path(), "/p/7791234567890");
    assert_eq!(stats.open_handles(), 0);
    assert_eq!(lookup.requested(), vec!["7791234567890"]);

    let rendered = app.render();
    assert!(rendered.contains("Escáner de Productos"));
    assert!(rendered.contains("Yerba Mate 1kg"));
    assert!(rendered.contains("Precio: ARS 1.200"));
    assert!(rendered.contains("Marca: Playadito"));
    assert!(rendered.contains("[Escanear otro producto]"));
}

#[tokio::test]
async fn test_unknown_product_is_fetched_once() {
    let (controller, mut events) =
        session(MockCamera::with_back_camera(), MockDecoder::always("000"));
    let lookup = Arc::new(MockLookup::new());
    let mut app = App::new(lookup.clone());

    let route = app.run_scan(&controller, &mut events).await;
    assert_eq!(route, Route::product("000"));
    assert!(matches!(app.product_page().view(), ProductView::Error(_)));

    let rendered = app.render();
    assert!(rendered.contains(MSG_PRODUCT_NOT_FOUND));
    assert!(rendered.contains("Producto no encontrado."));
    assert!(rendered.contains("[Volver a escanear]"));

    assert!(!app.load_product().await);
    assert_eq!(lookup.calls(), 1);
}

#[tokio::test]
async fn test_permission_denied_stays_on_scanner() {
    let (controller, mut events) = session(
        MockCamera::with_back_camera()
            .with_access_error(CameraError::permission_denied("NotAllowedError")),
        MockDecoder::always("7791234567890"),
    );
    let lookup = Arc::new(MockLookup::new());
    let mut app = App::new(lookup.clone());

    let route = app.run_scan(&controller, &mut events).await;

    assert_eq!(route, Route::Scanner);
    let rendered = app.render();
    assert!(rendered.contains(MSG_PERMISSION_DENIED));
    assert!(rendered.contains("[Iniciar cámara]"));
    assert_eq!(lookup.calls(), 0);
}

#[tokio::test]
async fn test_no_camera_shows_hint() {
    let (controller, mut events) = session(MockCamera::new(), MockDecoder::always("1"));
    let mut app = App::new(Arc::new(MockLookup::new()));

    let route = app.run_scan(&controller, &mut events).await;

    assert_eq!(route, Route::Scanner);
    assert!(app.scanner_page().is_active());
    assert!(app.render().contains(MSG_CAMERA_UNAVAILABLE));
}
