//! Application glue: routing between the scanner and product pages.

use crate::core::ArcLookup;
use crate::session::{ScanSessionController, SessionEvent, SessionEvents, SessionStatus};
use crate::views::product_page::ProductPage;
use crate::views::route::Route;
use crate::views::scanner_page::ScannerPage;

/// Application title.
pub const TITLE: &str = "Escáner de Productos";

/// Tagline under the title.
pub const TAGLINE: &str = "Escaneá el código y descubrí la info al instante.";

/// The application: current route plus the state of each page.
///
/// # Example
///
/// ```rust,ignore
/// let mut app = App::new(Arc::new(MockLookup::new()));
/// let route = app.run_scan(&controller, &mut events).await;
/// println!("{}", app.render());
/// ```
#[derive(Debug)]
pub struct App {
    route: Route,
    scanner: ScannerPage,
    product: ProductPage,
    lookup: ArcLookup,
}

impl App {
    /// Creates an application on the scanner route.
    pub fn new(lookup: ArcLookup) -> Self {
        Self {
            route: Route::Scanner,
            scanner: ScannerPage::new(),
            product: ProductPage::new(),
            lookup,
        }
    }

    /// Replaces the product page, e.g. to change its timeout.
    pub fn with_product_page(mut self, page: ProductPage) -> Self {
        self.product = page;
        self
    }

    /// Returns the current route.
    pub fn route(&self) -> &Route {
        &self.route
    }

    /// Returns the scanner page.
    pub fn scanner_page(&self) -> &ScannerPage {
        &self.scanner
    }

    /// Returns the product page.
    pub fn product_page(&self) -> &ProductPage {
        &self.product
    }

    /// Moves to `route`. Product routes reset the product page.
    pub fn navigate(&mut self, route: Route) {
        tracing::debug!(from = %self.route, to = %route, "Navigating");
        if let Route::Product { code } = &route {
            self.product.navigate(code.clone());
        }
        self.route = route;
    }

    /// Moves to the route at `path`. Unknown paths fall back to the scanner.
    pub fn open(&mut self, path: &str) {
        let route = Route::parse(path).unwrap_or_else(|| {
            tracing::debug!(path = %path, "Unknown path, showing scanner");
            Route::Scanner
        });
        self.navigate(route);
    }

    /// Applies a session event, following a detection to its product.
    pub fn handle_session_event(&mut self, event: &SessionEvent) {
        if let Some(route) = self.scanner.handle_event(event) {
            self.navigate(route);
        }
    }

    /// Performs the lookup for the current product route, once.
    pub async fn load_product(&mut self) -> bool {
        if !matches!(self.route, Route::Product { .. }) {
            return false;
        }
        self.product.load(self.lookup.as_ref()).await
    }

    /// Runs one scan: activates the scanner, waits for the session's
    /// outcome and loads the product when a code was read.
    ///
    /// Returns immediately, still on the scanner, when no camera was found.
    pub async fn run_scan(
        &mut self,
        controller: &ScanSessionController,
        events: &mut SessionEvents,
    ) -> Route {
        self.navigate(Route::Scanner);
        self.scanner.activate();
        controller.request_active(true).await;
        self.scanner.observe_status(controller.status());

        // Only the no-camera path ends without an event.
        while controller.status() != SessionStatus::Idle {
            let Some(event) = events.recv().await else {
                break;
            };
            let current = controller.snapshot().session_id;
            if current.as_deref() != Some(event.session_id()) {
                tracing::debug!(session_id = %event.session_id(), "Ignoring event from an earlier session");
                continue;
            }
            self.handle_session_event(&event);
            break;
        }

        self.load_product().await;
        self.route.clone()
    }

    /// Renders the header and the current page.
    pub fn render(&self) -> String {
        let page = match &self.route {
            Route::Scanner => self.scanner.render(),
            Route::Product { .. } => self.product.render(),
        };
        format!("{TITLE}\n{TAGLINE}\n\n{page}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{DecodedCode, Product};
    use crate::lookup::MockLookup;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_detection_navigates_and_loads() {
        let lookup = Arc::new(
            MockLookup::new().with_product("7791234567890", Product::new("Yerba Mate 1kg", 1200.0, "ARS")),
        );
        let mut app = App::new(lookup.clone());

        app.handle_session_event(&SessionEvent::Detected {
            session_id: "s1".into(),
            code: DecodedCode::new("7791234567890"),
        });
        assert_eq!(app.route(), &Route::product("7791234567890"));

        assert!(app.load_product().await);
        let rendered = app.render();
        assert!(rendered.starts_with(TITLE));
        assert!(rendered.contains("Precio: ARS 1.200"));
        assert_eq!(lookup.calls(), 1);
    }

    #[tokio::test]
    async fn test_open_path() {
        let mut app = App::new(Arc::new(MockLookup::new()));
        app.open("/p/000");
        assert_eq!(app.product_page().current_code(), Some("000"));

        app.open("/nowhere");
        assert_eq!(app.route(), &Route::Scanner);
        assert!(!app.load_product().await);
        assert!(app.render().contains("[Iniciar cámara]"));
    }
}
