//! The product page.

use crate::core::error::MSG_PRODUCT_NOT_FOUND;
use crate::core::{LookupError, Product, ProductLookup};
use crate::views::product_card::ProductCard;

use std::time::Duration;

/// Shown while the lookup is in flight.
pub const LOADING: &str = "Buscando el producto...";

/// Hint shown under a failed lookup.
pub const RETRY_HINT: &str = "Probá escanearlo de nuevo o consultá con el equipo del local.";

/// Control that returns to the scanner after an error.
pub const BACK_CONTROL: &str = "[Volver a escanear]";

/// Control that returns to the scanner after a product.
pub const SCAN_ANOTHER_CONTROL: &str = "[Escanear otro producto]";

/// What the product page shows.
#[derive(Debug, Clone, PartialEq)]
pub enum ProductView {
    /// The lookup has not finished.
    Loading,
    /// The lookup failed; holds the underlying error text.
    Error(String),
    /// The product was found.
    Loaded(Product),
}

/// State of the product page for the current route code.
#[derive(Debug, Clone)]
pub struct ProductPage {
    code: Option<String>,
    view: ProductView,
    fetched: bool,
    timeout: Duration,
}

impl Default for ProductPage {
    fn default() -> Self {
        Self {
            code: None,
            view: ProductView::Loading,
            fetched: false,
            timeout: Duration::from_secs(10),
        }
    }
}

impl ProductPage {
    /// Creates an empty page.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the bound on a single lookup.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Switches the page to a new code and resets it to loading.
    pub fn navigate(&mut self, code: impl Into<String>) {
        self.code = Some(code.into());
        self.view = ProductView::Loading;
        self.fetched = false;
    }

    /// Returns the code the page is showing.
    pub fn current_code(&self) -> Option<&str> {
        self.code.as_deref()
    }

    /// Returns what the page shows.
    pub fn view(&self) -> &ProductView {
        &self.view
    }

    /// Applies a lookup outcome for `code`.
    ///
    /// Returns `false` and leaves the page untouched when `code` is no
    /// longer the current one.
    pub fn resolve(&mut self, code: &str, result: Result<Product, LookupError>) -> bool {
        if self.code.as_deref() != Some(code) {
            tracing::debug!(code = %code, current = ?self.code, "Dropping stale lookup result");
            return false;
        }

        self.view = match result {
            Ok(product) => ProductView::Loaded(product),
            Err(LookupError::NotFound {
                detail: Some(detail),
                ..
            }) => ProductView::Error(detail),
            Err(error) => ProductView::Error(error.to_string()),
        };
        true
    }

    /// Looks up the current code once.
    ///
    /// Does nothing without a code or when this code was already fetched;
    /// a failed lookup is only retried by navigating again.
    pub async fn load(&mut self, lookup: &dyn ProductLookup) -> bool {
        let Some(code) = self.code.clone() else {
            return false;
        };
        if self.fetched {
            return false;
        }
        self.fetched = true;

        let result = match tokio::time::timeout(self.timeout, lookup.fetch(&code)).await {
            Ok(result) => result,
            Err(_) => Err(LookupError::Timeout {
                elapsed: self.timeout,
            }),
        };
        self.resolve(&code, result)
    }

    /// Renders the page.
    pub fn render(&self) -> String {
        match &self.view {
            ProductView::Loading => format!("{LOADING}\n"),
            ProductView::Error(message) => format!(
                "{MSG_PRODUCT_NOT_FOUND}\n{RETRY_HINT}\n{message}\n{BACK_CONTROL}\n"
            ),
            ProductView::Loaded(product) => format!(
                "{}{SCAN_ANOTHER_CONTROL}\n",
                ProductCard::new(product).render()
            ),
        }
    }
}
