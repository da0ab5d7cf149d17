//! In-memory product lookup for testing.

use crate::core::{LookupError, Product, ProductLookup};

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, RwLock};
use std::time::Duration;

/// Detail returned for unknown codes, as the product API words it.
pub const NOT_FOUND_DETAIL: &str = "Producto no encontrado.";

/// A product lookup backed by a map.
///
/// # Example
///
/// ```rust
/// use shelfscan::core::Product;
/// use shelfscan::lookup::MockLookup;
///
/// let lookup = MockLookup::new()
///     .with_product("7791234567890", Product::new("Yerba Mate 1kg", 1200.0, "ARS"));
/// assert_eq!(lookup.calls(), 0);
/// ```
#[derive(Debug, Default)]
pub struct MockLookup {
    name: String,
    products: RwLock<HashMap<String, Product>>,
    failures: RwLock<HashMap<String, LookupError>>,
    latency: Option<Duration>,
    calls: AtomicU64,
    requested: Mutex<Vec<String>>,
}

impl MockLookup {
    /// Creates an empty lookup; every code is unknown.
    pub fn new() -> Self {
        Self {
            name: "mock".to_string(),
            ..Default::default()
        }
    }

    /// Sets the backend name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Adds a product.
    pub fn with_product(self, code: impl Into<String>, product: Product) -> Self {
        self.insert_product(code, product);
        self
    }

    /// Makes lookups of `code` fail with `error`.
    pub fn with_failure(self, code: impl Into<String>, error: LookupError) -> Self {
        self.failures
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(code.into(), error);
        self
    }

    /// Delays every lookup.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Adds or replaces a product after construction.
    pub fn insert_product(&self, code: impl Into<String>, product: Product) {
        self.products
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(code.into(), product);
    }

    /// Returns how many lookups were made.
    pub fn calls(&self) -> u64 {
        self.calls.load(Ordering::SeqCst)
    }

    /// Returns the codes looked up, in order.
    pub fn requested(&self) -> Vec<String> {
        self.requested
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

#[async_trait]
impl ProductLookup for MockLookup {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch(&self, code: &str) -> Result<Product, LookupError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requested
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(code.to_string());

        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        if code.trim().is_empty() {
            return Err(LookupError::InvalidCode {
                code: code.to_string(),
            });
        }

        if let Some(error) = self
            .failures
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(code)
        {
            return Err(error.clone());
        }

        let products = self
            .products
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        match products.get(code) {
            Some(product) => {
                let mut product = product.clone();
                product.barcode.get_or_insert_with(|| code.to_string());
                Ok(product)
            }
            None => Err(LookupError::NotFound {
                code: code.to_string(),
                detail: Some(NOT_FOUND_DETAIL.to_string()),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_found_and_missing() {
        let lookup = MockLookup::new()
            .with_product("7791234567890", Product::new("Yerba Mate 1kg", 1200.0, "ARS"));

        let product = lookup.fetch("7791234567890").await.unwrap();
        assert_eq!(product.title, "Yerba Mate 1kg");
        assert_eq!(product.barcode.as_deref(), Some("7791234567890"));

        let err = lookup.fetch("000").await.unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(lookup.calls(), 2);
        assert_eq!(lookup.requested(), vec!["7791234567890", "000"]);
    }

    #[tokio::test]
    async fn test_injected_failure() {
        let lookup = MockLookup::new().with_failure("123", LookupError::network("refused"));
        let err = lookup.fetch("123").await.unwrap_err();
        assert!(err.is_transport());
    }

    #[tokio::test]
    async fn test_empty_code_rejected() {
        let lookup = MockLookup::new();
        assert!(matches!(
            lookup.fetch("").await,
            Err(LookupError::InvalidCode { .. })
        ));
    }
}
