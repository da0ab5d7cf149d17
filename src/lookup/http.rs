//! HTTP product lookup client.
//!
//! Talks to the product API over JSON:
//!
//! - `GET {base_url}/products/{code}` returns a product, or 404 with
//!   `{"detail": "...", "barcode": "..."}` when the code is unknown.
//! - `GET {base_url}/health` returns 2xx while the API is up.
//!
//! Requests are never retried.

use crate::audit;
use crate::core::{LookupError, Product, ProductLookup};
use crate::lookup::config::LookupConfig;

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::StatusCode;
use serde::Deserialize;
use std::time::Instant;

/// Body of an error response from the product API.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    detail: Option<String>,
}

/// Product lookup over HTTP.
///
/// # Example
///
/// ```rust,ignore
/// use shelfscan::lookup::{HttpLookupClient, LookupConfig};
/// use shelfscan::core::ProductLookup;
///
/// let client = HttpLookupClient::new(LookupConfig::from_env())?;
/// let product = client.fetch("7791234567890").await?;
/// ```
#[derive(Debug)]
pub struct HttpLookupClient {
    config: LookupConfig,
    client: reqwest::Client,
}

impl HttpLookupClient {
    /// Creates a client with the given configuration.
    pub fn new(config: LookupConfig) -> Result<Self, LookupError> {
        config.validate()?;

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| LookupError::configuration(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    /// Returns the configuration.
    pub fn config(&self) -> &LookupConfig {
        &self.config
    }

    /// Checks that the API is reachable and healthy.
    pub async fn health_check(&self) -> Result<(), LookupError> {
        let response = self
            .client
            .get(self.config.health_url())
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "Health check failed");
            return Err(LookupError::Status {
                status: status.as_u16(),
                code: String::new(),
            });
        }
        Ok(())
    }

    async fn request(&self, code: &str) -> Result<Product, LookupError> {
        let url = self.config.product_url(code);
        tracing::debug!(url = %url, "Requesting product");

        let response = self
            .client
            .get(&url)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            let detail = response
                .json::<ErrorBody>()
                .await
                .ok()
                .and_then(|body| body.detail)
                .filter(|detail| !detail.trim().is_empty());
            return Err(LookupError::NotFound {
                code: code.to_string(),
                detail,
            });
        }

        if !status.is_success() {
            return Err(LookupError::Status {
                status: status.as_u16(),
                code: code.to_string(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| self.transport_error(e))?;

        let mut product: Product =
            serde_json::from_slice(&body).map_err(|e| LookupError::InvalidResponse {
                details: e.to_string(),
            })?;
        if product.barcode.is_none() {
            product.barcode = Some(code.to_string());
        }
        Ok(product)
    }

    fn transport_error(&self, error: reqwest::Error) -> LookupError {
        if error.is_timeout() {
            LookupError::Timeout {
                elapsed: self.config.timeout,
            }
        } else {
            LookupError::network(error.to_string())
        }
    }
}

#[async_trait]
impl ProductLookup for HttpLookupClient {
    fn name(&self) -> &str {
        "http"
    }

    async fn fetch(&self, code: &str) -> Result<Product, LookupError> {
        // The scanned code is opaque; only a blank one is refused.
        if code.trim().is_empty() {
            return Err(LookupError::InvalidCode {
                code: code.to_string(),
            });
        }

        let started = Instant::now();
        let result = self.request(code).await;
        audit::emit_lookup_completed(self.name(), code, &result, started.elapsed());
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_rejects_invalid_config() {
        let err = HttpLookupClient::new(LookupConfig::new("localhost:8000")).unwrap_err();
        assert!(matches!(err, LookupError::Configuration { .. }));
    }

    #[tokio::test]
    async fn test_empty_code_makes_no_request() {
        // Nothing listens on this port; a request would surface as Network.
        let client = HttpLookupClient::new(
            LookupConfig::new("http://127.0.0.1:9").with_timeout(Duration::from_millis(200)),
        )
        .unwrap();

        let err = client.fetch("   ").await.unwrap_err();
        assert!(matches!(err, LookupError::InvalidCode { .. }));
    }

    #[test]
    fn test_error_body_detail() {
        let body: ErrorBody =
            serde_json::from_str(r#"{"detail": "Producto no encontrado.", "barcode": "000"}"#)
                .unwrap();
        assert_eq!(body.detail.as_deref(), Some("Producto no encontrado."));

        let empty: ErrorBody = serde_json::from_str("{}").unwrap();
        assert!(empty.detail.is_none());
    }
}
