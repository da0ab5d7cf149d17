//! Product lookup client configuration.

use crate::core::LookupError;

use std::time::Duration;

/// Environment variable that overrides the API base URL.
pub const API_URL_ENV: &str = "SHELFSCAN_API_URL";

/// Base URL used when nothing else is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/api";

/// Configuration for [`HttpLookupClient`](crate::lookup::HttpLookupClient).
#[derive(Debug, Clone)]
pub struct LookupConfig {
    /// Base URL of the product API, without a trailing slash.
    pub base_url: String,

    /// Bound on a whole request, body included.
    pub timeout: Duration,

    /// User agent sent with each request.
    pub user_agent: String,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(8),
            user_agent: concat!("shelfscan/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl LookupConfig {
    /// Creates a configuration for the given base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::default().with_base_url(base_url)
    }

    /// Creates a configuration from `SHELFSCAN_API_URL`, falling back to
    /// the default base URL when it is unset or blank.
    pub fn from_env() -> Self {
        match std::env::var(API_URL_ENV) {
            Ok(url) if !url.trim().is_empty() => Self::new(url.trim()),
            _ => Self::default(),
        }
    }

    /// Sets the base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the user agent.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Checks that the configuration can be used to build a client.
    pub fn validate(&self) -> Result<(), LookupError> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(LookupError::configuration(format!(
                "base URL must be http or https: '{}'",
                self.base_url
            )));
        }
        if self.timeout.is_zero() {
            return Err(LookupError::configuration("timeout must be greater than zero"));
        }
        Ok(())
    }

    /// Returns the URL of the product with the given code.
    ///
    /// The code is percent-encoded as a single path segment.
    pub fn product_url(&self, code: &str) -> String {
        format!("{}/products/{}", self.base_url, urlencoding::encode(code))
    }

    /// Returns the URL of the health endpoint.
    pub fn health_url(&self) -> String {
        format!("{}/health", self.base_url)
    }
}
