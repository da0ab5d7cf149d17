//! Product lookup backends.
//!
//! Implementations of [`ProductLookup`](crate::core::ProductLookup):
//!
//! - [`HttpLookupClient`] - The product API over HTTP (requires `http` feature)
//! - [`MockLookup`] - In-memory products for testing

pub mod config;
#[cfg(feature = "http")]
pub mod http;
pub mod mock;

pub use config::{LookupConfig, API_URL_ENV, DEFAULT_BASE_URL};
#[cfg(feature = "http")]
pub use http::HttpLookupClient;
pub use mock::MockLookup;
