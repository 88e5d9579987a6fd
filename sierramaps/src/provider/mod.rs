//! Tile server access.
//!
//! Tiles are fetched with a plain blocking GET through the [`HttpClient`]
//! trait so the cache can be exercised against a mock in tests.

mod http;
mod types;

pub use http::{HttpClient, ReqwestClient, DEFAULT_TIMEOUT_SECS};
pub use types::ProviderError;

#[cfg(test)]
pub use http::tests::MockHttpClient;
