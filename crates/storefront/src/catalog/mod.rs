//! Remote catalog access and the per-category product cache.
//!
//! # Architecture
//!
//! - [`CatalogSource`] is the seam to the remote catalog API
//! - [`CatalogClient`] implements it over HTTP with `reqwest`
//! - [`CatalogCache`] memoizes per-category product lists for the session
//!   lifetime (no TTL, no eviction)
//!
//! # Endpoints
//!
//! ```text
//! GET /products                      - Full product list
//! GET /products/category/{category}  - Products in one category
//! GET /products/categories           - Ordered category names
//! GET /products/{id}                 - Single product detail
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use marketstall_storefront::catalog::{CatalogCache, CatalogClient};
//!
//! let client = CatalogClient::new(&config.catalog)?;
//! let cache = CatalogCache::new(client);
//!
//! // First call fetches, second call is served from memory
//! let all = cache.select(&Category::all()).await?;
//! let again = cache.select(&Category::all()).await?;
//! ```

pub mod cache;
mod client;
#[cfg(test)]
pub(crate) mod stub;

use std::future::Future;

use marketstall_core::{Category, Product, ProductId};
use thiserror::Error;

pub use cache::{CatalogCache, ProductList};
pub use client::CatalogClient;

/// Errors that can occur when talking to the catalog API.
///
/// Every variant is a fetch failure from the caller's point of view; the
/// variants only exist so logs say which step failed.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Transport-level failure (connect, timeout, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The catalog answered with a non-success status.
    #[error("catalog returned HTTP {status} for {path}")]
    Status {
        status: reqwest::StatusCode,
        path: String,
    },

    /// The response body was not the expected JSON.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

impl CatalogError {
    /// Build a status error, mostly useful for test doubles.
    #[must_use]
    pub fn status(status: reqwest::StatusCode, path: impl Into<String>) -> Self {
        Self::Status {
            status,
            path: path.into(),
        }
    }
}

/// A remote source of catalog data.
///
/// Implementations must be cheap to share between tasks; the cache holds one
/// for the whole process.
pub trait CatalogSource: Send + Sync {
    /// Fetch the complete product list.
    fn products(&self) -> impl Future<Output = Result<Vec<Product>, CatalogError>> + Send;

    /// Fetch the products of one category.
    fn products_in_category(
        &self,
        category: &Category,
    ) -> impl Future<Output = Result<Vec<Product>, CatalogError>> + Send;

    /// Fetch the ordered list of category names.
    fn categories(&self) -> impl Future<Output = Result<Vec<Category>, CatalogError>> + Send;

    /// Fetch a single product.
    fn product(&self, id: ProductId) -> impl Future<Output = Result<Product, CatalogError>> + Send;
}
