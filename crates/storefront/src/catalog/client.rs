//! HTTP client for the catalog API.

use std::sync::Arc;

use marketstall_core::{Category, Product, ProductId};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use super::{CatalogError, CatalogSource};
use crate::config::CatalogConfig;

/// Client for the remote catalog API.
///
/// Cheap to clone; all clones share one connection pool.
#[derive(Clone)]
pub struct CatalogClient {
    inner: Arc<CatalogClientInner>,
}

struct CatalogClientInner {
    client: reqwest::Client,
    base_url: String,
}

impl CatalogClient {
    /// Create a new catalog client.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(config: &CatalogConfig) -> Result<Self, CatalogError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("marketstall/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            inner: Arc::new(CatalogClientInner {
                client,
                base_url: config.base_url.trim_end_matches('/').to_string(),
            }),
        })
    }

    /// Base URL requests are issued against.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    /// GET a path and decode the JSON body.
    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, CatalogError> {
        let url = format!("{}{path}", self.inner.base_url);

        let response = self.inner.client.get(&url).send().await?;
        let status = response.status();

        // Get response body as text first for better error diagnostics
        let body = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %body.chars().take(500).collect::<String>(),
                "Catalog API returned non-success status"
            );
            return Err(CatalogError::status(status, path));
        }

        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %body.chars().take(500).collect::<String>(),
                "Failed to parse catalog response"
            );
            CatalogError::Parse(e)
        })
    }
}

impl CatalogSource for CatalogClient {
    #[instrument(skip(self))]
    async fn products(&self) -> Result<Vec<Product>, CatalogError> {
        let products: Vec<Product> = self.get_json("/products").await?;
        debug!(count = products.len(), "Fetched product list");
        Ok(products)
    }

    #[instrument(skip(self, category), fields(category = %category))]
    async fn products_in_category(&self, category: &Category) -> Result<Vec<Product>, CatalogError> {
        let path = format!(
            "/products/category/{}",
            urlencoding::encode(category.as_str())
        );
        let products: Vec<Product> = self.get_json(&path).await?;
        debug!(count = products.len(), "Fetched category products");
        Ok(products)
    }

    #[instrument(skip(self))]
    async fn categories(&self) -> Result<Vec<Category>, CatalogError> {
        self.get_json("/products/categories").await
    }

    #[instrument(skip(self, id), fields(product_id = %id))]
    async fn product(&self, id: ProductId) -> Result<Product, CatalogError> {
        self.get_json(&format!("/products/{id}")).await
    }
}
