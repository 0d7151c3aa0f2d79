//! Application state shared across handlers.

use std::sync::Arc;

use marketstall_core::CategoryIndex;

use crate::cart::{CartStore, MemorySnapshotStore};
use crate::catalog::{CatalogCache, CatalogClient, CatalogError};
use crate::config::StorefrontConfig;
use crate::models::VisitorSession;
use crate::shop::{self, Shop};

/// Shop handle for one request, backed by the visitor session.
pub type SessionShop = Shop<CatalogClient, MemorySnapshotStore>;

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`. The catalog cache is shared by every
/// visitor; carts and browse state are per session.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    catalog: Arc<CatalogCache<CatalogClient>>,
    categories: CategoryIndex,
}

impl AppState {
    #[must_use]
    pub fn new(
        config: StorefrontConfig,
        catalog: Arc<CatalogCache<CatalogClient>>,
        categories: CategoryIndex,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog,
                categories,
            }),
        }
    }

    /// Build the catalog client and run the startup catalog load.
    ///
    /// A catalog that is down at startup is logged, not fatal.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub async fn bootstrap(config: StorefrontConfig) -> Result<Self, CatalogError> {
        let client = CatalogClient::new(&config.catalog)?;
        let catalog = Arc::new(CatalogCache::new(client));
        let categories = shop::load_catalog(&catalog).await;
        tracing::info!(categories = categories.len(), "Catalog loaded");
        Ok(Self::new(config, catalog, categories))
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn categories(&self) -> &CategoryIndex {
        &self.inner.categories
    }

    /// Open a shop over the visitor's session state.
    #[must_use]
    pub fn shop(&self, visitor: &VisitorSession) -> SessionShop {
        Shop::with_browse(
            Arc::clone(&self.inner.catalog),
            self.inner.categories.clone(),
            CartStore::open(visitor.cart.clone()),
            visitor.browse.clone(),
        )
    }
}
