//! Command implementations.

pub mod cart;
pub mod catalog;

use std::path::Path;
use std::sync::Arc;

use marketstall_storefront::cart::{CartStore, FileSnapshotStore};
use marketstall_storefront::catalog::{CatalogCache, CatalogClient, CatalogError};
use marketstall_storefront::config::{CatalogConfig, ConfigError};
use marketstall_storefront::shop::{self, Shop};
use thiserror::Error;

/// Shop over the live catalog with a file-backed cart.
pub type CliShop = Shop<CatalogClient, FileSnapshotStore>;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The catalog client could not be built.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// The catalog could not serve the request.
    #[error("{0}")]
    Unavailable(String),

    /// The shop returned a result the command cannot display.
    #[error("unexpected result: {0}")]
    Unexpected(String),
}

/// Connect to the catalog, load it and open the cart at `cart_file`.
pub async fn open_shop(cart_file: &Path) -> Result<CliShop, CliError> {
    let config = CatalogConfig::from_env()?;
    tracing::debug!(catalog = %config.base_url, cart = %cart_file.display(), "Opening shop");

    let cache = Arc::new(CatalogCache::new(CatalogClient::new(&config)?));
    let categories = shop::load_catalog(&cache).await;
    let cart = CartStore::open(FileSnapshotStore::new(cart_file));

    Ok(Shop::new(cache, categories, cart))
}
