//! Per-category product cache.
//!
//! Each category is fetched at most once per process lifetime: once a key is
//! present its list is never refetched, replaced, or evicted. The cart relies
//! on this when it resolves prices against the `"all"` entry.
//!
//! ```text
//! Unfetched --select--> Fetching --ok--> Cached (terminal)
//!                          |
//!                          +--err--> Unfetched (retried on next select)
//! ```

use std::sync::Arc;

use marketstall_core::{Category, CategoryIndex, Product, ProductId};
use moka::future::Cache;
use tracing::{debug, instrument, warn};

use super::{CatalogError, CatalogSource};

/// A shared, immutable product list.
pub type ProductList = Arc<[Product]>;

/// Memoizes product lists by category name.
///
/// Backed by an unbounded `moka` cache with no TTL; the catalog is small and
/// treated as read-only for the life of the process.
pub struct CatalogCache<S> {
    source: S,
    entries: Cache<Category, ProductList>,
}

impl<S: CatalogSource> CatalogCache<S> {
    /// Create an empty cache in front of `source`.
    pub fn new(source: S) -> Self {
        Self {
            source,
            entries: Cache::builder().name("catalog").build(),
        }
    }

    /// The catalog source behind this cache.
    pub const fn source(&self) -> &S {
        &self.source
    }

    /// Return the product list for `category`, fetching it on first use.
    ///
    /// `"all"` issues the unscoped product request; any other category the
    /// category-scoped one.
    ///
    /// # Errors
    ///
    /// Returns the source's error if the fetch fails. Nothing is stored in
    /// that case, so the next call retries.
    #[instrument(skip(self, category), fields(category = %category))]
    pub async fn select(&self, category: &Category) -> Result<ProductList, CatalogError> {
        if let Some(list) = self.entries.get(category).await {
            debug!("Cache hit for category");
            return Ok(list);
        }

        let fetched = if category.is_all() {
            self.source.products().await
        } else {
            self.source.products_in_category(category).await
        };

        let fetched = match fetched {
            Ok(products) => products,
            Err(e) => {
                warn!(error = %e, "Category fetch failed, cache left untouched");
                return Err(e);
            }
        };

        // A concurrent fetch may have stored this key while we were waiting;
        // the first stored list is kept.
        let entry = self
            .entries
            .entry(category.clone())
            .or_insert(ProductList::from(fetched))
            .await;
        if !entry.is_fresh() {
            debug!("Category already cached by a concurrent fetch");
        }

        Ok(entry.into_value())
    }

    /// Pre-seed `category` with an already fetched list.
    ///
    /// Has no effect if the category is already cached.
    pub async fn warm(&self, category: Category, products: impl Into<ProductList>) {
        let entry = self.entries.entry(category).or_insert(products.into()).await;
        debug!(
            category = %entry.key(),
            count = entry.value().len(),
            seeded = entry.is_fresh(),
            "Warmed catalog cache"
        );
    }

    /// Cached list for `category`, without fetching.
    pub async fn peek(&self, category: &Category) -> Option<ProductList> {
        self.entries.get(category).await
    }

    /// The full catalog, if it has been loaded.
    pub async fn all_products(&self) -> Option<ProductList> {
        self.peek(&Category::all()).await
    }

    /// Whether `category` has a cached entry.
    pub fn is_cached(&self, category: &Category) -> bool {
        self.entries.contains_key(category)
    }

    /// Fetch a single product. Details are never memoized.
    ///
    /// # Errors
    ///
    /// Returns the source's error if the fetch fails.
    pub async fn product(&self, id: ProductId) -> Result<Product, CatalogError> {
        self.source.product(id).await
    }

    /// Fetch the category index from the source.
    ///
    /// # Errors
    ///
    /// Returns the source's error if the fetch fails.
    pub async fn load_categories(&self) -> Result<CategoryIndex, CatalogError> {
        let categories = self.source.categories().await?;
        Ok(CategoryIndex::new(categories))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use marketstall_core::Price;

    use super::*;
    use crate::catalog::stub::StubCatalog;

    #[tokio::test]
    async fn test_second_select_is_served_from_cache() {
        let cache = CatalogCache::new(StubCatalog::sample());

        let first = cache.select(&Category::from("men")).await.unwrap();
        let second = cache.select(&Category::from("men")).await.unwrap();

        assert_eq!(cache.source().list_calls(), 1);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.len(), 2);
    }

    #[tokio::test]
    async fn test_select_all_uses_unscoped_request() {
        let cache = CatalogCache::new(StubCatalog::sample());

        let all = cache.select(&Category::all()).await.unwrap();

        assert_eq!(all.len(), 3);
        assert!(cache.all_products().await.is_some());
    }

    #[tokio::test]
    async fn test_single_product_catalog_cached_after_first_fetch() {
        let shirt = Product::new(ProductId::new(1), "Blue Shirt", Price::from_cents(1999), "men");
        let cache = CatalogCache::new(StubCatalog::new(vec![shirt.clone()]));

        let first = cache.select(&Category::all()).await.unwrap();
        let second = cache.select(&Category::all()).await.unwrap();

        assert_eq!(&*first, &[shirt][..]);
        assert_eq!(first, second);
        assert_eq!(cache.source().list_calls(), 1);
    }

    #[tokio::test]
    async fn test_failed_fetch_leaves_no_entry_and_retries() {
        let cache = CatalogCache::new(StubCatalog::sample());
        let men = Category::from("men");

        cache.source().set_failing(true);
        assert!(cache.select(&men).await.is_err());
        assert!(!cache.is_cached(&men));

        cache.source().set_failing(false);
        let list = cache.select(&men).await.unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(cache.source().list_calls(), 2);
    }

    #[tokio::test]
    async fn test_warm_avoids_fetch() {
        let cache = CatalogCache::new(StubCatalog::sample());
        let seeded = vec![Product::new(
            ProductId::new(9),
            "Seeded",
            Price::from_cents(100),
            "men",
        )];

        cache.warm(Category::all(), seeded).await;
        let all = cache.select(&Category::all()).await.unwrap();

        assert_eq!(all.len(), 1);
        assert_eq!(cache.source().list_calls(), 0);
    }

    #[tokio::test]
    async fn test_warm_does_not_replace_cached_entry() {
        let cache = CatalogCache::new(StubCatalog::sample());
        cache.select(&Category::all()).await.unwrap();

        cache.warm(Category::all(), Vec::new()).await;

        assert_eq!(cache.all_products().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_peek_never_fetches() {
        let cache = CatalogCache::new(StubCatalog::sample());
        assert!(cache.peek(&Category::from("men")).await.is_none());
        assert_eq!(cache.source().list_calls(), 0);
    }

    #[tokio::test]
    async fn test_product_detail_not_memoized() {
        let cache = CatalogCache::new(StubCatalog::sample());

        cache.product(ProductId::new(2)).await.unwrap();
        cache.product(ProductId::new(2)).await.unwrap();

        assert_eq!(cache.source().detail_calls(), 2);
    }

    #[tokio::test]
    async fn test_load_categories_prepends_all() {
        let cache = CatalogCache::new(StubCatalog::sample());
        let index = cache.load_categories().await.unwrap();
        let names: Vec<&str> = index.iter().map(Category::as_str).collect();
        assert_eq!(names, ["all", "men", "jewelery"]);
    }
}
