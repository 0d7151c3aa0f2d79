//! The shop: owner of one visitor's browsing and cart state.
//!
//! A [`Shop`] ties together the shared [`CatalogCache`], the visitor's
//! [`CartStore`] and the browse state (selected category, search text and
//! the product list currently being filtered). Front ends translate user
//! actions into an [`Intent`] and hand it to [`Shop::dispatch`].
//!
//! # View derivation
//!
//! Category narrows the candidate set, search narrows it further:
//!
//! ```text
//! SelectCategory(c) -> cache.select(c) -> base -> search::filter(base, query) -> Listing
//! Search(q)         ->                    base -> search::filter(base, q)     -> Listing
//! ```
//!
//! A query entered before a category change is re-applied to the new base.
//!
//! # Rapid category switching
//!
//! Every category request takes a ticket from a monotonically increasing
//! counter. When a response arrives after a newer request was issued it is
//! still cached, but it does not replace the current base and the caller
//! gets [`Outcome::Stale`].

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use marketstall_core::{CartLine, Category, CategoryIndex, Product, ProductId};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::cart::{CartStore, CartTotals, LineChange, SnapshotStore};
use crate::catalog::{CatalogCache, CatalogSource, ProductList};
use crate::search;

/// Fallback text when a product list cannot be loaded.
pub const PRODUCTS_UNAVAILABLE: &str = "Failed to load products.";

/// Fallback text when a product detail cannot be loaded.
pub const DETAILS_UNAVAILABLE: &str = "Error loading details.";

/// A user action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    SelectCategory(Category),
    Search(String),
    ShowDetails(ProductId),
    AddToCart(ProductId),
    Increment(ProductId),
    Decrement(ProductId),
    Remove(ProductId),
}

/// Result of dispatching an [`Intent`].
#[derive(Debug, Clone)]
pub enum Outcome {
    /// Products for the current category and query.
    Listing(Listing),
    /// A single product.
    Details(Product),
    /// Cart contents after a cart intent.
    Cart(CartSummary),
    /// A category response was superseded by a newer request.
    Stale,
    /// The request could not be served; carries user-facing fallback text.
    Unavailable(String),
}

/// Filtered product list ready for display.
#[derive(Debug, Clone)]
pub struct Listing {
    pub category: Category,
    pub query: String,
    pub products: Vec<Product>,
}

/// One cart line joined against the full catalog.
#[derive(Debug, Clone)]
pub struct CartEntry {
    pub line: CartLine,
    /// `None` if the full catalog is not loaded or lacks the product.
    pub product: Option<Product>,
}

/// Cart contents and totals.
#[derive(Debug, Clone)]
pub struct CartSummary {
    pub entries: Vec<CartEntry>,
    pub totals: CartTotals,
    /// Effect of the intent that produced this summary.
    pub change: LineChange,
}

/// Serializable browse state: what the visitor selected and typed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrowseState {
    pub category: Category,
    pub query: String,
}

struct Browse {
    state: BrowseState,
    /// Unfiltered list for `state.category`, once loaded.
    base: Option<ProductList>,
    /// Ticket of the most recent category request.
    latest_ticket: u64,
}

/// One visitor's view of the store.
pub struct Shop<S, P> {
    cache: Arc<CatalogCache<S>>,
    categories: CategoryIndex,
    cart: Mutex<CartStore<P>>,
    browse: Mutex<Browse>,
}

impl<S, P> Shop<S, P>
where
    S: CatalogSource,
    P: SnapshotStore,
{
    /// Create a shop starting on the `"all"` category with an empty query.
    pub fn new(cache: Arc<CatalogCache<S>>, categories: CategoryIndex, cart: CartStore<P>) -> Self {
        Self::with_browse(cache, categories, cart, BrowseState::default())
    }

    /// Create a shop resuming a previous browse state.
    ///
    /// A category that is not in the index falls back to `"all"`.
    pub fn with_browse(
        cache: Arc<CatalogCache<S>>,
        categories: CategoryIndex,
        cart: CartStore<P>,
        mut state: BrowseState,
    ) -> Self {
        if !categories.contains(&state.category) {
            state.category = Category::all();
        }

        Self {
            cache,
            categories,
            cart: Mutex::new(cart),
            browse: Mutex::new(Browse {
                state,
                base: None,
                latest_ticket: 0,
            }),
        }
    }

    /// Route an intent to its handler.
    pub async fn dispatch(&self, intent: Intent) -> Outcome {
        debug!(?intent, "Dispatching intent");
        match intent {
            Intent::SelectCategory(category) => self.select_category(category).await,
            Intent::Search(query) => self.search(query).await,
            Intent::ShowDetails(id) => self.show_details(id).await,
            Intent::AddToCart(id) => {
                let catalog = self.full_catalog().await;
                let change = self.lock_cart().add(id, &catalog);
                Outcome::Cart(self.summarize(&catalog, change))
            }
            Intent::Increment(id) => self.mutate_cart(|cart| cart.increment(id)).await,
            Intent::Decrement(id) => self.mutate_cart(|cart| cart.decrement(id)).await,
            Intent::Remove(id) => self.mutate_cart(|cart| cart.remove(id)).await,
        }
    }

    /// Select a category and return its listing filtered by the current query.
    #[instrument(skip(self, category), fields(category = %category))]
    pub async fn select_category(&self, category: Category) -> Outcome {
        if !self.categories.contains(&category) {
            warn!("Unknown category requested");
            return Outcome::Unavailable(PRODUCTS_UNAVAILABLE.to_string());
        }

        let ticket = {
            let mut browse = self.lock_browse();
            browse.latest_ticket += 1;
            browse.state.category = category.clone();
            browse.latest_ticket
        };

        let result = self.cache.select(&category).await;

        let mut browse = self.lock_browse();
        if browse.latest_ticket != ticket {
            debug!(ticket, latest = browse.latest_ticket, "Discarding superseded category response");
            return Outcome::Stale;
        }

        match result {
            Ok(list) => {
                let listing = Listing {
                    category,
                    query: browse.state.query.clone(),
                    products: search::filter(&list, &browse.state.query).into_owned(),
                };
                browse.base = Some(list);
                Outcome::Listing(listing)
            }
            Err(e) => {
                warn!(error = %e, "Failed to load category");
                // The old base belongs to another category; the next search refetches
                browse.base = None;
                Outcome::Unavailable(PRODUCTS_UNAVAILABLE.to_string())
            }
        }
    }

    /// Change the search text and re-filter the current base.
    #[instrument(skip(self))]
    pub async fn search(&self, query: String) -> Outcome {
        let (category, base) = {
            let mut browse = self.lock_browse();
            browse.state.query = query;
            (browse.state.category.clone(), browse.base.clone())
        };

        // Missing before the first category load or after a failed one
        let base = match base {
            Some(base) => base,
            None => match self.cache.select(&category).await {
                Ok(list) => {
                    let mut browse = self.lock_browse();
                    if browse.state.category == category && browse.base.is_none() {
                        browse.base = Some(Arc::clone(&list));
                    }
                    list
                }
                Err(e) => {
                    warn!(error = %e, "Failed to load category for search");
                    return Outcome::Unavailable(PRODUCTS_UNAVAILABLE.to_string());
                }
            },
        };

        let query = self.lock_browse().state.query.clone();
        Outcome::Listing(Listing {
            category,
            products: search::filter(&base, &query).into_owned(),
            query,
        })
    }

    /// Re-derive the listing for the current category and query.
    pub async fn listing(&self) -> Outcome {
        let category = self.lock_browse().state.category.clone();
        self.select_category(category).await
    }

    /// Fetch a single product.
    #[instrument(skip(self))]
    pub async fn show_details(&self, id: ProductId) -> Outcome {
        match self.cache.product(id).await {
            Ok(product) => Outcome::Details(product),
            Err(e) => {
                warn!(error = %e, "Failed to load product details");
                Outcome::Unavailable(DETAILS_UNAVAILABLE.to_string())
            }
        }
    }

    /// Current cart contents joined against the full catalog.
    pub async fn cart_summary(&self) -> CartSummary {
        let catalog = self.full_catalog().await;
        self.summarize(&catalog, LineChange::Unchanged)
    }

    /// The first `count` products of the full catalog.
    pub async fn trending(&self, count: usize) -> Vec<Product> {
        self.full_catalog().await.iter().take(count).cloned().collect()
    }

    /// Snapshot of what the visitor selected and typed.
    pub fn browse_state(&self) -> BrowseState {
        self.lock_browse().state.clone()
    }

    pub const fn categories(&self) -> &CategoryIndex {
        &self.categories
    }

    pub fn item_count(&self) -> u32 {
        self.lock_cart().item_count()
    }

    async fn mutate_cart(&self, mutate: impl FnOnce(&mut CartStore<P>) -> LineChange) -> Outcome {
        let catalog = self.full_catalog().await;
        let change = mutate(&mut self.lock_cart());
        Outcome::Cart(self.summarize(&catalog, change))
    }

    fn summarize(&self, catalog: &[Product], change: LineChange) -> CartSummary {
        let cart = self.lock_cart();
        let entries = cart
            .lines()
            .iter()
            .map(|line| CartEntry {
                line: *line,
                product: catalog.iter().find(|p| p.id == line.product_id).cloned(),
            })
            .collect();

        CartSummary {
            entries,
            totals: cart.totals(catalog),
            change,
        }
    }

    /// The `"all"` entry, or an empty list before the startup load completes.
    async fn full_catalog(&self) -> ProductList {
        self.cache
            .all_products()
            .await
            .unwrap_or_else(|| Arc::from(Vec::new()))
    }

    fn lock_cart(&self) -> MutexGuard<'_, CartStore<P>> {
        self.cart.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_browse(&self) -> MutexGuard<'_, Browse> {
        self.browse.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Startup catalog load: seed the `"all"` entry and build the category index.
///
/// Failures are logged and leave the cache unseeded or the index holding
/// only `"all"`; the store stays usable either way.
#[instrument(skip(cache))]
pub async fn load_catalog<S: CatalogSource>(cache: &CatalogCache<S>) -> CategoryIndex {
    match cache.source().products().await {
        Ok(products) => {
            debug!(count = products.len(), "Loaded full catalog");
            cache.warm(Category::all(), products).await;
        }
        Err(e) => warn!(error = %e, "Failed to load full catalog at startup"),
    }

    match cache.load_categories().await {
        Ok(index) => index,
        Err(e) => {
            warn!(error = %e, "Failed to load categories at startup");
            CategoryIndex::only_all()
        }
    }
}
