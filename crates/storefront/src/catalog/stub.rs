//! In-memory catalog source for unit tests.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use marketstall_core::{Category, Price, Product, ProductId};
use tokio::sync::Notify;

use super::{CatalogError, CatalogSource};

/// Catalog source backed by a fixed product list that counts every call.
#[derive(Default)]
pub struct StubCatalog {
    products: Vec<Product>,
    list_calls: AtomicUsize,
    detail_calls: AtomicUsize,
    failing: AtomicBool,
    gates: Mutex<HashMap<Category, Arc<Notify>>>,
}

impl StubCatalog {
    pub fn new(products: Vec<Product>) -> Self {
        Self {
            products,
            ..Self::default()
        }
    }

    /// Three products across two categories.
    pub fn sample() -> Self {
        Self::new(vec![
            Product::new(ProductId::new(1), "Blue Shirt", Price::from_cents(1999), "men"),
            Product::new(ProductId::new(2), "Red Hat", Price::from_cents(500), "men"),
            Product::new(ProductId::new(3), "Silver Ring", Price::from_cents(12000), "jewelery"),
        ])
    }

    /// Number of list fetches (all products or one category) served.
    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn detail_calls(&self) -> usize {
        self.detail_calls.load(Ordering::SeqCst)
    }

    /// Make every subsequent call fail.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Hold fetches for `category` until the returned handle is notified.
    pub fn gate(&self, category: impl Into<Category>) -> Arc<Notify> {
        let notify = Arc::new(Notify::new());
        self.gates
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .insert(category.into(), Arc::clone(&notify));
        notify
    }

    fn check(&self) -> Result<(), CatalogError> {
        if self.failing.load(Ordering::SeqCst) {
            Err(CatalogError::status(
                reqwest::StatusCode::SERVICE_UNAVAILABLE,
                "/stub",
            ))
        } else {
            Ok(())
        }
    }
}

impl CatalogSource for StubCatalog {
    async fn products(&self) -> Result<Vec<Product>, CatalogError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        Ok(self.products.clone())
    }

    async fn products_in_category(&self, category: &Category) -> Result<Vec<Product>, CatalogError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        let gate = self
            .gates
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .get(category)
            .cloned();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        self.check()?;
        Ok(self
            .products
            .iter()
            .filter(|p| &p.category == category)
            .cloned()
            .collect())
    }

    async fn categories(&self) -> Result<Vec<Category>, CatalogError> {
        self.check()?;
        let mut categories: Vec<Category> = Vec::new();
        for product in &self.products {
            if !categories.contains(&product.category) {
                categories.push(product.category.clone());
            }
        }
        Ok(categories)
    }

    async fn product(&self, id: ProductId) -> Result<Product, CatalogError> {
        self.detail_calls.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        self.products
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or_else(|| CatalogError::status(reqwest::StatusCode::NOT_FOUND, format!("/products/{id}")))
    }
}
