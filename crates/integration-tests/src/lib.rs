//! Integration test support for Marketstall.
//!
//! [`FakeCatalog`] serves the catalog API shape on an ephemeral local port
//! and records every request path, so tests can drive the real
//! [`CatalogClient`](marketstall_storefront::catalog::CatalogClient), the
//! shop and the storefront router over HTTP and count upstream calls.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p marketstall-integration-tests
//! ```

use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use axum::{
    Json, Router,
    extract::{Path, Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
};
use marketstall_storefront::config::{CatalogConfig, StorefrontConfig};
use marketstall_storefront::routes;
use marketstall_storefront::state::AppState;
use serde_json::{Value, json};
use tokio::net::TcpListener;

/// Products served by [`FakeCatalog::start`], in catalog order.
#[must_use]
pub fn sample_products() -> Vec<Value> {
    vec![
        json!({
            "id": 1,
            "title": "Fjallraven - Foldsack No. 1 Backpack, Fits 15 Laptops",
            "price": 109.95,
            "description": "Your perfect pack for everyday use and walks in the forest.",
            "category": "men's clothing",
            "image": "https://fakestoreapi.com/img/81fPKd-2AYL._AC_SL1500_.jpg",
            "rating": { "rate": 3.9, "count": 120 }
        }),
        json!({
            "id": 2,
            "title": "Mens Casual Premium Slim Fit T-Shirts ",
            "price": 22.3,
            "description": "Slim-fitting style, contrast raglan long sleeve.",
            "category": "men's clothing",
            "image": "https://fakestoreapi.com/img/71-3HjGNDUL._AC_SY879._SX._UX._SY._UY_.jpg",
            "rating": { "rate": 4.1, "count": 259 }
        }),
        json!({
            "id": 5,
            "title": "Dragon Station Chain Bracelet",
            "price": 695,
            "description": "From our Legends Collection, inspired by the mythical water dragon.",
            "category": "jewelery",
            "image": "https://fakestoreapi.com/img/71pWzhdJNwL._AC_UL640_QL65_ML3_.jpg",
            "rating": { "rate": 4.6, "count": 400 }
        }),
        json!({
            "id": 9,
            "title": "WD 2TB Elements Portable External Hard Drive - USB 3.0 ",
            "price": 64,
            "description": "USB 3.0 and USB 2.0 compatibility. Fast data transfers.",
            "category": "electronics",
            "image": "https://fakestoreapi.com/img/61IBBVJvSDL._AC_SY879_.jpg"
        }),
    ]
}

#[derive(Default)]
struct FakeState {
    products: Vec<Value>,
    hits: Mutex<Vec<String>>,
    failing: AtomicBool,
}

/// A catalog API running on `127.0.0.1` for the lifetime of the test.
pub struct FakeCatalog {
    addr: SocketAddr,
    state: Arc<FakeState>,
}

impl FakeCatalog {
    /// Serve [`sample_products`].
    pub async fn start() -> Self {
        Self::with_products(sample_products()).await
    }

    /// Serve the given product documents.
    ///
    /// # Panics
    ///
    /// Panics if no local port can be bound.
    pub async fn with_products(products: Vec<Value>) -> Self {
        let state = Arc::new(FakeState {
            products,
            ..FakeState::default()
        });

        let app = Router::new()
            .route("/products", get(all_products))
            .route("/products/categories", get(categories))
            .route("/products/category/{name}", get(products_in_category))
            .route("/products/{id}", get(product))
            .layer(middleware::from_fn_with_state(Arc::clone(&state), record))
            .with_state(Arc::clone(&state));

        let addr = serve(app).await;
        Self { addr, state }
    }

    #[must_use]
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Number of requests whose path starts with `prefix`.
    #[must_use]
    pub fn hits(&self, prefix: &str) -> usize {
        self.lock_hits().iter().filter(|p| p.starts_with(prefix)).count()
    }

    /// Number of requests for exactly `path`.
    #[must_use]
    pub fn hits_exact(&self, path: &str) -> usize {
        self.lock_hits().iter().filter(|p| *p == path).count()
    }

    /// Answer every subsequent request with 503.
    pub fn set_failing(&self, failing: bool) {
        self.state.failing.store(failing, Ordering::SeqCst);
    }

    #[must_use]
    pub fn catalog_config(&self) -> CatalogConfig {
        CatalogConfig {
            base_url: self.base_url(),
            timeout: Duration::from_secs(5),
        }
    }

    /// Storefront configuration pointing at this catalog, bound to an
    /// ephemeral port.
    ///
    /// # Panics
    ///
    /// Panics if the generated configuration is rejected.
    #[must_use]
    pub fn storefront_config(&self) -> StorefrontConfig {
        let base_url = self.base_url();
        StorefrontConfig::from_lookup(|key| match key {
            "CATALOG_API_URL" => Some(base_url.clone()),
            "STOREFRONT_PORT" => Some("0".to_string()),
            _ => None,
        })
        .expect("valid storefront config")
    }

    fn lock_hits(&self) -> std::sync::MutexGuard<'_, Vec<String>> {
        self.state.hits.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Boot the storefront against `catalog` and return its base URL.
///
/// # Panics
///
/// Panics if the storefront cannot start.
pub async fn start_storefront(catalog: &FakeCatalog) -> String {
    let state = AppState::bootstrap(catalog.storefront_config())
        .await
        .expect("storefront state");
    let addr = serve(routes::app(state)).await;
    format!("http://{addr}")
}

/// HTTP client that keeps session cookies and does not follow redirects.
///
/// # Panics
///
/// Panics if the client cannot be built.
#[must_use]
pub fn browser() -> reqwest::Client {
    reqwest::Client::builder()
        .cookie_store(true)
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .expect("Failed to create HTTP client")
}

async fn serve(app: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local address");
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    addr
}

async fn record(State(state): State<Arc<FakeState>>, request: Request, next: Next) -> Response {
    state
        .hits
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .push(request.uri().path().to_string());

    if state.failing.load(Ordering::SeqCst) {
        return (StatusCode::SERVICE_UNAVAILABLE, "catalog down").into_response();
    }
    next.run(request).await
}

async fn all_products(State(state): State<Arc<FakeState>>) -> Json<Vec<Value>> {
    Json(state.products.clone())
}

async fn products_in_category(
    State(state): State<Arc<FakeState>>,
    Path(name): Path<String>,
) -> Json<Vec<Value>> {
    Json(
        state
            .products
            .iter()
            .filter(|p| p.get("category").and_then(Value::as_str) == Some(name.as_str()))
            .cloned()
            .collect(),
    )
}

async fn categories(State(state): State<Arc<FakeState>>) -> Json<Vec<String>> {
    let mut names: Vec<String> = state
        .products
        .iter()
        .filter_map(|p| p.get("category").and_then(Value::as_str).map(String::from))
        .collect();
    names.sort();
    names.dedup();
    Json(names)
}

async fn product(State(state): State<Arc<FakeState>>, Path(id): Path<i64>) -> Response {
    state
        .products
        .iter()
        .find(|p| p.get("id").and_then(Value::as_i64) == Some(id))
        .map_or_else(
            || StatusCode::NOT_FOUND.into_response(),
            |p| Json(p.clone()).into_response(),
        )
}
