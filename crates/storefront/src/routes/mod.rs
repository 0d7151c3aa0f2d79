//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Health check
//! GET  /                       - Product grid for the session's category and search
//! GET  /category/{name}        - Select category (keeps search text)
//! GET  /search?q=              - Set search text (keeps category)
//! GET  /products/{id}          - Product detail
//!
//! # Cart (form posts, HTMX aware)
//! GET  /cart                   - Cart page
//! GET  /cart/count             - Cart count badge (fragment)
//! POST /cart/add               - Add one (id=)
//! POST /cart/increment         - Quantity +1 (id=)
//! POST /cart/decrement         - Quantity -1, removes at zero (id=)
//! POST /cart/remove            - Remove line (id=)
//! ```

pub mod cart;
pub mod home;
pub mod products;

use axum::{
    Router,
    routing::{get, post},
};

use tower_http::services::ServeDir;

use crate::middleware;
use crate::state::AppState;

/// Static assets shipped with the crate.
const STATIC_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/static");

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/count", get(cart::count))
        .route("/add", post(cart::add))
        .route("/increment", post(cart::increment))
        .route("/decrement", post(cart::decrement))
        .route("/remove", post(cart::remove))
}

/// Create all page routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::index))
        .route("/category/{name}", get(home::category))
        .route("/search", get(home::search))
        .route("/products/{id}", get(products::show))
        .nest("/cart", cart_routes())
}

/// Assemble the application: routes, sessions and request IDs.
///
/// Tracing and Sentry layers are added by the binary.
pub fn app(state: AppState) -> Router {
    let session_layer = middleware::create_session_layer(state.config());

    Router::new()
        .route("/health", get(health))
        .merge(routes())
        .nest_service("/static", ServeDir::new(STATIC_DIR))
        .layer(session_layer)
        .layer(axum::middleware::from_fn(middleware::request_id_middleware))
        .with_state(state)
}

/// Liveness health check endpoint.
async fn health() -> &'static str {
    "ok"
}
