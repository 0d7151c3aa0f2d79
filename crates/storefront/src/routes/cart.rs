//! Cart route handlers.
//!
//! Cart mutations redirect back to the cart page, or return the updated
//! count badge when requested by HTMX.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::HeaderMap,
    response::{AppendHeaders, IntoResponse, Redirect, Response},
};
use marketstall_core::ProductId;
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::filters;
use crate::models::VisitorSession;
use crate::shop::{Intent, Outcome};
use crate::state::AppState;
use crate::views::{self, CartView, CategoryLink};

/// Cart mutation form data.
#[derive(Debug, Deserialize)]
pub struct CartForm {
    pub id: ProductId,
}

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart.html")]
pub struct CartShowTemplate {
    pub categories: Vec<CategoryLink>,
    pub cart: CartView,
    pub cart_count: u32,
}

/// Cart count badge fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: u32,
}

/// Display cart page.
#[instrument(skip(state, session))]
pub async fn show(State(state): State<AppState>, session: Session) -> CartShowTemplate {
    let visitor = VisitorSession::load(&session).await;
    let shop = state.shop(&visitor);
    let summary = shop.cart_summary().await;

    CartShowTemplate {
        categories: views::category_links(shop.categories().iter(), &shop.browse_state().category),
        cart: CartView::from(&summary),
        cart_count: summary.totals.item_count,
    }
}

/// Cart count badge (HTMX).
#[instrument(skip(state, session))]
pub async fn count(State(state): State<AppState>, session: Session) -> CartCountTemplate {
    let visitor = VisitorSession::load(&session).await;
    CartCountTemplate {
        count: state.shop(&visitor).item_count(),
    }
}

/// Add one of a product to the cart.
#[instrument(skip(state, session, headers))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    Form(form): Form<CartForm>,
) -> Result<Response> {
    apply(&state, &session, &headers, Intent::AddToCart(form.id)).await
}

/// Raise a line's quantity by one.
#[instrument(skip(state, session, headers))]
pub async fn increment(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    Form(form): Form<CartForm>,
) -> Result<Response> {
    apply(&state, &session, &headers, Intent::Increment(form.id)).await
}

/// Lower a line's quantity by one, removing it at zero.
#[instrument(skip(state, session, headers))]
pub async fn decrement(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    Form(form): Form<CartForm>,
) -> Result<Response> {
    apply(&state, &session, &headers, Intent::Decrement(form.id)).await
}

/// Remove a line.
#[instrument(skip(state, session, headers))]
pub async fn remove(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    Form(form): Form<CartForm>,
) -> Result<Response> {
    apply(&state, &session, &headers, Intent::Remove(form.id)).await
}

async fn apply(
    state: &AppState,
    session: &Session,
    headers: &HeaderMap,
    intent: Intent,
) -> Result<Response> {
    let visitor = VisitorSession::load(session).await;
    let shop = state.shop(&visitor);

    let summary = match shop.dispatch(intent).await {
        Outcome::Cart(summary) => summary,
        other => {
            return Err(AppError::Internal(format!(
                "unexpected cart outcome: {other:?}"
            )));
        }
    };
    if summary.change.is_change() {
        visitor.save(session, &shop.browse_state()).await?;
    }

    if headers.contains_key("HX-Request") {
        Ok((
            AppendHeaders([("HX-Trigger", "cart-updated")]),
            CartCountTemplate {
                count: summary.totals.item_count,
            },
        )
            .into_response())
    } else {
        Ok(Redirect::to("/cart").into_response())
    }
}
