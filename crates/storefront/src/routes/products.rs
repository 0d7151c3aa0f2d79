//! Product detail handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Path, State};
use marketstall_core::ProductId;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::filters;
use crate::models::VisitorSession;
use crate::shop::{Intent, Outcome};
use crate::state::AppState;
use crate::views::{self, CategoryLink, ProductDetail};

/// Product detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "product.html")]
pub struct ProductShowTemplate {
    pub categories: Vec<CategoryLink>,
    pub product: ProductDetail,
    pub cart_count: u32,
}

/// Display product detail page.
///
/// Details are always fetched fresh from the catalog.
#[instrument(skip(state, session))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<ProductId>,
) -> Result<ProductShowTemplate> {
    let visitor = VisitorSession::load(&session).await;
    let shop = state.shop(&visitor);

    match shop.dispatch(Intent::ShowDetails(id)).await {
        Outcome::Details(product) => Ok(ProductShowTemplate {
            categories: views::category_links(
                shop.categories().iter(),
                &shop.browse_state().category,
            ),
            product: ProductDetail::from(&product),
            cart_count: shop.item_count(),
        }),
        Outcome::Unavailable(text) => Err(AppError::Unavailable(text)),
        other => Err(AppError::Internal(format!(
            "unexpected details outcome: {other:?}"
        ))),
    }
}
