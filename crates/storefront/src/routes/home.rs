//! Product grid handlers: home, category selection and search.
//!
//! All three render the same page. Category and search text are remembered
//! in the session, so each narrows the other.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Path, Query, State};
use marketstall_core::Category;
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::filters;
use crate::models::VisitorSession;
use crate::shop::{Intent, Outcome};
use crate::state::{AppState, SessionShop};
use crate::views::{self, CategoryLink, ProductCard};

/// Search query parameters.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub categories: Vec<CategoryLink>,
    pub query: String,
    pub products: Vec<ProductCard>,
    /// Fallback text shown in place of the grid.
    pub notice: Option<String>,
    pub trending: Vec<ProductCard>,
    pub cart_count: u32,
}

/// Display the grid for the session's category and search text.
#[instrument(skip(state, session))]
pub async fn index(State(state): State<AppState>, session: Session) -> Result<IndexTemplate> {
    let visitor = VisitorSession::load(&session).await;
    let shop = state.shop(&visitor);
    let outcome = shop.listing().await;
    render(&shop, &visitor, &session, outcome).await
}

/// Select a category, keeping the search text.
#[instrument(skip(state, session))]
pub async fn category(
    State(state): State<AppState>,
    session: Session,
    Path(name): Path<String>,
) -> Result<IndexTemplate> {
    let visitor = VisitorSession::load(&session).await;
    let shop = state.shop(&visitor);
    let outcome = shop.dispatch(Intent::SelectCategory(Category::new(name))).await;
    render(&shop, &visitor, &session, outcome).await
}

/// Set the search text, keeping the category.
#[instrument(skip(state, session))]
pub async fn search(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<SearchQuery>,
) -> Result<IndexTemplate> {
    let visitor = VisitorSession::load(&session).await;
    let shop = state.shop(&visitor);
    let outcome = shop.dispatch(Intent::Search(query.q)).await;
    render(&shop, &visitor, &session, outcome).await
}

async fn render(
    shop: &SessionShop,
    visitor: &VisitorSession,
    session: &Session,
    outcome: Outcome,
) -> Result<IndexTemplate> {
    let browse = shop.browse_state();
    visitor.save(session, &browse).await?;

    let (products, notice) = match outcome {
        Outcome::Listing(listing) => (listing.products.iter().map(ProductCard::from).collect(), None),
        Outcome::Unavailable(text) => (Vec::new(), Some(text)),
        other => {
            return Err(AppError::Internal(format!(
                "unexpected listing outcome: {other:?}"
            )));
        }
    };

    Ok(IndexTemplate {
        categories: views::category_links(shop.categories().iter(), &browse.category),
        query: browse.query,
        products,
        notice,
        trending: views::trending(&shop.trending(views::TRENDING_COUNT).await),
        cart_count: shop.item_count(),
    })
}
