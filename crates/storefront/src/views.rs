//! Display data for templates and the CLI.
//!
//! Views hold preformatted strings so templates stay free of formatting
//! logic.

use marketstall_core::{Category, Product};

use crate::shop::CartSummary;

/// Maximum title length on product cards.
pub const CARD_TITLE_CHARS: usize = 46;

/// Maximum title length on cart rows.
pub const CART_TITLE_CHARS: usize = 30;

/// Number of products in the trending strip.
pub const TRENDING_COUNT: usize = 3;

/// Text shown for a cart with no lines.
pub const EMPTY_CART_TEXT: &str = "Your cart is empty.";

const MAX_STARS: u8 = 5;

/// Product grid card.
#[derive(Debug, Clone)]
pub struct ProductCard {
    pub id: i32,
    /// Title truncated for the grid.
    pub title: String,
    pub full_title: String,
    pub price: String,
    pub category: String,
    pub image: String,
    pub stars: String,
    pub rate: String,
}

impl From<&Product> for ProductCard {
    fn from(product: &Product) -> Self {
        let rating = product.rating();
        Self {
            id: product.id.as_i32(),
            title: truncate(&product.title, CARD_TITLE_CHARS),
            full_title: product.title.clone(),
            price: product.price.display(),
            category: product.category.to_string(),
            image: product.image.clone(),
            stars: star_glyphs(rating.whole_stars()),
            rate: format!("{:.1}", rating.rate),
        }
    }
}

/// Product detail page data.
#[derive(Debug, Clone)]
pub struct ProductDetail {
    pub id: i32,
    pub title: String,
    pub category: String,
    pub rate: String,
    pub rating_count: u32,
    pub description: String,
    pub price: String,
    pub image: String,
}

impl From<&Product> for ProductDetail {
    fn from(product: &Product) -> Self {
        let rating = product.rating();
        Self {
            id: product.id.as_i32(),
            title: product.title.clone(),
            category: product.category.to_string(),
            rate: format!("{:.1}", rating.rate),
            rating_count: rating.count,
            description: product.description.clone(),
            price: product.price.display(),
            image: product.image.clone(),
        }
    }
}

/// One cart row.
#[derive(Debug, Clone)]
pub struct CartItemView {
    pub id: i32,
    pub title: String,
    pub unit_price: String,
    pub quantity: u32,
    pub line_total: String,
    pub image: String,
}

/// Cart page data.
#[derive(Debug, Clone)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub item_count: u32,
    pub total: String,
}

impl CartView {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub const fn empty_text(&self) -> &'static str {
        EMPTY_CART_TEXT
    }
}

impl From<&CartSummary> for CartView {
    fn from(summary: &CartSummary) -> Self {
        let items = summary
            .entries
            .iter()
            .map(|entry| {
                let id = entry.line.product_id;
                let quantity = entry.line.quantity;
                match &entry.product {
                    Some(product) => CartItemView {
                        id: id.as_i32(),
                        title: truncate(&product.title, CART_TITLE_CHARS),
                        unit_price: product.price.display(),
                        quantity,
                        line_total: product.price.times(quantity).display(),
                        image: product.image.clone(),
                    },
                    // Catalog not loaded yet; the line is still shown so it can be removed
                    None => CartItemView {
                        id: id.as_i32(),
                        title: format!("Product #{id}"),
                        unit_price: "-".to_string(),
                        quantity,
                        line_total: "-".to_string(),
                        image: String::new(),
                    },
                }
            })
            .collect();

        Self {
            items,
            item_count: summary.totals.item_count,
            total: summary.totals.amount_due.display(),
        }
    }
}

/// Category navigation link.
#[derive(Debug, Clone)]
pub struct CategoryLink {
    pub name: String,
    pub label: String,
    pub selected: bool,
}

/// Build navigation links, marking the selected category.
pub fn category_links<'a>(
    categories: impl IntoIterator<Item = &'a Category>,
    selected: &Category,
) -> Vec<CategoryLink> {
    categories
        .into_iter()
        .map(|category| CategoryLink {
            name: urlencoding::encode(category.as_str()).into_owned(),
            label: category.to_string(),
            selected: category == selected,
        })
        .collect()
}

/// Cards for the first [`TRENDING_COUNT`] products.
#[must_use]
pub fn trending(catalog: &[Product]) -> Vec<ProductCard> {
    catalog
        .iter()
        .take(TRENDING_COUNT)
        .map(ProductCard::from)
        .collect()
}

/// `★` for each whole star, `☆` for the rest of five.
#[must_use]
pub fn star_glyphs(whole: u8) -> String {
    let filled = whole.min(MAX_STARS);
    let mut stars = "★".repeat(usize::from(filled));
    stars.push_str(&"☆".repeat(usize::from(MAX_STARS - filled)));
    stars
}

/// Cut `text` to `max` characters, appending `...` when shortened.
#[must_use]
pub fn truncate(text: &str, max: usize) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(max).collect();
    if chars.next().is_some() {
        format!("{head}...")
    } else {
        head
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use marketstall_core::{CartLine, Price, ProductId, Rating};

    use super::*;
    use crate::cart::{CartTotals, LineChange};
    use crate::shop::CartEntry;

    fn product(title: &str, rate: f64) -> Product {
        Product::new(ProductId::new(7), title, Price::from_cents(1050), "electronics")
            .with_rating(Rating { rate, count: 12 })
    }

    #[test]
    fn test_star_glyphs() {
        assert_eq!(star_glyphs(0), "☆☆☆☆☆");
        assert_eq!(star_glyphs(4), "★★★★☆");
        assert_eq!(star_glyphs(9), "★★★★★");
    }

    #[test]
    fn test_truncate_counts_characters() {
        assert_eq!(truncate("short", 30), "short");
        assert_eq!(truncate("abcdef", 3), "abc...");
        assert_eq!(truncate("ééééé", 2), "éé...");
        assert_eq!(truncate("exact", 5), "exact");
    }

    #[test]
    fn test_product_card() {
        let title = "Mens Casual Premium Slim Fit T-Shirts with a very long name";
        let card = ProductCard::from(&product(title, 3.6));

        assert_eq!(card.title.chars().count(), CARD_TITLE_CHARS + 3);
        assert!(card.title.ends_with("..."));
        assert_eq!(card.full_title, title);
        assert_eq!(card.price, "$10.50");
        assert_eq!(card.stars, "★★★★☆");
        assert_eq!(card.rate, "3.6");
    }

    #[test]
    fn test_card_without_rating_shows_empty_stars() {
        let product = Product::new(ProductId::new(1), "Mug", Price::from_cents(800), "home");
        let card = ProductCard::from(&product);
        assert_eq!(card.stars, "☆☆☆☆☆");
        assert_eq!(card.rate, "0.0");
    }

    #[test]
    fn test_cart_view_rows_and_totals() {
        let summary = CartSummary {
            entries: vec![
                CartEntry {
                    line: CartLine::new(ProductId::new(7), 2),
                    product: Some(product("Wireless Noise Cancelling Headphones Pro", 4.0)),
                },
                CartEntry {
                    line: CartLine::new(ProductId::new(8), 1),
                    product: None,
                },
            ],
            totals: CartTotals {
                item_count: 3,
                amount_due: Price::from_cents(2100),
            },
            change: LineChange::Unchanged,
        };

        let view = CartView::from(&summary);

        let first = view.items.first().unwrap();
        assert_eq!(first.title, "Wireless Noise Cancelling Head...");
        assert_eq!(first.unit_price, "$10.50");
        assert_eq!(first.line_total, "$21.00");
        assert_eq!(view.items.get(1).unwrap().title, "Product #8");
        assert_eq!(view.item_count, 3);
        assert_eq!(view.total, "$21.00");
        assert!(!view.is_empty());
    }

    #[test]
    fn test_trending_takes_three() {
        let catalog: Vec<Product> = (1..=5)
            .map(|i| Product::new(ProductId::new(i), "Item", Price::from_cents(100), "misc"))
            .collect();
        let ids: Vec<i32> = trending(&catalog).iter().map(|c| c.id).collect();
        assert_eq!(ids, [1, 2, 3]);
    }

    #[test]
    fn test_category_links_mark_selection() {
        let categories = [Category::all(), Category::from("men's clothing")];
        let links = category_links(&categories, &Category::from("men's clothing"));

        assert!(!links.first().unwrap().selected);
        let second = links.get(1).unwrap();
        assert!(second.selected);
        assert_eq!(second.name, "men%27s%20clothing");
    }
}
