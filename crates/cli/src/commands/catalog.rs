//! Catalog browsing commands.

#![allow(clippy::print_stdout)]

use marketstall_core::{Category, ProductId};
use marketstall_storefront::shop::{Intent, Outcome};
use marketstall_storefront::views::{ProductCard, ProductDetail};

use super::{CliError, CliShop};

/// Print every category, `all` first.
pub fn categories(shop: &CliShop) {
    for category in shop.categories().iter() {
        println!("{category}");
    }
}

/// Print products in `category` (default `all`) matching `search`.
pub async fn products(
    shop: &CliShop,
    category: Option<Category>,
    search: Option<String>,
) -> Result<(), CliError> {
    let mut outcome = shop
        .dispatch(Intent::SelectCategory(category.unwrap_or_default()))
        .await;
    if let Some(query) = search.filter(|_| matches!(outcome, Outcome::Listing(_))) {
        outcome = shop.dispatch(Intent::Search(query)).await;
    }

    match outcome {
        Outcome::Listing(listing) => {
            if listing.products.is_empty() {
                println!("No products match.");
            }
            for product in &listing.products {
                println!("{}", format_card(&ProductCard::from(product)));
            }
            Ok(())
        }
        Outcome::Unavailable(text) => Err(CliError::Unavailable(text)),
        other => Err(CliError::Unexpected(format!("{other:?}"))),
    }
}

/// Print one product's details.
pub async fn show(shop: &CliShop, id: ProductId) -> Result<(), CliError> {
    match shop.dispatch(Intent::ShowDetails(id)).await {
        Outcome::Details(product) => {
            print!("{}", format_detail(&ProductDetail::from(&product)));
            Ok(())
        }
        Outcome::Unavailable(text) => Err(CliError::Unavailable(text)),
        other => Err(CliError::Unexpected(format!("{other:?}"))),
    }
}

/// One grid line: id, title, price, stars and category.
pub fn format_card(card: &ProductCard) -> String {
    format!(
        "{:>4}  {:<49}  {:>9}  {}  [{}]",
        card.id, card.title, card.price, card.stars, card.category
    )
}

pub fn format_detail(detail: &ProductDetail) -> String {
    let mut out = format!(
        "{} (#{})\nCategory: {}\nPrice:    {}\nRating:   {} ({} reviews)\n",
        detail.title, detail.id, detail.category, detail.price, detail.rate, detail.rating_count
    );
    if !detail.description.is_empty() {
        out.push('\n');
        out.push_str(&detail.description);
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use marketstall_core::{Price, Product, Rating};

    use super::*;

    fn product() -> Product {
        Product::new(ProductId::new(9), "Portable Drive", Price::from_cents(6400), "electronics")
            .with_rating(Rating { rate: 3.3, count: 203 })
    }

    #[test]
    fn test_format_card() {
        let line = format_card(&ProductCard::from(&product()));
        assert!(line.starts_with("   9  Portable Drive"));
        assert!(line.contains("$64.00"));
        assert!(line.contains("★★★☆☆"));
        assert!(line.ends_with("[electronics]"));
    }

    #[test]
    fn test_format_detail() {
        let text = format_detail(&ProductDetail::from(&product()));
        assert!(text.starts_with("Portable Drive (#9)\n"));
        assert!(text.contains("Rating:   3.3 (203 reviews)"));
    }
}
