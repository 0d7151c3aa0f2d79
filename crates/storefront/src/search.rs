//! Title search over an already selected product list.
//!
//! Matching is a case-insensitive substring test on the product title using
//! simple Unicode lowercase folding. There is no tokenization or ranking: the
//! result keeps the input order.

use std::borrow::Cow;

use marketstall_core::Product;

/// Lazily yield the products whose title contains `query`, in input order.
///
/// A blank query matches every product.
pub fn matching<'a>(products: &'a [Product], query: &str) -> impl Iterator<Item = &'a Product> {
    let needle = query.trim().to_lowercase();
    products
        .iter()
        .filter(move |product| needle.is_empty() || product.title.to_lowercase().contains(&needle))
}

/// Filter `products` by `query`.
///
/// An empty or whitespace-only query returns the input unchanged (borrowed);
/// anything else returns the matching subsequence.
pub fn filter<'a>(products: &'a [Product], query: &str) -> Cow<'a, [Product]> {
    if query.trim().is_empty() {
        return Cow::Borrowed(products);
    }
    Cow::Owned(matching(products, query).cloned().collect())
}
