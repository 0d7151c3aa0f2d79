//! Catalog product types.
//!
//! Products are fetched once from the catalog source and never mutated
//! afterwards. The JSON shape matches the catalog API:
//!
//! ```json
//! {
//!   "id": 1,
//!   "title": "Blue Shirt",
//!   "price": 19.99,
//!   "description": "...",
//!   "category": "men's clothing",
//!   "image": "https://...",
//!   "rating": { "rate": 3.9, "count": 120 }
//! }
//! ```

use serde::{Deserialize, Serialize};

use super::{Category, Price, ProductId};

/// Average review score and number of reviews.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rating {
    /// Average score in `[0, 5]`.
    #[serde(default)]
    pub rate: f64,
    /// Number of reviews.
    #[serde(default)]
    pub count: u32,
}

impl Rating {
    /// Score rounded to the nearest whole star, clamped to `0..=5`.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn whole_stars(&self) -> u8 {
        self.rate.clamp(0.0, 5.0).round() as u8
    }
}

/// A catalog product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    pub price: Price,
    pub category: Category,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    rating: Option<Rating>,
}

impl Product {
    /// Create a product with no rating data.
    #[must_use]
    pub fn new(
        id: ProductId,
        title: impl Into<String>,
        price: Price,
        category: impl Into<Category>,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            price,
            category: category.into(),
            image: String::new(),
            description: String::new(),
            rating: None,
        }
    }

    /// Attach rating data.
    #[must_use]
    pub const fn with_rating(mut self, rating: Rating) -> Self {
        self.rating = Some(rating);
        self
    }

    /// Rating data, or a zero score with zero reviews when the catalog sent none.
    #[must_use]
    pub fn rating(&self) -> Rating {
        self.rating.unwrap_or_default()
    }

    /// Whether the catalog supplied rating data.
    #[must_use]
    pub const fn has_rating(&self) -> bool {
        self.rating.is_some()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_product_deserializes_catalog_shape() {
        let json = r#"{
            "id": 1,
            "title": "Blue Shirt",
            "price": 19.99,
            "description": "Cotton",
            "category": "men's clothing",
            "image": "https://img.example/1.png",
            "rating": { "rate": 3.9, "count": 120 }
        }"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.id, ProductId::new(1));
        assert_eq!(product.price, Price::from_cents(1999));
        assert_eq!(product.category.as_str(), "men's clothing");
        assert_eq!(product.rating().count, 120);
        assert_eq!(product.rating().whole_stars(), 4);
    }

    #[test]
    fn test_missing_rating_defaults_to_zero() {
        let json = r#"{"id": 2, "title": "Red Hat", "price": 5, "category": "men"}"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert!(!product.has_rating());
        assert_eq!(product.rating(), Rating::default());
        assert_eq!(product.rating().whole_stars(), 0);
    }

    #[test]
    fn test_whole_stars_clamped() {
        let rating = Rating {
            rate: 7.2,
            count: 1,
        };
        assert_eq!(rating.whole_stars(), 5);
    }
}
