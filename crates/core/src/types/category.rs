//! Category labels and the startup category index.

use std::borrow::Borrow;

use serde::{Deserialize, Serialize};

/// Name of the synthetic category that means "no filter".
pub const ALL_CATEGORIES: &str = "all";

/// A text label partitioning the product catalog.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Category(String);

impl Category {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The synthetic `"all"` category.
    #[must_use]
    pub fn all() -> Self {
        Self(ALL_CATEGORIES.to_string())
    }

    #[must_use]
    pub fn is_all(&self) -> bool {
        self.0 == ALL_CATEGORIES
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Category {
    fn default() -> Self {
        Self::all()
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Category {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl From<String> for Category {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl Borrow<str> for Category {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Ordered list of known categories, `"all"` first.
///
/// Built once at startup from the catalog source and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryIndex {
    categories: Vec<Category>,
}

impl CategoryIndex {
    /// Build the index from the catalog's category list.
    ///
    /// `"all"` is placed first; duplicates (including a literal `"all"` from
    /// the source) are dropped while keeping the source order.
    #[must_use]
    pub fn new(fetched: impl IntoIterator<Item = Category>) -> Self {
        let mut categories = vec![Category::all()];
        for category in fetched {
            if !categories.contains(&category) {
                categories.push(category);
            }
        }
        Self { categories }
    }

    /// An index containing only `"all"`.
    #[must_use]
    pub fn only_all() -> Self {
        Self::new(std::iter::empty())
    }

    #[must_use]
    pub fn contains(&self, category: &Category) -> bool {
        self.categories.contains(category)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Category> {
        self.categories.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.categories.len()
    }

    /// Always false: `"all"` is a member of every index.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        false
    }
}

impl Default for CategoryIndex {
    fn default() -> Self {
        Self::only_all()
    }
}
