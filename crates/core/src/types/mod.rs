//! Core types for Marketstall.
//!
//! This module provides type-safe wrappers for the catalog and cart domain.

pub mod cart;
pub mod category;
pub mod id;
pub mod price;
pub mod product;

pub use cart::CartLine;
pub use category::{Category, CategoryIndex};
pub use id::*;
pub use price::{CurrencyCode, Price, PriceError};
pub use product::{Product, Rating};
