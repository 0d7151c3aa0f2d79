//! Marketstall storefront library.
//!
//! Catalog access and caching, search, the quantity-consolidating cart and
//! the [`shop::Shop`] that ties them together, plus the HTTP surface served
//! by the `marketstall-storefront` binary. The `stall` CLI reuses everything
//! except the routes.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod config;
pub mod error;
pub mod filters;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod search;
pub mod shop;
pub mod state;
pub mod views;
