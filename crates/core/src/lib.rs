//! Marketstall Core - Shared domain types.
//!
//! This crate provides the types used across all Marketstall components:
//! - `storefront` - Catalog cache, cart store and the public web front end
//! - `cli` - Terminal front end driving the same engine
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients, no
//! persistence. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Product, category, price and cart line types

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
