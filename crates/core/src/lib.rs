//! Shopfront Core - Shared types library.
//!
//! This crate provides common types used across all Shopfront components:
//! - `cart` - Cart store, persistence, notifications, catalog and checkout
//! - `cli` - Command-line front-end driving the cart
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no storage access, no async
//! runtime. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs and prices, plus product, cart,
//!   notification, order and shipping address records

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
