//! Core types for Shopfront.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod address;
pub mod cart;
pub mod id;
pub mod notification;
pub mod order;
pub mod price;
pub mod product;
pub mod status;

pub use address::{Address, AddressInput, DEFAULT_COUNTRY};
pub use cart::{CartLineItem, CartSnapshot};
pub use id::*;
pub use notification::{Notification, StoredNotification};
pub use order::{Order, OrderQuote};
pub use price::{CurrencyCode, Price, PriceError};
pub use product::{NewProduct, Product, ProductUpdate};
pub use status::*;
