//! Bazario Core - Shared domain types.
//!
//! This crate provides common types used across all Bazario components:
//! - `storefront` - The cart/checkout engine behind the shopper-facing site
//! - `cli` - Command-line driver for the engine
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients, no async.
//! This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, emails, phone numbers,
//!   money amounts, and order/payment classifications

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
