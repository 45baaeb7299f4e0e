//! Bazario storefront engine.
//!
//! The cart/checkout orchestration core behind the Bazario marketplace
//! storefront. Pages and presentation live elsewhere; this crate owns the
//! parts with actual behavior:
//!
//! - [`cart`] - cart state reconciled against the remote cart service, plus
//!   the pure fulfillment analyzer that decomposes a cart by vendor
//! - [`checkout`] - the four-step checkout wizard and order submission
//! - [`payment`] - the payment gateway seam and the simulated gateway
//! - [`stock`] - pure stock-availability checks
//! - [`api`] - REST clients for the cart, catalog, and order services
//! - [`services`] - session context and the notification sink
//!
//! The [`state::Storefront`] facade wires these together for callers.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod cart;
pub mod checkout;
pub mod config;
pub mod error;
pub mod payment;
pub mod services;
pub mod state;
pub mod stock;

pub use config::StorefrontConfig;
pub use error::{AppError, Result};
pub use state::Storefront;
