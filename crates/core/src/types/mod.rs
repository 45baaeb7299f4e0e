//! Core types for Bazario.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod money;
pub mod order_type;
pub mod phone;

pub use email::{Email, EmailError};
pub use id::*;
pub use money::{CurrencyCode, Money};
pub use order_type::{OrderType, PaymentMethod};
pub use phone::{Phone, PhoneError};
