//! Checkout wizard and order submission.
//!
//! A four-step wizard (customer info, address, payment, review) over an
//! in-memory [`form::CheckoutForm`]. Advancing validates the current step;
//! going back never does. Submission happens from the review step and is
//! driven by [`orchestrator::Checkout`].

pub mod buy_now;
pub mod form;
pub mod orchestrator;
pub mod validate;

pub use buy_now::BuyNowStore;
pub use form::CheckoutForm;
pub use orchestrator::{Checkout, CheckoutStep, OrderSubmission, OrderTotals};
pub use validate::ValidationErrors;
