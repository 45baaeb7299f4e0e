//! Unified error handling for the storefront engine.
//!
//! Provides a single `AppError` covering every failure the cart and
//! checkout flows can surface. Nothing here is fatal to the process; each
//! variant is recoverable by user retry.

use thiserror::Error;

use crate::api::ApiError;
use crate::checkout::validate::ValidationErrors;

/// Application-level error type for the storefront engine.
#[derive(Debug, Error)]
pub enum AppError {
    /// A cart mutation was attempted without an active session.
    #[error("Please sign in to manage your cart")]
    AuthenticationRequired,

    /// Step-level form validation failed. Recovered locally: blocks the
    /// step advance and is rendered inline, field by field.
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    /// Requested quantity exceeds available stock. Carries the backend's
    /// message verbatim when the rejection came from the server.
    #[error("{0}")]
    StockExceeded(String),

    /// The payment gateway declined the payment. No order is created.
    #[error("Payment declined: {0}")]
    PaymentDeclined(String),

    /// The order service rejected the submission or the call failed.
    /// The cart is left intact for retry.
    #[error("Order submission failed: {0}")]
    SubmissionFailed(String),

    /// Transport-level failure talking to the backend.
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

impl AppError {
    /// Whether the error should abort the current operation without
    /// touching cart state (as opposed to being rendered inline).
    #[must_use]
    pub const fn aborts_operation(&self) -> bool {
        !matches!(self, Self::Validation(_))
    }
}
