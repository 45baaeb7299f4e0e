//! Payment processing seam.
//!
//! Orchestration only ever talks to the [`PaymentGateway`] trait; the
//! bundled [`simulator::PaymentSimulator`] is one implementation, and a
//! real acquirer integration can replace it without touching checkout.

pub mod simulator;

use serde::Serialize;
use thiserror::Error;

use bazario_core::{Money, PaymentMethod, TransactionId};

use crate::checkout::form::CheckoutForm;

pub use simulator::PaymentSimulator;

/// Method-specific payment details collected at checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentRequest {
    Card {
        number: String,
        holder: String,
        expiry: String,
        cvv: String,
    },
    Bank {
        account_number: String,
        routing_number: String,
    },
    Wallet {
        number: String,
        pin: String,
    },
    Cash,
}

impl PaymentRequest {
    /// Build the method-specific payload from the checkout form.
    #[must_use]
    pub fn from_form(form: &CheckoutForm) -> Self {
        match form.payment_method {
            PaymentMethod::Card => Self::Card {
                number: form.card.number.clone(),
                holder: form.card.holder.clone(),
                expiry: form.card.expiry.clone(),
                cvv: form.card.cvv.clone(),
            },
            PaymentMethod::Bank => Self::Bank {
                account_number: form.bank.account_number.clone(),
                routing_number: form.bank.routing_number.clone(),
            },
            PaymentMethod::Wallet => Self::Wallet {
                number: form.wallet.number.clone(),
                pin: form.wallet.pin.clone(),
            },
            PaymentMethod::Cash => Self::Cash,
        }
    }

    /// The method this request pays with.
    #[must_use]
    pub const fn method(&self) -> PaymentMethod {
        match self {
            Self::Card { .. } => PaymentMethod::Card,
            Self::Bank { .. } => PaymentMethod::Bank,
            Self::Wallet { .. } => PaymentMethod::Wallet,
            Self::Cash => PaymentMethod::Cash,
        }
    }
}

/// A successful authorization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentReceipt {
    pub transaction_id: TransactionId,
    pub message: String,
    pub amount: Money,
}

/// A declined or failed payment, with a shopper-readable reason.
///
/// Failures are not retriable within a submission; the shopper resubmits.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PaymentError {
    #[error("Invalid card number")]
    InvalidCardNumber,
    #[error("Card declined by issuer")]
    CardDeclined,
    #[error("Payment could not be processed, please try again")]
    ProcessingError,
    #[error("Invalid bank account number")]
    InvalidAccountNumber,
    #[error("Invalid routing number")]
    InvalidRoutingNumber,
    #[error("Bank transfer could not be completed")]
    TransferFailed,
    #[error("Wallet payment was rejected")]
    WalletRejected,
}

/// Single entry point for payment authorization.
pub trait PaymentGateway {
    /// Validate and authorize a payment for the given amount.
    ///
    /// # Errors
    ///
    /// Returns a [`PaymentError`] naming the reason the payment was
    /// declined; the orchestrator blocks submission on any failure.
    fn process(
        &self,
        request: &PaymentRequest,
        amount: Money,
    ) -> Result<PaymentReceipt, PaymentError>;
}
