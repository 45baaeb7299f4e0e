//! The in-memory checkout form.
//!
//! Fields hold raw user input as strings; typed parsing (email, phone)
//! happens in [`validate`](super::validate). The form lives only for the
//! duration of the wizard and is discarded after submission or navigation
//! away.

use serde::Serialize;

use bazario_core::PaymentMethod;

use crate::services::Session;

/// Contact details collected on the first step.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomerInfo {
    pub name: String,
    pub email: String,
    pub phone: String,
}

/// Shipping address collected on the second step.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingAddress {
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub country: String,
}

/// Card fields (collected but currently disabled at checkout).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CardFields {
    pub number: String,
    pub holder: String,
    pub expiry: String,
    pub cvv: String,
}

/// Bank transfer fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BankFields {
    pub account_number: String,
    pub routing_number: String,
}

/// Mobile wallet fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WalletFields {
    pub number: String,
    pub pin: String,
}

/// Everything the wizard collects across its four steps.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckoutForm {
    pub customer: CustomerInfo,
    pub address: ShippingAddress,
    pub payment_method: PaymentMethod,
    pub card: CardFields,
    pub bank: BankFields,
    pub wallet: WalletFields,
}

impl CheckoutForm {
    /// A form pre-filled from the signed-in shopper's profile, where the
    /// profile has the data.
    #[must_use]
    pub fn prefilled(session: &Session) -> Self {
        let mut form = Self::default();

        if let Some(user) = session.user() {
            form.customer.name = user.name.unwrap_or_default();
            form.customer.email = user.email.to_string();
            form.customer.phone = user.phone.map(|p| p.to_string()).unwrap_or_default();

            if let Some(address) = user.address {
                form.address = ShippingAddress {
                    street: address.street,
                    city: address.city,
                    state: address.state,
                    zip: address.zip,
                    country: address.country,
                };
            }
        }

        form
    }
}
