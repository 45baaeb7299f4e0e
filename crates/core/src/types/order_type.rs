//! Classification enums for orders and payments.

use serde::{Deserialize, Serialize};

/// Fulfillment classification of a cart, derived by the cart analyzer.
///
/// `AdminOnly` covers carts fulfilled entirely by the marketplace operator
/// (including the all-platform case); `Mixed` covers carts spanning the
/// platform and at least one vendor, or two or more distinct vendors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderType {
    #[default]
    Empty,
    AdminOnly,
    VendorOnly,
    Mixed,
}

impl OrderType {
    /// Whether the order spans more than one fulfillment owner.
    #[must_use]
    pub const fn is_mixed(&self) -> bool {
        matches!(self, Self::Mixed)
    }
}

impl std::fmt::Display for OrderType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "empty"),
            Self::AdminOnly => write!(f, "admin_only"),
            Self::VendorOnly => write!(f, "vendor_only"),
            Self::Mixed => write!(f, "mixed"),
        }
    }
}

/// Payment methods offered at checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Card,
    Bank,
    Wallet,
    #[default]
    Cash,
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Card => write!(f, "card"),
            Self::Bank => write!(f, "bank"),
            Self::Wallet => write!(f, "wallet"),
            Self::Cash => write!(f, "cash"),
        }
    }
}

impl std::str::FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "card" => Ok(Self::Card),
            "bank" => Ok(Self::Bank),
            "wallet" => Ok(Self::Wallet),
            "cash" => Ok(Self::Cash),
            _ => Err(format!("invalid payment method: {s}")),
        }
    }
}
