//! The canonical cart line item.
//!
//! The cart service has shipped two payload shapes over time (product
//! fields inline, or nested under `productData`). Both are normalized into
//! [`LineItem`] at the API boundary (`api::types`); everything downstream
//! works with this one shape.

use bazario_core::{ProductId, VendorId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The vendor owning a line item's fulfillment.
///
/// Absence means the item is platform-fulfilled by Bazario itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VendorRef {
    pub id: VendorId,
    pub display_name: String,
}

/// One cart entry: a product (plus optional size variant) and its quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub product_id: ProductId,
    pub title: String,
    pub price: Decimal,
    /// Per-item shipping as quoted by the catalog. Carried for display;
    /// checkout totals currently charge flat zero shipping.
    #[serde(default)]
    pub shipping_cost: Decimal,
    pub image: Option<String>,
    /// Availability snapshot taken when the product was added.
    pub stock: u32,
    /// Always >= 1; a line whose quantity reaches 0 is removed instead.
    pub quantity: u32,
    pub selected_size: Option<String>,
    pub vendor: Option<VendorRef>,
}

impl LineItem {
    /// Unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }

    /// Whether a third-party vendor owns fulfillment of this line.
    ///
    /// A vendor ref with an empty id (seen in some legacy payloads) does
    /// not count; such lines are platform-fulfilled.
    #[must_use]
    pub fn is_vendor_fulfilled(&self) -> bool {
        self.vendor.as_ref().is_some_and(|v| !v.id.is_empty())
    }
}
