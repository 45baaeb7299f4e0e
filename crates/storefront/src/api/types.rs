//! Wire types for the Bazario REST backend, and their normalization.
//!
//! The cart service has returned two payload shapes over its lifetime:
//! product fields inline on the cart entry, or nested under `productData`.
//! Both are accepted here and collapsed into the canonical
//! [`LineItem`](crate::cart::LineItem) in one place, so no downstream code
//! ever branches on shape.

use bazario_core::{ProductId, VendorId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::cart::{LineItem, VendorRef};
use crate::stock::SizeStock;

// =============================================================================
// Catalog
// =============================================================================

/// A catalog product as served by the product API.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(rename = "_id")]
    pub id: ProductId,
    pub title: String,
    pub price: Decimal,
    #[serde(default)]
    pub shipping_cost: Decimal,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub stock: u32,
    /// Present only for size-variant products.
    #[serde(default)]
    pub sizes: Vec<SizeStock>,
    #[serde(default)]
    pub vendor: Option<WireVendor>,
}

impl Product {
    /// The vendor owning fulfillment of this product, if any.
    #[must_use]
    pub fn vendor_ref(&self) -> Option<VendorRef> {
        self.vendor.clone().and_then(WireVendor::normalize)
    }

    /// Availability for the given size selection, falling back to the
    /// overall stock figure for non-variant products.
    #[must_use]
    pub fn available_stock(&self, selected_size: Option<&str>) -> u32 {
        match selected_size {
            Some(size) => self
                .sizes
                .iter()
                .find(|s| s.size == size)
                .map_or(0, |s| s.stock),
            None => self.stock,
        }
    }
}

/// Vendor reference as it appears on the wire.
///
/// Legacy payloads sometimes carry a vendor object without an id; those
/// resolve to platform fulfillment during normalization.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireVendor {
    #[serde(default, rename = "_id")]
    pub id: Option<String>,
    #[serde(default, alias = "name")]
    pub display_name: Option<String>,
}

impl WireVendor {
    fn normalize(self) -> Option<VendorRef> {
        let id = self.id.filter(|id| !id.is_empty())?;
        Some(VendorRef {
            id: VendorId::new(id),
            display_name: self.display_name.unwrap_or_default(),
        })
    }
}

// =============================================================================
// Cart payloads
// =============================================================================

/// Full cart as returned by every cart endpoint (authoritative overwrite
/// contract: mutations return the entire resulting cart).
#[derive(Debug, Clone, Deserialize)]
pub struct WireCart {
    #[serde(default)]
    pub items: Vec<WireCartItem>,
}

impl WireCart {
    /// Collapse wire entries into canonical line items.
    ///
    /// Malformed entries (no product id in either shape) are dropped with
    /// a warning rather than failing the whole cart.
    #[must_use]
    pub fn normalize(self) -> Vec<LineItem> {
        self.items
            .into_iter()
            .filter_map(|item| {
                let id = item.wire_id();
                item.normalize().or_else(|| {
                    warn!(item_id = ?id, "Dropping malformed cart entry");
                    None
                })
            })
            .collect()
    }
}

/// Product fields nested under `productData` (the newer cart shape).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireProductData {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub price: Decimal,
    #[serde(default)]
    pub shipping_cost: Decimal,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub stock: u32,
    #[serde(default)]
    pub vendor: Option<WireVendor>,
}

/// One cart entry in either historical shape.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireCartItem {
    /// Product id when the entry is flat.
    #[serde(default, rename = "_id")]
    pub id: Option<String>,
    /// Nested product payload when the entry is the newer shape.
    #[serde(default)]
    pub product_data: Option<WireProductData>,

    // Flat-shape product fields
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub price: Option<Decimal>,
    #[serde(default)]
    pub shipping_cost: Option<Decimal>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub stock: Option<u32>,
    #[serde(default)]
    pub vendor: Option<WireVendor>,

    // Common fields
    #[serde(default = "default_quantity")]
    pub quantity: u32,
    #[serde(default)]
    pub selected_size: Option<String>,
}

const fn default_quantity() -> u32 {
    1
}

impl WireCartItem {
    fn wire_id(&self) -> Option<String> {
        self.product_data
            .as_ref()
            .map(|p| p.id.clone())
            .or_else(|| self.id.clone())
    }

    /// Resolve `productData ?? item` and build the canonical line item.
    fn normalize(self) -> Option<LineItem> {
        if let Some(product) = self.product_data {
            if product.id.is_empty() {
                return None;
            }
            return Some(LineItem {
                product_id: ProductId::new(product.id),
                title: product.title,
                price: product.price,
                shipping_cost: product.shipping_cost,
                image: product.image,
                stock: product.stock,
                quantity: self.quantity.max(1),
                selected_size: self.selected_size,
                vendor: product.vendor.and_then(WireVendor::normalize),
            });
        }

        let id = self.id.filter(|id| !id.is_empty())?;
        Some(LineItem {
            product_id: ProductId::new(id),
            title: self.title.unwrap_or_default(),
            price: self.price.unwrap_or_default(),
            shipping_cost: self.shipping_cost.unwrap_or_default(),
            image: self.image,
            stock: self.stock.unwrap_or_default(),
            quantity: self.quantity.max(1),
            selected_size: self.selected_size,
            vendor: self.vendor.and_then(WireVendor::normalize),
        })
    }
}

// =============================================================================
// Requests
// =============================================================================

/// Body for the cart "add" endpoint.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartRequest<'a> {
    pub product_id: &'a str,
    pub quantity: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_size: Option<&'a str>,
}

/// Body for the cart "update quantity" endpoint.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCartItemRequest {
    pub quantity: u32,
}

/// Response from the order service's create endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderConfirmation {
    /// Omitted by some deployments; callers fall back to a placeholder.
    #[serde(default)]
    pub order_number: Option<String>,
}

/// Error body the backend attaches to rejections.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    #[serde(default, alias = "message")]
    pub error: String,
}
