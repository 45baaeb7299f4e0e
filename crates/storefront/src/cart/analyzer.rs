//! Pure classification of cart contents by fulfillment owner.
//!
//! Deterministic and side-effect free: calling [`analyze`] twice on the
//! same input yields identical output, which upstream memoized rendering
//! relies on.

use serde::Serialize;

use bazario_core::{OrderType, VendorId};

use super::line_item::LineItem;

/// Delivery estimate shown on mixed-order notices.
const DELIVERY_ESTIMATE_HINT: &str =
    "Items from different sellers ship separately and may arrive on different days (3-5 business days).";

const CTA_SINGLE: &str = "Place Order";
const CTA_MULTI_VENDOR: &str = "Place Multi-Vendor Order";

/// Items owned by one vendor, in first-seen order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VendorGroup {
    pub vendor_id: VendorId,
    pub vendor_name: String,
    pub items: Vec<LineItem>,
}

/// Structured warning shown when an order spans fulfillment owners.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryNotice {
    /// One line per fulfillment group, in display order.
    pub breakdown: Vec<String>,
    pub estimate_hint: String,
}

/// Classification of a cart by fulfillment owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartAnalysis {
    pub order_type: OrderType,
    /// Line items fulfilled by Bazario itself.
    pub platform_items: Vec<LineItem>,
    /// Vendor groups in first-seen order.
    pub vendor_groups: Vec<VendorGroup>,
    /// Populated only for mixed orders.
    pub notification: Option<DeliveryNotice>,
    /// Submit button label; differs for multi-vendor orders.
    pub cta_label: &'static str,
}

/// Compact analysis summary attached to order submissions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisSummary {
    pub order_type: OrderType,
    pub platform_item_count: usize,
    pub vendor_count: usize,
}

impl CartAnalysis {
    /// The order-type-and-counts summary sent with order submissions.
    #[must_use]
    pub fn summary(&self) -> AnalysisSummary {
        AnalysisSummary {
            order_type: self.order_type,
            platform_item_count: self.platform_items.len(),
            vendor_count: self.vendor_groups.len(),
        }
    }
}

/// Partition cart lines into platform-fulfilled and per-vendor groups and
/// derive the order type.
///
/// An item is vendor-fulfilled iff it carries a vendor ref with a
/// non-empty id; everything else belongs to the platform group. Vendor
/// groups preserve first-seen order.
#[must_use]
pub fn analyze(items: &[LineItem]) -> CartAnalysis {
    let mut platform_items = Vec::new();
    let mut vendor_groups: Vec<VendorGroup> = Vec::new();

    for item in items {
        match item.vendor.as_ref().filter(|v| !v.id.is_empty()) {
            Some(vendor) => {
                if let Some(group) = vendor_groups.iter_mut().find(|g| g.vendor_id == vendor.id) {
                    group.items.push(item.clone());
                } else {
                    vendor_groups.push(VendorGroup {
                        vendor_id: vendor.id.clone(),
                        vendor_name: vendor.display_name.clone(),
                        items: vec![item.clone()],
                    });
                }
            }
            None => platform_items.push(item.clone()),
        }
    }

    let order_type = classify(platform_items.len(), vendor_groups.len(), items.is_empty());

    let notification = if order_type.is_mixed() {
        Some(build_notice(&platform_items, &vendor_groups))
    } else {
        None
    };

    let cta_label = if order_type.is_mixed() {
        CTA_MULTI_VENDOR
    } else {
        CTA_SINGLE
    };

    CartAnalysis {
        order_type,
        platform_items,
        vendor_groups,
        notification,
        cta_label,
    }
}

const fn classify(platform_count: usize, vendor_group_count: usize, empty: bool) -> OrderType {
    if empty {
        OrderType::Empty
    } else if (platform_count > 0 && vendor_group_count >= 1) || vendor_group_count >= 2 {
        OrderType::Mixed
    } else if vendor_group_count == 1 && platform_count == 0 {
        OrderType::VendorOnly
    } else {
        // Includes the all-platform case.
        OrderType::AdminOnly
    }
}

fn build_notice(platform_items: &[LineItem], vendor_groups: &[VendorGroup]) -> DeliveryNotice {
    let mut breakdown = Vec::with_capacity(vendor_groups.len() + 1);

    if !platform_items.is_empty() {
        breakdown.push(format!(
            "{} from Bazario",
            item_count_label(platform_items.len())
        ));
    }

    for group in vendor_groups {
        breakdown.push(format!(
            "{} from {}",
            item_count_label(group.items.len()),
            group.vendor_name
        ));
    }

    DeliveryNotice {
        breakdown,
        estimate_hint: DELIVERY_ESTIMATE_HINT.to_string(),
    }
}

fn item_count_label(count: usize) -> String {
    if count == 1 {
        "1 item".to_string()
    } else {
        format!("{count} items")
    }
}
