//! Shared fixtures for the integration tests: an in-memory backend with
//! the real cart service's semantics (server-side merge, stock-aware
//! rejections, authoritative full-cart responses) and a recording
//! notification sink.

#![cfg_attr(not(test), forbid(unsafe_code))]
#![allow(clippy::unwrap_used)] // test fixtures

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use rust_decimal::Decimal;
use tokio::sync::Notify;

use bazario_core::{Email, ProductId, UserId};
use bazario_storefront::api::types::{OrderConfirmation, Product, WireVendor};
use bazario_storefront::api::{ApiError, CartService, OrderService};
use bazario_storefront::cart::LineItem;
use bazario_storefront::checkout::orchestrator::OrderSubmission;
use bazario_storefront::services::{Notifier, Session, UserProfile};

/// In-memory stand-in for the cart and order services.
///
/// Mutating cart calls return the full resulting cart, mirroring the
/// backend's authoritative-overwrite contract.
#[derive(Clone, Default)]
pub struct FakeBackend {
    inner: Arc<FakeBackendInner>,
}

#[derive(Default)]
struct FakeBackendInner {
    products: Mutex<HashMap<String, Product>>,
    items: Mutex<Vec<LineItem>>,
    /// Server-side stock ceilings overriding the product snapshot.
    stock_limits: Mutex<HashMap<String, u32>>,
    orders: Mutex<Vec<OrderSubmission>>,
    fail_orders: AtomicBool,
    omit_order_number: AtomicBool,
    order_seq: AtomicU64,
    /// When set, the next update call snapshots its response and then
    /// parks until notified, so tests can deliver it stale.
    update_gate: Mutex<Option<Arc<Notify>>>,
}

impl FakeBackend {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a product with the fake catalog.
    pub fn add_product(&self, product: Product) {
        self.inner
            .products
            .lock()
            .unwrap()
            .insert(product.id.as_str().to_owned(), product);
    }

    /// Cap the server-side stock for a product below its snapshot.
    pub fn set_stock_limit(&self, product_id: &str, limit: u32) {
        self.inner
            .stock_limits
            .lock()
            .unwrap()
            .insert(product_id.to_owned(), limit);
    }

    /// Server-side cart contents.
    #[must_use]
    pub fn cart_items(&self) -> Vec<LineItem> {
        self.inner.items.lock().unwrap().clone()
    }

    /// Orders the order service accepted.
    #[must_use]
    pub fn orders(&self) -> Vec<OrderSubmission> {
        self.inner.orders.lock().unwrap().clone()
    }

    /// Make the next `create_order` call fail.
    pub fn fail_orders(&self, fail: bool) {
        self.inner.fail_orders.store(fail, Ordering::SeqCst);
    }

    /// Omit the order number from confirmations.
    pub fn omit_order_number(&self, omit: bool) {
        self.inner.omit_order_number.store(omit, Ordering::SeqCst);
    }

    /// Park the next update response until the gate is notified.
    pub fn gate_next_update(&self, gate: Arc<Notify>) {
        *self.inner.update_gate.lock().unwrap() = Some(gate);
    }

    fn stock_limit(&self, product_id: &str) -> Option<u32> {
        self.inner
            .stock_limits
            .lock()
            .unwrap()
            .get(product_id)
            .copied()
    }

    fn line_for(product: &Product, quantity: u32, selected_size: Option<&str>) -> LineItem {
        LineItem {
            product_id: product.id.clone(),
            title: product.title.clone(),
            price: product.price,
            shipping_cost: product.shipping_cost,
            image: product.image.clone(),
            stock: product.stock,
            quantity,
            selected_size: selected_size.map(str::to_owned),
            vendor: product.vendor_ref(),
        }
    }
}

impl CartService for FakeBackend {
    async fn fetch_cart(&self) -> Result<Vec<LineItem>, ApiError> {
        Ok(self.cart_items())
    }

    async fn add_to_cart(
        &self,
        product_id: &ProductId,
        quantity: u32,
        selected_size: Option<&str>,
    ) -> Result<Vec<LineItem>, ApiError> {
        let product = self
            .inner
            .products
            .lock()
            .unwrap()
            .get(product_id.as_str())
            .cloned()
            .ok_or(ApiError::Status {
                status: 404,
                message: "product not found".to_string(),
            })?;

        let limit = self.stock_limit(product_id.as_str()).unwrap_or(product.stock);

        let mut items = self.inner.items.lock().unwrap();
        let total = items
            .iter()
            .find(|i| i.product_id == *product_id)
            .map_or(0, |i| i.quantity)
            + quantity;
        if total > limit {
            return Err(ApiError::Rejected {
                message: format!("Only {limit} left in stock"),
            });
        }

        if let Some(line) = items.iter_mut().find(|i| i.product_id == *product_id) {
            line.quantity = total;
        } else {
            items.push(Self::line_for(&product, quantity, selected_size));
        }
        Ok(items.clone())
    }

    async fn remove_from_cart(&self, product_id: &ProductId) -> Result<Vec<LineItem>, ApiError> {
        let mut items = self.inner.items.lock().unwrap();
        items.retain(|i| i.product_id != *product_id);
        Ok(items.clone())
    }

    async fn update_cart_item(
        &self,
        product_id: &ProductId,
        quantity: u32,
    ) -> Result<Vec<LineItem>, ApiError> {
        if let Some(limit) = self.stock_limit(product_id.as_str()) {
            if quantity > limit {
                return Err(ApiError::Rejected {
                    message: format!("Only {limit} left in stock"),
                });
            }
        }

        let response = {
            let mut items = self.inner.items.lock().unwrap();
            if let Some(line) = items.iter_mut().find(|i| i.product_id == *product_id) {
                line.quantity = quantity;
            }
            items.clone()
        };

        // Snapshot taken; park if a test wants this response delivered late.
        let gate = self.inner.update_gate.lock().unwrap().take();
        if let Some(gate) = gate {
            gate.notified().await;
        }

        Ok(response)
    }

    async fn clear_cart(&self) -> Result<(), ApiError> {
        self.inner.items.lock().unwrap().clear();
        Ok(())
    }
}

impl OrderService for FakeBackend {
    async fn create_order(&self, order: &OrderSubmission) -> Result<OrderConfirmation, ApiError> {
        if self.inner.fail_orders.load(Ordering::SeqCst) {
            return Err(ApiError::Status {
                status: 503,
                message: "order service unavailable".to_string(),
            });
        }

        self.inner.orders.lock().unwrap().push(order.clone());

        let order_number = if self.inner.omit_order_number.load(Ordering::SeqCst) {
            None
        } else {
            let seq = self.inner.order_seq.fetch_add(1, Ordering::SeqCst) + 1;
            Some(format!("BZ-{seq:05}"))
        };

        Ok(OrderConfirmation { order_number })
    }
}

/// Notifier that records every message for assertions.
#[derive(Default)]
pub struct RecordingNotifier {
    messages: Mutex<Vec<(String, String)>>,
}

impl RecordingNotifier {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All `(level, message)` pairs recorded so far.
    #[must_use]
    pub fn messages(&self) -> Vec<(String, String)> {
        self.messages.lock().unwrap().clone()
    }

    /// Whether any message at the given level contains the needle.
    #[must_use]
    pub fn saw(&self, level: &str, needle: &str) -> bool {
        self.messages()
            .iter()
            .any(|(l, m)| l == level && m.contains(needle))
    }

    fn record(&self, level: &str, message: &str) {
        self.messages
            .lock()
            .unwrap()
            .push((level.to_owned(), message.to_owned()));
    }
}

impl Notifier for RecordingNotifier {
    fn success(&self, message: &str) {
        self.record("success", message);
    }

    fn error(&self, message: &str) {
        self.record("error", message);
    }

    fn warning(&self, message: &str) {
        self.record("warning", message);
    }
}

// =============================================================================
// Fixture helpers
// =============================================================================

/// A platform-fulfilled product.
#[must_use]
pub fn product(id: &str, price: i64, stock: u32) -> Product {
    Product {
        id: ProductId::new(id),
        title: format!("Product {id}"),
        price: Decimal::from(price),
        shipping_cost: Decimal::ZERO,
        image: None,
        stock,
        sizes: Vec::new(),
        vendor: None,
    }
}

/// A vendor-fulfilled product.
#[must_use]
pub fn vendor_product(id: &str, price: i64, stock: u32, vendor_id: &str, vendor_name: &str) -> Product {
    let mut p = product(id, price, stock);
    p.vendor = Some(WireVendor {
        id: Some(vendor_id.to_owned()),
        display_name: Some(vendor_name.to_owned()),
    });
    p
}

/// A signed-in session for the standard test shopper.
#[must_use]
pub fn signed_in_session() -> Session {
    Session::authenticated(UserProfile {
        id: UserId::new("u1"),
        name: Some("Ayesha Khan".to_string()),
        email: Email::parse("ayesha@example.com").unwrap(),
        phone: None,
        address: None,
    })
}
