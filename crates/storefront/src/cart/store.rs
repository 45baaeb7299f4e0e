//! Cart store: the single source of truth for cart contents.
//!
//! Authenticated sessions reconcile against the remote cart service; every
//! mutation sends the change and then **replaces** the whole local list
//! with the server's canonical cart (authoritative overwrite, no optimistic
//! merging). Without a session, quantity updates and removals fall back to
//! ephemeral local state; adding requires sign-in.
//!
//! Responses can arrive out of order, so each mutation is issued a
//! monotonic request id and a response is applied only while its id is
//! still the newest issued. Stale responses are dropped.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use rust_decimal::Decimal;
use tracing::{debug, instrument};

use bazario_core::ProductId;

use crate::api::types::Product;
use crate::api::{ApiError, CartService};
use crate::error::{AppError, Result};
use crate::services::{Notifier, Session};
use crate::stock;

use super::line_item::LineItem;

/// Derived read model over cart contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartStats {
    /// Sum of line quantities.
    pub total_items: u32,
    /// Sum of unit price times quantity.
    pub total_price: Decimal,
    pub is_empty: bool,
}

#[derive(Debug, Default)]
struct CartState {
    items: Vec<LineItem>,
    loading: bool,
    error: Option<String>,
}

/// Reducer-style cart store bound to a cart service and session.
pub struct CartStore<S> {
    service: S,
    session: Session,
    notifier: Arc<dyn Notifier>,
    state: RwLock<CartState>,
    /// Newest issued mutation id; responses for older ids are stale.
    request_seq: AtomicU64,
}

impl<S: CartService> CartStore<S> {
    /// Create a store over the given service and session.
    pub fn new(service: S, session: Session, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            service,
            session,
            notifier,
            state: RwLock::new(CartState::default()),
            request_seq: AtomicU64::new(0),
        }
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Current line items, in display order.
    #[must_use]
    pub fn items(&self) -> Vec<LineItem> {
        self.state
            .read()
            .map(|s| s.items.clone())
            .unwrap_or_default()
    }

    /// Whether the given product has a line in the cart.
    #[must_use]
    pub fn is_in_cart(&self, product_id: &ProductId) -> bool {
        self.get_item(product_id).is_some()
    }

    /// The line for the given product, if present.
    #[must_use]
    pub fn get_item(&self, product_id: &ProductId) -> Option<LineItem> {
        self.state.read().ok().and_then(|s| {
            s.items
                .iter()
                .find(|item| item.product_id == *product_id)
                .cloned()
        })
    }

    /// Totals and emptiness, derived on read.
    #[must_use]
    pub fn stats(&self) -> CartStats {
        let items = self.items();
        CartStats {
            total_items: items.iter().map(|i| i.quantity).sum(),
            total_price: items.iter().map(LineItem::line_total).sum(),
            is_empty: items.is_empty(),
        }
    }

    /// Whether a mutation is in flight.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.state.read().is_ok_and(|s| s.loading)
    }

    /// The last surfaced error message, if any.
    #[must_use]
    pub fn last_error(&self) -> Option<String> {
        self.state.read().ok().and_then(|s| s.error.clone())
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Add a product to the cart, merging into an existing line.
    ///
    /// # Errors
    ///
    /// - `AuthenticationRequired` when nobody is signed in (cart actions
    ///   require login).
    /// - `StockExceeded` when the requested total exceeds the availability
    ///   snapshot, or when the backend rejects the quantity.
    #[instrument(skip(self, product), fields(product_id = %product.id, quantity))]
    pub async fn add_item(
        &self,
        product: &Product,
        quantity: u32,
        selected_size: Option<&str>,
    ) -> Result<()> {
        if !self.session.is_authenticated() {
            self.notifier.error("Please sign in to add items to your cart");
            return Err(AppError::AuthenticationRequired);
        }

        // Client-side pre-check against the availability snapshot; the
        // backend stays authoritative and may still reject.
        let in_cart = self
            .get_item(&product.id)
            .map_or(0, |item| item.quantity);
        let available = product.available_stock(selected_size);
        if let Err(e) = stock::check_quantity(available, in_cart + quantity) {
            let message = e.to_string();
            self.notifier.error(&message);
            return Err(AppError::StockExceeded(message));
        }

        let request_id = self.begin_mutation();
        let result = self
            .service
            .add_to_cart(&product.id, quantity, selected_size)
            .await;

        match self.settle(request_id, result) {
            Ok(()) => {
                self.notifier
                    .success(&format!("Added {} to your cart", product.title));
                Ok(())
            }
            Err(e) => {
                self.notifier.error(&e.to_string());
                Err(e)
            }
        }
    }

    /// Remove a line from the cart.
    ///
    /// Authenticated sessions remove on the server; otherwise the line is
    /// removed from the local fallback state.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn remove_item(&self, product_id: &ProductId) -> Result<()> {
        if !self.session.is_authenticated() {
            self.mutate_local(|items| items.retain(|i| i.product_id != *product_id));
            self.notifier.success("Item removed from cart");
            return Ok(());
        }

        let request_id = self.begin_mutation();
        let result = self.service.remove_from_cart(product_id).await;

        match self.settle(request_id, result) {
            Ok(()) => {
                self.notifier.success("Item removed from cart");
                Ok(())
            }
            Err(e) => {
                self.notifier.error(&e.to_string());
                Err(e)
            }
        }
    }

    /// Set a line's quantity.
    ///
    /// A quantity below 1 is a removal, not an error. Backend stock
    /// rejections are surfaced as `StockExceeded`, never silently clamped.
    #[instrument(skip(self), fields(product_id = %product_id, new_quantity))]
    pub async fn update_quantity(&self, product_id: &ProductId, new_quantity: u32) -> Result<()> {
        if new_quantity < 1 {
            return self.remove_item(product_id).await;
        }

        if !self.session.is_authenticated() {
            // Local fallback still respects the stock snapshot.
            if let Some(item) = self.get_item(product_id) {
                if let Err(e) = stock::check_quantity(item.stock, new_quantity) {
                    let message = e.to_string();
                    self.notifier.error(&message);
                    return Err(AppError::StockExceeded(message));
                }
            }
            self.mutate_local(|items| {
                if let Some(item) = items.iter_mut().find(|i| i.product_id == *product_id) {
                    item.quantity = new_quantity;
                }
            });
            return Ok(());
        }

        let request_id = self.begin_mutation();
        let result = self.service.update_cart_item(product_id, new_quantity).await;

        match self.settle(request_id, result) {
            Ok(()) => Ok(()),
            Err(e) => {
                self.notifier.error(&e.to_string());
                Err(e)
            }
        }
    }

    /// Empty the cart, server-side too for authenticated sessions.
    ///
    /// Invoked automatically on logout so a cart never leaks across
    /// accounts on a shared device.
    #[instrument(skip(self))]
    pub async fn clear(&self) -> Result<()> {
        if self.session.is_authenticated() {
            let request_id = self.begin_mutation();
            let result = self.service.clear_cart().await.map(|()| Vec::new());
            if let Err(e) = self.settle(request_id, result) {
                self.notifier.error(&e.to_string());
                return Err(e);
            }
        } else {
            self.mutate_local(Vec::clear);
        }
        Ok(())
    }

    /// Reload the cart from the server, replacing local state.
    #[instrument(skip(self))]
    pub async fn refresh(&self) -> Result<()> {
        if !self.session.is_authenticated() {
            return Ok(());
        }
        let request_id = self.begin_mutation();
        let result = self.service.fetch_cart().await;
        self.settle(request_id, result)
    }

    // =========================================================================
    // Internals
    // =========================================================================

    /// Enter the loading state and allocate the next request id.
    fn begin_mutation(&self) -> u64 {
        let id = self.request_seq.fetch_add(1, Ordering::SeqCst) + 1;
        if let Ok(mut state) = self.state.write() {
            state.loading = true;
            state.error = None;
        }
        id
    }

    /// Apply a settled response if it is still the newest issued request.
    fn settle(&self, request_id: u64, result: std::result::Result<Vec<LineItem>, ApiError>) -> Result<()> {
        let newest = self.request_seq.load(Ordering::SeqCst);
        if request_id != newest {
            debug!(request_id, newest, "Dropping stale cart response");
            return Ok(());
        }

        let mut state = match self.state.write() {
            Ok(state) => state,
            Err(poisoned) => poisoned.into_inner(),
        };
        state.loading = false;

        match result {
            Ok(items) => {
                state.items = items;
                Ok(())
            }
            Err(e) => {
                let err = match e {
                    ApiError::Rejected { message } => AppError::StockExceeded(message),
                    other => AppError::Api(other),
                };
                state.error = Some(err.to_string());
                Err(err)
            }
        }
    }

    fn mutate_local(&self, f: impl FnOnce(&mut Vec<LineItem>)) {
        if let Ok(mut state) = self.state.write() {
            f(&mut state.items);
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Mutex;

    use crate::services::{TracingNotifier, UserProfile};

    use super::*;

    /// In-memory cart service with the real backend's merge semantics.
    #[derive(Default)]
    struct FakeCartService {
        items: Mutex<Vec<LineItem>>,
        products: Mutex<Vec<Product>>,
        /// Per-product stock ceiling enforced server-side.
        reject_above: Mutex<Option<u32>>,
    }

    impl FakeCartService {
        fn with_product(self, product: Product) -> Self {
            self.products.lock().unwrap().push(product);
            self
        }

        fn line_for(&self, product: &Product, quantity: u32, size: Option<&str>) -> LineItem {
            LineItem {
                product_id: product.id.clone(),
                title: product.title.clone(),
                price: product.price,
                shipping_cost: product.shipping_cost,
                image: product.image.clone(),
                stock: product.stock,
                quantity,
                selected_size: size.map(str::to_owned),
                vendor: product.vendor_ref(),
            }
        }
    }

    impl CartService for FakeCartService {
        async fn fetch_cart(&self) -> std::result::Result<Vec<LineItem>, ApiError> {
            Ok(self.items.lock().unwrap().clone())
        }

        async fn add_to_cart(
            &self,
            product_id: &ProductId,
            quantity: u32,
            selected_size: Option<&str>,
        ) -> std::result::Result<Vec<LineItem>, ApiError> {
            let product = self
                .products
                .lock()
                .unwrap()
                .iter()
                .find(|p| p.id == *product_id)
                .cloned()
                .ok_or(ApiError::Status {
                    status: 404,
                    message: "product not found".to_string(),
                })?;

            let mut items = self.items.lock().unwrap();
            if let Some(line) = items.iter_mut().find(|i| i.product_id == *product_id) {
                line.quantity += quantity;
            } else {
                let line = self.line_for(&product, quantity, selected_size);
                items.push(line);
            }
            Ok(items.clone())
        }

        async fn remove_from_cart(
            &self,
            product_id: &ProductId,
        ) -> std::result::Result<Vec<LineItem>, ApiError> {
            let mut items = self.items.lock().unwrap();
            items.retain(|i| i.product_id != *product_id);
            Ok(items.clone())
        }

        async fn update_cart_item(
            &self,
            product_id: &ProductId,
            quantity: u32,
        ) -> std::result::Result<Vec<LineItem>, ApiError> {
            if let Some(max) = *self.reject_above.lock().unwrap() {
                if quantity > max {
                    return Err(ApiError::Rejected {
                        message: format!("Only {max} left in stock"),
                    });
                }
            }
            let mut items = self.items.lock().unwrap();
            if let Some(line) = items.iter_mut().find(|i| i.product_id == *product_id) {
                line.quantity = quantity;
            }
            Ok(items.clone())
        }

        async fn clear_cart(&self) -> std::result::Result<(), ApiError> {
            self.items.lock().unwrap().clear();
            Ok(())
        }
    }

    fn product(id: &str, price: i64, stock: u32) -> Product {
        serde_json::from_value(serde_json::json!({
            "_id": id,
            "title": format!("Product {id}"),
            "price": price.to_string(),
            "stock": stock,
        }))
        .unwrap()
    }

    fn signed_in_session() -> Session {
        Session::authenticated(UserProfile {
            id: bazario_core::UserId::new("u1"),
            name: Some("Ayesha Khan".to_string()),
            email: bazario_core::Email::parse("ayesha@example.com").unwrap(),
            phone: None,
            address: None,
        })
    }

    fn store_with(products: Vec<Product>, session: Session) -> CartStore<FakeCartService> {
        let mut service = FakeCartService::default();
        for p in products {
            service = service.with_product(p);
        }
        CartStore::new(service, session, Arc::new(TracingNotifier))
    }

    #[tokio::test]
    async fn test_repeated_adds_merge_into_one_line() {
        let p = product("p1", 100, 10);
        let store = store_with(vec![p.clone()], signed_in_session());

        store.add_item(&p, 1, None).await.unwrap();
        store.add_item(&p, 2, None).await.unwrap();
        store.add_item(&p, 3, None).await.unwrap();

        let items = store.items();
        assert_eq!(items.len(), 1);
        assert_eq!(items.first().unwrap().quantity, 6);
    }

    #[tokio::test]
    async fn test_add_requires_authentication() {
        let p = product("p1", 100, 10);
        let store = store_with(vec![p.clone()], Session::anonymous());

        let err = store.add_item(&p, 1, None).await.unwrap_err();
        assert!(matches!(err, AppError::AuthenticationRequired));
        assert!(store.stats().is_empty);
    }

    #[tokio::test]
    async fn test_add_rejects_beyond_stock_snapshot() {
        let p = product("p1", 100, 2);
        let store = store_with(vec![p.clone()], signed_in_session());

        store.add_item(&p, 2, None).await.unwrap();
        let err = store.add_item(&p, 1, None).await.unwrap_err();
        assert!(matches!(err, AppError::StockExceeded(_)));
        // The failed add did not corrupt state.
        assert_eq!(store.stats().total_items, 2);
    }

    #[tokio::test]
    async fn test_update_quantity_zero_is_removal() {
        let p = product("p1", 100, 10);
        let store = store_with(vec![p.clone()], signed_in_session());

        store.add_item(&p, 2, None).await.unwrap();
        store.update_quantity(&p.id, 0).await.unwrap();

        assert!(store.stats().is_empty);
        assert!(!store.is_in_cart(&p.id));
    }

    #[tokio::test]
    async fn test_backend_stock_rejection_surfaces_verbatim() {
        let p = product("p1", 100, 10);
        let store = store_with(vec![p.clone()], signed_in_session());
        *store.service.reject_above.lock().unwrap() = Some(3);

        store.add_item(&p, 1, None).await.unwrap();
        let err = store.update_quantity(&p.id, 5).await.unwrap_err();

        match err {
            AppError::StockExceeded(message) => {
                assert_eq!(message, "Only 3 left in stock");
            }
            other => panic!("expected StockExceeded, got {other:?}"),
        }
        // Quantity was not clamped.
        assert_eq!(store.get_item(&p.id).unwrap().quantity, 1);
    }

    #[tokio::test]
    async fn test_clear_empties_server_and_local() {
        let p = product("p1", 100, 10);
        let store = store_with(vec![p.clone()], signed_in_session());

        store.add_item(&p, 2, None).await.unwrap();
        store.clear().await.unwrap();

        assert!(store.stats().is_empty);
        assert!(store.service.items.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_stats() {
        let p1 = product("p1", 100, 10);
        let p2 = product("p2", 250, 10);
        let store = store_with(vec![p1.clone(), p2.clone()], signed_in_session());

        store.add_item(&p1, 2, None).await.unwrap();
        store.add_item(&p2, 1, None).await.unwrap();

        let stats = store.stats();
        assert_eq!(stats.total_items, 3);
        assert_eq!(stats.total_price, Decimal::from(450));
        assert!(!stats.is_empty);
    }

    #[tokio::test]
    async fn test_unauthenticated_local_fallback_mutations() {
        let p = product("p1", 100, 5);
        let store = store_with(vec![p.clone()], Session::anonymous());

        // Seed local state directly (e.g. leftover ephemeral cart).
        store.mutate_local(|items| {
            items.push(LineItem {
                product_id: p.id.clone(),
                title: p.title.clone(),
                price: p.price,
                shipping_cost: Decimal::ZERO,
                image: None,
                stock: 5,
                quantity: 2,
                selected_size: None,
                vendor: None,
            });
        });

        store.update_quantity(&p.id, 4).await.unwrap();
        assert_eq!(store.get_item(&p.id).unwrap().quantity, 4);

        let err = store.update_quantity(&p.id, 9).await.unwrap_err();
        assert!(matches!(err, AppError::StockExceeded(_)));

        store.remove_item(&p.id).await.unwrap();
        assert!(store.stats().is_empty);
    }
}
