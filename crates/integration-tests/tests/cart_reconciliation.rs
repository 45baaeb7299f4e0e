//! Cart store reconciliation against the in-memory backend.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use rust_decimal::Decimal;

use bazario_core::ProductId;
use bazario_integration_tests::{FakeBackend, RecordingNotifier, product, signed_in_session};
use bazario_storefront::cart::{CartStore, analyze};
use bazario_storefront::error::AppError;
use bazario_storefront::services::Session;
use tokio::sync::Notify;

fn store(backend: &FakeBackend, session: Session) -> (CartStore<FakeBackend>, Arc<RecordingNotifier>) {
    let notifier = Arc::new(RecordingNotifier::new());
    (
        CartStore::new(backend.clone(), session, notifier.clone()),
        notifier,
    )
}

#[tokio::test]
async fn repeated_adds_merge_server_side() {
    let backend = FakeBackend::new();
    backend.add_product(product("p1", 100, 20));
    let (cart, _) = store(&backend, signed_in_session());

    let p = product("p1", 100, 20);
    for quantity in [1, 2, 3] {
        cart.add_item(&p, quantity, None).await.unwrap();
    }

    // One line whose quantity is the sum of the requested quantities,
    // both locally and on the server.
    let items = cart.items();
    assert_eq!(items.len(), 1);
    assert_eq!(items.first().unwrap().quantity, 6);
    assert_eq!(backend.cart_items().first().unwrap().quantity, 6);
}

#[tokio::test]
async fn update_to_zero_equals_remove() {
    let backend = FakeBackend::new();
    backend.add_product(product("p1", 100, 20));
    backend.add_product(product("p2", 50, 20));
    let (cart, _) = store(&backend, signed_in_session());

    cart.add_item(&product("p1", 100, 20), 2, None).await.unwrap();
    cart.add_item(&product("p2", 50, 20), 1, None).await.unwrap();

    cart.update_quantity(&ProductId::new("p1"), 0).await.unwrap();

    assert!(!cart.is_in_cart(&ProductId::new("p1")));
    assert!(cart.is_in_cart(&ProductId::new("p2")));
    assert_eq!(backend.cart_items().len(), 1);
}

#[tokio::test]
async fn backend_stock_rejection_is_surfaced_not_clamped() {
    let backend = FakeBackend::new();
    backend.add_product(product("p1", 100, 20));
    backend.set_stock_limit("p1", 3);
    let (cart, notifier) = store(&backend, signed_in_session());

    cart.add_item(&product("p1", 100, 20), 2, None).await.unwrap();

    let err = cart
        .update_quantity(&ProductId::new("p1"), 8)
        .await
        .unwrap_err();
    match err {
        AppError::StockExceeded(message) => assert_eq!(message, "Only 3 left in stock"),
        other => panic!("expected StockExceeded, got {other:?}"),
    }

    // Quantity stayed where the server left it.
    assert_eq!(cart.get_item(&ProductId::new("p1")).unwrap().quantity, 2);
    assert!(notifier.saw("error", "Only 3 left in stock"));
}

#[tokio::test]
async fn stale_response_is_dropped() {
    let backend = FakeBackend::new();
    backend.add_product(product("p1", 100, 20));
    let (cart, _) = store(&backend, signed_in_session());

    cart.add_item(&product("p1", 100, 20), 1, None).await.unwrap();

    // First update's response is parked; a second update lands first.
    let gate = Arc::new(Notify::new());
    backend.gate_next_update(gate.clone());

    let product_id = ProductId::new("p1");
    let slow = cart.update_quantity(&product_id, 2);
    let fast = async {
        cart.update_quantity(&product_id, 5).await.unwrap();
        gate.notify_one();
    };
    let (slow_result, ()) = tokio::join!(slow, fast);

    // The slow response resolved after the fast one and was dropped: the
    // cart shows the newest write, not the older in-flight one.
    slow_result.unwrap();
    assert_eq!(cart.get_item(&ProductId::new("p1")).unwrap().quantity, 5);
    assert!(!cart.is_loading());
}

#[tokio::test]
async fn logout_clears_cart_before_dropping_session() {
    let backend = FakeBackend::new();
    backend.add_product(product("p1", 100, 20));
    let session = signed_in_session();
    let (cart, _) = store(&backend, session.clone());

    cart.add_item(&product("p1", 100, 20), 2, None).await.unwrap();
    assert!(!backend.cart_items().is_empty());

    // Logout order: clear (still authenticated, so the server cart is
    // emptied too), then sign out.
    cart.clear().await.unwrap();
    session.sign_out();

    assert!(backend.cart_items().is_empty());
    assert!(cart.stats().is_empty);
    assert!(!session.is_authenticated());
}

#[tokio::test]
async fn unauthenticated_add_is_rejected_with_notification() {
    let backend = FakeBackend::new();
    backend.add_product(product("p1", 100, 20));
    let (cart, notifier) = store(&backend, Session::anonymous());

    let err = cart
        .add_item(&product("p1", 100, 20), 1, None)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::AuthenticationRequired));
    assert!(notifier.saw("error", "sign in"));
    assert!(backend.cart_items().is_empty());
}

#[tokio::test]
async fn derived_stats_and_analysis_agree() {
    let backend = FakeBackend::new();
    backend.add_product(product("p1", 100, 20));
    backend.add_product(product("p2", 300, 20));
    let (cart, _) = store(&backend, signed_in_session());

    cart.add_item(&product("p1", 100, 20), 2, None).await.unwrap();
    cart.add_item(&product("p2", 300, 20), 1, None).await.unwrap();

    let stats = cart.stats();
    assert_eq!(stats.total_items, 3);
    assert_eq!(stats.total_price, Decimal::from(500));

    let analysis = analyze(&cart.items());
    assert_eq!(analysis.platform_items.len(), 2);
    assert!(analysis.notification.is_none());
}
