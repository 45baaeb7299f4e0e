//! The checkout wizard state machine and order submission.
//!
//! Steps run `CustomerInfo -> Address -> Payment -> Review`. Advancing
//! validates the current step; going back is always allowed and never
//! re-validates. Submission happens from the review step: it re-validates
//! the whole form, authorizes payment for non-cash methods, assembles the
//! order payload once, and sends it to the order service. On failure the
//! cart is left intact and the wizard stays at review for retry.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{instrument, warn};

use bazario_core::{CurrencyCode, Money, PaymentMethod, ProductId, TransactionId};

use crate::api::{CartService, OrderService};
use crate::cart::analyzer::{AnalysisSummary, analyze};
use crate::cart::{CartStore, LineItem, VendorRef};
use crate::error::{AppError, Result};
use crate::payment::{PaymentGateway, PaymentRequest};
use crate::services::{Notifier, Session};

use super::form::{CheckoutForm, ShippingAddress};
use super::validate;

/// Reference used when the order service omits an order number.
/// Degraded but non-fatal; the confirmation view shows it as pending.
pub const FALLBACK_ORDER_REF: &str = "PENDING";

/// The four ordered wizard steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckoutStep {
    CustomerInfo,
    Address,
    Payment,
    Review,
}

impl CheckoutStep {
    /// Steps in wizard order.
    pub const ALL: [Self; 4] = [
        Self::CustomerInfo,
        Self::Address,
        Self::Payment,
        Self::Review,
    ];

    /// The step after this one, if any.
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::CustomerInfo => Some(Self::Address),
            Self::Address => Some(Self::Payment),
            Self::Payment => Some(Self::Review),
            Self::Review => None,
        }
    }

    /// The step before this one, if any.
    #[must_use]
    pub const fn prev(self) -> Option<Self> {
        match self {
            Self::CustomerInfo => None,
            Self::Address => Some(Self::CustomerInfo),
            Self::Payment => Some(Self::Address),
            Self::Review => Some(Self::Payment),
        }
    }
}

/// Who fulfills an order line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FulfilledBy {
    Platform,
    Vendor,
}

/// One line of the submitted order.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    pub product_id: ProductId,
    pub name: String,
    pub price: Decimal,
    pub quantity: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_size: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vendor: Option<VendorRef>,
    pub fulfilled_by: FulfilledBy,
}

impl From<&LineItem> for OrderLine {
    fn from(item: &LineItem) -> Self {
        let fulfilled_by = if item.is_vendor_fulfilled() {
            FulfilledBy::Vendor
        } else {
            FulfilledBy::Platform
        };
        Self {
            product_id: item.product_id.clone(),
            name: item.title.clone(),
            price: item.price,
            quantity: item.quantity,
            image: item.image.clone(),
            selected_size: item.selected_size.clone(),
            vendor: item.vendor.clone(),
            fulfilled_by,
        }
    }
}

/// Contact block of the submitted order.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderCustomer {
    pub name: String,
    pub email: String,
    pub phone: String,
}

/// Payment block of the submitted order.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentInfo {
    pub method: PaymentMethod,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<TransactionId>,
    pub status: PaymentStatus,
}

/// Settlement state at submission time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    /// Collected on delivery (cash orders).
    Pending,
    /// Authorized by the gateway before submission.
    Authorized,
}

/// Order totals.
///
/// Shipping is flat zero at checkout while free delivery runs; per-line
/// `shipping_cost` is display-only and deliberately not summed here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderTotals {
    pub subtotal: Decimal,
    pub shipping: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
    pub currency: CurrencyCode,
}

impl OrderTotals {
    /// Compute totals for a set of line items.
    #[must_use]
    pub fn compute(items: &[LineItem], currency: CurrencyCode) -> Self {
        let subtotal: Decimal = items.iter().map(LineItem::line_total).sum();
        Self {
            subtotal,
            shipping: Decimal::ZERO,
            tax: Decimal::ZERO,
            total: subtotal,
            currency,
        }
    }
}

/// The payload sent once to the order service. Never mutated after send;
/// a retry assembles a fresh one.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSubmission {
    pub items: Vec<OrderLine>,
    pub customer: OrderCustomer,
    pub shipping_address: ShippingAddress,
    pub payment: PaymentInfo,
    pub totals: OrderTotals,
    pub summary: AnalysisSummary,
    pub placed_at: DateTime<Utc>,
}

/// The checkout wizard.
pub struct Checkout<O, G> {
    orders: O,
    gateway: G,
    session: Session,
    notifier: Arc<dyn Notifier>,
    currency: CurrencyCode,
    form: CheckoutForm,
    step: CheckoutStep,
    confirmation: Option<String>,
}

impl<O: OrderService, G: PaymentGateway> Checkout<O, G> {
    /// Start a checkout with a form pre-filled from the session profile.
    pub fn new(
        orders: O,
        gateway: G,
        session: Session,
        notifier: Arc<dyn Notifier>,
        currency: CurrencyCode,
    ) -> Self {
        let form = CheckoutForm::prefilled(&session);
        Self {
            orders,
            gateway,
            session,
            notifier,
            currency,
            form,
            step: CheckoutStep::CustomerInfo,
            confirmation: None,
        }
    }

    /// The step the wizard is on.
    #[must_use]
    pub const fn step(&self) -> CheckoutStep {
        self.step
    }

    /// Read the form.
    #[must_use]
    pub const fn form(&self) -> &CheckoutForm {
        &self.form
    }

    /// Edit the form (UI bindings write through this).
    pub fn form_mut(&mut self) -> &mut CheckoutForm {
        &mut self.form
    }

    /// The confirmed order number after a successful submission.
    #[must_use]
    pub fn confirmation(&self) -> Option<&str> {
        self.confirmation.as_deref()
    }

    /// Whether the wizard reached its terminal submitted state.
    #[must_use]
    pub const fn is_submitted(&self) -> bool {
        self.confirmation.is_some()
    }

    /// Validate the current step and move forward.
    ///
    /// At the review step this re-validates and stays put (submission is a
    /// separate call).
    ///
    /// # Errors
    ///
    /// Returns the field-scoped validation errors that block the advance.
    pub fn advance(&mut self) -> Result<CheckoutStep> {
        let errors = validate::validate_step(self.step, &mut self.form);
        if !errors.is_empty() {
            return Err(AppError::Validation(errors));
        }
        if let Some(next) = self.step.next() {
            self.step = next;
        }
        Ok(self.step)
    }

    /// Move back one step. Always allowed, never re-validates.
    pub fn back(&mut self) -> CheckoutStep {
        if let Some(prev) = self.step.prev() {
            self.step = prev;
        }
        self.step
    }

    /// Submit an order for the cart's contents, clearing the cart on
    /// success.
    ///
    /// # Errors
    ///
    /// See [`Checkout::submit_items`]; additionally, a cart-clear failure
    /// after a successful submission is logged but not surfaced.
    pub async fn submit<S: CartService>(&mut self, cart: &CartStore<S>) -> Result<String> {
        let items = cart.items();
        let order_number = self.submit_items(&items).await?;

        if let Err(e) = cart.clear().await {
            warn!(error = %e, "Order placed but cart clear failed");
        }

        Ok(order_number)
    }

    /// Submit an order for the given items (the buy-now path hands the
    /// snapshot item here directly; the cart is not involved).
    ///
    /// # Errors
    ///
    /// - `Validation` when the form does not pass full re-validation or
    ///   there is nothing to order. No side effects in that case.
    /// - `PaymentDeclined` when the gateway refuses a non-cash payment;
    ///   no order is created.
    /// - `SubmissionFailed` when the order service rejects the payload;
    ///   the wizard stays at review for retry.
    #[instrument(skip(self, items), fields(item_count = items.len()))]
    pub async fn submit_items(&mut self, items: &[LineItem]) -> Result<String> {
        // 1. Re-validate the full form; abort with no side effects.
        let mut errors = validate::validate_full(&mut self.form);
        if items.is_empty() {
            errors.add("items", "There is nothing to order");
        }
        if !errors.is_empty() {
            return Err(AppError::Validation(errors));
        }

        // 2. Method-specific payment payload.
        let request = PaymentRequest::from_form(&self.form);
        let totals = OrderTotals::compute(items, self.currency);

        // 3. Authorize non-cash payments before anything else happens.
        let receipt = if request.method() == PaymentMethod::Cash {
            None
        } else {
            let amount = Money::new(totals.total, self.currency);
            match self.gateway.process(&request, amount) {
                Ok(receipt) => Some(receipt),
                Err(e) => {
                    let message = e.to_string();
                    self.notifier.error(&message);
                    return Err(AppError::PaymentDeclined(message));
                }
            }
        };

        // 4. Assemble the submission.
        let submission = self.assemble(items, totals, receipt.map(|r| r.transaction_id));

        // 5. Send once.
        match self.orders.create_order(&submission).await {
            Ok(confirmation) => {
                let order_number = confirmation.order_number.unwrap_or_else(|| {
                    warn!("Order service omitted the order number");
                    FALLBACK_ORDER_REF.to_string()
                });
                self.confirmation = Some(order_number.clone());
                self.notifier
                    .success(&format!("Order {order_number} placed successfully"));
                Ok(order_number)
            }
            Err(e) => {
                // 6. Stay at review; the caller's cart is untouched.
                let message = e.to_string();
                self.notifier.error(&message);
                Err(AppError::SubmissionFailed(message))
            }
        }
    }

    fn assemble(
        &self,
        items: &[LineItem],
        totals: OrderTotals,
        transaction_id: Option<TransactionId>,
    ) -> OrderSubmission {
        let analysis = analyze(items);

        // The session email is authoritative for signed-in shoppers.
        let email = self
            .session
            .user()
            .map_or_else(|| self.form.customer.email.clone(), |u| u.email.to_string());

        let status = if transaction_id.is_some() {
            PaymentStatus::Authorized
        } else {
            PaymentStatus::Pending
        };

        OrderSubmission {
            items: items.iter().map(OrderLine::from).collect(),
            customer: OrderCustomer {
                name: self.form.customer.name.clone(),
                email,
                phone: self.form.customer.phone.clone(),
            },
            shipping_address: self.form.address.clone(),
            payment: PaymentInfo {
                method: self.form.payment_method,
                transaction_id,
                status,
            },
            totals,
            summary: analysis.summary(),
            placed_at: Utc::now(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Mutex;

    use bazario_core::{Email, OrderType, UserId};

    use crate::api::types::OrderConfirmation;
    use crate::api::ApiError;
    use crate::payment::PaymentSimulator;
    use crate::services::{TracingNotifier, UserProfile};

    use super::*;

    #[derive(Default)]
    struct FakeOrderService {
        submissions: Mutex<Vec<OrderSubmission>>,
        fail_next: Mutex<bool>,
        omit_order_number: bool,
    }

    impl OrderService for FakeOrderService {
        async fn create_order(
            &self,
            order: &OrderSubmission,
        ) -> std::result::Result<OrderConfirmation, ApiError> {
            if *self.fail_next.lock().unwrap() {
                return Err(ApiError::Status {
                    status: 503,
                    message: "order service unavailable".to_string(),
                });
            }
            self.submissions.lock().unwrap().push(order.clone());
            Ok(OrderConfirmation {
                order_number: (!self.omit_order_number)
                    .then(|| format!("BZ-{}", self.submissions.lock().unwrap().len())),
            })
        }
    }

    fn item(id: &str, price: i64, quantity: u32) -> LineItem {
        LineItem {
            product_id: ProductId::new(id),
            title: format!("Product {id}"),
            price: Decimal::from(price),
            shipping_cost: Decimal::from(150),
            image: None,
            stock: 10,
            quantity,
            selected_size: None,
            vendor: None,
        }
    }

    fn checkout(orders: FakeOrderService) -> Checkout<FakeOrderService, PaymentSimulator> {
        let mut checkout = Checkout::new(
            orders,
            PaymentSimulator::with_seed(7),
            Session::anonymous(),
            Arc::new(TracingNotifier),
            CurrencyCode::PKR,
        );
        let form = checkout.form_mut();
        form.customer.name = "Ayesha Khan".to_string();
        form.customer.email = "ayesha@example.com".to_string();
        form.customer.phone = "+923001234567".to_string();
        form.address.street = "14-B Mall Road".to_string();
        form.address.city = "Lahore".to_string();
        form.address.state = "Punjab".to_string();
        form.address.zip = "54000".to_string();
        form.address.country = "Pakistan".to_string();
        checkout
    }

    #[test]
    fn test_advance_walks_steps_in_order() {
        let mut checkout = checkout(FakeOrderService::default());
        assert_eq!(checkout.step(), CheckoutStep::CustomerInfo);
        assert_eq!(checkout.advance().unwrap(), CheckoutStep::Address);
        assert_eq!(checkout.advance().unwrap(), CheckoutStep::Payment);
        assert_eq!(checkout.advance().unwrap(), CheckoutStep::Review);
        // Review is the last step; advancing re-validates and stays.
        assert_eq!(checkout.advance().unwrap(), CheckoutStep::Review);
    }

    #[test]
    fn test_advance_blocked_by_invalid_step() {
        let mut checkout = checkout(FakeOrderService::default());
        checkout.form_mut().customer.email = "nope".to_string();

        let err = checkout.advance().unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(checkout.step(), CheckoutStep::CustomerInfo);
    }

    #[test]
    fn test_back_never_validates() {
        let mut checkout = checkout(FakeOrderService::default());
        checkout.advance().unwrap();
        // Break the already-validated step, then go back freely.
        checkout.form_mut().customer.email = "nope".to_string();
        assert_eq!(checkout.back(), CheckoutStep::CustomerInfo);
        assert_eq!(checkout.back(), CheckoutStep::CustomerInfo);
    }

    #[tokio::test]
    async fn test_submit_cash_order() {
        let mut checkout = checkout(FakeOrderService::default());
        let items = vec![item("p1", 100, 1), item("p2", 100, 1)];

        let order_number = checkout.submit_items(&items).await.unwrap();
        assert_eq!(order_number, "BZ-1");
        assert!(checkout.is_submitted());

        let submissions = checkout.orders.submissions.lock().unwrap();
        let order = submissions.first().unwrap();
        assert_eq!(order.totals.total, Decimal::from(200));
        assert_eq!(order.totals.shipping, Decimal::ZERO);
        assert_eq!(order.summary.order_type, OrderType::AdminOnly);
        assert_eq!(order.payment.method, PaymentMethod::Cash);
        assert!(order.payment.transaction_id.is_none());
        assert_eq!(order.payment.status, PaymentStatus::Pending);
    }

    #[tokio::test]
    async fn test_submit_empty_order_is_blocked() {
        let mut checkout = checkout(FakeOrderService::default());
        let err = checkout.submit_items(&[]).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert!(checkout.orders.submissions.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_submission_failure_keeps_wizard_retriable() {
        let mut checkout = checkout(FakeOrderService::default());
        *checkout.orders.fail_next.lock().unwrap() = true;
        let items = vec![item("p1", 100, 1)];

        let err = checkout.submit_items(&items).await.unwrap_err();
        assert!(matches!(err, AppError::SubmissionFailed(_)));
        assert!(!checkout.is_submitted());

        // Retry succeeds once the service recovers.
        *checkout.orders.fail_next.lock().unwrap() = false;
        checkout.submit_items(&items).await.unwrap();
    }

    #[tokio::test]
    async fn test_missing_order_number_falls_back_to_placeholder() {
        let orders = FakeOrderService {
            omit_order_number: true,
            ..FakeOrderService::default()
        };
        let mut checkout = checkout(orders);

        let order_number = checkout.submit_items(&[item("p1", 100, 1)]).await.unwrap();
        assert_eq!(order_number, FALLBACK_ORDER_REF);
    }

    #[tokio::test]
    async fn test_session_email_overrides_form_email() {
        let session = Session::authenticated(UserProfile {
            id: UserId::new("u1"),
            name: Some("Ayesha Khan".to_string()),
            email: Email::parse("account@example.com").unwrap(),
            phone: None,
            address: None,
        });
        let mut checkout = Checkout::new(
            FakeOrderService::default(),
            PaymentSimulator::with_seed(7),
            session,
            Arc::new(TracingNotifier),
            CurrencyCode::PKR,
        );
        let form = checkout.form_mut();
        form.customer.name = "Ayesha Khan".to_string();
        form.customer.email = "typo@example.com".to_string();
        form.customer.phone = "+923001234567".to_string();
        form.address.street = "14-B Mall Road".to_string();
        form.address.city = "Lahore".to_string();
        form.address.state = "Punjab".to_string();
        form.address.zip = "54000".to_string();
        form.address.country = "Pakistan".to_string();

        checkout.submit_items(&[item("p1", 100, 1)]).await.unwrap();

        let submissions = checkout.orders.submissions.lock().unwrap();
        assert_eq!(
            submissions.first().unwrap().customer.email,
            "account@example.com"
        );
    }

    #[tokio::test]
    async fn test_vendor_lines_carry_fulfillment_owner() {
        let mut checkout = checkout(FakeOrderService::default());
        let mut vendor_item = item("p2", 300, 1);
        vendor_item.vendor = Some(VendorRef {
            id: bazario_core::VendorId::new("v1"),
            display_name: "Multan Crafts".to_string(),
        });
        let items = vec![item("p1", 100, 2), vendor_item];

        checkout.submit_items(&items).await.unwrap();

        let submissions = checkout.orders.submissions.lock().unwrap();
        let order = submissions.first().unwrap();
        assert_eq!(order.summary.order_type, OrderType::Mixed);
        assert_eq!(
            order.items.first().unwrap().fulfilled_by,
            FulfilledBy::Platform
        );
        assert_eq!(order.items.get(1).unwrap().fulfilled_by, FulfilledBy::Vendor);
        assert_eq!(order.totals.total, Decimal::from(500));
    }
}
